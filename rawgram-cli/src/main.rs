//! Interactive raw-socket UDP chat client and sniffer
//!
//! The default mode reads lines from stdin, frames each one by hand
//! (Ethernet/IP/UDP per the selected mode), sends it over a raw socket,
//! and blocks for the peer's response. The `sniff` subcommand instead
//! prints every UDP payload observed on the socket. Both require
//! CAP_NET_RAW or root.

use clap::Parser;
use rawgram_cli::{interface_mac, Cli, Commands};
use rawgram_core::{Endpoint, Error, Result};
use std::io::{self, BufRead, Write};
use tracing_subscriber::EnvFilter;

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if let Err(err) = run(cli) {
        eprintln!("rawgram: {err}");
        std::process::exit(1);
    }
}

fn init_logging(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default)),
        )
        .init();
}

/// Build the two endpoints from the parsed arguments, resolving the local
/// MAC from the interface when it was not given explicitly.
fn endpoints(cli: &Cli) -> Result<(Endpoint, Endpoint)> {
    let (local_addr, remote_addr) = match (cli.local, cli.remote) {
        (Some(local), Some(remote)) => (local, remote),
        _ => {
            return Err(Error::InvalidEndpoint(
                "chat requires --local and --remote".into(),
            ))
        }
    };

    let mut local = Endpoint::new(*local_addr.ip(), local_addr.port());
    let mut remote = Endpoint::new(*remote_addr.ip(), remote_addr.port());

    if cli.mode.header_set().has_link_layer() {
        let interface = cli
            .interface
            .as_deref()
            .ok_or_else(|| Error::InvalidEndpoint("ether mode requires --interface".into()))?;

        let local_mac = match cli.local_mac {
            Some(mac) => mac,
            None => {
                let mac = interface_mac(interface)?;
                tracing::debug!(%interface, %mac, "resolved local hardware address");
                mac
            }
        };
        let remote_mac = cli
            .remote_mac
            .ok_or_else(|| Error::InvalidEndpoint("ether mode requires --remote-mac".into()))?;

        local = local.with_mac(local_mac);
        remote = remote.with_mac(remote_mac);
    }

    Ok((local, remote))
}

#[cfg(target_os = "linux")]
fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Some(Commands::Sniff) => sniff(),
        None => chat(cli),
    }
}

/// Print every UDP datagram the raw socket observes, whoever sent it
#[cfg(target_os = "linux")]
fn sniff() -> Result<()> {
    use rawgram_session::open_sniffer;

    let mut sniffer = open_sniffer()?;
    while let Some((source, payload)) = sniffer.next_datagram()? {
        println!(
            "SNIFFER: UDP datagram from {source}: {}",
            String::from_utf8_lossy(&payload)
        );
    }
    Ok(())
}

#[cfg(target_os = "linux")]
fn chat(cli: Cli) -> Result<()> {
    use rawgram_packet::UdpChecksum;
    use rawgram_session::open_session;

    let (local, remote) = endpoints(&cli)?;
    let checksum = if cli.udp_checksum {
        UdpChecksum::PseudoHeader
    } else {
        UdpChecksum::Disabled
    };

    let interface = cli.interface.as_deref().unwrap_or_default();
    let mut session = open_session(cli.mode.header_set(), interface, local, remote)?
        .with_udp_checksum(checksum);

    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();

    loop {
        print!("Enter message: ");
        io::stdout().flush()?;

        let Some(line) = lines.next() else {
            break;
        };
        let line = line?;

        session.send(line.as_bytes())?;
        println!("CLIENT: sent message to {}: {line}", session.remote());

        match session.receive()? {
            Some(payload) => println!(
                "CLIENT: received response from {}: {}",
                session.remote(),
                String::from_utf8_lossy(&payload)
            ),
            None => {
                println!("CLIENT: connection closed by {}", session.remote());
                break;
            }
        }
    }

    session.close();
    Ok(())
}

#[cfg(not(target_os = "linux"))]
fn run(cli: Cli) -> Result<()> {
    // Endpoint validation still works for a dry run on other platforms.
    if !matches!(cli.command, Some(Commands::Sniff)) {
        let _ = endpoints(&cli)?;
    }
    Err(Error::Io(io::Error::new(
        io::ErrorKind::Unsupported,
        "raw socket transports are only available on Linux",
    )))
}
