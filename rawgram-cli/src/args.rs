//! CLI argument parsing

use clap::{Parser, Subcommand, ValueEnum};
use rawgram_core::MacAddr;
use rawgram_packet::HeaderSet;
use std::net::SocketAddrV4;

/// Which headers the client hand-builds, one per raw socket flavor
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// UDP header only; the kernel builds the IP header
    Udp,
    /// IP and UDP headers (IP_HDRINCL)
    Ip,
    /// Ethernet, IP, and UDP headers (packet socket)
    Ether,
}

impl Mode {
    /// The header set this mode maps to
    pub fn header_set(self) -> HeaderSet {
        match self {
            Mode::Udp => HeaderSet::UdpOnly,
            Mode::Ip => HeaderSet::IpUdp,
            Mode::Ether => HeaderSet::EthernetIpUdp,
        }
    }
}

#[derive(Parser, Debug)]
#[command(name = "rawgram")]
#[command(version, about = "Raw-socket UDP chat client and sniffer", long_about = None)]
pub struct Cli {
    /// Socket mode
    #[arg(short, long, value_enum, default_value_t = Mode::Ip)]
    pub mode: Mode,

    /// Local address as ip:port (required for chat)
    #[arg(short, long)]
    pub local: Option<SocketAddrV4>,

    /// Remote address as ip:port (required for chat)
    #[arg(short, long)]
    pub remote: Option<SocketAddrV4>,

    /// Network interface (required in ether mode)
    #[arg(short = 'I', long)]
    pub interface: Option<String>,

    /// Local MAC address; defaults to the interface's own in ether mode
    #[arg(long, value_name = "MAC")]
    pub local_mac: Option<MacAddr>,

    /// Remote MAC address (required in ether mode)
    #[arg(long, value_name = "MAC")]
    pub remote_mac: Option<MacAddr>,

    /// Compute the UDP pseudo-header checksum instead of sending zero
    #[arg(long)]
    pub udp_checksum: bool,

    /// Verbose output (-v, -vv for increasing verbosity)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print the payload of every UDP datagram observed on the raw socket
    Sniff,
}
