//! Blocking send/receive sessions over a raw transport

use rawgram_core::wire::{ETHERNET_HEADER_LEN, MAX_DATAGRAM};
use rawgram_core::{Endpoint, Error, Result};
use rawgram_packet::{assemble, HeaderSet, ParsedFrame, UdpChecksum};
use std::io;
use tracing::{debug, info};

use crate::transport::RawTransport;

/// One raw UDP exchange with a single peer.
///
/// The header set and both endpoints are fixed when the session opens; the
/// variant used for sending is identical to the one expected on receive.
/// Each call is synchronous: `send` performs one transport write, `receive`
/// blocks until a frame from the configured peer arrives or the transport
/// closes. No state persists across operations beyond the endpoints.
pub struct Session<T: RawTransport> {
    transport: T,
    mode: HeaderSet,
    local: Endpoint,
    remote: Endpoint,
    udp_checksum: UdpChecksum,
    recv_buf: Vec<u8>,
}

impl<T: RawTransport> Session<T> {
    /// Create a session over an already-open transport
    pub fn new(transport: T, mode: HeaderSet, local: Endpoint, remote: Endpoint) -> Self {
        Self {
            transport,
            mode,
            local,
            remote,
            udp_checksum: UdpChecksum::default(),
            recv_buf: vec![0u8; ETHERNET_HEADER_LEN + MAX_DATAGRAM],
        }
    }

    /// Opt in to computing the UDP pseudo-header checksum on send
    pub fn with_udp_checksum(mut self, checksum: UdpChecksum) -> Self {
        self.udp_checksum = checksum;
        self
    }

    /// The session's header set
    pub fn mode(&self) -> HeaderSet {
        self.mode
    }

    /// The local endpoint
    pub fn local(&self) -> &Endpoint {
        &self.local
    }

    /// The remote endpoint
    pub fn remote(&self) -> &Endpoint {
        &self.remote
    }

    /// Borrow the underlying transport
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Assemble one frame around `payload` and send it in a single
    /// transport call.
    ///
    /// `BufferTooLarge` and transport failures are surfaced immediately.
    pub fn send(&mut self, payload: &[u8]) -> Result<()> {
        let frame = assemble(
            self.mode,
            &self.local,
            &self.remote,
            payload,
            self.udp_checksum,
        )?;

        let sent = self.transport.send(frame.as_bytes())?;
        if sent != frame.len() {
            return Err(Error::Io(io::Error::new(
                io::ErrorKind::WriteZero,
                format!("short send: {sent} of {} bytes", frame.len()),
            )));
        }

        debug!(
            to = %self.remote,
            frame_len = frame.len(),
            payload_len = payload.len(),
            "sent frame"
        );
        Ok(())
    }

    /// Block until a frame from the configured peer arrives, returning its
    /// payload; `Ok(None)` means the transport closed (zero-length read).
    ///
    /// The raw socket observes all matching-protocol traffic on the link,
    /// including our own outbound frames, so anything that is not from the
    /// peer is skipped silently and the loop keeps reading. `Truncated` is
    /// surfaced as a decode error rather than retried.
    pub fn receive(&mut self) -> Result<Option<Vec<u8>>> {
        loop {
            let n = self.transport.recv(&mut self.recv_buf)?;
            if n == 0 {
                info!(peer = %self.remote, "transport closed, ending session");
                return Ok(None);
            }

            match ParsedFrame::parse(&self.recv_buf[..n], self.mode, &self.remote) {
                Ok(frame) => {
                    debug!(
                        from = %self.remote,
                        payload_len = frame.payload().len(),
                        "received frame"
                    );
                    return Ok(Some(frame.payload().to_vec()));
                }
                Err(Error::NotFromPeer) => {
                    debug!(frame_len = n, "skipping frame not from peer");
                    continue;
                }
                Err(err) => return Err(err),
            }
        }
    }

    /// End the session, dropping the transport
    pub fn close(self) {
        info!(peer = %self.remote, "session closed");
    }
}

/// Open a session backed by the right OS raw socket for `mode`.
///
/// Link-layer mode opens an `AF_PACKET` socket on `interface` (the remote
/// endpoint must carry a hardware address); the network-layer modes open a
/// raw `IPPROTO_UDP` socket, with `IP_HDRINCL` only when the session builds
/// its own IP headers.
#[cfg(target_os = "linux")]
pub fn open_session(
    mode: HeaderSet,
    interface: &str,
    local: Endpoint,
    remote: Endpoint,
) -> Result<Session<crate::socket::OsTransport>> {
    use crate::socket::{IpSocket, OsTransport, PacketSocket};

    let transport = match mode {
        HeaderSet::EthernetIpUdp => {
            OsTransport::Packet(PacketSocket::open(interface, remote.require_mac()?)?)
        }
        HeaderSet::IpUdp => OsTransport::Ip(IpSocket::open(remote.ip, remote.port, true)?),
        HeaderSet::UdpOnly => OsTransport::Ip(IpSocket::open(remote.ip, remote.port, false)?),
    };

    info!(%local, %remote, ?mode, "session opened");
    Ok(Session::new(transport, mode, local, remote))
}
