//! Unfiltered UDP payload sniffing
//!
//! The counterpart of a session without the peer: a [`Sniffer`] reads every
//! UDP datagram the raw socket observes, locates the payload with the same
//! IHL-aware parsing the session uses, and hands it back along with the
//! sender. No frames are ever sent.

use rawgram_core::wire::MAX_DATAGRAM;
use rawgram_core::{Endpoint, Error, Result};
use rawgram_packet::{HeaderSet, ParsedFrame};
use tracing::debug;

use crate::transport::RawTransport;

/// Observes all UDP traffic on a raw transport.
///
/// A raw `IPPROTO_UDP` socket delivers complete IP datagrams, so frames are
/// parsed network-layer first; the peer filter is bypassed entirely.
pub struct Sniffer<T: RawTransport> {
    transport: T,
    recv_buf: Vec<u8>,
}

impl<T: RawTransport> Sniffer<T> {
    /// Create a sniffer over an already-open transport
    pub fn new(transport: T) -> Self {
        Self {
            transport,
            recv_buf: vec![0u8; MAX_DATAGRAM],
        }
    }

    /// Block until the next UDP datagram arrives, returning its sender and
    /// payload; `Ok(None)` means the transport closed (zero-length read).
    ///
    /// Non-UDP leakage on the socket is skipped silently; `Truncated` frames
    /// surface as decode errors, same as the session's receive loop.
    pub fn next_datagram(&mut self) -> Result<Option<(Endpoint, Vec<u8>)>> {
        loop {
            let n = self.transport.recv(&mut self.recv_buf)?;
            if n == 0 {
                return Ok(None);
            }

            match ParsedFrame::parse_unfiltered(&self.recv_buf[..n], HeaderSet::IpUdp) {
                Ok(frame) => {
                    let source = Endpoint::new(frame.ip().source(), frame.udp().source_port());
                    debug!(
                        from = %source,
                        payload_len = frame.payload().len(),
                        "sniffed datagram"
                    );
                    return Ok(Some((source, frame.payload().to_vec())));
                }
                Err(Error::NotFromPeer) => {
                    debug!(frame_len = n, "skipping non-UDP frame");
                    continue;
                }
                Err(err) => return Err(err),
            }
        }
    }
}

/// Open a sniffer over a raw `IPPROTO_UDP` socket.
///
/// The socket is receive-only here; no destination is ever addressed and
/// the kernel hands over every inbound UDP datagram.
#[cfg(target_os = "linux")]
pub fn open_sniffer() -> Result<Sniffer<crate::socket::IpSocket>> {
    use std::net::Ipv4Addr;

    let socket = crate::socket::IpSocket::open(Ipv4Addr::UNSPECIFIED, 0, false)?;
    tracing::info!("sniffer opened");
    Ok(Sniffer::new(socket))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::MemoryTransport;
    use rawgram_packet::{assemble, UdpChecksum};
    use std::net::Ipv4Addr;

    fn datagram_from(source: &Endpoint, payload: &[u8]) -> Vec<u8> {
        let receiver = Endpoint::new(Ipv4Addr::new(10, 0, 0, 9), 4242);
        assemble(
            HeaderSet::IpUdp,
            source,
            &receiver,
            payload,
            UdpChecksum::Disabled,
        )
        .unwrap()
        .into_vec()
    }

    #[test]
    fn test_reports_every_source() {
        let one = Endpoint::new(Ipv4Addr::new(10, 0, 0, 1), 9000);
        let other = Endpoint::new(Ipv4Addr::new(172, 16, 0, 5), 5353);

        let mut transport = MemoryTransport::new();
        transport.push_inbound(datagram_from(&one, b"first"));
        transport.push_inbound(datagram_from(&other, b"second"));

        let mut sniffer = Sniffer::new(transport);
        assert_eq!(
            sniffer.next_datagram().unwrap(),
            Some((one, b"first".to_vec()))
        );
        assert_eq!(
            sniffer.next_datagram().unwrap(),
            Some((other, b"second".to_vec()))
        );
        assert_eq!(sniffer.next_datagram().unwrap(), None);
    }

    #[test]
    fn test_skips_non_udp_datagrams() {
        let source = Endpoint::new(Ipv4Addr::new(10, 0, 0, 1), 9000);

        let mut stray = datagram_from(&source, b"x");
        stray[9] = 6; // protocol field: TCP

        let mut transport = MemoryTransport::new();
        transport.push_inbound(stray);
        transport.push_inbound(datagram_from(&source, b"udp"));

        let mut sniffer = Sniffer::new(transport);
        assert_eq!(
            sniffer.next_datagram().unwrap(),
            Some((source, b"udp".to_vec()))
        );
    }

    #[test]
    fn test_truncated_datagram_surfaces() {
        let source = Endpoint::new(Ipv4Addr::new(10, 0, 0, 1), 9000);
        let mut short = datagram_from(&source, b"hello");
        short.truncate(short.len() - 1);

        let mut transport = MemoryTransport::new();
        transport.push_inbound(short);

        let mut sniffer = Sniffer::new(transport);
        assert!(matches!(
            sniffer.next_datagram(),
            Err(Error::Truncated { .. })
        ));
    }
}
