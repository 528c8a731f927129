//! UDP header construction and parsing
//!
//! The checksum is disabled (sent as zero) by default, which is valid for
//! UDP over IPv4. Pseudo-header computation is an explicit opt-in applied
//! after the header and payload are in place.

use bytes::{BufMut, BytesMut};
use rawgram_core::wire::{IPPROTO_UDP, MAX_UDP_PAYLOAD, UDP_HEADER_LEN};
use rawgram_core::{Error, Result};
use std::net::Ipv4Addr;

use crate::checksum::pseudo_header_checksum;

/// UDP checksum policy for outbound frames
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UdpChecksum {
    /// Send zero in the checksum field (no checksum, valid for IPv4)
    #[default]
    Disabled,
    /// Compute the RFC 768 checksum over the pseudo-header and segment
    PseudoHeader,
}

/// UDP header builder
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UdpHeader {
    /// Source port
    pub source_port: u16,
    /// Destination port
    pub destination_port: u16,
}

impl UdpHeader {
    /// Header size in bytes
    pub const SIZE: usize = UDP_HEADER_LEN;

    /// Create a header between two ports
    pub fn new(source_port: u16, destination_port: u16) -> Self {
        Self {
            source_port,
            destination_port,
        }
    }

    /// Append the 8 header bytes to `buf` with the checksum field zeroed.
    ///
    /// Rejects payloads that would overflow the 16-bit length field inside
    /// a maximum-size IPv4 datagram (65507 bytes).
    pub fn write_to(&self, buf: &mut BytesMut, payload_len: usize) -> Result<()> {
        if payload_len > MAX_UDP_PAYLOAD {
            return Err(Error::BufferTooLarge {
                len: payload_len,
                max: MAX_UDP_PAYLOAD,
            });
        }
        buf.put_u16(self.source_port);
        buf.put_u16(self.destination_port);
        buf.put_u16((Self::SIZE + payload_len) as u16);
        buf.put_u16(0);
        Ok(())
    }
}

/// Compute and fill in the checksum of a finished UDP segment.
///
/// `segment` is the 8-byte header followed by the payload, with the
/// checksum field still zero from [`UdpHeader::write_to`].
pub fn fill_checksum(segment: &mut [u8], src: Ipv4Addr, dst: Ipv4Addr) {
    debug_assert!(segment.len() >= UDP_HEADER_LEN);
    debug_assert_eq!(&segment[6..8], &[0, 0]);
    let checksum = pseudo_header_checksum(src, dst, IPPROTO_UDP, segment);
    segment[6..8].copy_from_slice(&checksum.to_be_bytes());
}

/// Bounds-checked view over a UDP header in a received buffer
#[derive(Debug, Clone, Copy)]
pub struct UdpSlice<'a> {
    data: &'a [u8],
}

impl<'a> UdpSlice<'a> {
    /// Validate that `data` holds at least a complete UDP header
    pub fn parse(data: &'a [u8]) -> Result<Self> {
        if data.len() < UDP_HEADER_LEN {
            return Err(Error::Truncated {
                needed: UDP_HEADER_LEN,
                got: data.len(),
            });
        }
        Ok(Self { data })
    }

    /// Source port
    pub fn source_port(&self) -> u16 {
        u16::from_be_bytes([self.data[0], self.data[1]])
    }

    /// Destination port
    pub fn destination_port(&self) -> u16 {
        u16::from_be_bytes([self.data[2], self.data[3]])
    }

    /// Length field: header plus payload
    pub fn length(&self) -> u16 {
        u16::from_be_bytes([self.data[4], self.data[5]])
    }

    /// Checksum field (zero means disabled)
    pub fn checksum(&self) -> u16 {
        u16::from_be_bytes([self.data[6], self.data[7]])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_layout() {
        let mut buf = BytesMut::new();
        UdpHeader::new(7777, 8080).write_to(&mut buf, 5).unwrap();

        assert_eq!(buf.len(), UdpHeader::SIZE);
        assert_eq!(u16::from_be_bytes([buf[0], buf[1]]), 7777);
        assert_eq!(u16::from_be_bytes([buf[2], buf[3]]), 8080);
        assert_eq!(u16::from_be_bytes([buf[4], buf[5]]), 13);
        assert_eq!(u16::from_be_bytes([buf[6], buf[7]]), 0);
    }

    #[test]
    fn test_payload_length_boundary() {
        let mut buf = BytesMut::new();
        let header = UdpHeader::new(1, 2);

        assert!(header.write_to(&mut buf, MAX_UDP_PAYLOAD).is_ok());

        let err = header.write_to(&mut buf, MAX_UDP_PAYLOAD + 1).unwrap_err();
        match err {
            Error::BufferTooLarge { len, max } => {
                assert_eq!(len, MAX_UDP_PAYLOAD + 1);
                assert_eq!(max, MAX_UDP_PAYLOAD);
            }
            other => panic!("expected BufferTooLarge, got {other:?}"),
        }
    }

    #[test]
    fn test_fill_checksum_verifies() {
        let src = Ipv4Addr::new(10, 0, 0, 1);
        let dst = Ipv4Addr::new(10, 0, 0, 2);

        let mut buf = BytesMut::new();
        UdpHeader::new(9000, 9001).write_to(&mut buf, 4).unwrap();
        buf.put_slice(b"ping");

        let mut segment = buf.to_vec();
        fill_checksum(&mut segment, src, dst);

        let slice = UdpSlice::parse(&segment).unwrap();
        assert_ne!(slice.checksum(), 0);

        // Re-summing pseudo-header + segment with the field filled must
        // fold to zero.
        let mut covered = Vec::new();
        covered.extend_from_slice(&src.octets());
        covered.extend_from_slice(&dst.octets());
        covered.extend_from_slice(&[0, IPPROTO_UDP]);
        covered.extend_from_slice(&(segment.len() as u16).to_be_bytes());
        covered.extend_from_slice(&segment);
        assert!(crate::checksum::verify_checksum(&covered));
    }

    #[test]
    fn test_parse_short_buffer() {
        assert!(matches!(
            UdpSlice::parse(&[0u8; 7]),
            Err(Error::Truncated { .. })
        ));
    }
}
