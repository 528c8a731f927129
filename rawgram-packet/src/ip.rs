//! IPv4 header construction and parsing
//!
//! Builders always emit the minimal 20-byte header (IHL 5, no options).
//! Parsing honors the IHL field, so frames carrying options are still
//! located correctly even though we never produce them.

use bytes::{BufMut, BytesMut};
use rawgram_core::wire::{IPPROTO_UDP, IPV4_HEADER_LEN, MAX_UDP_PAYLOAD, UDP_HEADER_LEN};
use rawgram_core::{Error, Result};
use std::net::Ipv4Addr;

use crate::checksum::internet_checksum;

/// IPv4 header builder.
///
/// Version, IHL, TOS, flags, and fragment offset are fixed to the values a
/// single-shot unfragmented UDP datagram needs; total length and checksum
/// are derived at write time.
#[derive(Debug, Clone, Copy)]
pub struct Ipv4Header {
    /// Identification field
    pub identification: u16,
    /// Time to live
    pub ttl: u8,
    /// Protocol number of the next layer
    pub protocol: u8,
    /// Source address
    pub source: Ipv4Addr,
    /// Destination address
    pub destination: Ipv4Addr,
}

impl Ipv4Header {
    /// Header size in bytes (no options)
    pub const SIZE: usize = IPV4_HEADER_LEN;

    /// Create a header for a UDP datagram with the default TTL of 255
    pub fn udp(source: Ipv4Addr, destination: Ipv4Addr) -> Self {
        Self {
            identification: 0,
            ttl: 255,
            protocol: IPPROTO_UDP,
            source,
            destination,
        }
    }

    /// Append the 20 header bytes to `buf`, checksum included.
    ///
    /// `next_len` is the byte count of everything after this header (UDP
    /// header plus payload). Rejects lengths that would overflow the 16-bit
    /// total-length field.
    pub fn write_to(&self, buf: &mut BytesMut, next_len: usize) -> Result<()> {
        if next_len > MAX_UDP_PAYLOAD + UDP_HEADER_LEN {
            return Err(Error::BufferTooLarge {
                len: next_len - UDP_HEADER_LEN,
                max: MAX_UDP_PAYLOAD,
            });
        }
        let total_length = (Self::SIZE + next_len) as u16;

        let start = buf.len();
        buf.put_u8(0x45); // version 4, IHL 5
        buf.put_u8(0); // TOS
        buf.put_u16(total_length);
        buf.put_u16(self.identification);
        buf.put_u16(0); // flags and fragment offset: unfragmented
        buf.put_u8(self.ttl);
        buf.put_u8(self.protocol);
        buf.put_u16(0); // checksum placeholder
        buf.put_slice(&self.source.octets());
        buf.put_slice(&self.destination.octets());

        // Checksum over the finished header with the field still zeroed.
        let checksum = internet_checksum(&buf[start..start + Self::SIZE]);
        buf[start + 10..start + 12].copy_from_slice(&checksum.to_be_bytes());
        Ok(())
    }
}

/// Bounds-checked view over an IPv4 header in a received buffer.
///
/// The header length comes from the IHL field (in 32-bit words); the view
/// is only constructed once the buffer is known to cover it.
#[derive(Debug, Clone, Copy)]
pub struct Ipv4Slice<'a> {
    data: &'a [u8],
    header_len: usize,
}

impl<'a> Ipv4Slice<'a> {
    /// Validate version and IHL and check the buffer covers the header
    pub fn parse(data: &'a [u8]) -> Result<Self> {
        if data.len() < IPV4_HEADER_LEN {
            return Err(Error::Truncated {
                needed: IPV4_HEADER_LEN,
                got: data.len(),
            });
        }

        let version = data[0] >> 4;
        if version != 4 {
            return Err(Error::parsing(format!("IP version {version}, expected 4")));
        }

        let ihl = data[0] & 0x0F;
        let header_len = ihl as usize * 4;
        if header_len < IPV4_HEADER_LEN {
            return Err(Error::parsing(format!("IHL {ihl} below minimum of 5")));
        }
        if data.len() < header_len {
            return Err(Error::Truncated {
                needed: header_len,
                got: data.len(),
            });
        }

        Ok(Self { data, header_len })
    }

    /// True header length in bytes (IHL * 4)
    pub fn header_len(&self) -> usize {
        self.header_len
    }

    /// Total length field: header plus everything after it
    pub fn total_length(&self) -> u16 {
        u16::from_be_bytes([self.data[2], self.data[3]])
    }

    /// Identification field
    pub fn identification(&self) -> u16 {
        u16::from_be_bytes([self.data[4], self.data[5]])
    }

    /// Time to live
    pub fn ttl(&self) -> u8 {
        self.data[8]
    }

    /// Protocol number of the next layer
    pub fn protocol(&self) -> u8 {
        self.data[9]
    }

    /// Header checksum field
    pub fn checksum(&self) -> u16 {
        u16::from_be_bytes([self.data[10], self.data[11]])
    }

    /// Source address
    pub fn source(&self) -> Ipv4Addr {
        Ipv4Addr::new(self.data[12], self.data[13], self.data[14], self.data[15])
    }

    /// Destination address
    pub fn destination(&self) -> Ipv4Addr {
        Ipv4Addr::new(self.data[16], self.data[17], self.data[18], self.data[19])
    }

    /// Bytes following the header (options skipped)
    pub fn payload(&self) -> &'a [u8] {
        &self.data[self.header_len..]
    }

    /// Verify the header checksum: summing the header including the
    /// checksum field must fold to zero
    pub fn verify_checksum(&self) -> bool {
        crate::checksum::verify_checksum(&self.data[..self.header_len])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SRC: Ipv4Addr = Ipv4Addr::new(192, 168, 0, 3);
    const DST: Ipv4Addr = Ipv4Addr::new(192, 168, 0, 6);

    fn build(next_len: usize) -> BytesMut {
        let mut buf = BytesMut::new();
        Ipv4Header::udp(SRC, DST).write_to(&mut buf, next_len).unwrap();
        buf
    }

    #[test]
    fn test_header_layout() {
        let buf = build(13); // 8-byte UDP header + "hello"

        assert_eq!(buf.len(), Ipv4Header::SIZE);
        assert_eq!(buf[0], 0x45);
        assert_eq!(u16::from_be_bytes([buf[2], buf[3]]), 33);
        assert_eq!(buf[8], 255); // TTL
        assert_eq!(buf[9], 17); // UDP
        assert_eq!(&buf[12..16], &SRC.octets());
        assert_eq!(&buf[16..20], &DST.octets());
    }

    #[test]
    fn test_checksum_folds_to_zero() {
        let buf = build(13);
        let slice = Ipv4Slice::parse(&buf).unwrap();
        assert_ne!(slice.checksum(), 0);
        assert!(slice.verify_checksum());
    }

    #[test]
    fn test_parse_accessors() {
        let buf = build(8);
        let slice = Ipv4Slice::parse(&buf).unwrap();

        assert_eq!(slice.header_len(), 20);
        assert_eq!(slice.total_length(), 28);
        assert_eq!(slice.ttl(), 255);
        assert_eq!(slice.protocol(), 17);
        assert_eq!(slice.source(), SRC);
        assert_eq!(slice.destination(), DST);
        assert!(slice.payload().is_empty());
    }

    #[test]
    fn test_parse_honors_ihl() {
        // Hand-built header with IHL 6 (one 4-byte option word).
        let mut data = build(0).to_vec();
        data[0] = 0x46;
        data.extend_from_slice(&[0, 0, 0, 0]); // option word
        data.extend_from_slice(b"rest");

        let slice = Ipv4Slice::parse(&data).unwrap();
        assert_eq!(slice.header_len(), 24);
        assert_eq!(slice.payload(), b"rest");
    }

    #[test]
    fn test_parse_rejects_short_and_bad_version() {
        assert!(matches!(
            Ipv4Slice::parse(&[0x45; 19]),
            Err(Error::Truncated { .. })
        ));

        let mut data = build(0).to_vec();
        data[0] = 0x65; // version 6
        assert!(matches!(
            Ipv4Slice::parse(&data),
            Err(Error::FrameParsing(_))
        ));

        // IHL claims 24 bytes but only 20 are present.
        let mut data = build(0).to_vec();
        data[0] = 0x46;
        assert!(matches!(
            Ipv4Slice::parse(&data),
            Err(Error::Truncated { .. })
        ));
    }

    #[test]
    fn test_write_rejects_oversized_next_layer() {
        let mut buf = BytesMut::new();
        let err = Ipv4Header::udp(SRC, DST)
            .write_to(&mut buf, MAX_UDP_PAYLOAD + UDP_HEADER_LEN + 1)
            .unwrap_err();
        assert!(matches!(err, Error::BufferTooLarge { .. }));
    }
}
