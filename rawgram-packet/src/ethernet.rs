//! Ethernet II header construction and parsing
//!
//! Only the fixed 14-byte header matters here: destination MAC, source MAC,
//! and the 16-bit big-endian EtherType announcing the next layer.

use bytes::{BufMut, BytesMut};
use rawgram_core::wire::{ETHERNET_HEADER_LEN, ETHERTYPE_IPV4};
use rawgram_core::{Error, MacAddr, Result};

/// Ethernet II header builder
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EthernetHeader {
    /// Destination MAC address
    pub destination: MacAddr,
    /// Source MAC address
    pub source: MacAddr,
    /// Next-protocol field, big-endian on the wire
    pub ethertype: u16,
}

impl EthernetHeader {
    /// Header size in bytes
    pub const SIZE: usize = ETHERNET_HEADER_LEN;

    /// Create a header carrying IPv4
    pub fn ipv4(destination: MacAddr, source: MacAddr) -> Self {
        Self {
            destination,
            source,
            ethertype: ETHERTYPE_IPV4,
        }
    }

    /// Append the 14 header bytes to `buf`
    pub fn write_to(&self, buf: &mut BytesMut) {
        buf.put_slice(self.destination.as_bytes());
        buf.put_slice(self.source.as_bytes());
        buf.put_u16(self.ethertype);
    }
}

/// Bounds-checked view over an Ethernet header in a received buffer
#[derive(Debug, Clone, Copy)]
pub struct EthernetSlice<'a> {
    data: &'a [u8],
}

impl<'a> EthernetSlice<'a> {
    /// Validate that `data` holds at least a complete Ethernet header
    pub fn parse(data: &'a [u8]) -> Result<Self> {
        if data.len() < ETHERNET_HEADER_LEN {
            return Err(Error::Truncated {
                needed: ETHERNET_HEADER_LEN,
                got: data.len(),
            });
        }
        Ok(Self { data })
    }

    /// Destination MAC address
    pub fn destination(&self) -> MacAddr {
        let mut bytes = [0u8; 6];
        bytes.copy_from_slice(&self.data[0..6]);
        MacAddr(bytes)
    }

    /// Source MAC address
    pub fn source(&self) -> MacAddr {
        let mut bytes = [0u8; 6];
        bytes.copy_from_slice(&self.data[6..12]);
        MacAddr(bytes)
    }

    /// EtherType of the encapsulated layer
    pub fn ethertype(&self) -> u16 {
        u16::from_be_bytes([self.data[12], self.data[13]])
    }

    /// Bytes following the header
    pub fn payload(&self) -> &'a [u8] {
        &self.data[ETHERNET_HEADER_LEN..]
    }
}
