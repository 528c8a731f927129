//! Common types used throughout rawgram

use std::fmt;
use std::net::Ipv4Addr;
use std::str::FromStr;

/// MAC Address (6 bytes)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MacAddr(pub [u8; 6]);

impl MacAddr {
    /// Create a new MAC address
    pub const fn new(bytes: [u8; 6]) -> Self {
        Self(bytes)
    }

    /// Broadcast MAC address (ff:ff:ff:ff:ff:ff)
    pub const fn broadcast() -> Self {
        Self([0xff, 0xff, 0xff, 0xff, 0xff, 0xff])
    }

    /// Get bytes as slice
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Convert to array
    pub fn octets(&self) -> [u8; 6] {
        self.0
    }
}

impl fmt::Display for MacAddr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:02x}:{:02x}:{:02x}:{:02x}:{:02x}:{:02x}",
            self.0[0], self.0[1], self.0[2], self.0[3], self.0[4], self.0[5]
        )
    }
}

impl FromStr for MacAddr {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.split(':').collect();
        if parts.len() != 6 {
            return Err(crate::Error::InvalidEndpoint(format!(
                "invalid MAC address format '{s}'"
            )));
        }

        let mut bytes = [0u8; 6];
        for (i, part) in parts.iter().enumerate() {
            bytes[i] = u8::from_str_radix(part, 16).map_err(|_| {
                crate::Error::InvalidEndpoint(format!("invalid MAC address hex '{s}'"))
            })?;
        }

        Ok(MacAddr(bytes))
    }
}

impl From<[u8; 6]> for MacAddr {
    fn from(bytes: [u8; 6]) -> Self {
        MacAddr(bytes)
    }
}

/// One end of a raw UDP exchange.
///
/// The hardware address is only required for link-layer framed sessions;
/// network-layer sessions leave it unset. Immutable once a session begins.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Endpoint {
    /// IPv4 address
    pub ip: Ipv4Addr,
    /// UDP port
    pub port: u16,
    /// Hardware address, present in link-layer mode
    pub mac: Option<MacAddr>,
}

impl Endpoint {
    /// Create a network-layer endpoint (no hardware address)
    pub fn new(ip: Ipv4Addr, port: u16) -> Self {
        Self {
            ip,
            port,
            mac: None,
        }
    }

    /// Attach a hardware address for link-layer framing
    pub fn with_mac(mut self, mac: MacAddr) -> Self {
        self.mac = Some(mac);
        self
    }

    /// Hardware address, or an error naming the missing field
    pub fn require_mac(&self) -> crate::Result<MacAddr> {
        self.mac.ok_or_else(|| {
            crate::Error::InvalidEndpoint(format!(
                "{self} has no hardware address but the socket mode is link-layer framed"
            ))
        })
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.ip, self.port)
    }
}

/// On-wire constants
pub mod wire {
    /// EtherType for IPv4 (0x0800)
    pub const ETHERTYPE_IPV4: u16 = 0x0800;

    /// IP protocol number for UDP
    pub const IPPROTO_UDP: u8 = 17;

    /// Ethernet header size: dst MAC + src MAC + EtherType
    pub const ETHERNET_HEADER_LEN: usize = 14;

    /// IPv4 header size without options
    pub const IPV4_HEADER_LEN: usize = 20;

    /// UDP header size
    pub const UDP_HEADER_LEN: usize = 8;

    /// Largest UDP payload that fits a 65535-byte IPv4 datagram
    /// (65535 - 20 IP - 8 UDP)
    pub const MAX_UDP_PAYLOAD: usize = 65507;

    /// Largest IPv4 datagram, used to size receive buffers
    pub const MAX_DATAGRAM: usize = 65535;
}
