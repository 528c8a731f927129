//! Packet construction and parsing library for rawgram
//!
//! This crate builds and parses the byte-exact wire format used to carry
//! UDP application payloads over a raw socket, bypassing the operating
//! system's own UDP/IP/Ethernet stack:
//!
//! - **Ethernet II frames** (optional layer, EtherType 0x0800)
//! - **IPv4** headers with checksum calculation and IHL-aware parsing
//! - **UDP** headers with optional pseudo-header checksum
//!
//! # Architecture
//!
//! - [`checksum`] - Internet checksum calculation (RFC 1071)
//! - [`ethernet`] - Ethernet II header construction and parsing
//! - [`ip`] - IPv4 header construction and parsing
//! - [`udp`] - UDP header construction and parsing
//! - [`frame`] - Frame assembly and parsing across the layered header set
//!
//! # Quick Start
//!
//! ```rust
//! use std::net::Ipv4Addr;
//! use rawgram_core::Endpoint;
//! use rawgram_packet::{assemble, HeaderSet, ParsedFrame, UdpChecksum};
//!
//! let local = Endpoint::new(Ipv4Addr::new(192, 168, 0, 3), 7777);
//! let remote = Endpoint::new(Ipv4Addr::new(192, 168, 0, 6), 8080);
//!
//! let frame = assemble(
//!     HeaderSet::IpUdp,
//!     &local,
//!     &remote,
//!     b"hello",
//!     UdpChecksum::Disabled,
//! )
//! .unwrap();
//!
//! // The receiving side sees our own source as the peer.
//! let parsed = ParsedFrame::parse(frame.as_bytes(), HeaderSet::IpUdp, &local).unwrap();
//! assert_eq!(parsed.payload(), b"hello");
//! ```
//!
//! All functions here are pure mappings over caller-supplied buffers; no
//! socket or I/O access happens in this crate.

pub mod checksum;
pub mod ethernet;
pub mod frame;
pub mod ip;
pub mod udp;

// Re-export commonly used types
pub use checksum::{internet_checksum, pseudo_header_checksum, verify_checksum};
pub use ethernet::{EthernetHeader, EthernetSlice};
pub use frame::{assemble, HeaderSet, ParsedFrame, RawFrame};
pub use ip::{Ipv4Header, Ipv4Slice};
pub use udp::{UdpChecksum, UdpHeader, UdpSlice};
