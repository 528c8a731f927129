//! Session layer for rawgram
//!
//! Ties the pure packet code to an actual raw socket: a [`Session`] owns a
//! transport plus the two immutable endpoints of the exchange, assembles
//! frames on send, and runs the filtering receive loop that skips traffic
//! from other hosts on the shared raw socket. A [`Sniffer`] is the
//! receive-only counterpart with the peer filter bypassed: it reports every
//! UDP datagram the socket observes.
//!
//! The transport boundary is the [`RawTransport`] trait; the OS-backed
//! implementations live in [`socket`] (Linux only), and an in-memory
//! [`MemoryTransport`] drives tests without privileges.

pub mod session;
pub mod sniff;
pub mod transport;

#[cfg(target_os = "linux")]
pub mod socket;

pub use session::Session;
pub use sniff::Sniffer;
pub use transport::{MemoryTransport, RawTransport};

#[cfg(target_os = "linux")]
pub use session::open_session;
#[cfg(target_os = "linux")]
pub use sniff::open_sniffer;
#[cfg(target_os = "linux")]
pub use socket::{IpSocket, OsTransport, PacketSocket};
