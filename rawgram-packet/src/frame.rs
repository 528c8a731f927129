//! Frame assembly and parsing across the layered header set
//!
//! One parameterized assembler and parser covers all three socket modes
//! instead of separate per-mode code paths. The [`HeaderSet`] variant is
//! fixed for the lifetime of a session: the same variant governs what is
//! built on send and what is expected on receive.

use bytes::{BufMut, BytesMut};
use rawgram_core::wire::{ETHERNET_HEADER_LEN, ETHERTYPE_IPV4, IPPROTO_UDP, UDP_HEADER_LEN};
use rawgram_core::{Endpoint, Error, Result};

use crate::ethernet::{EthernetHeader, EthernetSlice};
use crate::ip::{Ipv4Header, Ipv4Slice};
use crate::udp::{self, UdpChecksum, UdpHeader, UdpSlice};

/// Which header layers are hand-built on send for a given socket mode.
///
/// Inbound frames carry an IP header in every mode: a raw `IPPROTO_UDP`
/// socket delivers the IP header on receive even when the kernel built it
/// on send, so only the link-layer modes differ on the parse side.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeaderSet {
    /// Build only the UDP header; the kernel supplies the IP header
    /// (raw `IPPROTO_UDP` socket without `IP_HDRINCL`)
    UdpOnly,
    /// Build IP and UDP headers (`IP_HDRINCL` socket)
    IpUdp,
    /// Build Ethernet, IP, and UDP headers (packet socket)
    EthernetIpUdp,
}

impl HeaderSet {
    /// Whether frames on this socket are link-layer framed
    pub fn has_link_layer(&self) -> bool {
        matches!(self, HeaderSet::EthernetIpUdp)
    }

    /// Bytes of hand-built header preceding the payload on send
    pub fn send_overhead(&self) -> usize {
        match self {
            HeaderSet::UdpOnly => UdpHeader::SIZE,
            HeaderSet::IpUdp => Ipv4Header::SIZE + UdpHeader::SIZE,
            HeaderSet::EthernetIpUdp => {
                EthernetHeader::SIZE + Ipv4Header::SIZE + UdpHeader::SIZE
            }
        }
    }
}

/// An owned, finished outbound frame ready for a single transport call
#[derive(Debug, Clone)]
pub struct RawFrame {
    data: Vec<u8>,
}

impl RawFrame {
    /// Frame bytes, headers first
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    /// Total frame length: all included headers plus the payload
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// A frame always carries at least one header
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Consume the frame, yielding the underlying buffer
    pub fn into_vec(self) -> Vec<u8> {
        self.data
    }
}

/// Assemble headers and payload into one contiguous outbound frame.
///
/// Layer order follows the active [`HeaderSet`] variant. The local endpoint
/// supplies source fields, the remote endpoint destination fields; in
/// link-layer mode both must carry hardware addresses.
///
/// # Errors
///
/// `BufferTooLarge` if the payload exceeds 65507 bytes, `InvalidEndpoint`
/// if link-layer mode is requested without hardware addresses.
pub fn assemble(
    mode: HeaderSet,
    local: &Endpoint,
    remote: &Endpoint,
    payload: &[u8],
    checksum: UdpChecksum,
) -> Result<RawFrame> {
    let mut buf = BytesMut::with_capacity(mode.send_overhead() + payload.len());

    if mode.has_link_layer() {
        EthernetHeader::ipv4(remote.require_mac()?, local.require_mac()?).write_to(&mut buf);
    }

    if mode != HeaderSet::UdpOnly {
        Ipv4Header::udp(local.ip, remote.ip)
            .write_to(&mut buf, UDP_HEADER_LEN + payload.len())?;
    }

    let udp_start = buf.len();
    UdpHeader::new(local.port, remote.port).write_to(&mut buf, payload.len())?;
    buf.put_slice(payload);

    let mut data = buf.to_vec();
    if checksum == UdpChecksum::PseudoHeader {
        udp::fill_checksum(&mut data[udp_start..], local.ip, remote.ip);
    }

    Ok(RawFrame { data })
}

/// A parsed inbound frame: per-layer views plus the isolated payload.
///
/// Borrows the receive buffer for the duration of one receive call; parsing
/// never copies and never reads past the validated length.
#[derive(Debug, Clone, Copy)]
pub struct ParsedFrame<'a> {
    ethernet: Option<EthernetSlice<'a>>,
    ip: Ipv4Slice<'a>,
    udp: UdpSlice<'a>,
    payload: &'a [u8],
}

impl<'a> ParsedFrame<'a> {
    /// Locate header boundaries in `data`, validate lengths, and apply the
    /// peer filter.
    ///
    /// # Errors
    ///
    /// - `Truncated` if `data` ends before the offsets demanded by the
    ///   on-wire length fields (IHL, UDP length).
    /// - `NotFromPeer` if the frame is valid but does not originate from
    ///   `expected_peer` (wrong source address or port), or is non-IPv4 /
    ///   non-UDP traffic observed on the shared raw socket. The receive
    ///   loop recovers from this by reading the next frame.
    pub fn parse(data: &'a [u8], mode: HeaderSet, expected_peer: &Endpoint) -> Result<Self> {
        Self::parse_with(data, mode, Some(expected_peer))
    }

    /// Parse without the peer filter, accepting UDP traffic from any source.
    ///
    /// Used by the sniffer, which observes every UDP datagram on the raw
    /// socket instead of talking to one peer. Non-IPv4 and non-UDP frames
    /// still come back as `NotFromPeer`, and length validation is identical
    /// to the filtered path.
    pub fn parse_unfiltered(data: &'a [u8], mode: HeaderSet) -> Result<Self> {
        Self::parse_with(data, mode, None)
    }

    fn parse_with(
        data: &'a [u8],
        mode: HeaderSet,
        expected_peer: Option<&Endpoint>,
    ) -> Result<Self> {
        let (ethernet, ip_region) = if mode.has_link_layer() {
            let eth = EthernetSlice::parse(data)?;
            if eth.ethertype() != ETHERTYPE_IPV4 {
                return Err(Error::NotFromPeer);
            }
            (Some(eth), &data[ETHERNET_HEADER_LEN..])
        } else {
            (None, data)
        };

        // The IHL field decides where the UDP header really starts.
        let ip = Ipv4Slice::parse(ip_region)?;
        if ip.protocol() != IPPROTO_UDP {
            return Err(Error::NotFromPeer);
        }

        let udp_region = ip.payload();
        let udp = UdpSlice::parse(udp_region)?;

        let udp_len = udp.length() as usize;
        if udp_len < UDP_HEADER_LEN {
            return Err(Error::parsing(format!(
                "UDP length field {udp_len} below the 8-byte header"
            )));
        }
        // The wire length is only trusted once checked against the bytes
        // physically present; Ethernet trailer padding past it is ignored.
        if udp_region.len() < udp_len {
            return Err(Error::Truncated {
                needed: udp_len,
                got: udp_region.len(),
            });
        }

        if let Some(peer) = expected_peer {
            if ip.source() != peer.ip || udp.source_port() != peer.port {
                return Err(Error::NotFromPeer);
            }
        }

        Ok(Self {
            ethernet,
            ip,
            udp,
            payload: &udp_region[UDP_HEADER_LEN..udp_len],
        })
    }

    /// Ethernet header view, present in link-layer mode
    pub fn ethernet(&self) -> Option<EthernetSlice<'a>> {
        self.ethernet
    }

    /// IP header view
    pub fn ip(&self) -> Ipv4Slice<'a> {
        self.ip
    }

    /// UDP header view
    pub fn udp(&self) -> UdpSlice<'a> {
        self.udp
    }

    /// The embedded application payload
    pub fn payload(&self) -> &'a [u8] {
        self.payload
    }
}
