//! Linux raw socket transports
//!
//! Two flavors, matching the two socket modes a session can run in:
//!
//! - [`PacketSocket`]: `AF_PACKET`/`SOCK_RAW`, sees complete Ethernet
//!   frames in both directions.
//! - [`IpSocket`]: `AF_INET`/`SOCK_RAW` with `IPPROTO_UDP`; with
//!   `IP_HDRINCL` the caller supplies the IP header, without it the kernel
//!   builds one around the outbound UDP segment. Inbound frames include
//!   the IP header either way.
//!
//! Both require CAP_NET_RAW (or root).

use rawgram_core::{Error, MacAddr, Result};
use std::ffi::CString;
use std::io;
use std::mem;
use std::net::Ipv4Addr;
use std::os::unix::io::RawFd;

use crate::transport::RawTransport;

fn last_os_error() -> Error {
    Error::Io(io::Error::last_os_error())
}

fn send_all(fd: RawFd, frame: &[u8], addr: *const libc::sockaddr, addr_len: u32) -> Result<usize> {
    let n = unsafe {
        libc::sendto(
            fd,
            frame.as_ptr() as *const libc::c_void,
            frame.len(),
            0,
            addr,
            addr_len,
        )
    };
    if n < 0 {
        return Err(last_os_error());
    }
    Ok(n as usize)
}

fn recv_one(fd: RawFd, buf: &mut [u8]) -> Result<usize> {
    let n = unsafe { libc::recv(fd, buf.as_mut_ptr() as *mut libc::c_void, buf.len(), 0) };
    if n < 0 {
        return Err(last_os_error());
    }
    Ok(n as usize)
}

/// `AF_PACKET` raw socket bound to one interface, addressing one peer MAC
pub struct PacketSocket {
    fd: RawFd,
    addr: libc::sockaddr_ll,
}

impl PacketSocket {
    /// Open a packet socket on `interface` targeting `peer_mac`.
    ///
    /// The socket observes all protocols on the link (`ETH_P_ALL`), so the
    /// session's peer filter is what keeps unrelated traffic out.
    pub fn open(interface: &str, peer_mac: MacAddr) -> Result<Self> {
        let name = CString::new(interface)
            .map_err(|_| Error::InterfaceNotFound(interface.to_string()))?;
        let ifindex = unsafe { libc::if_nametoindex(name.as_ptr()) };
        if ifindex == 0 {
            return Err(Error::InterfaceNotFound(interface.to_string()));
        }

        let protocol = (libc::ETH_P_ALL as u16).to_be() as libc::c_int;
        let fd = unsafe { libc::socket(libc::AF_PACKET, libc::SOCK_RAW, protocol) };
        if fd < 0 {
            return Err(last_os_error());
        }

        let mut addr: libc::sockaddr_ll = unsafe { mem::zeroed() };
        addr.sll_family = libc::AF_PACKET as libc::c_ushort;
        addr.sll_ifindex = ifindex as libc::c_int;
        addr.sll_halen = 6;
        addr.sll_addr[..6].copy_from_slice(peer_mac.as_bytes());

        Ok(Self { fd, addr })
    }
}

impl RawTransport for PacketSocket {
    fn send(&mut self, frame: &[u8]) -> Result<usize> {
        send_all(
            self.fd,
            frame,
            &self.addr as *const libc::sockaddr_ll as *const libc::sockaddr,
            mem::size_of::<libc::sockaddr_ll>() as u32,
        )
    }

    fn recv(&mut self, buf: &mut [u8]) -> Result<usize> {
        recv_one(self.fd, buf)
    }
}

impl Drop for PacketSocket {
    fn drop(&mut self) {
        unsafe {
            libc::close(self.fd);
        }
    }
}

/// `AF_INET` raw UDP socket addressing one peer
pub struct IpSocket {
    fd: RawFd,
    addr: libc::sockaddr_in,
}

impl IpSocket {
    /// Open a raw `IPPROTO_UDP` socket toward `peer`.
    ///
    /// With `header_included` the kernel is told (via `IP_HDRINCL`) that
    /// outbound buffers already start with the IP header.
    pub fn open(peer: Ipv4Addr, peer_port: u16, header_included: bool) -> Result<Self> {
        let fd = unsafe { libc::socket(libc::AF_INET, libc::SOCK_RAW, libc::IPPROTO_UDP) };
        if fd < 0 {
            return Err(last_os_error());
        }

        if header_included {
            let flag: libc::c_int = 1;
            let rc = unsafe {
                libc::setsockopt(
                    fd,
                    libc::IPPROTO_IP,
                    libc::IP_HDRINCL,
                    &flag as *const libc::c_int as *const libc::c_void,
                    mem::size_of::<libc::c_int>() as libc::socklen_t,
                )
            };
            if rc < 0 {
                let err = last_os_error();
                unsafe {
                    libc::close(fd);
                }
                return Err(err);
            }
        }

        let mut addr: libc::sockaddr_in = unsafe { mem::zeroed() };
        addr.sin_family = libc::AF_INET as libc::sa_family_t;
        addr.sin_port = peer_port.to_be();
        addr.sin_addr = libc::in_addr {
            s_addr: u32::from(peer).to_be(),
        };

        Ok(Self { fd, addr })
    }
}

impl RawTransport for IpSocket {
    fn send(&mut self, frame: &[u8]) -> Result<usize> {
        send_all(
            self.fd,
            frame,
            &self.addr as *const libc::sockaddr_in as *const libc::sockaddr,
            mem::size_of::<libc::sockaddr_in>() as u32,
        )
    }

    fn recv(&mut self, buf: &mut [u8]) -> Result<usize> {
        recv_one(self.fd, buf)
    }
}

impl Drop for IpSocket {
    fn drop(&mut self) {
        unsafe {
            libc::close(self.fd);
        }
    }
}

/// Either OS-backed transport, selected by the session's header set
pub enum OsTransport {
    /// Link-layer framed
    Packet(PacketSocket),
    /// Network-layer only
    Ip(IpSocket),
}

impl RawTransport for OsTransport {
    fn send(&mut self, frame: &[u8]) -> Result<usize> {
        match self {
            OsTransport::Packet(socket) => socket.send(frame),
            OsTransport::Ip(socket) => socket.send(frame),
        }
    }

    fn recv(&mut self, buf: &mut [u8]) -> Result<usize> {
        match self {
            OsTransport::Packet(socket) => socket.recv(buf),
            OsTransport::Ip(socket) => socket.recv(buf),
        }
    }
}
