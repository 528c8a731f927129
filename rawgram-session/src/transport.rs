//! Transport boundary: the already-open raw socket primitive
//!
//! Socket creation, interface binding, and hardware-address resolution are
//! collaborators outside the packet core; everything the session needs from
//! them is this pair of blocking calls.

use rawgram_core::{Error, Result};
use std::collections::VecDeque;

/// A blocking send/receive primitive over an already-open raw socket.
///
/// `recv` suspends the caller until a frame arrives; a return of `Ok(0)`
/// means the socket was closed and the session should end cleanly.
pub trait RawTransport {
    /// Send one finished frame; returns the number of bytes written
    fn send(&mut self, frame: &[u8]) -> Result<usize>;

    /// Receive one frame into `buf`; returns the number of bytes read,
    /// zero meaning closed
    fn recv(&mut self, buf: &mut [u8]) -> Result<usize>;
}

/// In-memory transport for tests and demos.
///
/// Frames pushed onto the inbound queue are handed out one per `recv`
/// call; sent frames accumulate on the outbound side for inspection. An
/// exhausted inbound queue reads as closed, mirroring a zero-length read.
#[derive(Debug, Default)]
pub struct MemoryTransport {
    inbound: VecDeque<Vec<u8>>,
    outbound: Vec<Vec<u8>>,
    closed: bool,
}

impl MemoryTransport {
    /// Create an empty transport
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a frame to be returned by a later `recv`
    pub fn push_inbound(&mut self, frame: Vec<u8>) {
        self.inbound.push_back(frame);
    }

    /// Frames sent so far, oldest first
    pub fn outbound(&self) -> &[Vec<u8>] {
        &self.outbound
    }

    /// Mark the transport closed; subsequent sends fail
    pub fn close(&mut self) {
        self.closed = true;
    }
}

impl RawTransport for MemoryTransport {
    fn send(&mut self, frame: &[u8]) -> Result<usize> {
        if self.closed {
            return Err(Error::TransportClosed);
        }
        self.outbound.push(frame.to_vec());
        Ok(frame.len())
    }

    fn recv(&mut self, buf: &mut [u8]) -> Result<usize> {
        match self.inbound.pop_front() {
            Some(frame) => {
                let n = frame.len().min(buf.len());
                buf[..n].copy_from_slice(&frame[..n]);
                Ok(n)
            }
            None => Ok(0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_transport_fifo() {
        let mut transport = MemoryTransport::new();
        transport.push_inbound(vec![1, 2, 3]);
        transport.push_inbound(vec![4]);

        let mut buf = [0u8; 16];
        assert_eq!(transport.recv(&mut buf).unwrap(), 3);
        assert_eq!(&buf[..3], &[1, 2, 3]);
        assert_eq!(transport.recv(&mut buf).unwrap(), 1);
        assert_eq!(buf[0], 4);

        // Drained queue reads as closed.
        assert_eq!(transport.recv(&mut buf).unwrap(), 0);
    }

    #[test]
    fn test_memory_transport_records_sends() {
        let mut transport = MemoryTransport::new();
        assert_eq!(transport.send(&[9, 9]).unwrap(), 2);
        assert_eq!(transport.outbound(), &[vec![9, 9]]);
    }

    #[test]
    fn test_send_after_close_fails() {
        let mut transport = MemoryTransport::new();
        transport.close();
        assert!(matches!(
            transport.send(&[1]),
            Err(Error::TransportClosed)
        ));
    }
}
