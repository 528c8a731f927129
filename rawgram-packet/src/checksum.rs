//! Internet checksum calculation (RFC 1071)
//!
//! Both the IPv4 header checksum and the optional UDP checksum use the same
//! one's-complement-of-sum algorithm; the UDP variant additionally covers a
//! pseudo-header that is never transmitted.

use std::net::Ipv4Addr;

/// Sum a byte region as 16-bit big-endian words into a folded 16-bit value.
///
/// An odd trailing byte is treated as the high byte of a zero-padded word.
fn fold_sum(mut sum: u32, data: &[u8]) -> u32 {
    let mut chunks = data.chunks_exact(2);
    for chunk in &mut chunks {
        sum += u16::from_be_bytes([chunk[0], chunk[1]]) as u32;
    }
    if let Some(&byte) = chunks.remainder().first() {
        sum += (byte as u32) << 8;
    }

    // Fold the carries back in until the sum fits 16 bits.
    while (sum >> 16) != 0 {
        sum = (sum & 0xFFFF) + (sum >> 16);
    }
    sum
}

/// Calculate the Internet checksum over `data`.
///
/// The field being checksummed must contain zero at computation time;
/// callers are responsible for zeroing it first. A zero-length input yields
/// the complement of zero, 0xFFFF.
pub fn internet_checksum(data: &[u8]) -> u16 {
    !(fold_sum(0, data) as u16)
}

/// Calculate the UDP checksum including the IPv4 pseudo-header.
///
/// The pseudo-header (source address, destination address, zero byte,
/// protocol, UDP length) is prepended only for checksum computation and is
/// not part of the transmitted frame. `segment` is the UDP header plus
/// payload, with the checksum field zeroed.
///
/// A computed value of zero is returned as 0xFFFF, since an on-wire zero
/// means "checksum disabled" (RFC 768).
pub fn pseudo_header_checksum(
    src: Ipv4Addr,
    dst: Ipv4Addr,
    protocol: u8,
    segment: &[u8],
) -> u16 {
    let mut pseudo = [0u8; 12];
    pseudo[..4].copy_from_slice(&src.octets());
    pseudo[4..8].copy_from_slice(&dst.octets());
    pseudo[9] = protocol;
    pseudo[10..12].copy_from_slice(&(segment.len() as u16).to_be_bytes());

    let sum = fold_sum(fold_sum(0, &pseudo), segment);
    match !(sum as u16) {
        0 => 0xFFFF,
        checksum => checksum,
    }
}

/// Verify a checksummed region.
///
/// Summing a correct header including its checksum field folds to zero
/// (0xFFFF before complement, which is equivalent in one's complement).
pub fn verify_checksum(data: &[u8]) -> bool {
    let result = internet_checksum(data);
    result == 0 || result == 0xFFFF
}
