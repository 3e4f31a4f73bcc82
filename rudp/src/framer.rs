//! Encoding and decoding of the fixed-size segment datagrams.
//!
//! Every datagram on the wire is exactly `segment_size + HEADER_SIZE` bytes:
//! a 6-byte header followed by up to `segment_size` bytes of payload,
//! zero-padded out to the fixed datagram size. The header is written in a
//! fixed, portable byte order (little-endian) rather than the host's native
//! order, so two peers on different architectures agree on the wire format.

use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};

/// Size of the segment header: a 4-byte `begin` plus a 2-byte `sizeflag`.
pub const HEADER_SIZE: usize = 6;

/// Bit 10 of `sizeflag` marks a segment as a retransmission request.
const REQUEST_FLAG: i16 = 1 << 10;

/// Mask for the low 10 bits of `sizeflag`, the payload length.
const LENGTH_MASK: i16 = (1 << 10) - 1;

/// A decoded segment header, with a borrowed view of its payload.
#[derive(Debug, PartialEq, Eq)]
pub struct Segment<'a> {
    /// The stream offset this segment starts at.
    pub begin: i32,
    /// The stream offset this segment ends at (exclusive).
    pub end: i32,
    /// Whether this is a retransmission request rather than data.
    pub is_request: bool,
    /// The payload bytes, `end - begin` long. Empty for a request.
    pub payload: &'a [u8],
}

/// Encodes a segment into a datagram of exactly `segment_size + HEADER_SIZE`
/// bytes, zero-padded after the header and payload.
///
/// `payload` must be empty for a request, and exactly `end - begin` bytes
/// long and no more than `segment_size` otherwise.
pub fn encode(begin: i32, end: i32, is_request: bool, payload: &[u8], segment_size: usize) -> Vec<u8> {
    let len = (end - begin) as usize;
    debug_assert!(len <= segment_size, "segment length exceeds segment_size");
    debug_assert!(len < (LENGTH_MASK as usize) + 1, "segment length does not fit in 10 bits");
    debug_assert!(is_request || payload.len() == len, "payload length mismatch");

    let mut sizeflag = len as i16;
    if is_request {
        sizeflag |= REQUEST_FLAG;
    }

    let mut datagram = Vec::with_capacity(segment_size + HEADER_SIZE);
    datagram.write_i32::<LittleEndian>(begin).unwrap();
    datagram.write_i16::<LittleEndian>(sizeflag).unwrap();
    if !is_request {
        datagram.extend_from_slice(payload);
    }
    datagram.resize(segment_size + HEADER_SIZE, 0);
    datagram
}

/// Decodes a datagram produced by [`encode`].
///
/// Returns `None` for a malformed or truncated datagram: anything whose
/// length doesn't match `segment_size + HEADER_SIZE`, or whose declared
/// payload length doesn't fit in what's actually present. The listener
/// discards such datagrams silently, per the protocol's framing-error
/// handling.
pub fn decode(datagram: &[u8], segment_size: usize) -> Option<Segment<'_>> {
    if datagram.len() != segment_size + HEADER_SIZE {
        return None;
    }

    let mut header = &datagram[0..HEADER_SIZE];
    let begin = header.read_i32::<LittleEndian>().ok()?;
    let sizeflag = header.read_i16::<LittleEndian>().ok()?;

    let len = (sizeflag & LENGTH_MASK) as usize;
    let is_request = sizeflag & REQUEST_FLAG != 0;
    if len > segment_size {
        return None;
    }

    let end = begin.checked_add(len as i32)?;
    let payload = if is_request { &[][..] } else { &datagram[HEADER_SIZE..HEADER_SIZE + len] };

    Some(Segment { begin, end, is_request, payload })
}
