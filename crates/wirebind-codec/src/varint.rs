//! LEB128 unsigned variable-length integers.

/// Maximum encoded length of a `u64`.
pub const MAX_LEN: usize = 10;

/// Number of bytes [`encode`] produces for `value`.
pub fn encoded_len(mut value: u64) -> usize {
    let mut len = 1;
    while value >= 0x80 {
        value >>= 7;
        len += 1;
    }
    len
}

/// Encode `value` at `offset`, returning the number of bytes written.
pub fn encode(mut value: u64, buf: &mut [u8], offset: usize) -> usize {
    let mut pos = offset;
    while value >= 0x80 {
        buf[pos] = (value as u8) | 0x80;
        value >>= 7;
        pos += 1;
    }
    buf[pos] = value as u8;
    pos + 1 - offset
}

/// Decode a value starting at `offset`.
///
/// Continuation bits past the tenth byte are ignored, as are bits that do not fit a `u64`.
pub fn decode(buf: &[u8], offset: usize) -> u64 {
    let mut value = 0u64;
    let mut shift = 0u32;
    for &byte in buf[offset..].iter().take(MAX_LEN) {
        value |= u64::from(byte & 0x7f).checked_shl(shift).unwrap_or(0);
        if byte & 0x80 == 0 {
            break;
        }
        shift += 7;
    }
    value
}
