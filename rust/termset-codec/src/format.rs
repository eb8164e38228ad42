//! Payload layout.
//!
//! ```text
//! u32 body_len | body | u32 checksum(body)
//! body := u32 magic_version | u8 encoding | u32 count | values
//! ```
//!
//! All integers are little endian. The checksum is XXH3-64 of the body folded to
//! 32 bits. `values` is either `count` raw `i64`s (plain) or the ascending values as
//! a zigzag varint followed by `count - 1` varint deltas (delta-varint).

use termset_common::{Result, error::ErrorKind, verify_data};

pub(crate) const MAGIC_VERSION: u32 = 0x5453_0001;

pub(crate) const BODY_LEN_SIZE: usize = 4;

pub(crate) const CHECKSUM_SIZE: usize = 4;

/// `magic_version`, `encoding` and `count`.
pub(crate) const HEADER_SIZE: usize = 4 + 1 + 4;

pub(crate) const ENCODING_PLAIN: u8 = 0;

pub(crate) const ENCODING_DELTA_VARINT: u8 = 1;

pub(crate) fn checksum(buf: &[u8]) -> u32 {
    let h = xxhash_rust::xxh3::xxh3_64(buf);
    (h as u32) ^ ((h >> 32) as u32)
}

/// Validates the framing of a payload and returns its body.
pub(crate) fn unframe(payload: &[u8]) -> Result<&[u8]> {
    verify_data!(payload, payload.len() >= BODY_LEN_SIZE + CHECKSUM_SIZE);
    let (len_bytes, rest) = payload.split_at(BODY_LEN_SIZE);
    let body_len = u32::from_le_bytes([len_bytes[0], len_bytes[1], len_bytes[2], len_bytes[3]])
        as usize;
    verify_data!(body_len, body_len + CHECKSUM_SIZE == rest.len());
    let (body, checksum_bytes) = rest.split_at(body_len);
    let expected = u32::from_le_bytes([
        checksum_bytes[0],
        checksum_bytes[1],
        checksum_bytes[2],
        checksum_bytes[3],
    ]);
    if checksum(body) != expected {
        return Err(ErrorKind::ChecksumMismatch {
            element: "term set payload".to_string(),
        }
        .into());
    }
    Ok(body)
}

pub(crate) fn frame(body: &[u8]) -> Vec<u8> {
    let mut payload = Vec::with_capacity(BODY_LEN_SIZE + body.len() + CHECKSUM_SIZE);
    payload.extend_from_slice(&(body.len() as u32).to_le_bytes());
    payload.extend_from_slice(body);
    payload.extend_from_slice(&checksum(body).to_le_bytes());
    payload
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frame_unframe() {
        let payload = frame(b"body");
        assert_eq!(payload.len(), 4 + 4 + 4);
        assert_eq!(unframe(&payload).unwrap(), b"body");
    }

    #[test]
    fn test_corrupted_body() {
        let mut payload = frame(b"body");
        payload[5] ^= 0x01;
        let err = unframe(&payload).unwrap_err();
        assert!(matches!(err.kind(), ErrorKind::ChecksumMismatch { .. }));
    }

    #[test]
    fn test_length_mismatch() {
        let mut payload = frame(b"body");
        payload.push(0);
        assert!(matches!(
            unframe(&payload).unwrap_err().kind(),
            ErrorKind::InvalidFormat { .. }
        ));
        assert!(unframe(&payload[..6]).is_err());
    }
}
