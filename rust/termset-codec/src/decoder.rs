//! Term set payload decoding.

use std::io;

use byteorder::{LE, ReadBytesExt};
use termset_common::{
    Result,
    error::{Error, ErrorKind},
    verify_data,
};

use crate::{
    config::CodecConfig,
    format::{self, ENCODING_DELTA_VARINT, ENCODING_PLAIN, HEADER_SIZE, MAGIC_VERSION},
    term_set::TermSet,
    varint::{read_varint, zigzag_decode},
};

/// Decodes a payload into a term set using the default configuration.
///
/// An empty payload decodes into an empty set. Malformed, truncated or corrupted
/// payloads fail with a decode error (see [`Error::is_decode_error`]).
pub fn decode(payload: &[u8]) -> Result<TermSet> {
    decode_with_config(payload, &CodecConfig::default())
}

/// Decodes a payload into a term set, rejecting payloads that declare more than
/// `config.max_term_count` terms.
pub fn decode_with_config(payload: &[u8], config: &CodecConfig) -> Result<TermSet> {
    if payload.is_empty() {
        return Ok(TermSet::new());
    }

    let body = format::unframe(payload)?;
    verify_data!(body, body.len() >= HEADER_SIZE);

    let mut r = body;
    let magic = r.read_u32::<LE>().map_err(truncated)?;
    if magic != MAGIC_VERSION {
        return Err(ErrorKind::InvalidFormat {
            element: "term set payload".to_string(),
            message: format!("unexpected signature {magic:#010x}"),
        }
        .into());
    }
    let encoding = r.read_u8().map_err(truncated)?;
    let count = r.read_u32::<LE>().map_err(truncated)? as usize;
    if count > config.max_term_count {
        return Err(ErrorKind::TooManyTerms {
            count,
            limit: config.max_term_count,
        }
        .into());
    }

    let terms = match encoding {
        ENCODING_PLAIN => decode_plain(r, count)?,
        ENCODING_DELTA_VARINT => decode_delta_varint(r, count)?,
        other => {
            return Err(ErrorKind::InvalidFormat {
                element: "term set encoding".to_string(),
                message: format!("unknown encoding {other}"),
            }
            .into());
        }
    };
    Ok(terms)
}

fn decode_plain(mut r: &[u8], count: usize) -> Result<TermSet> {
    verify_data!(values, count.checked_mul(8) == Some(r.len()));
    let mut terms = TermSet::with_capacity(count);
    for _ in 0..count {
        terms.insert(r.read_i64::<LE>().map_err(truncated)?);
    }
    Ok(terms)
}

fn decode_delta_varint(mut r: &[u8], count: usize) -> Result<TermSet> {
    // Every varint takes at least one byte, which bounds the set capacity by the
    // payload size.
    verify_data!(values, r.len() >= count);
    let mut terms = TermSet::with_capacity(count);
    if count > 0 {
        let mut value = zigzag_decode(read_varint(&mut r).map_err(truncated)?);
        terms.insert(value);
        for _ in 1..count {
            let delta = read_varint(&mut r).map_err(truncated)?;
            value = value.wrapping_add(delta as i64);
            terms.insert(value);
        }
    }
    verify_data!(values, r.is_empty());
    Ok(terms)
}

#[cold]
fn truncated(e: io::Error) -> Error {
    ErrorKind::InvalidFormat {
        element: "term set payload".to_string(),
        message: e.to_string(),
    }
    .into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encoder::{TermsEncoding, encode};

    #[test]
    fn test_empty_payload() {
        let terms = decode(&[]).unwrap();
        assert!(terms.is_empty());
    }

    #[test]
    fn test_decode_plain() {
        let payload = encode([10, 20, 30], TermsEncoding::Plain);
        let terms = decode(&payload).unwrap();
        assert_eq!(terms.to_sorted_vec(), vec![10, 20, 30]);
    }

    #[test]
    fn test_decode_delta_varint_extremes() {
        let values = [i64::MIN, -1, 0, 1, i64::MAX];
        let payload = encode(values, TermsEncoding::DeltaVarint);
        assert_eq!(decode(&payload).unwrap().to_sorted_vec(), values.to_vec());
    }

    #[test]
    fn test_unknown_encoding() {
        let mut body = Vec::new();
        body.extend_from_slice(&MAGIC_VERSION.to_le_bytes());
        body.push(7);
        body.extend_from_slice(&0u32.to_le_bytes());
        let err = decode(&format::frame(&body)).unwrap_err();
        assert!(err.is_decode_error());
        assert!(err.to_string().contains("unknown encoding 7"));
    }

    #[test]
    fn test_bad_signature() {
        let mut body = Vec::new();
        body.extend_from_slice(&0xdead_beefu32.to_le_bytes());
        body.push(ENCODING_PLAIN);
        body.extend_from_slice(&0u32.to_le_bytes());
        assert!(decode(&format::frame(&body)).is_err());
    }

    #[test]
    fn test_count_beyond_values() {
        let mut body = Vec::new();
        body.extend_from_slice(&MAGIC_VERSION.to_le_bytes());
        body.push(ENCODING_PLAIN);
        body.extend_from_slice(&3u32.to_le_bytes());
        body.extend_from_slice(&10i64.to_le_bytes());
        let err = decode(&format::frame(&body)).unwrap_err();
        assert!(matches!(err.kind(), ErrorKind::InvalidFormat { .. }));
    }

    #[test]
    fn test_huge_declared_count_is_rejected_without_allocation() {
        let mut body = Vec::new();
        body.extend_from_slice(&MAGIC_VERSION.to_le_bytes());
        body.push(ENCODING_PLAIN);
        body.extend_from_slice(&u32::MAX.to_le_bytes());
        body.extend_from_slice(&10i64.to_le_bytes());
        let config = CodecConfig::default().with_max_term_count(usize::MAX);
        let err = decode_with_config(&format::frame(&body), &config).unwrap_err();
        assert!(matches!(err.kind(), ErrorKind::InvalidFormat { .. }));
    }

    #[test]
    fn test_max_term_count() {
        let payload = encode(0..100, TermsEncoding::DeltaVarint);
        let config = CodecConfig::default().with_max_term_count(99);
        let err = decode_with_config(&payload, &config).unwrap_err();
        assert!(matches!(
            err.kind(),
            ErrorKind::TooManyTerms {
                count: 100,
                limit: 99
            }
        ));
        let config = CodecConfig::default().with_max_term_count(100);
        assert_eq!(decode_with_config(&payload, &config).unwrap().len(), 100);
    }
}
