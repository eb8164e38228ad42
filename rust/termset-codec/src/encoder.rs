//! Term set payload encoding.
//!
//! Query front-ends produce payloads with these functions and ship them to the
//! filters as opaque bytes.

use std::io::{self, Write};

use byteorder::{LE, WriteBytesExt};

use crate::{
    format::{self, ENCODING_DELTA_VARINT, ENCODING_PLAIN, HEADER_SIZE, MAGIC_VERSION},
    hash::hash_value_with_seed,
    varint::{MAX_VARINT_LEN, write_varint, zigzag_encode},
};

/// Layout of the values within a payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TermsEncoding {
    /// Fixed-width little-endian `i64`s.
    Plain,
    /// Sorted values stored as varint deltas; compact for dense or clustered terms.
    #[default]
    DeltaVarint,
}

/// Encodes a set of numeric terms. Duplicates are removed.
///
/// Panics: if there are more than `u32::MAX` distinct terms, the limit of the format.
pub fn encode(values: impl IntoIterator<Item = i64>, encoding: TermsEncoding) -> Vec<u8> {
    let mut values = values.into_iter().collect::<Vec<_>>();
    values.sort_unstable();
    values.dedup();

    let value_size = match encoding {
        TermsEncoding::Plain => 8,
        TermsEncoding::DeltaVarint => MAX_VARINT_LEN,
    };
    let mut body = Vec::with_capacity(HEADER_SIZE + values.len() * value_size);
    write_body(&values, encoding, &mut body).expect("write_body");
    format::frame(&body)
}

/// Hashes byte values with `seed` and encodes the resulting terms.
pub fn encode_hashed<I, V>(values: I, seed: u64, encoding: TermsEncoding) -> Vec<u8>
where
    I: IntoIterator<Item = V>,
    V: AsRef<[u8]>,
{
    encode(
        values
            .into_iter()
            .map(|value| hash_value_with_seed(value.as_ref(), seed)),
        encoding,
    )
}

fn write_body<W: Write>(sorted: &[i64], encoding: TermsEncoding, w: &mut W) -> io::Result<()> {
    let count = u32::try_from(sorted.len()).map_err(|_| {
        io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("{} terms exceed the payload limit", sorted.len()),
        )
    })?;
    w.write_u32::<LE>(MAGIC_VERSION)?;
    match encoding {
        TermsEncoding::Plain => {
            w.write_u8(ENCODING_PLAIN)?;
            w.write_u32::<LE>(count)?;
            for &value in sorted {
                w.write_i64::<LE>(value)?;
            }
        }
        TermsEncoding::DeltaVarint => {
            w.write_u8(ENCODING_DELTA_VARINT)?;
            w.write_u32::<LE>(count)?;
            if let Some((&first, rest)) = sorted.split_first() {
                write_varint(w, zigzag_encode(first))?;
                let mut prev = first;
                for &value in rest {
                    write_varint(w, (value as u64).wrapping_sub(prev as u64))?;
                    prev = value;
                }
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{decoder::decode, hash::hash_value};

    #[test]
    fn test_delta_varint_is_compact() {
        let values = 1_000_000i64..1_010_000;
        let plain = encode(values.clone(), TermsEncoding::Plain);
        let packed = encode(values, TermsEncoding::DeltaVarint);
        assert!(packed.len() * 4 < plain.len());
    }

    #[test]
    fn test_duplicates_collapse() {
        let payload = encode([5, 5, 5, 1], TermsEncoding::Plain);
        assert_eq!(decode(&payload).unwrap().len(), 2);
    }

    #[test]
    fn test_encode_hashed() {
        let payload = encode_hashed(
            ["alice", "carol"],
            crate::TERMSET_HASH_SEED,
            TermsEncoding::default(),
        );
        let terms = decode(&payload).unwrap();
        assert!(terms.contains(hash_value(b"alice")));
        assert!(terms.contains(hash_value(b"carol")));
        assert!(!terms.contains(hash_value(b"bob")));
    }

    #[test]
    fn test_empty_set_is_framed() {
        let payload = encode(std::iter::empty(), TermsEncoding::DeltaVarint);
        assert!(!payload.is_empty());
        assert!(decode(&payload).unwrap().is_empty());
    }
}
