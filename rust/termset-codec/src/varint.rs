//! LEB128 varints with zigzag encoding for signed values.

use std::io::{self, Read, Write};

use byteorder::{ReadBytesExt, WriteBytesExt};

/// Maximum number of bytes of a LEB128-encoded `u64`.
pub(crate) const MAX_VARINT_LEN: usize = 10;

#[inline]
pub(crate) fn zigzag_encode(value: i64) -> u64 {
    ((value << 1) ^ (value >> 63)) as u64
}

#[inline]
pub(crate) fn zigzag_decode(value: u64) -> i64 {
    ((value >> 1) as i64) ^ -((value & 1) as i64)
}

pub(crate) fn write_varint<W: Write>(w: &mut W, mut value: u64) -> io::Result<()> {
    while value >= 0x80 {
        w.write_u8((value as u8) | 0x80)?;
        value >>= 7;
    }
    w.write_u8(value as u8)
}

/// Reads a LEB128 `u64`. Overlong encodings are reported as `InvalidData`.
pub(crate) fn read_varint<R: Read>(r: &mut R) -> io::Result<u64> {
    let mut value = 0u64;
    for i in 0..MAX_VARINT_LEN {
        let byte = r.read_u8()?;
        let bits = (byte & 0x7f) as u64;
        if i == MAX_VARINT_LEN - 1 && bits > 1 {
            break;
        }
        value |= bits << (7 * i);
        if byte & 0x80 == 0 {
            return Ok(value);
        }
    }
    Err(io::Error::new(io::ErrorKind::InvalidData, "varint overflow"))
}
