//! Write-direction counterparts of the [`decoding`](crate::decoding) primitives.
//!
//! Used to frame outbound requests. All integers are big-endian. A writer
//! that fails because a length does not fit its prefix writes nothing.

use bytes::BufMut;

use crate::consistency::Consistency;
use crate::decoding::{StringMap, StringMultimap, BYTES_ABSENT, SHORT_BYTES_ABSENT};
use crate::error::EncodingError;

/// Largest count or length a `[short]` prefix carries.
pub const MAX_SHORT_LENGTH: usize = u16::MAX as usize;

/// Largest `[short bytes]` length; the high bit marks an absent value.
pub const MAX_SHORT_BYTES_LENGTH: usize = SHORT_BYTES_ABSENT as usize - 1;

/// Largest length an `[int]` prefix carries.
pub const MAX_INT_LENGTH: usize = i32::MAX as usize;

/// Convert `len` to its prefix type, rejecting anything above `max`.
pub(crate) fn length<T: TryFrom<usize>>(
    what: &'static str,
    len: usize,
    max: usize,
) -> Result<T, EncodingError> {
    let too_long = || EncodingError::TooLong { what, len, max };
    if len > max {
        return Err(too_long());
    }
    T::try_from(len).map_err(|_| too_long())
}

pub fn write_byte(buf: &mut impl BufMut, value: u8) {
    buf.put_u8(value);
}

pub fn write_int(buf: &mut impl BufMut, value: i32) {
    buf.put_i32(value);
}

pub fn write_short(buf: &mut impl BufMut, value: u16) {
    buf.put_u16(value);
}

pub fn write_string(buf: &mut impl BufMut, value: &str) -> Result<(), EncodingError> {
    let len = length("a string", value.len(), MAX_SHORT_LENGTH)?;
    write_short(buf, len);
    buf.put_slice(value.as_bytes());
    Ok(())
}

pub fn write_long_string(buf: &mut impl BufMut, value: &str) -> Result<(), EncodingError> {
    let len = length("a long string", value.len(), MAX_INT_LENGTH)?;
    write_int(buf, len);
    buf.put_slice(value.as_bytes());
    Ok(())
}

/// Write `[bytes]`; `None` is encoded with the absent sentinel.
pub fn write_bytes(buf: &mut impl BufMut, value: Option<&[u8]>) -> Result<(), EncodingError> {
    match value {
        Some(bytes) => {
            let len = length("a bytes value", bytes.len(), MAX_INT_LENGTH)?;
            write_int(buf, len);
            buf.put_slice(bytes);
        }
        None => buf.put_u32(BYTES_ABSENT),
    }
    Ok(())
}

/// Write `[short bytes]`; `None` is encoded with the absent sentinel.
pub fn write_short_bytes(buf: &mut impl BufMut, value: Option<&[u8]>) -> Result<(), EncodingError> {
    match value {
        Some(bytes) => {
            let len = length("a short bytes value", bytes.len(), MAX_SHORT_BYTES_LENGTH)?;
            write_short(buf, len);
            buf.put_slice(bytes);
        }
        None => write_short(buf, SHORT_BYTES_ABSENT),
    }
    Ok(())
}

pub fn write_string_list(buf: &mut impl BufMut, values: &[String]) -> Result<(), EncodingError> {
    let count = length("a string list", values.len(), MAX_SHORT_LENGTH)?;
    // Elements are checked up front so a failure leaves `buf` as it was.
    for value in values {
        length::<u16>("a string", value.len(), MAX_SHORT_LENGTH)?;
    }
    write_short(buf, count);
    for value in values {
        write_string(buf, value)?;
    }
    Ok(())
}

pub fn write_string_map(buf: &mut impl BufMut, map: &StringMap) -> Result<(), EncodingError> {
    let count = length("a string map", map.len(), MAX_SHORT_LENGTH)?;
    for (key, value) in map {
        length::<u16>("a string", key.len(), MAX_SHORT_LENGTH)?;
        length::<u16>("a string", value.len(), MAX_SHORT_LENGTH)?;
    }
    write_short(buf, count);
    for (key, value) in map {
        write_string(buf, key)?;
        write_string(buf, value)?;
    }
    Ok(())
}

pub fn write_string_multimap(
    buf: &mut impl BufMut,
    map: &StringMultimap,
) -> Result<(), EncodingError> {
    let count = length("a string multimap", map.len(), MAX_SHORT_LENGTH)?;
    for (key, values) in map {
        length::<u16>("a string", key.len(), MAX_SHORT_LENGTH)?;
        length::<u16>("a string list", values.len(), MAX_SHORT_LENGTH)?;
        for value in values {
            length::<u16>("a string", value.len(), MAX_SHORT_LENGTH)?;
        }
    }
    write_short(buf, count);
    for (key, values) in map {
        write_string(buf, key)?;
        write_string_list(buf, values)?;
    }
    Ok(())
}

pub fn write_consistency(buf: &mut impl BufMut, consistency: Consistency) {
    write_short(buf, consistency.index());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absent_sentinels() {
        let mut out = Vec::new();
        write_bytes(&mut out, None).unwrap();
        write_short_bytes(&mut out, None).unwrap();
        assert_eq!(out, vec![0x80, 0, 0, 0, 0x80, 0]);
    }

    #[test]
    fn string_is_length_prefixed() {
        let mut out = Vec::new();
        write_string(&mut out, "ab").unwrap();
        write_long_string(&mut out, "c").unwrap();
        assert_eq!(out, vec![0, 2, b'a', b'b', 0, 0, 0, 1, b'c']);
    }

    #[test]
    fn consistency_is_a_short_index() {
        let mut out = Vec::new();
        write_consistency(&mut out, Consistency::LocalOne);
        assert_eq!(out, vec![0, 0x0a]);
    }

    #[test]
    fn string_over_short_limit_is_rejected() {
        let long = "x".repeat(70_000);
        let mut out = Vec::new();
        assert_eq!(
            write_string(&mut out, &long),
            Err(EncodingError::TooLong {
                what: "a string",
                len: 70_000,
                max: MAX_SHORT_LENGTH,
            })
        );
        assert!(out.is_empty());

        write_long_string(&mut out, &long).unwrap();
        assert_eq!(&out[..4], &70_000i32.to_be_bytes());
        assert_eq!(out.len(), 4 + 70_000);
    }

    #[test]
    fn string_at_short_limit_is_accepted() {
        let mut out = Vec::new();
        write_string(&mut out, &"y".repeat(MAX_SHORT_LENGTH)).unwrap();
        assert_eq!(&out[..2], &[0xff, 0xff]);
    }

    #[test]
    fn short_bytes_cannot_collide_with_absent_sentinel() {
        let mut out = Vec::new();
        let value = vec![0u8; SHORT_BYTES_ABSENT as usize];
        assert!(matches!(
            write_short_bytes(&mut out, Some(&value)),
            Err(EncodingError::TooLong { max: MAX_SHORT_BYTES_LENGTH, .. })
        ));
        assert!(out.is_empty());
        write_short_bytes(&mut out, Some(&value[1..])).unwrap();
        assert_eq!(&out[..2], &[0x7f, 0xff]);
    }

    #[test]
    fn oversized_list_element_writes_nothing() {
        let values = vec!["ok".to_string(), "z".repeat(70_000)];
        let mut out = Vec::new();
        assert!(write_string_list(&mut out, &values).is_err());
        assert!(out.is_empty());
    }

    #[test]
    fn oversized_list_count_is_rejected() {
        let values = vec![String::new(); MAX_SHORT_LENGTH + 1];
        let mut out = Vec::new();
        assert_eq!(
            write_string_list(&mut out, &values),
            Err(EncodingError::TooLong {
                what: "a string list",
                len: MAX_SHORT_LENGTH + 1,
                max: MAX_SHORT_LENGTH,
            })
        );
        assert!(out.is_empty());
    }
}
