//! Frame decoder — protocol primitives read off a byte cursor.
//!
//! Every `read_*` function takes the frame buffer by `&mut Bytes`, consumes
//! exactly the bytes of the value it returns and advances the cursor. Bounds
//! are checked before any byte is touched, so a truncated frame fails with a
//! [`DecodingError`] and leaves the buffer exactly as it was.
//!
//! ```text
//! int          4 bytes, big-endian signed
//! short        2 bytes, big-endian unsigned
//! string       [short n][n bytes UTF-8]
//! long string  [int n][n bytes UTF-8]
//! bytes        [int n][n bytes]      n with high bit set => absent
//! short bytes  [short n][n bytes]    n with high bit set => absent
//! ```

use bytes::{Buf, Bytes};
use indexmap::IndexMap;

use crate::consistency::Consistency;
use crate::error::DecodingError;

/// `[string map]` — insertion order is wire order.
pub type StringMap = IndexMap<String, String>;

/// `[string multimap]` — insertion order is wire order.
pub type StringMultimap = IndexMap<String, Vec<String>>;

/// High bit of an int length prefix: the `[bytes]` value is absent.
pub const BYTES_ABSENT: u32 = 0x8000_0000;

/// High bit of a short length prefix: the `[short bytes]` value is absent.
pub const SHORT_BYTES_ABSENT: u16 = 0x8000;

type Result<T> = std::result::Result<T, DecodingError>;

fn ensure(buffer: &Bytes, needed: usize, what: &'static str) -> Result<()> {
    if buffer.remaining() < needed {
        return Err(DecodingError::Underflow {
            what,
            needed,
            available: buffer.remaining(),
        });
    }
    Ok(())
}

/// Run `decode` against a copy of the cursor and commit only on success.
fn atomically<T>(buffer: &mut Bytes, decode: impl FnOnce(&mut Bytes) -> Result<T>) -> Result<T> {
    let mut cursor = buffer.clone();
    let value = decode(&mut cursor)?;
    *buffer = cursor;
    Ok(value)
}

fn take(buffer: &mut Bytes, len: usize, what: &'static str) -> Result<Bytes> {
    ensure(buffer, len, what)?;
    Ok(buffer.split_to(len))
}

fn utf8(raw: Bytes, what: &'static str) -> Result<String> {
    String::from_utf8(raw.to_vec()).map_err(|_| DecodingError::InvalidUtf8 { what })
}

pub fn read_byte(buffer: &mut Bytes) -> Result<u8> {
    ensure(buffer, 1, "a byte")?;
    Ok(buffer.get_u8())
}

pub fn read_int(buffer: &mut Bytes) -> Result<i32> {
    ensure(buffer, 4, "an int")?;
    Ok(buffer.get_i32())
}

pub fn read_short(buffer: &mut Bytes) -> Result<u16> {
    ensure(buffer, 2, "a short")?;
    Ok(buffer.get_u16())
}

pub fn read_string(buffer: &mut Bytes) -> Result<String> {
    atomically(buffer, |cursor| {
        let len = read_short(cursor)? as usize;
        utf8(take(cursor, len, "a string")?, "a string")
    })
}

pub fn read_long_string(buffer: &mut Bytes) -> Result<String> {
    atomically(buffer, |cursor| {
        // A negative length reads as a huge one and fails the bounds check.
        let len = read_int(cursor)? as u32 as usize;
        utf8(take(cursor, len, "a long string")?, "a long string")
    })
}

/// Read `[bytes]`. `None` means the value is absent, which is distinct from
/// `Some` of an empty payload.
pub fn read_bytes(buffer: &mut Bytes) -> Result<Option<Bytes>> {
    atomically(buffer, |cursor| {
        let len = read_int(cursor)? as u32;
        if len & BYTES_ABSENT == BYTES_ABSENT {
            return Ok(None);
        }
        take(cursor, len as usize, "a byte array").map(Some)
    })
}

/// Read `[short bytes]`. `None` means the value is absent.
pub fn read_short_bytes(buffer: &mut Bytes) -> Result<Option<Bytes>> {
    atomically(buffer, |cursor| {
        let len = read_short(cursor)?;
        if len & SHORT_BYTES_ABSENT == SHORT_BYTES_ABSENT {
            return Ok(None);
        }
        take(cursor, len as usize, "a short byte array").map(Some)
    })
}

pub fn read_string_list(buffer: &mut Bytes) -> Result<Vec<String>> {
    atomically(buffer, |cursor| {
        let count = read_short(cursor)?;
        (0..count).map(|_| read_string(cursor)).collect()
    })
}

/// Read `[string map]`. A repeated key keeps its first position and the
/// last value.
pub fn read_string_map(buffer: &mut Bytes) -> Result<StringMap> {
    atomically(buffer, |cursor| {
        let count = read_short(cursor)?;
        let mut map = StringMap::with_capacity(count as usize);
        for _ in 0..count {
            let key = read_string(cursor)?;
            map.insert(key, read_string(cursor)?);
        }
        Ok(map)
    })
}

pub fn read_string_multimap(buffer: &mut Bytes) -> Result<StringMultimap> {
    atomically(buffer, |cursor| {
        let count = read_short(cursor)?;
        let mut map = StringMultimap::with_capacity(count as usize);
        for _ in 0..count {
            let key = read_string(cursor)?;
            map.insert(key, read_string_list(cursor)?);
        }
        Ok(map)
    })
}

/// Read an `[option]` id with no payload.
pub fn read_option(buffer: &mut Bytes) -> Result<u16> {
    read_short(buffer)
}

/// Read an `[option]` id and then its payload, whose shape depends on the id.
pub fn read_option_with<T, F>(buffer: &mut Bytes, decode_value: F) -> Result<(u16, T)>
where
    F: FnOnce(u16, &mut Bytes) -> Result<T>,
{
    atomically(buffer, |cursor| {
        let id = read_short(cursor)?;
        let value = decode_value(id, cursor)?;
        Ok((id, value))
    })
}

pub fn read_consistency(buffer: &mut Bytes) -> Result<Consistency> {
    atomically(buffer, |cursor| {
        let index = read_short(cursor)?;
        Consistency::from_index(index)
    })
}

pub fn read_uuid(_buffer: &mut Bytes) -> Result<[u8; 16]> {
    Err(DecodingError::Unsupported { primitive: "uuid" })
}

pub fn read_inet(_buffer: &mut Bytes) -> Result<std::net::SocketAddr> {
    Err(DecodingError::Unsupported { primitive: "inet" })
}

pub fn read_option_list(_buffer: &mut Bytes) -> Result<Vec<(u16, Option<Bytes>)>> {
    Err(DecodingError::Unsupported { primitive: "option list" })
}
