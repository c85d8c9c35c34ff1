//! Alignment and short-read helpers shared by the codecs

use std::io::{self, Read, Seek, SeekFrom, Write};
use std::path::{Component, PathBuf};

/// Bytes needed to bring `pos` up to a multiple of `alignment`
pub const fn padding(pos: u64, alignment: u64) -> u64 {
    let rem = pos % alignment;
    if rem == 0 { 0 } else { alignment - rem }
}

/// Round `value` up to a multiple of `alignment`
pub const fn align_up(value: u64, alignment: u64) -> u64 {
    value + padding(value, alignment)
}

/// Write zeros until the stream position is a multiple of `alignment`,
/// returning the new position
pub fn align_write<W: Write + Seek>(writer: &mut W, alignment: u64) -> io::Result<u64> {
    let pos = writer.stream_position()?;
    let pad = padding(pos, alignment);
    if pad > 0 {
        writer.write_all(&vec![0u8; pad as usize])?;
    }
    Ok(pos + pad)
}

/// Skip forward until the stream position is a multiple of `alignment`,
/// returning the new position
pub fn align_read<R: Seek>(reader: &mut R, alignment: u64) -> io::Result<u64> {
    let pos = reader.stream_position()?;
    let pad = padding(pos, alignment);
    if pad > 0 {
        reader.seek(SeekFrom::Current(pad as i64))?;
    }
    Ok(pos + pad)
}

/// Pad an in-memory buffer with zeros to a multiple of `alignment`
pub fn align_vec(buf: &mut Vec<u8>, alignment: u64) {
    let pad = padding(buf.len() as u64, alignment);
    buf.resize(buf.len() + pad as usize, 0);
}

/// Fill as much of `buf` as the reader can supply, stopping at end of stream
///
/// Returns the number of bytes read; the rest of `buf` is left untouched.
pub fn read_up_to<R: Read>(reader: &mut R, buf: &mut [u8]) -> io::Result<usize> {
    let mut filled = 0;
    while filled < buf.len() {
        match reader.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => {}
            Err(e) => return Err(e),
        }
    }
    Ok(filled)
}

/// Archive path as a path relative to an extraction or source directory
///
/// Leading separators are dropped. Returns `None` for empty paths and for
/// paths that would escape the directory.
pub fn relative_path(file_path: &str) -> Option<PathBuf> {
    let relative = PathBuf::from(file_path.trim_start_matches(['/', '\\']));
    let valid = relative
        .components()
        .all(|c| matches!(c, Component::Normal(_)));
    (valid && !relative.as_os_str().is_empty()).then_some(relative)
}

/// Parse a hex number with an optional `0x` prefix
pub fn parse_hex(text: &str) -> Option<u64> {
    let digits = text
        .strip_prefix("0x")
        .or_else(|| text.strip_prefix("0X"))
        .unwrap_or(text);
    u64::from_str_radix(digits, 16).ok()
}

/// Format a number as `0x`-prefixed uppercase hex
pub fn format_hex(value: u64) -> String {
    format!("0x{value:X}")
}

/// Serde adapter for integers stored as hex strings
pub(crate) mod hex_format {
    use super::{format_hex, parse_hex};
    use serde::de::Error as _;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<T, S>(value: &T, serializer: S) -> Result<S::Ok, S::Error>
    where
        T: Into<u64> + Copy,
        S: Serializer,
    {
        serializer.serialize_str(&format_hex((*value).into()))
    }

    pub fn deserialize<'de, T, D>(deserializer: D) -> Result<T, D::Error>
    where
        T: TryFrom<u64>,
        D: Deserializer<'de>,
    {
        let text = String::deserialize(deserializer)?;
        parse_hex(&text)
            .and_then(|v| T::try_from(v).ok())
            .ok_or_else(|| D::Error::custom(format!("invalid hex value: {text}")))
    }
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::io::Cursor;

    #[test]
    fn test_padding() {
        assert_eq!(padding(0, 16), 0);
        assert_eq!(padding(1, 16), 15);
        assert_eq!(padding(16, 16), 0);
        assert_eq!(padding(33, 1024), 991);
        assert_eq!(align_up(52, 16), 64);
    }

    #[test]
    fn test_align_write() {
        let mut cursor = Cursor::new(Vec::new());
        cursor.write_all(&[1, 2, 3]).unwrap();
        let pos = align_write(&mut cursor, 16).expect("align should succeed");
        assert_eq!(pos, 16);
        assert_eq!(cursor.get_ref().len(), 16);
        assert_eq!(align_write(&mut cursor, 16).unwrap(), 16);
    }

    #[test]
    fn test_align_read() {
        let mut cursor = Cursor::new(vec![0u8; 64]);
        cursor.set_position(17);
        assert_eq!(align_read(&mut cursor, 16).unwrap(), 32);
        assert_eq!(cursor.position(), 32);
    }

    #[test]
    fn test_align_vec() {
        let mut buf = vec![7u8; 5];
        align_vec(&mut buf, 8);
        assert_eq!(buf, vec![7, 7, 7, 7, 7, 0, 0, 0]);
    }

    #[test]
    fn test_relative_path() {
        assert_eq!(relative_path("/Assets/a.lua"), Some(PathBuf::from("Assets/a.lua")));
        assert_eq!(relative_path("abc.lua"), Some(PathBuf::from("abc.lua")));
        assert_eq!(relative_path("/../etc/passwd"), None);
        assert_eq!(relative_path(""), None);
    }

    #[test]
    fn test_hex() {
        assert_eq!(parse_hex("0x1F"), Some(0x1F));
        assert_eq!(parse_hex("1f"), Some(0x1F));
        assert_eq!(parse_hex("0xZZ"), None);
        assert_eq!(format_hex(0xABC), "0xABC");
    }

    #[test]
    fn test_read_up_to_short_stream() {
        let mut src: &[u8] = &[1, 2, 3];
        let mut buf = [9u8; 8];
        assert_eq!(read_up_to(&mut src, &mut buf).unwrap(), 3);
        assert_eq!(buf, [1, 2, 3, 9, 9, 9, 9, 9]);
    }

    proptest! {
        #[test]
        fn test_align_up_properties(value in 0u64..1 << 40, shift in 0u32..13) {
            let alignment = 1u64 << shift;
            let aligned = align_up(value, alignment);
            prop_assert_eq!(aligned % alignment, 0);
            prop_assert!(aligned >= value);
            prop_assert!(aligned - value < alignment);
        }
    }
}
