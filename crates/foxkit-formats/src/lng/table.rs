//! Language tables

use super::error::{LngError, LngResult};
use super::header::{Endianness, HEADER_SIZE, LngHeader, VERSION_TPP};
use crate::util::{hex_format, padding};
use binrw::{BinReaderExt, BinWriterExt};
use foxkit_crypto::{NameDictionary, str_code_64};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::io::{Read, Seek, SeekFrom, Write};

/// Key of a language id: the low 32 bits of its StrCode64
pub fn lang_key(lang_id: &str) -> u32 {
    (str_code_64(lang_id.as_bytes()) & 0xFFFF_FFFF) as u32
}

/// One localized string
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LngEntry {
    /// Key hash
    #[serde(with = "hex_format")]
    pub key: u32,
    /// Language id the key was made from, when known
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lang_id: Option<String>,
    /// Text colour index
    pub color: i16,
    /// Text
    pub value: String,
}

impl LngEntry {
    /// Entry keyed by `lang_id`
    pub fn new(lang_id: &str, color: i16, value: impl Into<String>) -> Self {
        Self {
            key: lang_key(lang_id),
            lang_id: Some(lang_id.to_string()),
            color,
            value: value.into(),
        }
    }

    /// Key to write: derived from the language id when known
    pub fn current_key(&self) -> u32 {
        self.lang_id.as_deref().map_or(self.key, lang_key)
    }
}

/// A `LANG` string table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Lng {
    /// Table version
    pub version: u32,
    /// Byte order
    pub endianness: Endianness,
    /// Entries in values-region order
    pub entries: Vec<LngEntry>,
}

impl Default for Lng {
    fn default() -> Self {
        Self {
            version: VERSION_TPP,
            endianness: Endianness::default(),
            entries: Vec::new(),
        }
    }
}

/// Colour word, then a NUL-terminated string
fn read_value<R: Read + Seek>(reader: &mut R) -> LngResult<(i16, String)> {
    let start = reader.stream_position()?;
    // colour is little-endian regardless of the table's byte order
    let color: i16 = reader.read_le()?;
    let mut text = Vec::new();
    let mut byte = [0u8; 1];
    loop {
        if reader.read(&mut byte)? == 0 {
            return Err(LngError::UnterminatedValue(start));
        }
        if byte[0] == 0 {
            break;
        }
        text.push(byte[0]);
    }
    Ok((color, String::from_utf8_lossy(&text).into_owned()))
}

fn to_u32(value: u64) -> LngResult<u32> {
    u32::try_from(value).map_err(|_| LngError::TooLarge(value))
}

impl Lng {
    /// Parse a table, resolving keys through `names` when given
    pub fn read<R: Read + Seek>(reader: &mut R, names: Option<&NameDictionary>) -> LngResult<Self> {
        let header = LngHeader::read(reader)?;
        let endian = header.endianness.endian();
        let values_offset = u64::from(header.values_offset);

        reader.seek(SeekFrom::Start(values_offset))?;
        let mut values = Vec::with_capacity(header.entry_count as usize);
        for _ in 0..header.entry_count {
            let offset = reader.stream_position()? - values_offset;
            let (color, value) = read_value(reader)?;
            values.push((offset, color, value));
        }

        reader.seek(SeekFrom::Start(u64::from(header.keys_offset)))?;
        let mut keys = HashMap::with_capacity(header.entry_count as usize);
        for _ in 0..header.entry_count {
            let key: u32 = reader.read_type(endian)?;
            let offset: u32 = reader.read_type(endian)?;
            keys.entry(u64::from(offset)).or_insert(key);
        }

        let entries: Vec<LngEntry> = values
            .into_iter()
            .map(|(offset, color, value)| {
                let key = keys.get(&offset).copied().unwrap_or_default();
                LngEntry {
                    key,
                    lang_id: names
                        .and_then(|n| n.get_low32(key))
                        .map(ToOwned::to_owned),
                    color,
                    value,
                }
            })
            .collect();

        tracing::info!(
            "Read LNG table: version {}, {:?}, {} entries",
            header.version,
            header.endianness,
            entries.len()
        );

        Ok(Self {
            version: header.version,
            endianness: header.endianness,
            entries,
        })
    }

    /// Write the table
    ///
    /// Values follow the header in entry order; keys are sorted after a
    /// padding run of one to four zero bytes.
    pub fn write<W: Write + Seek>(&self, writer: &mut W) -> LngResult<()> {
        let endian = self.endianness.endian();
        writer.seek(SeekFrom::Start(HEADER_SIZE))?;

        let mut keys = Vec::with_capacity(self.entries.len());
        for entry in &self.entries {
            let offset = to_u32(writer.stream_position()? - HEADER_SIZE)?;
            writer.write_le(&entry.color)?;
            writer.write_all(entry.value.as_bytes())?;
            writer.write_all(&[0])?;
            keys.push((entry.current_key(), offset));
        }

        let end = writer.stream_position()?;
        let pad = match padding(end, 4) {
            0 => 4,
            n => n,
        };
        writer.write_all(&vec![0u8; pad as usize])?;
        let keys_offset = to_u32(end + pad)?;

        keys.sort_by_key(|(key, _)| *key);
        for (key, offset) in &keys {
            writer.write_type(key, endian)?;
            writer.write_type(offset, endian)?;
        }
        let file_end = writer.stream_position()?;

        let header = LngHeader {
            version: self.version,
            endianness: self.endianness,
            entry_count: to_u32(self.entries.len() as u64)?,
            values_offset: HEADER_SIZE as u32,
            keys_offset,
        };
        writer.seek(SeekFrom::Start(0))?;
        header.write(writer)?;
        writer.seek(SeekFrom::Start(file_end))?;

        tracing::info!("Wrote LNG table: {} entries, {file_end} bytes", self.entries.len());
        Ok(())
    }
}
