//! Literal pool records

use super::error::Fox2Result;
use crate::util::read_up_to;
use foxkit_crypto::str_code_64;
use std::io::{Read, Write};

/// A string referenced by hash somewhere in the document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Literal {
    /// StrCode64 of `text`
    pub hash: u64,
    /// The string
    pub text: String,
}

impl Literal {
    /// Literal for `text`
    pub fn new(text: impl Into<String>) -> Self {
        let text = text.into();
        Self {
            hash: str_code_64(text.as_bytes()),
            text,
        }
    }

    /// Read the next record
    ///
    /// Returns `None` at the zero-hash terminator, on a short read, or on a
    /// negative length.
    pub fn read<R: Read>(reader: &mut R) -> Fox2Result<Option<Self>> {
        let mut word = [0u8; 8];
        if read_up_to(reader, &mut word)? < word.len() {
            return Ok(None);
        }
        let hash = u64::from_le_bytes(word);
        if hash == 0 {
            return Ok(None);
        }

        let mut len = [0u8; 4];
        if read_up_to(reader, &mut len)? < len.len() {
            return Ok(None);
        }
        let Ok(len) = usize::try_from(i32::from_le_bytes(len)) else {
            return Ok(None);
        };

        let mut text = vec![0u8; len];
        if read_up_to(reader, &mut text)? < len {
            return Ok(None);
        }

        Ok(Some(Self {
            hash,
            text: String::from_utf8_lossy(&text).into_owned(),
        }))
    }

    /// Write the record: hash, 32-bit length, bytes
    pub fn write<W: Write>(&self, writer: &mut W) -> Fox2Result<()> {
        writer.write_all(&self.hash.to_le_bytes())?;
        writer.write_all(&(self.text.len() as u32).to_le_bytes())?;
        writer.write_all(self.text.as_bytes())?;
        Ok(())
    }
}
