//! FOX2 documents

use super::entity::Entity;
use super::error::{Fox2Error, Fox2Result};
use super::header::{Fox2Header, HEADER_SIZE};
use super::literal::Literal;
use crate::util::align_vec;
use binrw::io::Cursor;
use binrw::{BinRead, BinWrite};
use foxkit_crypto::NameLookup;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::io::{Read, Seek, SeekFrom, Write};

/// Bytes following the literal pool terminator
pub const TRAILER: [u8; 5] = [0x00, 0x00, 0x65, 0x6E, 0x64];

/// Literal pool first, external names second
struct Layered<'a> {
    pool: &'a HashMap<u64, String>,
    fallback: Option<&'a dyn NameLookup>,
}

impl NameLookup for Layered<'_> {
    fn lookup(&self, hash: u64) -> Option<&str> {
        self.pool
            .get(&hash)
            .map(String::as_str)
            .or_else(|| self.fallback.and_then(|f| f.lookup(hash)))
    }
}

/// A FOX2 document: entities plus the literal pool they reference
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Fox2 {
    /// Entities in file order
    pub entities: Vec<Entity>,
    /// Literal pool as read; rebuilt on write
    #[serde(skip)]
    pub literals: Vec<Literal>,
}

impl Fox2 {
    /// Parse a document and resolve it against its own literal pool
    pub fn read<R: Read + Seek>(reader: &mut R) -> Fox2Result<Self> {
        let header = Fox2Header::read(reader)?;
        reader.seek(SeekFrom::Start(u64::from(header.data_offset)))?;

        let mut entities = Vec::with_capacity(header.entity_count as usize);
        for _ in 0..header.entity_count {
            entities.push(Entity::read(reader)?);
        }

        let mut literals = Vec::new();
        while let Some(literal) = Literal::read(reader)? {
            literals.push(literal);
        }

        tracing::info!(
            "Read FOX2 document: {} entities, {} literals",
            entities.len(),
            literals.len()
        );

        let mut fox2 = Self { entities, literals };
        fox2.resolve_with(None);
        Ok(fox2)
    }

    /// Literal pool as read
    pub fn literals(&self) -> &[Literal] {
        &self.literals
    }

    /// Resolve every hash against the literal pool, then `names`
    ///
    /// Already resolved fields are left alone, so this can be applied
    /// repeatedly with different dictionaries.
    pub fn resolve_with(&mut self, names: Option<&dyn NameLookup>) {
        let mut pool = HashMap::with_capacity(self.literals.len());
        for literal in &self.literals {
            pool.entry(literal.hash).or_insert_with(|| literal.text.clone());
        }
        let layered = Layered {
            pool: &pool,
            fallback: names,
        };
        for entity in &mut self.entities {
            entity.resolve(&layered);
        }
    }

    /// Literal pool for the current entities, first occurrence first
    pub fn collect_literals(&self) -> Vec<Literal> {
        let mut seen = HashSet::new();
        self.entities
            .iter()
            .flat_map(Entity::strings)
            .filter(|s| seen.insert(*s))
            .map(Literal::new)
            .collect()
    }

    /// Encode the whole document
    pub fn to_bytes(&self) -> Fox2Result<Vec<u8>> {
        let mut bytes = vec![0u8; HEADER_SIZE as usize];
        for entity in &self.entities {
            bytes.extend(entity.to_bytes()?);
        }

        let string_table_offset = bytes.len();
        for literal in self.collect_literals() {
            literal.write(&mut bytes)?;
        }
        bytes.extend([0u8; 8]);
        align_vec(&mut bytes, 16);
        bytes.extend(TRAILER);
        align_vec(&mut bytes, 16);

        let header = Fox2Header {
            entity_count: u32::try_from(self.entities.len())
                .map_err(|_| Fox2Error::TooManyItems(self.entities.len()))?,
            string_table_offset: u32::try_from(string_table_offset)
                .map_err(|_| Fox2Error::TooManyItems(string_table_offset))?,
            ..Fox2Header::default()
        };
        let mut cursor = Cursor::new(bytes);
        header.write(&mut cursor)?;

        Ok(cursor.into_inner())
    }

    /// Write the document; hashes are recomputed from any known text
    pub fn write<W: Write>(&self, writer: &mut W) -> Fox2Result<()> {
        let bytes = self.to_bytes()?;
        writer.write_all(&bytes)?;
        tracing::info!(
            "Wrote FOX2 document: {} entities, {} bytes",
            self.entities.len(),
            bytes.len()
        );
        Ok(())
    }
}
