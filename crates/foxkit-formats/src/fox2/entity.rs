//! Entities

use super::error::{Fox2Error, Fox2Result};
use super::hashed::HashedString;
use super::property::Property;
use crate::util::{align_read, align_vec, hex_format};
use binrw::io::Cursor;
use binrw::{BinRead, BinWrite};
use foxkit_crypto::NameLookup;
use serde::{Deserialize, Serialize};
use std::io::{Read, Seek};

/// Entity header magic, `"ent\0"`
pub const ENTITY_MAGIC: u32 = 0x0074_6E65;

/// Space reserved for an entity header, padding included
pub const ENTITY_HEADER_SIZE: u64 = 64;

/// Packed on-disk entity header (52 bytes)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, BinRead, BinWrite)]
#[brw(little)]
pub struct EntityHeader {
    /// Always [`ENTITY_HEADER_SIZE`]
    pub header_size: u16,
    /// Reserved
    #[brw(pad_after = 2)]
    pub unknown1: i16,
    /// Always [`ENTITY_MAGIC`]
    #[br(assert(magic == ENTITY_MAGIC, "invalid entity magic: {:#010x}", magic))]
    pub magic: u32,
    /// Entity address
    #[brw(pad_after = 4)]
    pub address: u32,
    /// Reserved
    pub unknown2: i32,
    /// Reserved
    pub unknown5: i32,
    /// Class schema version
    pub version: i16,
    /// StrCode64 of the class name
    pub class_name_hash: u64,
    /// Number of static properties
    pub static_property_count: u16,
    /// Number of dynamic properties
    pub dynamic_property_count: u16,
    /// Offset of the first property from the header start
    pub offset: u32,
    /// Header plus static properties
    pub static_data_size: u32,
    /// Header plus all properties
    pub data_size: u32,
}

fn is_zero<T: Default + PartialEq>(value: &T) -> bool {
    *value == T::default()
}

/// An entity and its properties
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Entity {
    /// Class name
    #[serde(rename = "class")]
    pub class_name: HashedString,
    /// Class schema version
    pub class_version: i16,
    /// Entity address
    #[serde(with = "hex_format")]
    pub address: u32,
    /// Reserved header field
    #[serde(default, skip_serializing_if = "is_zero")]
    pub unknown1: i16,
    /// Reserved header field
    #[serde(default, skip_serializing_if = "is_zero")]
    pub unknown2: i32,
    /// Reserved header field
    #[serde(default, skip_serializing_if = "is_zero")]
    pub unknown5: i32,
    /// Properties declared by the class
    #[serde(default)]
    pub static_properties: Vec<Property>,
    /// Properties added at runtime
    #[serde(default)]
    pub dynamic_properties: Vec<Property>,
}

fn count(len: usize) -> Fox2Result<u16> {
    u16::try_from(len).map_err(|_| Fox2Error::TooManyItems(len))
}

fn size(len: usize) -> Fox2Result<u32> {
    u32::try_from(len).map_err(|_| Fox2Error::TooManyItems(len))
}

impl Entity {
    /// Entity of `class_name` with no properties
    pub fn new(class_name: &str, address: u32) -> Self {
        Self {
            class_name: HashedString::new(class_name),
            address,
            ..Self::default()
        }
    }

    /// Read an entity at the current (16-byte aligned) position
    pub fn read<R: Read + Seek>(reader: &mut R) -> Fox2Result<Self> {
        let header = EntityHeader::read(reader)?;
        align_read(reader, 16)?;

        let mut static_properties = Vec::with_capacity(header.static_property_count as usize);
        for _ in 0..header.static_property_count {
            static_properties.push(Property::read(reader)?);
        }
        let mut dynamic_properties = Vec::with_capacity(header.dynamic_property_count as usize);
        for _ in 0..header.dynamic_property_count {
            dynamic_properties.push(Property::read(reader)?);
        }

        tracing::debug!(
            "Read entity {:x} at {:#x}: {} static, {} dynamic properties",
            header.class_name_hash,
            header.address,
            static_properties.len(),
            dynamic_properties.len()
        );

        Ok(Self {
            class_name: HashedString::from_hash(header.class_name_hash),
            class_version: header.version,
            address: header.address,
            unknown1: header.unknown1,
            unknown2: header.unknown2,
            unknown5: header.unknown5,
            static_properties,
            dynamic_properties,
        })
    }

    /// Encode the padded header followed by every property
    pub fn to_bytes(&self) -> Fox2Result<Vec<u8>> {
        let mut statics = Vec::new();
        for property in &self.static_properties {
            statics.extend(property.to_bytes()?);
        }
        let mut dynamics = Vec::new();
        for property in &self.dynamic_properties {
            dynamics.extend(property.to_bytes()?);
        }

        let header_size = ENTITY_HEADER_SIZE as usize;
        let header = EntityHeader {
            header_size: ENTITY_HEADER_SIZE as u16,
            unknown1: self.unknown1,
            magic: ENTITY_MAGIC,
            address: self.address,
            unknown2: self.unknown2,
            unknown5: self.unknown5,
            version: self.class_version,
            class_name_hash: self.class_name.current_hash(),
            static_property_count: count(self.static_properties.len())?,
            dynamic_property_count: count(self.dynamic_properties.len())?,
            offset: ENTITY_HEADER_SIZE as u32,
            static_data_size: size(header_size + statics.len())?,
            data_size: size(header_size + statics.len() + dynamics.len())?,
        };

        let mut cursor = Cursor::new(Vec::with_capacity(header_size + statics.len() + dynamics.len()));
        header.write(&mut cursor)?;
        let mut bytes = cursor.into_inner();
        align_vec(&mut bytes, ENTITY_HEADER_SIZE);
        bytes.extend(statics);
        bytes.extend(dynamics);
        Ok(bytes)
    }

    /// Strings this entity adds to the literal pool
    ///
    /// Class name first, then static and dynamic properties in order.
    pub fn strings(&self) -> Vec<&str> {
        self.class_name
            .text
            .as_deref()
            .into_iter()
            .chain(self.static_properties.iter().flat_map(Property::strings))
            .chain(self.dynamic_properties.iter().flat_map(Property::strings))
            .collect()
    }

    /// Resolve the class name and all properties against `names`
    pub fn resolve(&mut self, names: &dyn NameLookup) {
        self.class_name.resolve(names);
        for property in &mut self.static_properties {
            property.resolve(names);
        }
        for property in &mut self.dynamic_properties {
            property.resolve(names);
        }
    }
}
