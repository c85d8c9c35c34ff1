//! Entity properties

use super::container::Container;
use super::error::{Fox2Error, Fox2Result};
use super::hashed::HashedString;
use super::types::{ContainerKind, DataType};
use crate::util::{align_read, align_write};
use binrw::io::Cursor;
use binrw::{BinRead, BinWrite};
use foxkit_crypto::NameLookup;
use serde::de::Error as _;
use serde::ser::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value as Json;
use std::io::{Read, Seek, SeekFrom};

/// Size of a property header
pub const PROPERTY_HEADER_SIZE: u64 = 32;

/// Alignment of property bodies
const PROPERTY_ALIGNMENT: u64 = 16;

/// On-disk property header
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, BinRead, BinWrite)]
#[brw(little)]
pub struct PropertyHeader {
    /// StrCode64 of the property name
    pub name_hash: u64,
    /// [`DataType`] tag
    pub data_type: u8,
    /// [`ContainerKind`] tag
    pub container: u8,
    /// Number of values or map entries
    pub value_count: u16,
    /// Offset of the container from the header start
    pub offset: u16,
    /// Header plus padded container size
    pub size: u16,
    /// Reserved
    pub unknown2: i32,
    /// Reserved
    pub unknown3: i32,
    /// Reserved
    pub unknown4: i32,
    /// Reserved
    pub unknown5: i32,
}

/// A named, typed property
#[derive(Debug, Clone, PartialEq)]
pub struct Property {
    /// Property name
    pub name: HashedString,
    /// Type shared by every value
    pub data_type: DataType,
    /// Values
    pub container: Container,
    /// Reserved header words, kept as read
    pub unknown: [i32; 4],
}

impl Property {
    /// Property with no values
    pub fn new(name: &str, data_type: DataType, kind: ContainerKind) -> Self {
        Self {
            name: HashedString::new(name),
            data_type,
            container: Container::empty(kind),
            unknown: [0; 4],
        }
    }

    /// Read a property at the current position, leaving the stream 16-byte aligned
    pub fn read<R: Read + Seek>(reader: &mut R) -> Fox2Result<Self> {
        let header = PropertyHeader::read(reader)?;
        let data_type = DataType::try_from(header.data_type)?;
        let kind = ContainerKind::try_from(header.container)?;

        let container = Container::read(reader, kind, data_type, header.value_count as usize)?;
        align_read(reader, PROPERTY_ALIGNMENT)?;

        tracing::debug!(
            "Read property {:x}: {} {data_type} x{}",
            header.name_hash,
            kind,
            header.value_count
        );

        Ok(Self {
            name: HashedString::from_hash(header.name_hash),
            data_type,
            container,
            unknown: [
                header.unknown2,
                header.unknown3,
                header.unknown4,
                header.unknown5,
            ],
        })
    }

    /// Encode header and body
    ///
    /// The header is filled in once the body has been written, so the size
    /// and name hash always match what follows.
    pub fn to_bytes(&self) -> Fox2Result<Vec<u8>> {
        let mut cursor = Cursor::new(vec![0u8; PROPERTY_HEADER_SIZE as usize]);
        cursor.seek(SeekFrom::End(0))?;
        self.container.write(&mut cursor, self.data_type)?;
        align_write(&mut cursor, PROPERTY_ALIGNMENT)?;

        let size = cursor.get_ref().len();
        let value_count = self.container.len();
        let header = PropertyHeader {
            name_hash: self.name.current_hash(),
            data_type: self.data_type.tag(),
            container: self.container.kind().tag(),
            value_count: u16::try_from(value_count)
                .map_err(|_| Fox2Error::TooManyItems(value_count))?,
            offset: PROPERTY_HEADER_SIZE as u16,
            size: u16::try_from(size).map_err(|_| Fox2Error::PropertyTooLarge(size))?,
            unknown2: self.unknown[0],
            unknown3: self.unknown[1],
            unknown4: self.unknown[2],
            unknown5: self.unknown[3],
        };
        cursor.seek(SeekFrom::Start(0))?;
        header.write(&mut cursor)?;

        Ok(cursor.into_inner())
    }

    /// Strings this property adds to the literal pool: its name, then its values
    pub fn strings(&self) -> Vec<&str> {
        self.name
            .text
            .as_deref()
            .into_iter()
            .chain(self.container.strings())
            .collect()
    }

    /// Resolve the name and every value against `names`
    pub fn resolve(&mut self, names: &dyn NameLookup) {
        self.name.resolve(names);
        self.container.resolve(names);
    }
}

fn is_zero(value: &i32) -> bool {
    *value == 0
}

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PropertyJson {
    name: HashedString,
    #[serde(rename = "type")]
    data_type: DataType,
    container: ContainerKind,
    #[serde(default, skip_serializing_if = "is_zero")]
    unknown2: i32,
    #[serde(default, skip_serializing_if = "is_zero")]
    unknown3: i32,
    #[serde(default, skip_serializing_if = "is_zero")]
    unknown4: i32,
    #[serde(default, skip_serializing_if = "is_zero")]
    unknown5: i32,
    #[serde(default)]
    values: Vec<Json>,
}

impl Serialize for Property {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        PropertyJson {
            name: self.name.clone(),
            data_type: self.data_type,
            container: self.container.kind(),
            unknown2: self.unknown[0],
            unknown3: self.unknown[1],
            unknown4: self.unknown[2],
            unknown5: self.unknown[3],
            values: self.container.to_json().map_err(S::Error::custom)?,
        }
        .serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Property {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let json = PropertyJson::deserialize(deserializer)?;
        let container = Container::from_json(json.container, json.data_type, json.values)
            .map_err(D::Error::custom)?;
        Ok(Self {
            name: json.name,
            data_type: json.data_type,
            container,
            unknown: [json.unknown2, json.unknown3, json.unknown4, json.unknown5],
        })
    }
}
