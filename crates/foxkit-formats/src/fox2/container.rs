//! Property containers

use super::error::{Fox2Error, Fox2Result};
use super::hashed::HashedString;
use super::types::{ContainerKind, DataType};
use super::value::Value;
use crate::util::{align_read, align_write};
use binrw::{BinReaderExt, BinWriterExt};
use foxkit_crypto::NameLookup;
use serde::{Deserialize, Serialize};
use serde_json::Value as Json;
use std::io::{Read, Seek, Write};

/// Alignment of every string map entry
const MAP_ENTRY_ALIGNMENT: u64 = 16;

/// One key/value pair of a string map
#[derive(Debug, Clone, PartialEq)]
pub struct StringMapEntry {
    /// Hashed key
    pub key: HashedString,
    /// Value
    pub value: Value,
}

#[derive(Serialize, Deserialize)]
struct StringMapJson {
    key: HashedString,
    value: Json,
}

/// Values held by a property
///
/// The three array kinds share one layout: `count` values back to back.
/// String map entries are a 64-bit key hash and a value, each entry padded
/// to 16 bytes.
#[derive(Debug, Clone, PartialEq)]
pub enum Container {
    /// Fixed-size array
    StaticArray(Vec<Value>),
    /// Growable array
    DynamicArray(Vec<Value>),
    /// Hash-keyed map
    StringMap(Vec<StringMapEntry>),
    /// Linked list
    List(Vec<Value>),
}

impl Container {
    /// Empty container of `kind`
    pub const fn empty(kind: ContainerKind) -> Self {
        match kind {
            ContainerKind::StaticArray => Self::StaticArray(Vec::new()),
            ContainerKind::DynamicArray => Self::DynamicArray(Vec::new()),
            ContainerKind::StringMap => Self::StringMap(Vec::new()),
            ContainerKind::List => Self::List(Vec::new()),
        }
    }

    fn with_values(kind: ContainerKind, values: Vec<Value>) -> Self {
        match kind {
            ContainerKind::StaticArray => Self::StaticArray(values),
            ContainerKind::DynamicArray => Self::DynamicArray(values),
            ContainerKind::List => Self::List(values),
            ContainerKind::StringMap => Self::StringMap(Vec::new()),
        }
    }

    /// Container kind
    pub const fn kind(&self) -> ContainerKind {
        match self {
            Self::StaticArray(_) => ContainerKind::StaticArray,
            Self::DynamicArray(_) => ContainerKind::DynamicArray,
            Self::StringMap(_) => ContainerKind::StringMap,
            Self::List(_) => ContainerKind::List,
        }
    }

    /// Number of values or map entries
    pub fn len(&self) -> usize {
        match self {
            Self::StaticArray(v) | Self::DynamicArray(v) | Self::List(v) => v.len(),
            Self::StringMap(m) => m.len(),
        }
    }

    /// Whether the container holds nothing
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Iterate over all values, map values included
    pub fn values(&self) -> Box<dyn Iterator<Item = &Value> + '_> {
        match self {
            Self::StaticArray(v) | Self::DynamicArray(v) | Self::List(v) => Box::new(v.iter()),
            Self::StringMap(m) => Box::new(m.iter().map(|e| &e.value)),
        }
    }

    /// Read `count` items of `data_type`
    pub fn read<R: Read + Seek>(
        reader: &mut R,
        kind: ContainerKind,
        data_type: DataType,
        count: usize,
    ) -> Fox2Result<Self> {
        if kind == ContainerKind::StringMap {
            let mut entries = Vec::with_capacity(count);
            for _ in 0..count {
                let key = HashedString::from_hash(reader.read_le()?);
                let value = Value::read(reader, data_type)?;
                align_read(reader, MAP_ENTRY_ALIGNMENT)?;
                entries.push(StringMapEntry { key, value });
            }
            return Ok(Self::StringMap(entries));
        }

        let mut values = Vec::with_capacity(count);
        for _ in 0..count {
            values.push(Value::read(reader, data_type)?);
        }
        Ok(Self::with_values(kind, values))
    }

    /// Write every item, checking it against `data_type`
    pub fn write<W: Write + Seek>(&self, writer: &mut W, data_type: DataType) -> Fox2Result<()> {
        let check = |value: &Value| {
            if value.data_type() == data_type {
                Ok(())
            } else {
                Err(Fox2Error::TypeMismatch {
                    expected: data_type,
                    found: value.data_type(),
                })
            }
        };

        match self {
            Self::StaticArray(values) | Self::DynamicArray(values) | Self::List(values) => {
                for value in values {
                    check(value)?;
                    value.write(writer)?;
                }
            }
            Self::StringMap(entries) => {
                for entry in entries {
                    check(&entry.value)?;
                    writer.write_le(&entry.key.current_hash())?;
                    entry.value.write(writer)?;
                    align_write(writer, MAP_ENTRY_ALIGNMENT)?;
                }
            }
        }
        Ok(())
    }

    /// Strings this container adds to the literal pool, map keys first per entry
    pub fn strings(&self) -> Vec<&str> {
        match self {
            Self::StaticArray(values) | Self::DynamicArray(values) | Self::List(values) => {
                values.iter().flat_map(Value::strings).collect()
            }
            Self::StringMap(entries) => entries
                .iter()
                .flat_map(|e| e.key.text.as_deref().into_iter().chain(e.value.strings()))
                .collect(),
        }
    }

    /// Resolve keys and values against `names`
    pub fn resolve(&mut self, names: &dyn NameLookup) {
        match self {
            Self::StaticArray(values) | Self::DynamicArray(values) | Self::List(values) => {
                for value in values {
                    value.resolve(names);
                }
            }
            Self::StringMap(entries) => {
                for entry in entries {
                    entry.key.resolve(names);
                    entry.value.resolve(names);
                }
            }
        }
    }

    /// JSON projection: plain values, or `{"key", "value"}` objects for maps
    pub fn to_json(&self) -> Fox2Result<Vec<Json>> {
        match self {
            Self::StaticArray(values) | Self::DynamicArray(values) | Self::List(values) => {
                values.iter().map(Value::to_json).collect()
            }
            Self::StringMap(entries) => entries
                .iter()
                .map(|e| {
                    Ok(serde_json::to_value(StringMapJson {
                        key: e.key.clone(),
                        value: e.value.to_json()?,
                    })?)
                })
                .collect(),
        }
    }

    /// Parse the JSON projection
    pub fn from_json(kind: ContainerKind, data_type: DataType, items: Vec<Json>) -> Fox2Result<Self> {
        if kind == ContainerKind::StringMap {
            let entries = items
                .into_iter()
                .map(|item| {
                    let entry: StringMapJson = serde_json::from_value(item)?;
                    Ok(StringMapEntry {
                        key: entry.key,
                        value: Value::from_json(data_type, entry.value)?,
                    })
                })
                .collect::<Fox2Result<Vec<_>>>()?;
            return Ok(Self::StringMap(entries));
        }

        let values = items
            .into_iter()
            .map(|item| Value::from_json(data_type, item))
            .collect::<Fox2Result<Vec<_>>>()?;
        Ok(Self::with_values(kind, values))
    }
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::*;
    use binrw::io::Cursor;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_string_map_entries_are_aligned() {
        let map = Container::StringMap(vec![
            StringMapEntry {
                key: HashedString::new("first"),
                value: Value::UInt32(1),
            },
            StringMapEntry {
                key: HashedString::new("second"),
                value: Value::UInt32(2),
            },
        ]);

        let mut cursor = Cursor::new(Vec::new());
        map.write(&mut cursor, DataType::UInt32).unwrap();
        let bytes = cursor.into_inner();
        assert_eq!(bytes.len(), 32);
        assert_eq!(&bytes[8..12], &1u32.to_le_bytes());
        assert_eq!(&bytes[24..28], &2u32.to_le_bytes());

        let read = Container::read(
            &mut Cursor::new(bytes),
            ContainerKind::StringMap,
            DataType::UInt32,
            2,
        )
        .unwrap();
        assert_eq!(read.len(), 2);
        assert_eq!(read.strings(), Vec::<&str>::new());
    }

    #[test]
    fn test_type_mismatch() {
        let list = Container::List(vec![Value::Int8(1), Value::Int16(2)]);
        let err = list.write(&mut Cursor::new(Vec::new()), DataType::Int8);
        assert!(matches!(
            err,
            Err(Fox2Error::TypeMismatch {
                expected: DataType::Int8,
                found: DataType::Int16
            })
        ));
    }

    #[test]
    fn test_arrays_share_layout() {
        let values = vec![Value::Int16(-2), Value::Int16(3)];
        let mut a = Cursor::new(Vec::new());
        let mut b = Cursor::new(Vec::new());
        Container::StaticArray(values.clone())
            .write(&mut a, DataType::Int16)
            .unwrap();
        Container::DynamicArray(values)
            .write(&mut b, DataType::Int16)
            .unwrap();
        assert_eq!(a.into_inner(), b.into_inner());
    }

    #[test]
    fn test_json_round_trip() {
        let map = Container::StringMap(vec![StringMapEntry {
            key: HashedString::new("k"),
            value: Value::String(HashedString::new("v")),
        }]);
        let json = map.to_json().unwrap();
        assert_eq!(json[0]["key"], Json::from("k"));
        let back = Container::from_json(ContainerKind::StringMap, DataType::String, json).unwrap();
        assert_eq!(back, map);
        assert_eq!(back.strings(), vec!["k", "v"]);
    }
}
