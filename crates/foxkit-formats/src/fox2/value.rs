//! Property values
//!
//! Every value has a fixed binary size. Hash-bearing values ([`HashedString`]
//! and [`EntityLink`]) write the hash of their text when it is known.

use super::error::{Fox2Error, Fox2Result};
use super::hashed::HashedString;
use crate::util::{format_hex, hex_format, parse_hex};
use super::types::DataType;
use binrw::{BinRead, BinReaderExt, BinWrite, BinWriterExt};
use foxkit_crypto::NameLookup;
use serde::{Deserialize, Serialize};
use serde_json::Value as Json;
use std::io::{Read, Seek, Write};

/// Four floats: vectors and quaternions
#[derive(Debug, Clone, Copy, Default, PartialEq, BinRead, BinWrite, Serialize, Deserialize)]
#[brw(little)]
pub struct Float4 {
    /// X
    pub x: f32,
    /// Y
    pub y: f32,
    /// Z
    pub z: f32,
    /// W
    pub w: f32,
}

/// RGBA colour
#[derive(Debug, Clone, Copy, Default, PartialEq, BinRead, BinWrite, Serialize, Deserialize)]
#[brw(little)]
pub struct Color {
    /// Red
    pub r: f32,
    /// Green
    pub g: f32,
    /// Blue
    pub b: f32,
    /// Alpha
    pub a: f32,
}

/// Row-major 3x3 matrix
#[derive(Debug, Clone, Copy, Default, PartialEq, BinRead, BinWrite, Serialize, Deserialize)]
#[brw(little)]
pub struct Matrix3(pub [f32; 9]);

/// Row-major 4x4 matrix
#[derive(Debug, Clone, Copy, Default, PartialEq, BinRead, BinWrite, Serialize, Deserialize)]
#[brw(little)]
pub struct Matrix4(pub [f32; 16]);

/// Three floats followed by two 16-bit words
#[derive(Debug, Clone, Copy, Default, PartialEq, BinRead, BinWrite, Serialize, Deserialize)]
#[brw(little)]
pub struct WideVector3 {
    /// X
    pub x: f32,
    /// Y
    pub y: f32,
    /// Z
    pub z: f32,
    /// First extra word
    pub a: u16,
    /// Second extra word
    pub b: u16,
}

/// Reference to an entity stored in another package
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntityLink {
    /// Package holding the target
    pub package_path: HashedString,
    /// Archive inside the package
    pub archive_path: HashedString,
    /// Target name inside the archive
    pub name_in_archive: HashedString,
    /// Handle of the target entity
    #[serde(with = "hex_format")]
    pub entity_handle: u64,
}

impl EntityLink {
    fn read<R: Read + Seek>(reader: &mut R) -> Fox2Result<Self> {
        let package_path = HashedString::from_hash(reader.read_le()?);
        let archive_path = HashedString::from_hash(reader.read_le()?);
        let name_in_archive = HashedString::from_hash(reader.read_le()?);
        let entity_handle = reader.read_le()?;
        Ok(Self {
            package_path,
            archive_path,
            name_in_archive,
            entity_handle,
        })
    }

    fn write<W: Write + Seek>(&self, writer: &mut W) -> Fox2Result<()> {
        writer.write_le(&self.package_path.current_hash())?;
        writer.write_le(&self.archive_path.current_hash())?;
        writer.write_le(&self.name_in_archive.current_hash())?;
        writer.write_le(&self.entity_handle)?;
        Ok(())
    }
}

/// A single typed value
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// `Int8`
    Int8(i8),
    /// `UInt8`
    UInt8(u8),
    /// `Int16`
    Int16(i16),
    /// `UInt16`
    UInt16(u16),
    /// `Int32`
    Int32(i32),
    /// `UInt32`
    UInt32(u32),
    /// `Int64`
    Int64(i64),
    /// `UInt64`
    UInt64(u64),
    /// `Float`
    Float(f32),
    /// `Double`
    Double(f64),
    /// `Bool`
    Bool(bool),
    /// `String`
    String(HashedString),
    /// `Path`
    Path(HashedString),
    /// `EntityPtr`
    EntityPtr(u64),
    /// `Vector3`
    Vector3(Float4),
    /// `Vector4`
    Vector4(Float4),
    /// `Quat`
    Quat(Float4),
    /// `Matrix3`
    Matrix3(Matrix3),
    /// `Matrix4`
    Matrix4(Matrix4),
    /// `Color`
    Color(Color),
    /// `FilePtr`
    FilePtr(HashedString),
    /// `EntityHandle`
    EntityHandle(u64),
    /// `EntityLink`
    EntityLink(EntityLink),
    /// `WideVector3`
    WideVector3(WideVector3),
}

fn from_json<T: serde::de::DeserializeOwned>(json: Json) -> Fox2Result<T> {
    Ok(serde_json::from_value(json)?)
}

fn hex_from_json(json: &Json) -> Fox2Result<u64> {
    match json {
        Json::String(text) => parse_hex(text).ok_or_else(|| Fox2Error::InvalidHex(text.clone())),
        other => Err(Fox2Error::InvalidHex(other.to_string())),
    }
}

impl Value {
    /// Type tag of this value
    pub const fn data_type(&self) -> DataType {
        match self {
            Self::Int8(_) => DataType::Int8,
            Self::UInt8(_) => DataType::UInt8,
            Self::Int16(_) => DataType::Int16,
            Self::UInt16(_) => DataType::UInt16,
            Self::Int32(_) => DataType::Int32,
            Self::UInt32(_) => DataType::UInt32,
            Self::Int64(_) => DataType::Int64,
            Self::UInt64(_) => DataType::UInt64,
            Self::Float(_) => DataType::Float,
            Self::Double(_) => DataType::Double,
            Self::Bool(_) => DataType::Bool,
            Self::String(_) => DataType::String,
            Self::Path(_) => DataType::Path,
            Self::EntityPtr(_) => DataType::EntityPtr,
            Self::Vector3(_) => DataType::Vector3,
            Self::Vector4(_) => DataType::Vector4,
            Self::Quat(_) => DataType::Quat,
            Self::Matrix3(_) => DataType::Matrix3,
            Self::Matrix4(_) => DataType::Matrix4,
            Self::Color(_) => DataType::Color,
            Self::FilePtr(_) => DataType::FilePtr,
            Self::EntityHandle(_) => DataType::EntityHandle,
            Self::EntityLink(_) => DataType::EntityLink,
            Self::WideVector3(_) => DataType::WideVector3,
        }
    }

    /// Read one value of type `data_type`
    pub fn read<R: Read + Seek>(reader: &mut R, data_type: DataType) -> Fox2Result<Self> {
        let value = match data_type {
            DataType::Int8 => Self::Int8(reader.read_le()?),
            DataType::UInt8 => Self::UInt8(reader.read_le()?),
            DataType::Int16 => Self::Int16(reader.read_le()?),
            DataType::UInt16 => Self::UInt16(reader.read_le()?),
            DataType::Int32 => Self::Int32(reader.read_le()?),
            DataType::UInt32 => Self::UInt32(reader.read_le()?),
            DataType::Int64 => Self::Int64(reader.read_le()?),
            DataType::UInt64 => Self::UInt64(reader.read_le()?),
            DataType::Float => Self::Float(reader.read_le()?),
            DataType::Double => Self::Double(reader.read_le()?),
            DataType::Bool => Self::Bool(reader.read_le::<u8>()? != 0),
            DataType::String => Self::String(HashedString::from_hash(reader.read_le()?)),
            DataType::Path => Self::Path(HashedString::from_hash(reader.read_le()?)),
            DataType::EntityPtr => Self::EntityPtr(reader.read_le()?),
            DataType::Vector3 => Self::Vector3(reader.read_le()?),
            DataType::Vector4 => Self::Vector4(reader.read_le()?),
            DataType::Quat => Self::Quat(reader.read_le()?),
            DataType::Matrix3 => Self::Matrix3(reader.read_le()?),
            DataType::Matrix4 => Self::Matrix4(reader.read_le()?),
            DataType::Color => Self::Color(reader.read_le()?),
            DataType::FilePtr => Self::FilePtr(HashedString::from_hash(reader.read_le()?)),
            DataType::EntityHandle => Self::EntityHandle(reader.read_le()?),
            DataType::EntityLink => Self::EntityLink(EntityLink::read(reader)?),
            DataType::PropertyInfo => return Err(Fox2Error::UnsupportedType(data_type)),
            DataType::WideVector3 => Self::WideVector3(reader.read_le()?),
        };
        Ok(value)
    }

    /// Write the value, hashing any known text
    pub fn write<W: Write + Seek>(&self, writer: &mut W) -> Fox2Result<()> {
        match self {
            Self::Int8(v) => writer.write_le(v)?,
            Self::UInt8(v) => writer.write_le(v)?,
            Self::Int16(v) => writer.write_le(v)?,
            Self::UInt16(v) => writer.write_le(v)?,
            Self::Int32(v) => writer.write_le(v)?,
            Self::UInt32(v) => writer.write_le(v)?,
            Self::Int64(v) => writer.write_le(v)?,
            Self::UInt64(v) => writer.write_le(v)?,
            Self::Float(v) => writer.write_le(v)?,
            Self::Double(v) => writer.write_le(v)?,
            Self::Bool(v) => writer.write_le(&u8::from(*v))?,
            Self::String(s) | Self::Path(s) | Self::FilePtr(s) => {
                writer.write_le(&s.current_hash())?;
            }
            Self::EntityPtr(v) | Self::EntityHandle(v) => writer.write_le(v)?,
            Self::Vector3(v) | Self::Vector4(v) | Self::Quat(v) => writer.write_le(v)?,
            Self::Matrix3(v) => writer.write_le(v)?,
            Self::Matrix4(v) => writer.write_le(v)?,
            Self::Color(v) => writer.write_le(v)?,
            Self::EntityLink(link) => link.write(writer)?,
            Self::WideVector3(v) => writer.write_le(v)?,
        }
        Ok(())
    }

    /// Strings this value adds to the literal pool
    ///
    /// Every known text is pooled, the empty string included; unresolved
    /// hashes add nothing.
    pub fn strings(&self) -> Vec<&str> {
        match self {
            Self::String(s) | Self::Path(s) | Self::FilePtr(s) => s.text.iter().map(String::as_str).collect(),
            Self::EntityLink(link) => [&link.name_in_archive, &link.package_path, &link.archive_path]
                .into_iter()
                .filter_map(|s| s.text.as_deref())
                .collect(),
            _ => Vec::new(),
        }
    }

    /// Resolve hash-bearing fields against `names`
    pub fn resolve(&mut self, names: &dyn NameLookup) {
        match self {
            Self::String(s) | Self::Path(s) | Self::FilePtr(s) => s.resolve(names),
            Self::EntityLink(link) => {
                link.package_path.resolve(names);
                link.archive_path.resolve(names);
                link.name_in_archive.resolve(names);
            }
            _ => {}
        }
    }

    /// JSON projection; addresses and handles become hex strings
    pub fn to_json(&self) -> Fox2Result<Json> {
        let json = match self {
            Self::Int8(v) => Json::from(*v),
            Self::UInt8(v) => Json::from(*v),
            Self::Int16(v) => Json::from(*v),
            Self::UInt16(v) => Json::from(*v),
            Self::Int32(v) => Json::from(*v),
            Self::UInt32(v) => Json::from(*v),
            Self::Int64(v) => Json::from(*v),
            Self::UInt64(v) => Json::from(*v),
            Self::Float(v) => Json::from(*v),
            Self::Double(v) => Json::from(*v),
            Self::Bool(v) => Json::from(*v),
            Self::String(s) | Self::Path(s) | Self::FilePtr(s) => serde_json::to_value(s)?,
            Self::EntityPtr(v) | Self::EntityHandle(v) => Json::from(format_hex(*v)),
            Self::Vector3(v) | Self::Vector4(v) | Self::Quat(v) => serde_json::to_value(v)?,
            Self::Matrix3(v) => serde_json::to_value(v)?,
            Self::Matrix4(v) => serde_json::to_value(v)?,
            Self::Color(v) => serde_json::to_value(v)?,
            Self::EntityLink(link) => serde_json::to_value(link)?,
            Self::WideVector3(v) => serde_json::to_value(v)?,
        };
        Ok(json)
    }

    /// Parse the JSON projection of a value of type `data_type`
    pub fn from_json(data_type: DataType, json: Json) -> Fox2Result<Self> {
        let value = match data_type {
            DataType::Int8 => Self::Int8(from_json(json)?),
            DataType::UInt8 => Self::UInt8(from_json(json)?),
            DataType::Int16 => Self::Int16(from_json(json)?),
            DataType::UInt16 => Self::UInt16(from_json(json)?),
            DataType::Int32 => Self::Int32(from_json(json)?),
            DataType::UInt32 => Self::UInt32(from_json(json)?),
            DataType::Int64 => Self::Int64(from_json(json)?),
            DataType::UInt64 => Self::UInt64(from_json(json)?),
            DataType::Float => Self::Float(from_json(json)?),
            DataType::Double => Self::Double(from_json(json)?),
            DataType::Bool => Self::Bool(from_json(json)?),
            DataType::String => Self::String(from_json(json)?),
            DataType::Path => Self::Path(from_json(json)?),
            DataType::EntityPtr => Self::EntityPtr(hex_from_json(&json)?),
            DataType::Vector3 => Self::Vector3(from_json(json)?),
            DataType::Vector4 => Self::Vector4(from_json(json)?),
            DataType::Quat => Self::Quat(from_json(json)?),
            DataType::Matrix3 => Self::Matrix3(from_json(json)?),
            DataType::Matrix4 => Self::Matrix4(from_json(json)?),
            DataType::Color => Self::Color(from_json(json)?),
            DataType::FilePtr => Self::FilePtr(from_json(json)?),
            DataType::EntityHandle => Self::EntityHandle(hex_from_json(&json)?),
            DataType::EntityLink => Self::EntityLink(from_json(json)?),
            DataType::PropertyInfo => return Err(Fox2Error::UnsupportedType(data_type)),
            DataType::WideVector3 => Self::WideVector3(from_json(json)?),
        };
        Ok(value)
    }
}
