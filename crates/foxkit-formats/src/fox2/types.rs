//! Value type and container tags

use super::error::Fox2Error;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Scalar type tag of a property
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum DataType {
    /// `i8`
    Int8 = 0,
    /// `u8`
    UInt8 = 1,
    /// `i16`
    Int16 = 2,
    /// `u16`
    UInt16 = 3,
    /// `i32`
    Int32 = 4,
    /// `u32`
    UInt32 = 5,
    /// `i64`
    Int64 = 6,
    /// `u64`
    UInt64 = 7,
    /// `f32`
    Float = 8,
    /// `f64`
    Double = 9,
    /// One byte, nonzero is true
    Bool = 10,
    /// Hashed string
    String = 11,
    /// Hashed path
    Path = 12,
    /// Entity address
    EntityPtr = 13,
    /// Four floats, the last one unused
    Vector3 = 14,
    /// Four floats
    Vector4 = 15,
    /// Quaternion
    Quat = 16,
    /// 3x3 float matrix
    Matrix3 = 17,
    /// 4x4 float matrix
    Matrix4 = 18,
    /// RGBA floats
    Color = 19,
    /// Hashed file path
    FilePtr = 20,
    /// Entity handle
    EntityHandle = 21,
    /// Link to an entity in another package
    EntityLink = 22,
    /// Property reflection record, layout unknown
    PropertyInfo = 23,
    /// Three floats plus two 16-bit words
    WideVector3 = 24,
}

impl DataType {
    /// Every tag in tag order
    pub const ALL: [Self; 25] = [
        Self::Int8,
        Self::UInt8,
        Self::Int16,
        Self::UInt16,
        Self::Int32,
        Self::UInt32,
        Self::Int64,
        Self::UInt64,
        Self::Float,
        Self::Double,
        Self::Bool,
        Self::String,
        Self::Path,
        Self::EntityPtr,
        Self::Vector3,
        Self::Vector4,
        Self::Quat,
        Self::Matrix3,
        Self::Matrix4,
        Self::Color,
        Self::FilePtr,
        Self::EntityHandle,
        Self::EntityLink,
        Self::PropertyInfo,
        Self::WideVector3,
    ];

    /// Tag value stored in property headers
    pub const fn tag(self) -> u8 {
        self as u8
    }

    /// Name as used in JSON
    pub const fn name(self) -> &'static str {
        match self {
            Self::Int8 => "Int8",
            Self::UInt8 => "UInt8",
            Self::Int16 => "Int16",
            Self::UInt16 => "UInt16",
            Self::Int32 => "Int32",
            Self::UInt32 => "UInt32",
            Self::Int64 => "Int64",
            Self::UInt64 => "UInt64",
            Self::Float => "Float",
            Self::Double => "Double",
            Self::Bool => "Bool",
            Self::String => "String",
            Self::Path => "Path",
            Self::EntityPtr => "EntityPtr",
            Self::Vector3 => "Vector3",
            Self::Vector4 => "Vector4",
            Self::Quat => "Quat",
            Self::Matrix3 => "Matrix3",
            Self::Matrix4 => "Matrix4",
            Self::Color => "Color",
            Self::FilePtr => "FilePtr",
            Self::EntityHandle => "EntityHandle",
            Self::EntityLink => "EntityLink",
            Self::PropertyInfo => "PropertyInfo",
            Self::WideVector3 => "WideVector3",
        }
    }
}

impl TryFrom<u8> for DataType {
    type Error = Fox2Error;

    fn try_from(tag: u8) -> Result<Self, Self::Error> {
        Self::ALL
            .get(tag as usize)
            .copied()
            .ok_or(Fox2Error::UnknownDataType(tag))
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for DataType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|t| t.name() == s)
            .ok_or_else(|| format!("unknown data type: {s}"))
    }
}

/// Container kind of a property
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum ContainerKind {
    /// Fixed-size array
    #[default]
    StaticArray = 0,
    /// Growable array
    DynamicArray = 1,
    /// Hash-keyed map
    StringMap = 2,
    /// Linked list
    List = 3,
}

impl ContainerKind {
    /// Tag value stored in property headers
    pub const fn tag(self) -> u8 {
        self as u8
    }

    /// Name as used in JSON
    pub const fn name(self) -> &'static str {
        match self {
            Self::StaticArray => "StaticArray",
            Self::DynamicArray => "DynamicArray",
            Self::StringMap => "StringMap",
            Self::List => "List",
        }
    }
}

impl TryFrom<u8> for ContainerKind {
    type Error = Fox2Error;

    fn try_from(tag: u8) -> Result<Self, Self::Error> {
        match tag {
            0 => Ok(Self::StaticArray),
            1 => Ok(Self::DynamicArray),
            2 => Ok(Self::StringMap),
            3 => Ok(Self::List),
            _ => Err(Fox2Error::UnknownContainer(tag)),
        }
    }
}

impl fmt::Display for ContainerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_tags_follow_declaration_order() {
        for (i, t) in DataType::ALL.iter().enumerate() {
            assert_eq!(t.tag() as usize, i);
            assert_eq!(DataType::try_from(i as u8).unwrap(), *t);
        }
        assert!(matches!(
            DataType::try_from(25),
            Err(Fox2Error::UnknownDataType(25))
        ));
    }

    #[test]
    fn test_names() {
        assert_eq!("String".parse::<DataType>(), Ok(DataType::String));
        assert_eq!("WideVector3".parse::<DataType>(), Ok(DataType::WideVector3));
        assert!("asdsad".parse::<DataType>().is_err());
        assert_eq!(
            serde_json::to_string(&DataType::EntityLink).unwrap(),
            "\"EntityLink\""
        );
    }

    #[test]
    fn test_container_tags() {
        assert_eq!(ContainerKind::try_from(2).unwrap(), ContainerKind::StringMap);
        assert_eq!(ContainerKind::List.tag(), 3);
        assert!(matches!(
            ContainerKind::try_from(4),
            Err(Fox2Error::UnknownContainer(4))
        ));
        assert_eq!(
            serde_json::from_str::<ContainerKind>("\"List\"").unwrap(),
            ContainerKind::List
        );
    }
}
