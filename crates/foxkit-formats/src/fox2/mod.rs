//! FOX2 typed entity documents
//!
//! A FOX2 file is a flat list of entities, each holding static and dynamic
//! properties of one of 25 value types:
//!
//! - **Header** (32 bytes): magic, entity count, literal pool offset
//! - **Entities**: 64-byte header, then 16-byte aligned properties
//! - **Properties**: 32-byte header, then a container of values
//! - **Literal pool**: `(hash, length, bytes)` records naming every hashed
//!   string in the document, a zero hash, and the `"end"` trailer
//!
//! Strings are stored as StrCode64 hashes. Reading resolves them through the
//! document's own literal pool; [`Fox2::resolve_with`] adds an external
//! dictionary. Unresolved hashes are kept and written back unchanged.
//!
//! # Examples
//!
//! ```
//! use foxkit_formats::fox2::{
//!     Container, ContainerKind, DataType, Entity, Fox2, HashedString, Property, Value,
//! };
//! use std::io::Cursor;
//!
//! let mut property = Property::new("name", DataType::String, ContainerKind::StaticArray);
//! property.container = Container::StaticArray(vec![Value::String(HashedString::new("uhh"))]);
//! let mut entity = Entity::new("TppGameObject", 0x10);
//! entity.static_properties.push(property);
//! let doc = Fox2 { entities: vec![entity], literals: Vec::new() };
//!
//! let mut bytes = Vec::new();
//! doc.write(&mut bytes).expect("document should be written");
//!
//! let read = Fox2::read(&mut Cursor::new(bytes)).expect("document should parse");
//! assert_eq!(read.entities, doc.entities);
//! ```

mod container;
mod document;
mod entity;
mod error;
mod hashed;
mod header;
mod literal;
mod property;
mod types;
mod value;

pub use container::{Container, StringMapEntry};
pub use document::{Fox2, TRAILER};
pub use entity::{ENTITY_HEADER_SIZE, ENTITY_MAGIC, Entity, EntityHeader};
pub use error::{Fox2Error, Fox2Result};
pub use hashed::HashedString;
pub use header::{FOX2_MAGIC, FOX2_MAGIC2, Fox2Header, HEADER_SIZE};
pub use literal::Literal;
pub use property::{PROPERTY_HEADER_SIZE, Property, PropertyHeader};
pub use types::{ContainerKind, DataType};
pub use value::{Color, EntityLink, Float4, Matrix3, Matrix4, Value, WideVector3};
