//! LNG language tables
//!
//! `LANG` files map 32-bit keys to coloured strings:
//!
//! - **Header** (24 bytes): magic, version, endianness marker, count, offsets
//! - **Values**: a 16-bit colour and a NUL-terminated string per entry
//! - **Keys**: `(key, value offset)` pairs sorted by key
//!
//! A key is the low half of the StrCode64 of a language id. Reading with a
//! [`NameDictionary`](foxkit_crypto::NameDictionary) recovers the ids.
//!
//! # Examples
//!
//! ```
//! use foxkit_formats::lng::{Lng, LngEntry};
//! use foxkit_crypto::NameDictionary;
//! use std::io::Cursor;
//!
//! let lng = Lng { entries: vec![LngEntry::new("menu_quit", 0, "Quit")], ..Lng::default() };
//! let mut cursor = Cursor::new(Vec::new());
//! lng.write(&mut cursor).expect("table should be written");
//!
//! let names = NameDictionary::from_text("menu_quit");
//! cursor.set_position(0);
//! let read = Lng::read(&mut cursor, Some(&names)).expect("table should parse");
//! assert_eq!(read.entries[0].lang_id.as_deref(), Some("menu_quit"));
//! ```

mod error;
mod header;
mod table;

pub use error::{LngError, LngResult};
pub use header::{Endianness, HEADER_SIZE, LNG_MAGIC, LngHeader, VERSION_GZ, VERSION_TPP};
pub use table::{Lng, LngEntry, lang_key};
