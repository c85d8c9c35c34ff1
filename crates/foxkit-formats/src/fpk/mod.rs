//! FPK and FPKD package format
//!
//! Packages bundle the files of one level or asset set:
//!
//! - **Header** (48 bytes): 10-byte magic, file size, counts
//! - **Entry records** (48 bytes each): payload offset and size, path string
//!   location, MD5 of the path
//! - **Reference records** (16 bytes each): path string location
//! - **Strings**: NUL-terminated paths, then 16-byte aligned payloads
//!
//! Payloads starting with `0x1B`/`0x1C` are usually encrypted with the
//! [FPK cipher](foxkit_crypto::fpk). A payload that fails to decrypt is kept
//! verbatim.
//!
//! # Examples
//!
//! ```
//! use foxkit_formats::fpk::{Fpk, FpkEntry, FpkKind};
//! use std::io::Cursor;
//! use std::path::Path;
//!
//! let mut fpk = Fpk::new(FpkKind::Fpk);
//! let mut entry = FpkEntry::new("/Assets/tpp/script/mission/mission_main.lua", true);
//! entry.data = b"return {}".to_vec();
//! fpk.entries.push(entry);
//!
//! let mut cursor = Cursor::new(Vec::new());
//! fpk.write(&mut cursor, Path::new(".")).expect("package should be written");
//!
//! cursor.set_position(0);
//! let read = Fpk::read(&mut cursor).expect("package should parse");
//! assert!(read.entries[0].encrypted);
//! assert_eq!(read.entries[0].data, b"return {}");
//! ```

mod archive;
mod entry;
mod error;
mod header;

pub use archive::Fpk;
pub use entry::{
    ENTRY_RECORD_SIZE, EntryRecord, FpkEntry, FpkReference, REFERENCE_RECORD_SIZE, path_digest,
};
pub use error::{FpkError, FpkResult};
pub use header::{FPK_MAGIC, FPKD_MAGIC, FpkHeader, FpkKind, HEADER_SIZE, STRING_HEADER_SIZE, StringHeader};
