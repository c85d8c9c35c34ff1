//! QAR archive format
//!
//! QAR (`.dat`) archives hold game files addressed only by a 64-bit hash of
//! their path. The layout is:
//!
//! - **Header** (32 bytes): magic "SQAR" followed by seven masked words
//! - **Section table**: one encrypted 64-bit word per entry giving its block
//!   offset and hash fragments
//! - **Entries**: block-aligned; a masked 32-byte header and a ciphered payload
//!
//! Names are not stored. A [`Dictionary`](foxkit_crypto::Dictionary) of
//! candidate paths turns hashes back into names, with hex placeholders for
//! anything it does not know.
//!
//! # Examples
//!
//! ```
//! use foxkit_formats::qar::{Qar, QarEntry};
//! use foxkit_crypto::hash_with_extension;
//! use std::io::Cursor;
//! use std::path::Path;
//!
//! let mut qar = Qar::new(0, 2);
//! let mut entry = QarEntry::new("/test.lua");
//! entry.data = b"data1234567890\n".to_vec();
//! qar.entries.push(entry);
//!
//! let mut cursor = Cursor::new(Vec::new());
//! qar.write(&mut cursor, Path::new(".")).expect("archive should be written");
//!
//! cursor.set_position(0);
//! let archive = Qar::read(&mut cursor).expect("archive should parse");
//! let mut out = Vec::new();
//! archive
//!     .extract_to("/test.lua", hash_with_extension("/test.lua"), &mut cursor, &mut out)
//!     .expect("entry should extract");
//! assert_eq!(out, b"data1234567890\n");
//! ```

mod archive;
mod entry;
mod error;
mod header;

pub use archive::{Qar, pack_section, relative_path, section_matches, section_offset};
pub use entry::{
    DataHeader, ENCRYPTION_MAGIC_1, ENCRYPTION_MAGIC_2, ENTRY_HEADER_SIZE, EntryHeader, HASH_MASK,
    QarEntry, data_header_size,
};
pub use error::{QarError, QarResult};
pub use header::{FLAG_LARGE_BLOCKS, HEADER_SIZE, QAR_MAGIC, QarHeader};
