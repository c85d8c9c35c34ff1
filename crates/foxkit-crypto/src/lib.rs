//! Hashing and ciphers for Fox Engine asset containers
//!
//! This crate holds the primitives shared by the QAR, FPK, FOX2 and LNG
//! codecs: the CityHash-based string hashes, the extension code table, hash
//! dictionaries and the four lightweight ciphers that protect archive data.
//!
//! # Components
//!
//! - **Hashing**: [`city`] (seeded CityHash64) and [`hashing`] (path codes, name hashes)
//! - **Extensions**: [`extension`] maps extensions to the 13-bit codes in entry hashes
//! - **Dictionaries**: [`dictionary`] turns wordlists into hash lookups
//! - **Ciphers**: [`section`] (QAR section table), [`stream1`] and [`stream2`]
//!   (QAR payload layers), [`fpk`] (FPK payloads)
//! - **Digests**: [`md5`] wraps entry MD5s and their header masking
//!
//! # Examples
//!
//! ```
//! use foxkit_crypto::{Dictionary, hash_with_extension};
//!
//! let dict = Dictionary::from_text("/init");
//! let (name, resolved) = dict.resolve(hash_with_extension("/init.lua"));
//! assert!(resolved);
//! assert_eq!(name, "/init.lua");
//! ```

#![warn(missing_docs)]

pub mod city;
pub mod dictionary;
pub mod error;
pub mod extension;
pub mod fpk;
pub mod hashing;
pub mod md5;
pub mod section;
pub mod stream1;
pub mod stream2;

pub use error::{CryptoError, CryptoResult};

// Re-export commonly used types
pub use dictionary::{Dictionary, NameDictionary, NameLookup};
pub use hashing::{hash_file_name, hash_with_extension, legacy_hash, str_code_32, str_code_64};
pub use md5::ContentDigest;
pub use section::XOR_TABLE;
pub use stream1::Stream1Cipher;
pub use stream2::Stream2Cipher;
