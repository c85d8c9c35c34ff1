//! File format parsers and builders for Fox Engine assets
//!
#![allow(clippy::cast_possible_truncation)] // Intentional for binary format parsing
#![allow(clippy::cast_possible_wrap)] // Intentional for binary operations
#![allow(clippy::cast_lossless)] // Sometimes clearer than From
#![allow(clippy::doc_markdown)] // Format names don't need backticks
#![allow(clippy::module_name_repetitions)] // Clear naming is preferred
#![allow(clippy::similar_names)] // Domain-specific naming patterns
#![allow(clippy::float_cmp)] // Binary format requirements
#![allow(clippy::derive_partial_eq_without_eq)] // Float-bearing value types
#![allow(clippy::redundant_closure_for_method_calls)] // Iterator chains
#![allow(clippy::use_self)] // Type clarity
//! This crate provides symmetric (parser and builder) implementations for the
//! container and data formats of the Fox Engine:
//!
//! # Supported Formats
//!
//! - **QAR**: `.dat` archives with encrypted section tables and layered
//!   payload ciphers
//! - **FPK / FPKD**: asset packages with optional per-file encryption
//! - **FOX2**: typed entity documents with a hashed literal pool
//! - **LNG**: `LANG` localized string tables
//!
//! # Design Principles
//!
//! - **Symmetric Operations**: every format reads and writes
//! - **Explicit Dictionaries**: name resolution takes the dictionary as an
//!   argument, unresolved hashes survive a round trip
//! - **Round-Trip Guarantee**: `read(write(x)) == x` up to fields derived on write

#![warn(missing_docs)]

/// Fox2 typed entity documents
pub mod fox2;
/// FPK and FPKD packages
pub mod fpk;
/// LNG language tables
pub mod lng;
/// QAR archives
///
/// See the [`qar`] module for the on-disk layout and an end-to-end example.
pub mod qar;
/// Alignment, short-read and hex helpers shared by the codecs
pub mod util;
