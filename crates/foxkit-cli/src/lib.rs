//! Fox Engine archive command line tool
//!
//! This crate backs the `foxkit` binary. It unpacks QAR archives and FPK/FPKD
//! packages into directories plus a JSON definition, packs them back from that
//! definition, and converts FOX2 documents and LNG tables to and from JSON.
//!
//! # Commands
//!
//! - `extract <file.dat|file.fpk|file.fpkd>`: unpack next to the input and write `<file>.json`
//! - `pack <definition.json>`: rebuild the archive described by a definition
//! - `decompile <file.fox2|file.lng2>`: write `<file>.json`
//! - `compile <file.fox2.json|file.lng2.json>`: write the binary form
//! - `hash <string>...`: print entry hash, StrCode64 and path code
//!
//! A bare file argument runs the command implied by its suffix.
//!
//! # Library Usage
//!
//! ```no_run
//! use foxkit_cli::commands;
//! use std::path::Path;
//!
//! let dictionary = commands::load_dictionary(Some(Path::new("dictionary.txt")))?;
//! let definition = commands::extract_qar(Path::new("chunk0.dat"), None, &dictionary)?;
//! commands::pack(&definition, None, Some(Path::new("chunk0_repacked.dat")))?;
//! # Ok::<(), foxkit_cli::CommandError>(())
//! ```

#![warn(missing_docs)]

pub mod commands;
pub mod config;
pub mod definition;
pub mod error;

pub use config::{Cli, Command, FileKind};
pub use definition::{Definition, PackageDefinition, QarDefinition};
pub use error::{CommandError, CommandResult, ConfigError};
