//! Command line configuration.
//!
//! Arguments come from the command line with environment fallbacks for the
//! dictionaries and the log filter. Besides the explicit subcommands, a bare
//! file argument picks a command from its suffix.
//!
//! # Configuration Sources
//!
//! - CLI arguments (`--dictionary`, `--fox-dictionary`, `--log`, `--verbose`)
//! - Environment variables (`FOXKIT_DICTIONARY`, `FOXKIT_FOX_DICTIONARY`, `FOXKIT_LOG`)
//! - `dictionary.txt` and `fox_dictionary.txt` next to the executable
//!
//! # Example
//!
//! ```
//! use clap::Parser;
//! use foxkit_cli::{Cli, Command};
//!
//! let cli = Cli::parse_from(["foxkit", "chunk0.dat"]);
//! let command = cli.resolve_command().expect("suffix is known");
//! assert!(matches!(command, Command::Extract { .. }));
//! ```

use crate::error::ConfigError;
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};

/// Default QAR dictionary file name
pub const DICTIONARY_FILE: &str = "dictionary.txt";

/// Default FOX2/LNG name dictionary file name
pub const FOX_DICTIONARY_FILE: &str = "fox_dictionary.txt";

/// Command line arguments.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "foxkit",
    about = "Unpack and repack Fox Engine QAR, FPK, FOX2 and LNG files",
    version
)]
pub struct Cli {
    /// Command to run
    #[command(subcommand)]
    pub command: Option<Command>,

    /// File to process, the command is chosen by its suffix
    pub input: Option<PathBuf>,

    /// QAR path dictionary
    #[arg(long, global = true, env = "FOXKIT_DICTIONARY")]
    pub dictionary: Option<PathBuf>,

    /// FOX2 and LNG name dictionary
    #[arg(long, global = true, env = "FOXKIT_FOX_DICTIONARY")]
    pub fox_dictionary: Option<PathBuf>,

    /// Log filter directive, overrides RUST_LOG
    #[arg(long, global = true, env = "FOXKIT_LOG")]
    pub log: Option<String>,

    /// Log at debug level
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

/// Subcommands.
#[derive(Debug, Clone, PartialEq, Eq, Subcommand)]
pub enum Command {
    /// Unpack a QAR archive or an FPK/FPKD package and write its definition
    Extract {
        /// Archive or package
        input: PathBuf,
        /// Output directory, defaults to `<name>_<ext>` next to the input
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Build an archive or package from a JSON definition
    Pack {
        /// Definition written by `extract`
        definition: PathBuf,
        /// Directory holding the files, defaults to `<name>_<ext>` next to the definition
        #[arg(short, long)]
        input_dir: Option<PathBuf>,
        /// Output file, defaults to the definition path without `.json`
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Turn a FOX2 document or LNG table into JSON
    Decompile {
        /// `.fox2`, `.lng` or `.lng2` file
        input: PathBuf,
        /// Output file, defaults to the input path plus `.json`
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Turn JSON back into a FOX2 document or LNG table
    Compile {
        /// `.fox2.json`, `.lng.json` or `.lng2.json` file
        input: PathBuf,
        /// Output file, defaults to the input path without `.json`
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Print the hashes of strings
    Hash {
        /// Paths or names to hash
        #[arg(required = true)]
        strings: Vec<String>,
    },
}

/// File types recognized by suffix
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileKind {
    /// `.dat` QAR archive
    Qar,
    /// `.fpk` package
    Fpk,
    /// `.fpkd` package
    Fpkd,
    /// `.fox2` document
    Fox2,
    /// `.lng` or `.lng2` table
    Lng,
    /// `.fox2.json` document tree
    Fox2Json,
    /// `.lng.json` or `.lng2.json` table
    LngJson,
    /// Any other `.json`: a pack definition
    Definition,
}

impl FileKind {
    /// Classify `path` by its (case-insensitive) suffix
    pub fn from_path(path: &Path) -> Option<Self> {
        let name = path.file_name()?.to_string_lossy().to_ascii_lowercase();
        let kind = if name.ends_with(".fox2.json") {
            Self::Fox2Json
        } else if name.ends_with(".lng.json") || name.ends_with(".lng2.json") {
            Self::LngJson
        } else if name.ends_with(".json") {
            Self::Definition
        } else if name.ends_with(".dat") {
            Self::Qar
        } else if name.ends_with(".fpkd") {
            Self::Fpkd
        } else if name.ends_with(".fpk") {
            Self::Fpk
        } else if name.ends_with(".fox2") {
            Self::Fox2
        } else if name.ends_with(".lng") || name.ends_with(".lng2") {
            Self::Lng
        } else {
            return None;
        };
        Some(kind)
    }
}

impl Command {
    /// Command implied by a bare file argument
    pub fn for_path(path: &Path) -> Result<Self, ConfigError> {
        let kind =
            FileKind::from_path(path).ok_or_else(|| ConfigError::UnknownFileType(path.into()))?;
        let input = path.to_path_buf();
        Ok(match kind {
            FileKind::Qar | FileKind::Fpk | FileKind::Fpkd => Self::Extract {
                input,
                output: None,
            },
            FileKind::Fox2 | FileKind::Lng => Self::Decompile {
                input,
                output: None,
            },
            FileKind::Fox2Json | FileKind::LngJson => Self::Compile {
                input,
                output: None,
            },
            FileKind::Definition => Self::Pack {
                definition: input,
                input_dir: None,
                output: None,
            },
        })
    }
}

impl Cli {
    /// The explicit subcommand, or the one implied by the input file
    pub fn resolve_command(&self) -> Result<Command, ConfigError> {
        match (&self.command, &self.input) {
            (Some(command), _) => Ok(command.clone()),
            (None, Some(input)) => Command::for_path(input),
            (None, None) => Err(ConfigError::MissingInput),
        }
    }

    /// Level used when neither `--log` nor `RUST_LOG` is set
    pub const fn default_log_level(&self) -> &'static str {
        if self.verbose { "debug" } else { "info" }
    }

    /// QAR dictionary to load
    pub fn dictionary_path(&self) -> Option<PathBuf> {
        self.dictionary
            .clone()
            .or_else(|| beside_executable(DICTIONARY_FILE))
    }

    /// Name dictionary to load
    pub fn fox_dictionary_path(&self) -> Option<PathBuf> {
        self.fox_dictionary
            .clone()
            .or_else(|| beside_executable(FOX_DICTIONARY_FILE))
    }
}

fn beside_executable(file_name: &str) -> Option<PathBuf> {
    let exe = std::env::current_exe().ok()?;
    Some(exe.parent()?.join(file_name))
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_file_kinds() {
        let cases = [
            ("chunk0.dat", Some(FileKind::Qar)),
            ("a/b/mission.FPK", Some(FileKind::Fpk)),
            ("mission.fpkd", Some(FileKind::Fpkd)),
            ("x.fox2", Some(FileKind::Fox2)),
            ("x.fox2.json", Some(FileKind::Fox2Json)),
            ("eng.lng2", Some(FileKind::Lng)),
            ("eng.lng2.json", Some(FileKind::LngJson)),
            ("chunk0.dat.json", Some(FileKind::Definition)),
            ("readme.txt", None),
        ];
        for (path, expected) in cases {
            assert_eq!(FileKind::from_path(Path::new(path)), expected, "{path}");
        }
    }

    #[test]
    fn test_positional_dispatch() {
        let cli = Cli::try_parse_from(["foxkit", "chunk0.dat.json"]).unwrap();
        assert_eq!(
            cli.resolve_command().unwrap(),
            Command::Pack {
                definition: PathBuf::from("chunk0.dat.json"),
                input_dir: None,
                output: None,
            }
        );

        let cli = Cli::try_parse_from(["foxkit", "x.fox2.json"]).unwrap();
        assert!(matches!(cli.resolve_command().unwrap(), Command::Compile { .. }));
    }

    #[test]
    fn test_subcommand() {
        let cli = Cli::try_parse_from(["foxkit", "extract", "a.fpk", "-o", "out"]).unwrap();
        assert_eq!(
            cli.resolve_command().unwrap(),
            Command::Extract {
                input: PathBuf::from("a.fpk"),
                output: Some(PathBuf::from("out")),
            }
        );
    }

    #[test]
    fn test_hash_requires_input() {
        assert!(Cli::try_parse_from(["foxkit", "hash"]).is_err());
    }

    #[test]
    fn test_missing_and_unknown_input() {
        let cli = Cli::try_parse_from(["foxkit"]).unwrap();
        assert!(matches!(cli.resolve_command(), Err(ConfigError::MissingInput)));

        let cli = Cli::try_parse_from(["foxkit", "notes.txt"]).unwrap();
        assert!(matches!(
            cli.resolve_command(),
            Err(ConfigError::UnknownFileType(_))
        ));
    }

    #[test]
    fn test_verbose_level() {
        let cli = Cli::try_parse_from(["foxkit", "-v", "x.fox2"]).unwrap();
        assert_eq!(cli.default_log_level(), "debug");
        let cli = Cli::try_parse_from(["foxkit", "x.fox2"]).unwrap();
        assert_eq!(cli.default_log_level(), "info");
    }

    #[test]
    fn test_explicit_dictionary() {
        let cli =
            Cli::try_parse_from(["foxkit", "--dictionary", "names.txt", "chunk0.dat"]).unwrap();
        assert_eq!(cli.dictionary_path(), Some(PathBuf::from("names.txt")));
    }
}
