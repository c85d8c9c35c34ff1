//! Command implementations
//!
//! Every command reads its input from disk, writes its output next to it
//! unless told otherwise, and returns the path of what it produced.

use crate::config::{Cli, Command, FileKind};
use crate::definition::{Definition, PackageDefinition, QarDefinition};
use crate::error::{CommandError, CommandResult};
use foxkit_crypto::hashing::{hash_file_name, hash_with_extension, str_code_64};
use foxkit_crypto::{Dictionary, NameDictionary, NameLookup};
use foxkit_formats::fox2::Fox2;
use foxkit_formats::fpk::{Fpk, FpkKind};
use foxkit_formats::lng::Lng;
use foxkit_formats::qar::Qar;
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::ffi::OsString;
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

fn open(path: &Path) -> CommandResult<BufReader<File>> {
    File::open(path)
        .map(BufReader::new)
        .map_err(|e| CommandError::file(path, e))
}

fn create(path: &Path) -> CommandResult<BufWriter<File>> {
    File::create(path)
        .map(BufWriter::new)
        .map_err(|e| CommandError::file(path, e))
}

fn flush(path: &Path, mut writer: BufWriter<File>) -> CommandResult<()> {
    writer.flush().map_err(|e| CommandError::file(path, e))
}

fn read_json<T: DeserializeOwned>(path: &Path) -> CommandResult<T> {
    Ok(serde_json::from_reader(open(path)?)?)
}

fn write_json<T: Serialize>(path: &Path, value: &T) -> CommandResult<()> {
    let mut writer = create(path)?;
    serde_json::to_writer_pretty(&mut writer, value)?;
    flush(path, writer)
}

/// `dir/name.ext` becomes `dir/name_ext`
pub fn default_directory(path: &Path) -> CommandResult<PathBuf> {
    let name = path
        .file_name()
        .ok_or_else(|| CommandError::NoOutputName(path.into()))?
        .to_string_lossy();
    let dir_name = match name.rfind('.') {
        Some(dot) if dot > 0 => format!("{}_{}", &name[..dot], &name[dot + 1..]),
        _ => format!("{name}_"),
    };
    Ok(path.with_file_name(dir_name))
}

/// `path` with `.json` appended
pub fn with_json(path: &Path) -> PathBuf {
    let mut name = OsString::from(path.as_os_str());
    name.push(".json");
    PathBuf::from(name)
}

/// `path` with its trailing `.json` removed
pub fn without_json(path: &Path) -> CommandResult<PathBuf> {
    match path.extension() {
        Some(ext) if ext.eq_ignore_ascii_case("json") => Ok(path.with_extension("")),
        _ => Err(CommandError::NoOutputName(path.into())),
    }
}

fn load_or_default<T, F>(path: Option<&Path>, read: F) -> CommandResult<T>
where
    T: Default,
    F: FnOnce(&mut BufReader<File>) -> CommandResult<T>,
{
    match path {
        Some(path) if path.is_file() => {
            let loaded = read(&mut open(path)?)?;
            tracing::debug!("Loaded dictionary {}", path.display());
            Ok(loaded)
        }
        Some(path) => {
            tracing::warn!(
                "Dictionary {} not found, names stay unresolved",
                path.display()
            );
            Ok(T::default())
        }
        None => Ok(T::default()),
    }
}

/// Load a QAR path dictionary; a missing file gives an empty dictionary
pub fn load_dictionary(path: Option<&Path>) -> CommandResult<Dictionary> {
    load_or_default(path, |r| Ok(Dictionary::read(r)?))
}

/// Load a FOX2/LNG name dictionary; a missing file gives an empty dictionary
pub fn load_names(path: Option<&Path>) -> CommandResult<NameDictionary> {
    load_or_default(path, |r| Ok(NameDictionary::read(r)?))
}

/// Unpack a QAR archive and write `<input>.json`
///
/// Returns the definition path.
pub fn extract_qar(input: &Path, output: Option<&Path>, dictionary: &Dictionary) -> CommandResult<PathBuf> {
    let (mut qar, mut reader) = Qar::open(input)?;
    let resolved = qar.apply_dictionary(dictionary);
    tracing::info!(
        "Resolved {resolved} of {} names in {}",
        qar.entries.len(),
        input.display()
    );

    let out_dir = match output {
        Some(dir) => dir.to_path_buf(),
        None => default_directory(input)?,
    };
    for entry in &qar.entries {
        let target = qar.extract(&entry.file_path, entry.hash(), &mut reader, &out_dir)?;
        tracing::debug!("Extracted {}", target.display());
    }

    let definition_path = with_json(input);
    write_json(&definition_path, &Definition::Qar(QarDefinition::from_qar(&qar)))?;
    Ok(definition_path)
}

/// Unpack an FPK or FPKD package and write `<input>.json`
///
/// Returns the definition path.
pub fn extract_fpk(input: &Path, output: Option<&Path>) -> CommandResult<PathBuf> {
    let fpk = Fpk::open(input)?;
    let out_dir = match output {
        Some(dir) => dir.to_path_buf(),
        None => default_directory(input)?,
    };
    for entry in &fpk.entries {
        let target = fpk.extract(&entry.file_path, &out_dir)?;
        tracing::debug!("Extracted {}", target.display());
    }

    let definition_path = with_json(input);
    write_json(&definition_path, &Definition::package(&fpk))?;
    Ok(definition_path)
}

/// Build the archive described by a definition
///
/// Returns the archive path.
pub fn pack(definition_path: &Path, input_dir: Option<&Path>, output: Option<&Path>) -> CommandResult<PathBuf> {
    let definition: Definition = read_json(definition_path)?;
    let archive_path = match output {
        Some(path) => path.to_path_buf(),
        None => without_json(definition_path)?,
    };
    let base_dir = match input_dir {
        Some(dir) => dir.to_path_buf(),
        None => default_directory(&archive_path)?,
    };

    let mut writer = create(&archive_path)?;
    match definition {
        Definition::Qar(def) => def.to_qar().write(&mut writer, &base_dir)?,
        Definition::Fpk(def) => write_package(&def, FpkKind::Fpk, &mut writer, &base_dir)?,
        Definition::Fpkd(def) => write_package(&def, FpkKind::Fpkd, &mut writer, &base_dir)?,
    }
    flush(&archive_path, writer)?;

    tracing::info!("Packed {}", archive_path.display());
    Ok(archive_path)
}

fn write_package(
    definition: &PackageDefinition,
    kind: FpkKind,
    writer: &mut BufWriter<File>,
    base_dir: &Path,
) -> CommandResult<()> {
    definition.to_fpk(kind).write(writer, base_dir)?;
    Ok(())
}

/// Turn a FOX2 document or LNG table into JSON
///
/// Returns the JSON path.
pub fn decompile(input: &Path, output: Option<&Path>, names: &NameDictionary) -> CommandResult<PathBuf> {
    let json_path = output.map_or_else(|| with_json(input), Path::to_path_buf);
    match FileKind::from_path(input) {
        Some(FileKind::Fox2) => {
            let mut fox2 = Fox2::read(&mut open(input)?)?;
            fox2.resolve_with(Some(names as &dyn NameLookup));
            write_json(&json_path, &fox2)?;
        }
        Some(FileKind::Lng) => {
            let lng = Lng::read(&mut open(input)?, Some(names))?;
            write_json(&json_path, &lng)?;
        }
        _ => return Err(CommandError::UnsupportedInput(input.into())),
    }
    tracing::info!("Decompiled {} to {}", input.display(), json_path.display());
    Ok(json_path)
}

/// Turn JSON back into a FOX2 document or LNG table
///
/// Returns the binary path.
pub fn compile(input: &Path, output: Option<&Path>) -> CommandResult<PathBuf> {
    let binary_path = match output {
        Some(path) => path.to_path_buf(),
        None => without_json(input)?,
    };
    match FileKind::from_path(input) {
        Some(FileKind::Fox2Json) => {
            let fox2: Fox2 = read_json(input)?;
            let mut writer = create(&binary_path)?;
            fox2.write(&mut writer)?;
            flush(&binary_path, writer)?;
        }
        Some(FileKind::LngJson) => {
            let lng: Lng = read_json(input)?;
            let mut writer = create(&binary_path)?;
            lng.write(&mut writer)?;
            flush(&binary_path, writer)?;
        }
        _ => return Err(CommandError::UnsupportedInput(input.into())),
    }
    tracing::info!("Compiled {} to {}", input.display(), binary_path.display());
    Ok(binary_path)
}

/// One line per input: entry hash, StrCode64 and path code
pub fn hash_lines(strings: &[String]) -> Vec<String> {
    strings
        .iter()
        .map(|s| {
            format!(
                "{:016x} {:012x} {:013x} {s}",
                hash_with_extension(s),
                str_code_64(s.as_bytes()),
                hash_file_name(s, true)
            )
        })
        .collect()
}

/// Run `command` with the dictionaries configured in `cli`
pub fn execute(cli: &Cli, command: &Command) -> CommandResult<()> {
    match command {
        Command::Extract { input, output } => {
            let definition = match FileKind::from_path(input) {
                Some(FileKind::Qar) => {
                    let dictionary = load_dictionary(cli.dictionary_path().as_deref())?;
                    extract_qar(input, output.as_deref(), &dictionary)?
                }
                Some(FileKind::Fpk | FileKind::Fpkd) => extract_fpk(input, output.as_deref())?,
                _ => return Err(CommandError::UnsupportedInput(input.clone())),
            };
            tracing::info!("Wrote definition {}", definition.display());
        }
        Command::Pack {
            definition,
            input_dir,
            output,
        } => {
            pack(definition, input_dir.as_deref(), output.as_deref())?;
        }
        Command::Decompile { input, output } => {
            let names = load_names(cli.fox_dictionary_path().as_deref())?;
            decompile(input, output.as_deref(), &names)?;
        }
        Command::Compile { input, output } => {
            compile(input, output.as_deref())?;
        }
        Command::Hash { strings } => {
            let mut stdout = std::io::stdout().lock();
            for line in hash_lines(strings) {
                writeln!(stdout, "{line}").map_err(|e| CommandError::file("<stdout>", e))?;
            }
        }
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    #[test]
    fn test_default_directory() {
        assert_eq!(
            default_directory(Path::new("data/chunk0.dat")).unwrap(),
            PathBuf::from("data/chunk0_dat")
        );
        assert_eq!(
            default_directory(Path::new("mission.fpkd")).unwrap(),
            PathBuf::from("mission_fpkd")
        );
        assert_eq!(
            default_directory(Path::new("noext")).unwrap(),
            PathBuf::from("noext_")
        );
    }

    #[test]
    fn test_json_names() {
        assert_eq!(
            with_json(Path::new("a/x.fox2")),
            PathBuf::from("a/x.fox2.json")
        );
        assert_eq!(
            without_json(Path::new("a/x.fox2.json")).unwrap(),
            PathBuf::from("a/x.fox2")
        );
        assert!(without_json(Path::new("a/x.fox2")).is_err());
    }

    #[test]
    fn test_hash_lines() {
        let lines = hash_lines(&["/test.lua".to_string()]);
        assert_eq!(lines.len(), 1);
        assert!(lines[0].starts_with("18e40155acd63807 "));
        assert!(lines[0].ends_with(" /test.lua"));
    }

    #[test]
    fn test_missing_dictionary_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let dictionary = load_dictionary(Some(&dir.path().join("absent.txt"))).unwrap();
        assert!(dictionary.is_empty());
        assert!(load_names(None).unwrap().is_empty());
    }

    #[test]
    fn test_decompile_rejects_other_files() {
        let result = decompile(Path::new("x.dat"), None, &NameDictionary::default());
        assert!(matches!(result, Err(CommandError::UnsupportedInput(_))));
    }

    proptest! {
        #[test]
        fn test_json_suffix_round_trip(stem in "[a-z0-9_]{1,12}", ext in "[a-z0-9]{1,5}") {
            let path = PathBuf::from(format!("{stem}.{ext}"));
            prop_assert_eq!(without_json(&with_json(&path)).unwrap(), path);
        }
    }
}
