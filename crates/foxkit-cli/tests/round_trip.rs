//! Extract, pack, decompile and compile through the command layer, on disk

#![allow(clippy::expect_used, clippy::unwrap_used, clippy::panic)]

use clap::Parser;
use foxkit_cli::commands;
use foxkit_cli::{Cli, Definition};
use foxkit_crypto::{Dictionary, NameDictionary, hash_with_extension};
use foxkit_formats::fox2::{Container, ContainerKind, DataType, Entity, Fox2, HashedString, Property, Value};
use foxkit_formats::fpk::{Fpk, FpkEntry, FpkKind, FpkReference};
use foxkit_formats::lng::{Endianness, Lng, LngEntry};
use foxkit_formats::qar::{Qar, QarEntry};
use pretty_assertions::assert_eq;
use std::collections::HashMap;
use std::fs::{self, File};
use std::path::Path;

const SCRIPT: &str = "/Assets/tpp/ui/Script/emblem_list.lua";

fn write_qar(path: &Path) {
    let mut qar = Qar::new(0, 2);
    let mut script = QarEntry::new(SCRIPT);
    script.compressed = true;
    script.data = b"local emblems = {}\n".repeat(32);
    let mut hidden = QarEntry::new("/test.lua");
    hidden.data_header.key = 0x1234;
    hidden.data = b"data1234567890\n".to_vec();
    qar.entries = vec![script, hidden];

    let mut file = File::create(path).unwrap();
    qar.write(&mut file, Path::new(".")).unwrap();
}

fn contents(path: &Path, dictionary: &Dictionary) -> HashMap<u64, Vec<u8>> {
    let (mut qar, mut reader) = Qar::open(path).unwrap();
    qar.apply_dictionary(dictionary);
    qar.entries
        .iter()
        .map(|e| (e.hash(), e.read_data(&mut reader).unwrap()))
        .collect()
}

#[test]
fn test_qar_extract_then_pack() {
    let dir = tempfile::tempdir().unwrap();
    let archive = dir.path().join("chunk0.dat");
    write_qar(&archive);

    let dictionary_path = dir.path().join("dictionary.txt");
    fs::write(&dictionary_path, "/Assets/tpp/ui/Script/emblem_list\n").unwrap();
    let dictionary = commands::load_dictionary(Some(&dictionary_path)).unwrap();

    let definition_path = commands::extract_qar(&archive, None, &dictionary).unwrap();
    assert_eq!(definition_path, dir.path().join("chunk0.dat.json"));

    let out_dir = dir.path().join("chunk0_dat");
    assert_eq!(
        fs::read(out_dir.join("Assets/tpp/ui/Script/emblem_list.lua")).unwrap(),
        b"local emblems = {}\n".repeat(32)
    );

    let definition: Definition =
        serde_json::from_str(&fs::read_to_string(&definition_path).unwrap()).unwrap();
    let Definition::Qar(qar_definition) = &definition else {
        panic!("expected a qar definition");
    };
    assert_eq!(qar_definition.version, 2);
    assert_eq!(qar_definition.entries[0].file_path, SCRIPT);
    assert!(qar_definition.entries[0].compressed);
    assert_eq!(qar_definition.entries[0].hash, 0);

    let placeholder = &qar_definition.entries[1];
    assert_eq!(placeholder.hash, hash_with_extension("/test.lua"));
    assert_eq!(placeholder.key, 0x1234);
    assert!(placeholder.meta_flag);
    assert_eq!(
        fs::read(out_dir.join(&placeholder.file_path)).unwrap(),
        b"data1234567890\n"
    );

    let repacked = dir.path().join("repacked.dat");
    let written = commands::pack(&definition_path, Some(&out_dir), Some(&repacked)).unwrap();
    assert_eq!(written, repacked);
    assert_eq!(
        contents(&repacked, &dictionary),
        contents(&archive, &dictionary)
    );
}

#[test]
fn test_fpk_extract_then_pack_by_suffix() {
    let dir = tempfile::tempdir().unwrap();
    let package = dir.path().join("title.fpkd");

    let mut fpk = Fpk::new(FpkKind::Fpkd);
    let mut doc = FpkEntry::new("/Assets/tpp/level/title.fox2", false);
    doc.data = vec![0xAB; 40];
    let mut script = FpkEntry::new("/Assets/tpp/script/title.lua", true);
    script.data = b"return {}\n".to_vec();
    fpk.entries = vec![doc, script];
    fpk.references = vec![FpkReference::new("/Assets/tpp/pack/common.fpkd")];
    let mut file = File::create(&package).unwrap();
    fpk.write(&mut file, Path::new(".")).unwrap();
    drop(file);

    let cli = Cli::try_parse_from(["foxkit", package.to_str().unwrap()]).unwrap();
    let command = cli.resolve_command().unwrap();
    commands::execute(&cli, &command).unwrap();

    let definition_path = dir.path().join("title.fpkd.json");
    assert_eq!(
        fs::read(dir.path().join("title_fpkd/Assets/tpp/script/title.lua")).unwrap(),
        b"return {}\n"
    );

    // packing writes back over the original package
    fs::remove_file(&package).unwrap();
    let cli = Cli::try_parse_from(["foxkit", definition_path.to_str().unwrap()]).unwrap();
    let command = cli.resolve_command().unwrap();
    commands::execute(&cli, &command).unwrap();

    let read = Fpk::open(&package).unwrap();
    assert_eq!(read.kind(), FpkKind::Fpkd);
    assert_eq!(read.references, fpk.references);
    assert_eq!(read.entries.len(), 2);
    assert_eq!(read.entries[0].data, vec![0xAB; 40]);
    assert!(read.entries[1].encrypted);
    assert_eq!(read.entries[1].data, b"return {}\n");
}

#[test]
fn test_fox2_decompile_then_compile() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("title.fox2");

    let mut name = Property::new("name", DataType::String, ContainerKind::StaticArray);
    name.container = Container::StaticArray(vec![Value::String(HashedString::new("uhh"))]);
    let mut entity = Entity::new("TppGameObject", 0x1000_0010);
    entity.static_properties.push(name);
    entity.class_name = HashedString::from_hash(0x6401_235d_dad2);
    let doc = Fox2 {
        entities: vec![entity],
        literals: Vec::new(),
    };
    fs::write(&path, doc.to_bytes().unwrap()).unwrap();

    let names = NameDictionary::from_text("TppGameObject");
    let json_path = commands::decompile(&path, None, &names).unwrap();
    assert_eq!(json_path, dir.path().join("title.fox2.json"));

    let tree: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&json_path).unwrap()).unwrap();
    assert_eq!(tree["entities"][0]["class"], "TppGameObject");

    fs::remove_file(&path).unwrap();
    let compiled = commands::compile(&json_path, None).unwrap();
    assert_eq!(compiled, path);
    assert_eq!(fs::read(&path).unwrap(), doc_with_resolved_class().to_bytes().unwrap());
}

fn doc_with_resolved_class() -> Fox2 {
    let mut name = Property::new("name", DataType::String, ContainerKind::StaticArray);
    name.container = Container::StaticArray(vec![Value::String(HashedString::new("uhh"))]);
    let mut entity = Entity::new("TppGameObject", 0x1000_0010);
    entity.static_properties.push(name);
    Fox2 {
        entities: vec![entity],
        literals: Vec::new(),
    }
}

#[test]
fn test_lng_decompile_then_compile() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("tpp_tutorial.eng.lng2");

    let table = Lng {
        endianness: Endianness::Big,
        entries: vec![
            LngEntry::new("tutorial_title", 0, "Tutorial"),
            LngEntry::new("tutorial_body", 2, "Press the button"),
        ],
        ..Lng::default()
    };
    let mut file = File::create(&path).unwrap();
    table.write(&mut file).unwrap();
    drop(file);
    let original = fs::read(&path).unwrap();

    let json_path = commands::decompile(&path, None, &NameDictionary::default()).unwrap();
    let output = dir.path().join("rebuilt.lng2");
    commands::compile(&json_path, Some(&output)).unwrap();
    assert_eq!(fs::read(&output).unwrap(), original);
}

#[test]
fn test_pack_rejects_unknown_type() {
    let dir = tempfile::tempdir().unwrap();
    let definition = dir.path().join("x.dat.json");
    fs::write(&definition, r#"{"type":"zip","entries":[]}"#).unwrap();
    let err = commands::pack(&definition, None, None).unwrap_err();
    assert!(matches!(err, foxkit_cli::CommandError::Json(_)));
}
