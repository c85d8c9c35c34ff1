//! End-to-end tests across the container formats
//!
//! A FOX2 document is packed into an FPKD, the FPKD into a QAR archive, and
//! everything is read back through the same public API the CLI uses.

#![allow(clippy::expect_used, clippy::unwrap_used, clippy::panic)]

use foxkit_crypto::{Dictionary, NameDictionary, hash_with_extension};
use foxkit_formats::fox2::{
    Container, ContainerKind, DataType, Entity, EntityLink, Fox2, HashedString, Property, Value,
};
use foxkit_formats::fpk::{Fpk, FpkEntry, FpkKind, FpkReference};
use foxkit_formats::lng::{Endianness, Lng, LngEntry};
use foxkit_formats::qar::{Qar, QarEntry};
use pretty_assertions::assert_eq;
use std::fs;
use std::io::Cursor;
use std::path::Path;

const FOX2_PATH: &str = "/Assets/tpp/level/mission2/init/title_sequence.fox2";
const FPKD_PATH: &str = "/Assets/tpp/pack/mission2/init/title.fpkd";
const SCRIPT_PATH: &str = "/Assets/tpp/script/mission/mission_main.lua";

fn document() -> Fox2 {
    let mut name = Property::new("name", DataType::String, ContainerKind::StaticArray);
    name.container = Container::StaticArray(vec![Value::String(HashedString::new("uhh"))]);

    let mut link = Property::new("target", DataType::EntityLink, ContainerKind::StaticArray);
    link.container = Container::StaticArray(vec![Value::EntityLink(EntityLink {
        package_path: HashedString::new("/Assets/tpp/pack/common.fpkd"),
        archive_path: HashedString::new("common.fox2"),
        name_in_archive: HashedString::new("Locator0000"),
        entity_handle: 0x1234,
    })]);

    let mut entity = Entity::new("TppGameObject", 0x1000_0010);
    entity.static_properties = vec![name, link];
    Fox2 {
        entities: vec![entity],
        literals: Vec::new(),
    }
}

fn package() -> Fpk {
    let mut fox2 = Vec::new();
    document().write(&mut fox2).unwrap();

    let mut fpk = Fpk::new(FpkKind::Fpkd);
    let mut doc = FpkEntry::new(FOX2_PATH, false);
    doc.data = fox2;
    let mut script = FpkEntry::new(SCRIPT_PATH, true);
    script.data = b"local this = {}\nreturn this\n".to_vec();
    fpk.entries = vec![doc, script];
    fpk.references = vec![FpkReference::new("/Assets/tpp/pack/common.fpkd")];
    fpk
}

#[test]
fn test_nested_containers() {
    let mut fpk_bytes = Cursor::new(Vec::new());
    package().write(&mut fpk_bytes, Path::new(".")).unwrap();

    let mut qar = Qar::new(0, 2);
    let mut entry = QarEntry::new(FPKD_PATH);
    entry.compressed = true;
    entry.data_header.key = 0x5EED;
    entry.data = fpk_bytes.into_inner();
    qar.entries.push(entry);
    let mut readme = QarEntry::new("/test.lua");
    readme.data = b"data1234567890\n".to_vec();
    qar.entries.push(readme);

    let mut archive = Cursor::new(Vec::new());
    qar.write(&mut archive, Path::new(".")).unwrap();
    archive.set_position(0);

    let mut read = Qar::read(&mut archive).unwrap();
    let dictionary = Dictionary::from_text(&format!("{}\r\n", FPKD_PATH.trim_end_matches(".fpkd")));
    assert_eq!(read.apply_dictionary(&dictionary), 1);

    let mut script = Vec::new();
    let placeholder = read.entries[1].file_path.clone();
    read.extract_to(&placeholder, 0, &mut archive, &mut script)
        .expect("placeholder names resolve back to their hash");
    assert_eq!(script, b"data1234567890\n");

    let mut fpk_bytes = Vec::new();
    read.extract_to(FPKD_PATH, hash_with_extension(FPKD_PATH), &mut archive, &mut fpk_bytes)
        .unwrap();
    let fpk = Fpk::read(&mut Cursor::new(fpk_bytes)).unwrap();
    assert_eq!(fpk.kind(), FpkKind::Fpkd);
    assert_eq!(fpk.references[0].file_path, "/Assets/tpp/pack/common.fpkd");
    assert!(fpk.entries[1].encrypted);

    let mut fox2_bytes = Vec::new();
    fpk.extract_to(FOX2_PATH, &mut fox2_bytes).unwrap();
    let doc = Fox2::read(&mut Cursor::new(fox2_bytes)).unwrap();
    assert_eq!(doc.entities, document().entities);
}

#[test]
fn test_pack_from_directory() {
    let source = tempfile::tempdir().unwrap();
    let script = source.path().join(&SCRIPT_PATH[1..]);
    fs::create_dir_all(script.parent().unwrap()).unwrap();
    fs::write(&script, b"return {}").unwrap();

    let mut fpk = Fpk::new(FpkKind::Fpk);
    fpk.entries.push(FpkEntry::new(SCRIPT_PATH, true));
    let packed = source.path().join("out.fpk");
    let mut file = fs::File::create(&packed).unwrap();
    fpk.write(&mut file, source.path()).unwrap();
    drop(file);

    let read = Fpk::open(&packed).unwrap();
    let out = tempfile::tempdir().unwrap();
    let target = read.extract(SCRIPT_PATH, out.path()).unwrap();
    assert_eq!(fs::read(target).unwrap(), b"return {}");
}

#[test]
fn test_qar_on_disk() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("00.dat");

    let mut qar = Qar::new(0x800, 1);
    let mut entry = QarEntry::new("/init.lua");
    entry.data = b"print('hi')".to_vec();
    qar.entries.push(entry);
    let mut file = fs::File::create(&path).unwrap();
    qar.write(&mut file, dir.path()).unwrap();
    drop(file);

    let (mut read, mut reader) = Qar::open(&path).unwrap();
    read.apply_dictionary(&Dictionary::from_text("/init\n"));
    assert!(read.entries[0].meta_flag);
    let out = read
        .extract("/init.lua", hash_with_extension("/init.lua"), &mut reader, &dir.path().join("out"))
        .unwrap();
    assert_eq!(fs::read(out).unwrap(), b"print('hi')");
}

#[test]
fn test_language_table_in_package() {
    let lng = Lng {
        endianness: Endianness::Big,
        entries: vec![LngEntry::new("tutorial_title", 0, "Tutorial")],
        ..Lng::default()
    };
    let mut lng_bytes = Cursor::new(Vec::new());
    lng.write(&mut lng_bytes).unwrap();

    let mut fpk = Fpk::new(FpkKind::Fpk);
    let mut entry = FpkEntry::new("/Assets/tpp/lang/ui/tpp_tutorial.eng.lng2", false);
    entry.data = lng_bytes.into_inner();
    fpk.entries.push(entry);
    let mut bytes = Cursor::new(Vec::new());
    fpk.write(&mut bytes, Path::new(".")).unwrap();

    let read = Fpk::read(&mut Cursor::new(bytes.into_inner())).unwrap();
    let names = NameDictionary::from_text("tutorial_title");
    let table = Lng::read(&mut Cursor::new(&read.entries[0].data), Some(&names)).unwrap();
    assert_eq!(table, lng);
}
