//! JSON definitions written by `extract` and consumed by `pack`
//!
//! A definition lists what an archive contains and how each file is stored,
//! so the archive can be rebuilt from an extracted directory. Fields that are
//! zero or false are left out.

use foxkit_formats::fpk::{Fpk, FpkEntry, FpkKind, FpkReference};
use foxkit_formats::qar::{DataHeader, Qar, QarEntry};
use serde::{Deserialize, Serialize};

fn is_zero_u32(value: &u32) -> bool {
    *value == 0
}

fn is_zero_u64(value: &u64) -> bool {
    *value == 0
}

fn is_false(value: &bool) -> bool {
    !*value
}

/// Any pack definition, tagged by `"type"`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Definition {
    /// QAR archive
    Qar(QarDefinition),
    /// FPK package
    Fpk(PackageDefinition),
    /// FPKD package
    Fpkd(PackageDefinition),
}

impl Definition {
    /// Definition of a package, typed by its kind
    pub fn package(fpk: &Fpk) -> Self {
        let definition = PackageDefinition::from_fpk(fpk);
        match fpk.kind() {
            FpkKind::Fpk => Self::Fpk(definition),
            FpkKind::Fpkd => Self::Fpkd(definition),
        }
    }
}

/// QAR archive definition
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QarDefinition {
    /// Archive flags
    #[serde(default, skip_serializing_if = "is_zero_u32")]
    pub flags: u32,
    /// Cipher version
    #[serde(default, skip_serializing_if = "is_zero_u32")]
    pub version: u32,
    /// Entries in archive order
    #[serde(default)]
    pub entries: Vec<QarEntryDefinition>,
}

/// One QAR entry
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QarEntryDefinition {
    /// Resolved path or placeholder name
    pub file_path: String,
    /// Store zlib-compressed
    #[serde(default, skip_serializing_if = "is_false")]
    pub compressed: bool,
    /// Hash carries the meta flag; informational, recomputed on pack
    #[serde(default, skip_serializing_if = "is_false")]
    pub meta_flag: bool,
    /// Data header magic
    #[serde(default, skip_serializing_if = "is_zero_u32")]
    pub encryption: u32,
    /// Data header key
    #[serde(default, skip_serializing_if = "is_zero_u32")]
    pub key: u32,
    /// Hash to pack under when the path is a placeholder
    #[serde(default, skip_serializing_if = "is_zero_u64")]
    pub hash: u64,
}

impl QarDefinition {
    /// Describe an archive whose entries already carry their paths
    pub fn from_qar(qar: &Qar) -> Self {
        Self {
            flags: qar.flags(),
            version: qar.version(),
            entries: qar
                .entries
                .iter()
                .map(|entry| QarEntryDefinition {
                    file_path: entry.file_path.clone(),
                    compressed: entry.compressed,
                    meta_flag: entry.meta_flag,
                    encryption: entry.data_header.encryption_magic,
                    key: entry.data_header.key,
                    hash: entry.name_hash_for_packing,
                })
                .collect(),
        }
    }

    /// Empty archive ready to be written; payloads are loaded on write
    pub fn to_qar(&self) -> Qar {
        let mut qar = Qar::new(self.flags, self.version);
        qar.entries = self
            .entries
            .iter()
            .map(|def| {
                let mut entry = QarEntry::new(def.file_path.clone());
                entry.compressed = def.compressed;
                entry.meta_flag = def.meta_flag;
                entry.name_hash_for_packing = def.hash;
                entry.data_header = DataHeader {
                    encryption_magic: def.encryption,
                    key: def.key,
                    ..DataHeader::default()
                };
                entry
            })
            .collect();
        qar
    }
}

/// FPK or FPKD package definition
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackageDefinition {
    /// Entries in package order
    #[serde(default)]
    pub entries: Vec<PackageEntryDefinition>,
    /// Referenced packages
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub references: Vec<ReferenceDefinition>,
}

/// One package entry
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PackageEntryDefinition {
    /// Path inside the package
    pub file_path: String,
    /// Store with the FPK cipher
    #[serde(default, skip_serializing_if = "is_false")]
    pub encrypted: bool,
}

/// One package reference
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReferenceDefinition {
    /// Referenced package path
    pub file_path: String,
}

impl PackageDefinition {
    /// Describe a package
    pub fn from_fpk(fpk: &Fpk) -> Self {
        Self {
            entries: fpk
                .entries
                .iter()
                .map(|e| PackageEntryDefinition {
                    file_path: e.file_path.clone(),
                    encrypted: e.encrypted,
                })
                .collect(),
            references: fpk
                .references
                .iter()
                .map(|r| ReferenceDefinition {
                    file_path: r.file_path.clone(),
                })
                .collect(),
        }
    }

    /// Empty package of `kind` ready to be written; payloads are loaded on write
    pub fn to_fpk(&self, kind: FpkKind) -> Fpk {
        let mut fpk = Fpk::new(kind);
        fpk.entries = self
            .entries
            .iter()
            .map(|e| FpkEntry::new(e.file_path.clone(), e.encrypted))
            .collect();
        fpk.references = self
            .references
            .iter()
            .map(|r| FpkReference::new(r.file_path.clone()))
            .collect();
        fpk
    }
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_qar_definition_omits_defaults() {
        let definition = Definition::Qar(QarDefinition {
            flags: 0,
            version: 2,
            entries: vec![
                QarEntryDefinition {
                    file_path: "/Assets/tpp/ui/Script/emblem_list.lua".to_string(),
                    compressed: true,
                    ..QarEntryDefinition::default()
                },
                QarEntryDefinition {
                    file_path: "18e40155acd63807.lua".to_string(),
                    meta_flag: true,
                    encryption: 0xE3F8_EFE6,
                    key: 7,
                    hash: 0x18e4_0155_acd6_3807,
                    ..QarEntryDefinition::default()
                },
            ],
        });

        let value = serde_json::to_value(&definition).unwrap();
        assert_eq!(
            value,
            json!({
                "type": "qar",
                "version": 2,
                "entries": [
                    {"filePath": "/Assets/tpp/ui/Script/emblem_list.lua", "compressed": true},
                    {
                        "filePath": "18e40155acd63807.lua",
                        "metaFlag": true,
                        "encryption": 0xE3F8_EFE6_u32,
                        "key": 7,
                        "hash": 0x18e4_0155_acd6_3807_u64
                    }
                ]
            })
        );

        let back: Definition = serde_json::from_value(value).unwrap();
        assert_eq!(back, definition);
    }

    #[test]
    fn test_package_definition_json() {
        let text = r#"{
            "type": "fpkd",
            "entries": [{"filePath": "/Assets/a.fox2"}, {"filePath": "/Assets/b.lua", "encrypted": true}],
            "references": [{"filePath": "/Assets/common.fpk"}]
        }"#;
        let definition: Definition = serde_json::from_str(text).unwrap();
        let Definition::Fpkd(package) = &definition else {
            panic!("expected an fpkd definition");
        };
        assert_eq!(package.entries.len(), 2);
        assert!(package.entries[1].encrypted);

        let fpk = package.to_fpk(FpkKind::Fpkd);
        assert_eq!(fpk.kind(), FpkKind::Fpkd);
        assert_eq!(fpk.references[0].file_path, "/Assets/common.fpk");
        assert_eq!(Definition::package(&fpk), definition);
    }

    #[test]
    fn test_qar_definition_to_archive() {
        let definition = QarDefinition {
            flags: 0x800,
            version: 1,
            entries: vec![QarEntryDefinition {
                file_path: "18e40155acd63807.lua".to_string(),
                key: 9,
                hash: 0x18e4_0155_acd6_3807,
                ..QarEntryDefinition::default()
            }],
        };
        let qar = definition.to_qar();
        assert_eq!(qar.flags(), 0x800);
        assert_eq!(qar.version(), 1);
        assert_eq!(qar.entries[0].packing_hash(), 0x18e4_0155_acd6_3807);
        assert_eq!(qar.entries[0].data_header.key, 9);
    }
}
