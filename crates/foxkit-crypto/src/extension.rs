//! Extension code table
//!
//! QAR entry hashes store a 13-bit code for the file extension in their top bits.
//! The code of an extension is the low 13 bits of its own [`hash_file_name`].
//! Only the extensions below are known to the engine; anything else gets code 0.
//!
//! [`hash_file_name`]: crate::hashing::hash_file_name

use crate::hashing::{EXTENSION_CODE_MASK, hash_file_name};
use std::collections::HashMap;
use std::sync::LazyLock;

/// Every extension the engine assigns a code to
pub const EXTENSIONS: [&str; 140] = [
    "1.ftexs", "1.nav2", "2.ftexs", "3.ftexs", "4.ftexs", "5.ftexs", "6.ftexs", "ag.evf", "aia",
    "aib", "aibc", "aig", "aigc", "aim", "aip", "ait", "atsh", "bnd", "bnk", "cc.evf", "clo",
    "csnav", "dat", "des", "dnav", "dnav2", "eng.lng", "ese", "evb", "evf", "fag", "fage", "fago",
    "fagp", "fagx", "fclo", "fcnp", "fcnpx", "fdes", "fdmg", "ffnt", "fmdl", "fmdlb", "fmtt", "fnt",
    "fova", "fox", "fox2", "fpk", "fpkd", "fpkl", "frdv", "fre.lng", "frig", "frt", "fsd", "fsm",
    "fsml", "fsop", "fstb", "ftex", "fv2", "fx.evf", "fxp", "gani", "geom", "ger.lng", "gpfp",
    "grxla", "grxoc", "gskl", "htre", "info", "ita.lng", "jpn.lng", "json", "lad", "ladb", "lani",
    "las", "lba", "lng", "lpsh", "lua", "mas", "mbl", "mog", "mtar", "mtl", "nav2", "nta", "obr",
    "obrb", "param", "parts", "path", "pftxs", "ph", "phep", "phsd", "por.lng", "qar", "rbs", "rdb",
    "rdf", "rnav", "rus.lng", "sad", "sand", "sani", "sbp", "sd.evf", "sdf", "sim", "simep", "snav",
    "spa.lng", "spch", "sub", "subp", "tgt", "tre2", "txt", "uia", "uif", "uig", "uigb", "uil",
    "uilb", "utxl", "veh", "vfx", "vfxbin", "vfxdb", "vnav", "vo.evf", "vpc", "wem", "wmv", "xml",
];

struct ExtensionTable {
    by_name: HashMap<&'static str, u64>,
    by_code: HashMap<u64, &'static str>,
}

static TABLE: LazyLock<ExtensionTable> = LazyLock::new(|| {
    let mut by_name = HashMap::with_capacity(EXTENSIONS.len());
    let mut by_code = HashMap::with_capacity(EXTENSIONS.len());
    for ext in EXTENSIONS {
        let code = hash_file_name(ext, false) & EXTENSION_CODE_MASK;
        by_name.insert(ext, code);
        by_code.entry(code).or_insert(ext);
    }
    ExtensionTable { by_name, by_code }
});

/// Extension code for a known extension (without leading dot)
pub fn code(extension: &str) -> Option<u64> {
    TABLE.by_name.get(extension).copied()
}

/// Extension name for a code
pub fn name(code: u64) -> Option<&'static str> {
    TABLE.by_code.get(&code).copied()
}
