//! Hash dictionaries
//!
//! Archives and documents store only hashes. A dictionary is a plain wordlist,
//! one candidate per line, hashed up front so lookups become map hits. Two
//! flavours exist because paths and names use different hashes:
//!
//! - [`Dictionary`] keys QAR paths by their 50-bit path code
//! - [`NameDictionary`] keys FOX2 and LNG names by [`str_code_64`]
//!
//! Lookups never fail. An unknown hash resolves to a deterministic hex
//! placeholder that [`Dictionary::parse_unresolved`] can turn back into a hash.
//!
//! # Examples
//!
//! ```
//! use foxkit_crypto::dictionary::Dictionary;
//! use foxkit_crypto::hashing::hash_with_extension;
//!
//! // lines are paths without their extension
//! let dict = Dictionary::from_text("/Assets/tpp/ui/Script/emblem_list\n/init");
//! let hash = hash_with_extension("/init.lua");
//! assert_eq!(dict.resolve(hash), ("/init.lua".to_string(), true));
//! ```

use crate::error::CryptoResult;
use crate::extension;
use crate::hashing::{
    EXTENSION_SHIFT, META_FLAG, PATH_CODE_MASK, ext_code_from_hash, hash_file_name,
    path_hash_from_hash, str_code_64,
};
use std::collections::HashMap;
use std::io::Read;

const UNKNOWN_SUFFIX: &str = ".unknown";

/// Read-only hash to name lookup used by the resolve passes
pub trait NameLookup {
    /// Name for a hash, if known
    fn lookup(&self, hash: u64) -> Option<&str>;
}

impl NameLookup for HashMap<u64, String> {
    fn lookup(&self, hash: u64) -> Option<&str> {
        self.get(&hash).map(String::as_str)
    }
}

/// Split a wordlist into lines: CRLF when the file has any, LF otherwise
fn lines(text: &str) -> Vec<&str> {
    let crlf: Vec<&str> = text.split("\r\n").collect();
    if crlf.len() >= 2 {
        return crlf;
    }
    text.split('\n').collect()
}

fn read_text<R: Read>(reader: &mut R) -> CryptoResult<String> {
    let mut bytes = Vec::new();
    reader.read_to_end(&mut bytes)?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

/// QAR path dictionary
#[derive(Debug, Clone, Default)]
pub struct Dictionary {
    paths: HashMap<u64, String>,
}

impl Dictionary {
    /// Build from wordlist text; on collision the first line wins
    pub fn from_text(text: &str) -> Self {
        let mut paths = HashMap::new();
        for line in lines(text).into_iter().filter(|l| !l.is_empty()) {
            let hash = hash_file_name(line, true) & PATH_CODE_MASK;
            paths.entry(hash).or_insert_with(|| line.to_string());
        }
        Self { paths }
    }

    /// Read a wordlist from any byte source
    pub fn read<R: Read>(reader: &mut R) -> CryptoResult<Self> {
        Ok(Self::from_text(&read_text(reader)?))
    }

    /// Number of distinct path codes
    pub fn len(&self) -> usize {
        self.paths.len()
    }

    /// Whether the dictionary is empty
    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    /// Path for a 50-bit path code
    pub fn get(&self, path_hash: u64) -> Option<&str> {
        self.paths.get(&path_hash).map(String::as_str)
    }

    /// Best-effort name for a full entry hash
    ///
    /// Path and extension halves are resolved independently. A missing path
    /// becomes its hex value (meta flag included), a missing extension becomes
    /// `<hex>.unknown`. The flag is `true` only when both halves resolved.
    pub fn resolve(&self, hash: u64) -> (String, bool) {
        let mut resolved = true;

        let path = match self.get(path_hash_from_hash(hash)) {
            Some(p) => p.to_string(),
            None => {
                resolved = false;
                format!("{:x}", hash & (PATH_CODE_MASK | META_FLAG))
            }
        };

        let ext_code = ext_code_from_hash(hash);
        let ext = match extension::name(ext_code) {
            Some(e) => e.to_string(),
            None => {
                resolved = false;
                format!("{ext_code:x}{UNKNOWN_SUFFIX}")
            }
        };

        (format!("{path}.{ext}"), resolved)
    }

    /// Recover the hash from an unresolved placeholder name
    ///
    /// Accepts `<hex path>.<extension>` and `<hex path>.<hex code>.unknown`.
    /// Names containing a directory separator are never placeholders.
    pub fn parse_unresolved(name: &str) -> Option<u64> {
        if name.contains(['/', '\\']) {
            return None;
        }
        let (path_hex, ext) = name.split_once('.').unwrap_or((name, ""));
        let path = u64::from_str_radix(path_hex, 16).ok()?;

        let code = match ext.strip_suffix(UNKNOWN_SUFFIX) {
            Some(hex_code) => u64::from_str_radix(hex_code, 16).ok()?,
            None => extension::code(ext).unwrap_or(0),
        };

        Some((code << EXTENSION_SHIFT) | path)
    }
}

/// FOX2 and LNG name dictionary, keyed by [`str_code_64`]
#[derive(Debug, Clone, Default)]
pub struct NameDictionary {
    names: HashMap<u64, String>,
    low_words: HashMap<u32, String>,
}

impl NameDictionary {
    /// Build from wordlist text; on collision the first line wins
    pub fn from_text(text: &str) -> Self {
        let mut dict = Self::default();
        for line in lines(text).into_iter().filter(|l| !l.is_empty()) {
            dict.insert(line);
        }
        dict
    }

    /// Read a wordlist from any byte source
    pub fn read<R: Read>(reader: &mut R) -> CryptoResult<Self> {
        Ok(Self::from_text(&read_text(reader)?))
    }

    /// Add a name unless its hash is already taken
    pub fn insert(&mut self, name: &str) {
        let hash = str_code_64(name.as_bytes());
        self.names
            .entry(hash)
            .or_insert_with(|| name.to_string());
        self.low_words
            .entry((hash & 0xFFFF_FFFF) as u32)
            .or_insert_with(|| name.to_string());
    }

    /// Number of distinct names
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Whether the dictionary is empty
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Name whose hash has the given low 32 bits (LNG keys)
    pub fn get_low32(&self, key: u32) -> Option<&str> {
        self.low_words.get(&key).map(String::as_str)
    }
}

impl NameLookup for NameDictionary {
    fn lookup(&self, hash: u64) -> Option<&str> {
        self.names.get(&hash).map(String::as_str)
    }
}
