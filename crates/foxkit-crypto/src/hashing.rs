//! Fox Engine string hashes
//!
//! Three hashes are built on top of the seeded [`city_hash_64_with_seeds`]:
//!
//! - [`str_code_32`]: the 50-bit path code used as the body of a QAR entry hash
//! - [`str_code_64`]: the 48-bit name hash used by FOX2, LNG and FPK string tables
//! - [`legacy_hash`]: an older 48-bit filename hash, now only used to key the FPK cipher
//!
//! [`hash_with_extension`] combines a path code, the meta flag and an extension code
//! into the 64-bit identity stored in QAR archives.
//!
//! # Examples
//!
//! ```
//! use foxkit_crypto::hashing::{hash_with_extension, str_code_64};
//!
//! assert_eq!(hash_with_extension("/Assets/tpp/ui/Script/emblem_list.lua"), 0x18e393985a3ddd5e);
//! assert_eq!(str_code_64(b"name"), 0x3391ed17a03a);
//! ```

use crate::city::{SEED0, city_hash_64_with_seeds};
use crate::extension;

/// Mask applied to [`str_code_32`] results
pub const PATH_CODE_MASK: u64 = 0x3_FFFF_FFFF_FFFF;

/// Mask applied to [`str_code_64`] and [`legacy_hash`] results
pub const NAME_HASH_MASK: u64 = 0xFFFF_FFFF_FFFF;

/// Set in a path hash when the asset lives outside `/Assets/`
pub const META_FLAG: u64 = 0x4_0000_0000_0000;

/// Bit position of the 13-bit extension code in a full entry hash
pub const EXTENSION_SHIFT: u32 = 51;

/// Mask of the extension code before shifting
pub const EXTENSION_CODE_MASK: u64 = 0x1FFF;

const ASSETS_PREFIX: &str = "/Assets/";
const TEST_PREFIX: &str = "tpptest";

/// Path code of a raw byte string
///
/// The second seed is the reversed input read as a little-endian integer, which
/// makes short paths sensitive to their final characters.
pub fn str_code_32(s: &[u8]) -> u64 {
    let mut seed = [0u8; 8];
    for (dst, src) in seed.iter_mut().zip(s.iter().rev()) {
        *dst = *src;
    }
    city_hash_64_with_seeds(s, SEED0, u64::from_le_bytes(seed)) & PATH_CODE_MASK
}

/// Name hash of a string, hashed with a trailing NUL
///
/// A terminator is appended unless the input already ends with one, so
/// `str_code_64(b"uhh")` and `str_code_64(b"uhh\0")` agree.
pub fn str_code_64(s: &[u8]) -> u64 {
    let mut terminated = Vec::with_capacity(s.len() + 1);
    terminated.extend_from_slice(s);
    if terminated.last() != Some(&0) {
        terminated.push(0);
    }

    let seed1 = if terminated.len() > 1 {
        (u64::from(terminated[0]) << 16).wrapping_add(terminated.len() as u64 - 1)
    } else {
        0
    };

    city_hash_64_with_seeds(&terminated, SEED0, seed1) & NAME_HASH_MASK
}

/// Legacy filename hash
///
/// Seeded with the unterminated length, then hashed with a trailing NUL.
pub fn legacy_hash(s: &[u8], remove_extension: bool) -> u64 {
    let mut body = s;
    if remove_extension {
        if let Some(dot) = body.iter().rposition(|&b| b == b'.') {
            if dot > 0 {
                body = &body[..dot];
            }
        }
    }

    let seed1 = body
        .first()
        .map_or(0, |&first| (u64::from(first) << 16).wrapping_add(body.len() as u64));

    let mut terminated = Vec::with_capacity(body.len() + 1);
    terminated.extend_from_slice(body);
    terminated.push(0);

    city_hash_64_with_seeds(&terminated, SEED0, seed1) & NAME_HASH_MASK
}

/// Hash a file path without its extension code
///
/// Strips `/Assets/` (or a bare leading slash), optionally the extension, and sets
/// [`META_FLAG`] for paths outside `/Assets/` or under `tpptest`.
pub fn hash_file_name(path: &str, remove_extension: bool) -> u64 {
    let in_assets = path.starts_with(ASSETS_PREFIX);
    let mut trimmed = path.strip_prefix(ASSETS_PREFIX).unwrap_or(path);
    trimmed = trimmed.strip_prefix('/').unwrap_or(trimmed);

    let meta = !in_assets || trimmed.starts_with(TEST_PREFIX);

    if remove_extension {
        if let Some(dot) = trimmed.rfind('.') {
            if dot > 0 {
                trimmed = &trimmed[..dot];
            }
        }
    }

    let hash = str_code_32(trimmed.as_bytes());
    if meta { hash | META_FLAG } else { hash }
}

/// Extension of a path as understood by the hashers: text after the last dot,
/// ignoring a dot in the first position
pub fn extension_of(path: &str) -> &str {
    match path.rfind('.') {
        Some(dot) if dot > 0 => &path[dot + 1..],
        _ => "",
    }
}

/// Full 64-bit entry identity of a path
pub fn hash_with_extension(path: &str) -> u64 {
    let code = extension::code(extension_of(path)).unwrap_or(0);
    (code << EXTENSION_SHIFT) | hash_file_name(path, true)
}

/// Path part (low 50 bits) of an entry hash
pub const fn path_hash_from_hash(hash: u64) -> u64 {
    hash & PATH_CODE_MASK
}

/// Extension code (top 13 bits) of an entry hash
pub const fn ext_code_from_hash(hash: u64) -> u64 {
    hash >> EXTENSION_SHIFT
}

/// Combine a bare path hash with the code of `extension` (with or without a leading dot)
pub fn add_extension(hash: u64, extension: &str) -> u64 {
    let ext = extension.strip_prefix('.').unwrap_or(extension);
    let code = extension::code(ext).unwrap_or(0);
    (code << EXTENSION_SHIFT) | hash
}
