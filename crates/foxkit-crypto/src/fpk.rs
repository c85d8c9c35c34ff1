//! FPK payload cipher
//!
//! Encrypted FPK payloads start with a marker byte (`0x1B`, sometimes `0x1C`)
//! followed by a running-XOR stream keyed by the lowercase file name. Every
//! plaintext ends with a NUL byte, which doubles as the integrity check on
//! decryption.
//!
//! # Examples
//!
//! ```
//! use foxkit_crypto::fpk::{decrypt, encrypt};
//!
//! let sealed = encrypt(b"local this = {}", "/Assets/tpp/script/mission_main.lua");
//! assert_eq!(sealed[0], 0x1B);
//! let opened = decrypt(&sealed, "/Assets/tpp/script/mission_main.lua").expect("payload should open");
//! assert_eq!(opened, b"local this = {}");
//! ```

use crate::error::{CryptoError, CryptoResult};
use crate::hashing::legacy_hash;

/// Marker written in front of every payload this crate encrypts
pub const ENCRYPTED_MARKER: u8 = 0x1B;

/// Alternative marker seen in shipped files
pub const ENCRYPTED_MARKER_ALT: u8 = 0x1C;

/// Whether a payload starts with an encryption marker
pub fn is_encrypted(data: &[u8]) -> bool {
    matches!(data.first(), Some(&(ENCRYPTED_MARKER | ENCRYPTED_MARKER_ALT)))
}

/// Initial 8-byte key for an entry path
///
/// Only the final path component takes part, lowercased, with its extension.
pub fn key_for_path(path: &str) -> [u8; 8] {
    let lower = path.to_lowercase();
    let name = lower.rsplit(['/', '\\']).next().unwrap_or(&lower);
    (!legacy_hash(name.as_bytes(), false)).to_le_bytes()
}

/// Decrypt a marked payload
///
/// Fails when the payload is too short or the recovered plaintext does not end
/// with NUL; callers usually fall back to the raw bytes in that case.
pub fn decrypt(data: &[u8], path: &str) -> CryptoResult<Vec<u8>> {
    if data.len() < 2 {
        return Err(CryptoError::FpkPayloadTooShort(data.len()));
    }

    let mut key = key_for_path(path);
    let mut out: Vec<u8> = data[1..]
        .iter()
        .enumerate()
        .map(|(i, &c)| {
            key[i % 8] ^= c;
            key[i % 8]
        })
        .collect();

    match out.pop() {
        Some(0) => Ok(out),
        Some(last) => Err(CryptoError::FpkTerminatorMissing(last)),
        None => Err(CryptoError::FpkPayloadTooShort(data.len())),
    }
}

/// Encrypt a payload, prepending [`ENCRYPTED_MARKER`] and appending the NUL terminator
pub fn encrypt(data: &[u8], path: &str) -> Vec<u8> {
    let mut key = key_for_path(path);
    let mut out = Vec::with_capacity(data.len() + 2);
    out.push(ENCRYPTED_MARKER);
    for (i, &p) in data.iter().chain(std::iter::once(&0)).enumerate() {
        out.push(key[i % 8] ^ p);
        key[i % 8] = p;
    }
    out
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_key_uses_lowercase_basename() {
        assert_eq!(
            key_for_path("/Assets/tpp/script/Mission_Main.lua"),
            key_for_path("mission_main.lua")
        );
        assert_eq!(
            key_for_path("mission_main.lua"),
            (!0x6316_d87f_1094u64).to_le_bytes()
        );
    }

    #[test]
    fn test_encrypt_layout() {
        let sealed = encrypt(b"ab", "x.lua");
        assert_eq!(sealed.len(), 4);
        assert_eq!(sealed[0], ENCRYPTED_MARKER);
        // the terminator's slot is XOR-ed with an untouched key byte
        assert_eq!(sealed[3], key_for_path("x.lua")[2]);
    }

    #[test]
    fn test_decrypt_rejects_missing_terminator() {
        let mut sealed = encrypt(b"hello", "a.lua");
        let last = sealed.len() - 1;
        sealed[last] ^= 0xFF;
        assert!(matches!(
            decrypt(&sealed, "a.lua"),
            Err(CryptoError::FpkTerminatorMissing(_))
        ));
    }

    #[test]
    fn test_decrypt_short_input() {
        assert!(matches!(decrypt(&[0x1B], "a.lua"), Err(CryptoError::FpkPayloadTooShort(1))));
        assert!(matches!(decrypt(&[], "a.lua"), Err(CryptoError::FpkPayloadTooShort(0))));
    }

    #[test]
    fn test_wrong_name_fails() {
        let sealed = encrypt(b"0123456789abcdef", "right.lua");
        let result = decrypt(&sealed, "wrong.lua");
        assert!(result.map_or(true, |d| d != b"0123456789abcdef"));
    }

    #[test]
    fn test_marker_detection() {
        assert!(is_encrypted(&[0x1B, 0]));
        assert!(is_encrypted(&[0x1C]));
        assert!(!is_encrypted(b"plain"));
        assert!(!is_encrypted(&[]));
    }

    proptest! {
        #[test]
        fn test_round_trip(data in prop::collection::vec(any::<u8>(), 0..200), name in "[a-z_]{1,12}\\.lua") {
            let sealed = encrypt(&data, &name);
            prop_assert_eq!(sealed.len(), data.len() + 2);
            let opened = decrypt(&sealed, &name).expect("decrypt should succeed");
            prop_assert_eq!(opened, data);
        }
    }
}
