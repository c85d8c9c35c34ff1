//! MD5 digests stored in QAR entry headers

use crate::section::XOR_TABLE;
use md5::{Digest, Md5};
use std::fmt;

/// Masks applied word by word to a digest in an entry header
const HEADER_MASK: [u32; 4] = [XOR_TABLE[3], XOR_TABLE[0], XOR_TABLE[0], XOR_TABLE[1]];

/// MD5 of an entry payload (data header included, before the outer cipher)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct ContentDigest([u8; 16]);

impl ContentDigest {
    /// Wrap raw digest bytes
    pub fn from_bytes(bytes: [u8; 16]) -> Self {
        Self(bytes)
    }

    /// Compute the digest of `data`
    pub fn from_data(data: &[u8]) -> Self {
        let mut hasher = Md5::new();
        hasher.update(data);
        let result = hasher.finalize();
        let mut bytes = [0u8; 16];
        bytes.copy_from_slice(&result);
        Self(bytes)
    }

    /// Parse from a hex string
    pub fn from_hex(hex: &str) -> Result<Self, hex::FromHexError> {
        let mut bytes = [0u8; 16];
        hex::decode_to_slice(hex, &mut bytes)?;
        Ok(Self(bytes))
    }

    /// Recover a digest from its masked header form
    pub fn from_masked(masked: [u8; 16]) -> Self {
        Self(apply_mask(masked))
    }

    /// Raw bytes
    pub fn as_bytes(&self) -> &[u8; 16] {
        &self.0
    }

    /// Masked form as written to an entry header
    pub fn to_masked(&self) -> [u8; 16] {
        apply_mask(self.0)
    }

    /// Hex string
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl fmt::Display for ContentDigest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

fn apply_mask(mut bytes: [u8; 16]) -> [u8; 16] {
    for (word, mask) in bytes.chunks_exact_mut(4).zip(HEADER_MASK) {
        for (b, m) in word.iter_mut().zip(mask.to_le_bytes()) {
            *b ^= m;
        }
    }
    bytes
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_known_digest() {
        let digest = ContentDigest::from_data(b"data1234567890\n");
        assert_eq!(digest, ContentDigest::from_hex(&digest.to_hex()).unwrap());
        assert_eq!(ContentDigest::from_data(b"").to_hex(), "d41d8cd98f00b204e9800998ecf8427e");
    }

    #[test]
    fn test_mask_is_self_inverse() {
        let digest = ContentDigest::from_data(b"abc");
        let masked = digest.to_masked();
        assert_ne!(&masked, digest.as_bytes());
        assert_eq!(ContentDigest::from_masked(masked), digest);
    }

    #[test]
    fn test_mask_words() {
        let masked = ContentDigest::default().to_masked();
        assert_eq!(&masked[..4], &0x532C_7319u32.to_le_bytes());
        assert_eq!(&masked[4..8], &0x4144_1043u32.to_le_bytes());
        assert_eq!(&masked[8..12], &0x4144_1043u32.to_le_bytes());
        assert_eq!(&masked[12..], &0x11C2_2050u32.to_le_bytes());
    }
}
