//! Outer QAR payload cipher
//!
//! Every QAR entry payload (data header included) is XOR-ed block by block with
//! a keystream derived from the entry hash and its MD5 digest. The keystream of
//! an 8-byte block depends only on the block's absolute offset inside the
//! payload, which makes the cipher an involution and lets callers decrypt any
//! block-aligned window independently.

/// Keystream table, consumed in pairs
pub const DECRYPTION_TABLE: [u32; 8] = [
    0xBB8A_DEDB,
    0x6522_9958,
    0x0845_3206,
    0x8812_1302,
    0x4C34_4955,
    0x2C02_F10C,
    0x4887_F823,
    0xF381_8583,
];

/// Cipher block size
pub const BLOCK_SIZE: usize = 8;

/// Keystream generator for one entry payload
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Stream1Cipher {
    version: u32,
    hash_low: u32,
    seed: u64,
}

impl Stream1Cipher {
    /// Set up the cipher for an entry
    ///
    /// The seed is one half of the entry MD5, chosen by the parity of the
    /// low 32 bits of the hash.
    pub fn new(md5: &[u8; 16], hash: u64, version: u32) -> Self {
        let hash_low = (hash & 0xFFFF_FFFF) as u32;
        let start = (hash_low % 2) as usize * 8;
        let mut seed = [0u8; 8];
        seed.copy_from_slice(&md5[start..start + 8]);
        Self {
            version,
            hash_low,
            seed: u64::from_le_bytes(seed),
        }
    }

    /// The 8 keystream bytes of the block starting at `block_offset`
    fn block_key(&self, block_offset: u64) -> [u8; BLOCK_SIZE] {
        let (lo, hi) = if self.version == 2 {
            let index = 2 * ((u64::from(self.hash_low)
                .wrapping_add(self.seed)
                .wrapping_add(block_offset / 11))
                % 4) as usize;
            let seed_low = (self.seed & 0xFFFF_FFFF) as u32;
            let seed_high = (self.seed >> 32) as u32;
            (
                DECRYPTION_TABLE[index] ^ seed_low,
                DECRYPTION_TABLE[index + 1] ^ seed_high,
            )
        } else {
            let index = 2 * ((u64::from(self.hash_low) + block_offset / 11) % 4) as usize;
            (DECRYPTION_TABLE[index], DECRYPTION_TABLE[index + 1])
        };

        let mut key = [0u8; BLOCK_SIZE];
        key[..4].copy_from_slice(&lo.to_le_bytes());
        key[4..].copy_from_slice(&hi.to_le_bytes());
        key
    }

    /// XOR `data` in place with the keystream, treating `data[0]` as payload
    /// offset `position`
    ///
    /// `position` must be a multiple of [`BLOCK_SIZE`]. A trailing partial
    /// block uses the leading bytes of its block's keystream.
    pub fn apply(&self, data: &mut [u8], position: u64) {
        debug_assert_eq!(position % BLOCK_SIZE as u64, 0);
        for (i, chunk) in data.chunks_mut(BLOCK_SIZE).enumerate() {
            let key = self.block_key(position + (i * BLOCK_SIZE) as u64);
            for (byte, k) in chunk.iter_mut().zip(key) {
                *byte ^= k;
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const MD5: [u8; 16] = [
        0x01, 0x23, 0x45, 0x67, 0x89, 0xab, 0xcd, 0xef, 0xfe, 0xdc, 0xba, 0x98, 0x76, 0x54, 0x32,
        0x10,
    ];

    #[test]
    fn test_version1_first_block() {
        // hash_low 0 selects pair 0 at offset 0
        let cipher = Stream1Cipher::new(&MD5, 0, 1);
        let mut data = [0u8; 8];
        cipher.apply(&mut data, 0);
        assert_eq!(&data[..4], &DECRYPTION_TABLE[0].to_le_bytes());
        assert_eq!(&data[4..], &DECRYPTION_TABLE[1].to_le_bytes());
    }

    #[test]
    fn test_seed_half_follows_hash_parity() {
        let even = Stream1Cipher::new(&MD5, 2, 2);
        let odd = Stream1Cipher::new(&MD5, 3, 2);
        assert_eq!(even.seed, 0xefcd_ab89_6745_2301);
        assert_eq!(odd.seed, 0x1032_5476_98ba_dcfe);
    }

    #[test]
    fn test_windowed_matches_whole() {
        let cipher = Stream1Cipher::new(&MD5, 0x18e4_0155_acd6_3807, 2);
        let plain: Vec<u8> = (0..=99u8).collect();

        let mut whole = plain.clone();
        cipher.apply(&mut whole, 0);

        let mut tail = plain[48..].to_vec();
        cipher.apply(&mut tail, 48);
        assert_eq!(&whole[48..], &tail[..]);
    }

    #[test]
    fn test_partial_block_uses_block_key() {
        let cipher = Stream1Cipher::new(&MD5, 7, 1);
        let mut full = [0u8; 16];
        cipher.apply(&mut full, 0);
        let mut short = [0u8; 13];
        cipher.apply(&mut short, 0);
        assert_eq!(&full[..13], &short[..]);
    }

    proptest! {
        #[test]
        fn test_involution(data in prop::collection::vec(any::<u8>(), 0..300), hash in any::<u64>(), v2 in any::<bool>()) {
            let cipher = Stream1Cipher::new(&MD5, hash, if v2 { 2 } else { 1 });
            let mut buf = data.clone();
            cipher.apply(&mut buf, 0);
            cipher.apply(&mut buf, 0);
            prop_assert_eq!(buf, data);
        }
    }
}
