//! Inner QAR payload cipher
//!
//! Entries with a non-zero key carry a second layer under the outer
//! [`Stream1Cipher`](crate::stream1::Stream1Cipher): a 32-bit linear
//! congruential keystream XOR-ed over every whole little-endian word. Trailing
//! bytes that do not fill a word are left as they are.
//!
//! # Examples
//!
//! ```
//! use foxkit_crypto::stream2::Stream2Cipher;
//!
//! let mut data = b"some payload".to_vec();
//! Stream2Cipher::new(0x1234).apply(&mut data);
//! Stream2Cipher::new(0x1234).apply(&mut data);
//! assert_eq!(data, b"some payload");
//! ```

const MULTIPLIER: u32 = 48_828_125;

/// Keystream state for one payload
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Stream2Cipher {
    key: u32,
    block_key: u32,
}

impl Stream2Cipher {
    /// Initialise from the key stored in the data header
    pub fn new(key: u32) -> Self {
        Self {
            key: key.wrapping_mul(278),
            block_key: key | ((key ^ 25974) << 16),
        }
    }

    /// XOR every whole 4-byte word of `data` in place, advancing the keystream
    pub fn apply(&mut self, data: &mut [u8]) {
        for word in data.chunks_exact_mut(4) {
            let mut buf = [0u8; 4];
            buf.copy_from_slice(word);
            let value = u32::from_le_bytes(buf) ^ self.block_key;
            word.copy_from_slice(&value.to_le_bytes());
            self.block_key = self.key.wrapping_add(MULTIPLIER.wrapping_mul(self.block_key));
        }
    }
}
