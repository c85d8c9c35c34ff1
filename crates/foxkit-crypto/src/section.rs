//! QAR section table cipher
//!
//! The section table follows the 32-byte archive header and holds one packed
//! 64-bit word per entry. Each word is stored as two little-endian halves, each
//! XOR-ed with one of the four header masks. Version 2 archives pick the mask
//! with a running key that is updated from every decrypted word, so a table has
//! to be processed front to back.
//!
//! # Examples
//!
//! ```
//! use foxkit_crypto::section::{decrypt_sections, encrypt_sections};
//!
//! let words = [0x0000_0400_1807_0155, 0x0000_0800_ac84_c1d9];
//! let bytes = encrypt_sections(&words, 2);
//! let decoded = decrypt_sections(&bytes, words.len(), 2).expect("table should decode");
//! assert_eq!(decoded, words);
//! ```

use crate::error::{CryptoError, CryptoResult};

/// Header masks shared by the archive header, section table and entry headers
pub const XOR_TABLE: [u32; 4] = [0x4144_1043, 0x11C2_2050, 0xD056_08C3, 0x532C_7319];

const CHAIN_SEED: u64 = 0xA2C1_8EC3;

/// Size of one encrypted section word
pub const SECTION_SIZE: usize = 8;

fn read_half(data: &[u8], offset: usize) -> u32 {
    let mut buf = [0u8; 4];
    buf.copy_from_slice(&data[offset..offset + 4]);
    u32::from_le_bytes(buf)
}

/// Runs the cipher over `count` words of `data`
///
/// With `encrypt` set, `data` holds plaintext and the chaining key is updated
/// from the input halves; otherwise from the output halves. Either way the
/// chain follows the plaintext, so the same routine goes both directions.
/// `data` must hold at least `count` words.
fn transform(data: &[u8], count: usize, version: u32, encrypt: bool) -> Vec<u64> {
    let mut result = Vec::with_capacity(count);
    let mut chain = CHAIN_SEED;

    for i in 0..count {
        let offset1 = (i * SECTION_SIZE) as u64;
        let offset2 = offset1 + 4;
        let lo_in = read_half(data, offset1 as usize);
        let hi_in = read_half(data, offset2 as usize);

        let base = if version == 2 { chain } else { i as u64 };
        let idx1 = (base.wrapping_add(offset1 / 5) % 4) as usize;
        let idx2 = (base.wrapping_add(offset2 / 5) % 4) as usize;

        let lo_out = lo_in ^ XOR_TABLE[idx1];
        let hi_out = hi_in ^ XOR_TABLE[idx2];
        result.push((u64::from(hi_out) << 32) | u64::from(lo_out));

        if version == 2 {
            let (lo, hi) = if encrypt { (lo_in, hi_in) } else { (lo_out, hi_out) };
            chain ^= u64::from(lo.rotate_right((hi / 256) % 19));
        }
    }

    result
}

/// Decrypt `count` section words from the raw table bytes
pub fn decrypt_sections(data: &[u8], count: usize, version: u32) -> CryptoResult<Vec<u64>> {
    let needed = count * SECTION_SIZE;
    if data.len() < needed {
        return Err(CryptoError::SectionTableTruncated {
            expected: needed,
            actual: data.len(),
        });
    }
    Ok(transform(data, count, version, false))
}

/// Encrypt section words into the on-disk table layout
pub fn encrypt_sections(sections: &[u64], version: u32) -> Vec<u8> {
    let plain: Vec<u8> = sections.iter().flat_map(|s| s.to_le_bytes()).collect();
    transform(&plain, sections.len(), version, true)
        .iter()
        .flat_map(|w| w.to_le_bytes())
        .collect()
}
