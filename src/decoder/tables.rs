//! Block partitioning tables for QR codes (Model 2)

use crate::error::DecodeError;
use crate::models::{ECLevel, Version};

/// How a version / EC level splits its codewords into error-correction blocks
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockLayout {
    pub num_blocks: usize,
    pub ecc_per_block: usize,
    pub total_codewords: usize,
}

impl BlockLayout {
    pub fn total_data_codewords(&self) -> usize {
        self.total_codewords - self.num_blocks * self.ecc_per_block
    }

    /// Data codewords in each of the shorter blocks
    pub fn short_block_data_codewords(&self) -> usize {
        self.total_data_codewords() / self.num_blocks
    }

    /// Number of blocks carrying one extra data codeword (they come last)
    pub fn num_long_blocks(&self) -> usize {
        self.total_data_codewords() % self.num_blocks
    }

    /// Data codewords of block `index`
    pub fn data_codewords_in_block(&self, index: usize) -> usize {
        let short_blocks = self.num_blocks - self.num_long_blocks();
        if index < short_blocks {
            self.short_block_data_codewords()
        } else {
            self.short_block_data_codewords() + 1
        }
    }
}

// Tables from the QR Code specification (Model 2) via Nayuki QR Code generator.
// Index: [ec_level][version]
const ECC_CODEWORDS_PER_BLOCK: [[i8; 41]; 4] = [
    [
        -1, 7, 10, 15, 20, 26, 18, 20, 24, 30, 18, 20, 24, 26, 30, 22, 24, 28, 30, 28, 28, 28, 28,
        30, 30, 26, 28, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30,
    ], // Low
    [
        -1, 10, 16, 26, 18, 24, 16, 18, 22, 22, 26, 30, 22, 22, 24, 24, 28, 28, 26, 26, 26, 26, 28,
        28, 28, 28, 28, 28, 28, 28, 28, 28, 28, 28, 28, 28, 28, 28, 28, 28, 28,
    ], // Medium
    [
        -1, 13, 22, 18, 26, 18, 24, 18, 22, 20, 24, 28, 26, 24, 20, 30, 24, 28, 28, 26, 30, 28, 30,
        30, 30, 30, 28, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30,
    ], // Quartile
    [
        -1, 17, 28, 22, 16, 22, 28, 26, 26, 24, 28, 24, 28, 22, 24, 24, 30, 28, 28, 26, 28, 30, 24,
        30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30,
    ], // High
];

const NUM_ERROR_CORRECTION_BLOCKS: [[i8; 41]; 4] = [
    [
        -1, 1, 1, 1, 1, 1, 2, 2, 2, 2, 4, 4, 4, 4, 4, 6, 6, 6, 6, 7, 8, 8, 9, 9, 10, 12, 12, 12,
        13, 14, 15, 16, 17, 18, 19, 19, 20, 21, 22, 24, 25,
    ], // Low
    [
        -1, 1, 1, 1, 2, 2, 4, 4, 4, 5, 5, 5, 8, 9, 9, 10, 10, 11, 13, 14, 16, 17, 17, 18, 20, 21,
        23, 25, 26, 28, 29, 31, 33, 35, 37, 38, 40, 43, 45, 47, 49,
    ], // Medium
    [
        -1, 1, 1, 2, 2, 4, 4, 6, 6, 8, 8, 8, 10, 12, 16, 12, 17, 16, 18, 21, 20, 23, 23, 25, 27,
        29, 34, 34, 35, 38, 40, 43, 45, 48, 51, 53, 56, 59, 62, 65, 68,
    ], // Quartile
    [
        -1, 1, 1, 2, 4, 4, 4, 5, 6, 8, 8, 11, 11, 16, 16, 18, 16, 19, 21, 25, 25, 25, 34, 30, 32,
        35, 37, 40, 42, 45, 48, 51, 54, 57, 60, 63, 66, 70, 74, 77, 81,
    ], // High
];

/// Block layout for a version and EC level
pub fn block_layout(version: Version, ec_level: ECLevel) -> Result<BlockLayout, DecodeError> {
    let idx = ec_level.ordinal();
    let ver = version.number() as usize;
    let ecc = ECC_CODEWORDS_PER_BLOCK[idx][ver];
    let blocks = NUM_ERROR_CORRECTION_BLOCKS[idx][ver];
    if ecc <= 0 || blocks <= 0 {
        return Err(DecodeError::MalformedStructure("no block layout for version"));
    }
    Ok(BlockLayout {
        num_blocks: blocks as usize,
        ecc_per_block: ecc as usize,
        total_codewords: total_codewords(version),
    })
}

/// Total codewords (data + ECC) a symbol of this version holds
pub fn total_codewords(version: Version) -> usize {
    num_raw_data_modules(version) / 8
}

/// Modules left for data and ECC after all function patterns, including
/// the remainder bits that do not fill a codeword
pub fn num_raw_data_modules(version: Version) -> usize {
    let ver = version.number() as usize;
    let mut result = (16 * ver + 128) * ver + 64;
    if ver >= 2 {
        let num_align = ver / 7 + 2;
        result -= (25 * num_align - 10) * num_align - 55;
        if ver >= 7 {
            result -= 36;
        }
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    fn v(n: u8) -> Version {
        Version::new(n).unwrap()
    }

    #[test]
    fn test_total_codewords() {
        assert_eq!(total_codewords(v(1)), 26);
        assert_eq!(total_codewords(v(2)), 44);
        assert_eq!(total_codewords(v(5)), 134);
        assert_eq!(total_codewords(v(7)), 196);
        assert_eq!(total_codewords(v(40)), 3706);
    }

    #[test]
    fn test_layout_1m() {
        let layout = block_layout(v(1), ECLevel::M).unwrap();
        assert_eq!(layout.num_blocks, 1);
        assert_eq!(layout.ecc_per_block, 10);
        assert_eq!(layout.total_data_codewords(), 16);
        assert_eq!(layout.num_long_blocks(), 0);
    }

    #[test]
    fn test_layout_5q_has_long_blocks() {
        // 5-Q: 2 blocks of 15 data + 2 blocks of 16 data, 18 ECC each
        let layout = block_layout(v(5), ECLevel::Q).unwrap();
        assert_eq!(layout.num_blocks, 4);
        assert_eq!(layout.ecc_per_block, 18);
        assert_eq!(layout.total_data_codewords(), 62);
        assert_eq!(layout.short_block_data_codewords(), 15);
        assert_eq!(layout.num_long_blocks(), 2);
        assert_eq!(layout.data_codewords_in_block(0), 15);
        assert_eq!(layout.data_codewords_in_block(1), 15);
        assert_eq!(layout.data_codewords_in_block(2), 16);
        assert_eq!(layout.data_codewords_in_block(3), 16);
    }

    #[test]
    fn test_every_layout_is_consistent() {
        for n in 1..=40u8 {
            for level in [ECLevel::L, ECLevel::M, ECLevel::Q, ECLevel::H] {
                let layout = block_layout(v(n), level).unwrap();
                assert!(layout.total_codewords > layout.num_blocks * layout.ecc_per_block);
                // Every block fits in GF(256) and keeps some data
                let longest = layout.short_block_data_codewords() + 1 + layout.ecc_per_block;
                assert!(longest < 256);
                assert!(layout.short_block_data_codewords() > 0);
            }
        }
    }
}
