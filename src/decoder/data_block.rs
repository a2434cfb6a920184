//! Deinterleaving of the raw codeword stream into error-correction blocks

use crate::decoder::tables::block_layout;
use crate::error::DecodeError;
use crate::models::{ECLevel, Version};

/// One error-correction block: data codewords followed by ECC codewords
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataBlock {
    num_data_codewords: usize,
    codewords: Vec<u8>,
}

impl DataBlock {
    pub fn new(num_data_codewords: usize, codewords: Vec<u8>) -> Result<Self, DecodeError> {
        if num_data_codewords >= codewords.len() {
            return Err(DecodeError::MalformedStructure(
                "data block has no error-correction codewords",
            ));
        }
        Ok(Self {
            num_data_codewords,
            codewords,
        })
    }

    pub fn num_data_codewords(&self) -> usize {
        self.num_data_codewords
    }

    pub fn codewords(&self) -> &[u8] {
        &self.codewords
    }

    pub fn codewords_mut(&mut self) -> &mut [u8] {
        &mut self.codewords
    }

    pub fn data(&self) -> &[u8] {
        &self.codewords[..self.num_data_codewords]
    }

    /// Split the interleaved stream read from a symbol into its blocks.
    ///
    /// Shorter blocks come first. Data codewords are interleaved across all
    /// blocks, then ECC codewords; long blocks carry one extra data codeword
    /// that is read after the short blocks run out.
    pub fn get_data_blocks(
        raw_codewords: &[u8],
        version: Version,
        ec_level: ECLevel,
    ) -> Result<Vec<DataBlock>, DecodeError> {
        let layout = block_layout(version, ec_level)?;
        if raw_codewords.len() != layout.total_codewords {
            return Err(DecodeError::MalformedStructure(
                "codeword count does not match version",
            ));
        }

        let mut blocks: Vec<Vec<u8>> = (0..layout.num_blocks)
            .map(|b| Vec::with_capacity(layout.data_codewords_in_block(b) + layout.ecc_per_block))
            .collect();

        let short_data = layout.short_block_data_codewords();
        let longer_blocks_start = layout.num_blocks - layout.num_long_blocks();
        let mut raw = raw_codewords.iter().copied();

        for _ in 0..short_data {
            for block in blocks.iter_mut() {
                block.extend(raw.next());
            }
        }
        for block in blocks.iter_mut().skip(longer_blocks_start) {
            block.extend(raw.next());
        }
        for _ in 0..layout.ecc_per_block {
            for block in blocks.iter_mut() {
                block.extend(raw.next());
            }
        }

        blocks
            .into_iter()
            .enumerate()
            .map(|(b, codewords)| DataBlock::new(layout.data_codewords_in_block(b), codewords))
            .collect()
    }
}
