use crate::decoder::config::{debug_enabled, mirror_retry_default};
use crate::decoder::data_block::DataBlock;
use crate::decoder::parser::{BitMatrixParser, CodewordSource};
use crate::decoder::reed_solomon::ReedSolomonDecoder;
use crate::error::DecodeError;
/// Main QR code decoder - corrects every block and retries mirrored once
use crate::models::{BitMatrix, BlockErrors, DecoderResult};


/// Where the pipeline stands between attempts
enum Attempt {
    Normal,
    /// Holds the error of the normal attempt, which is what a failed retry reports
    Mirrored(DecodeError),
}

/// Block decoder and mirrored-retry pipeline over the QR code field
#[derive(Debug, Clone, Copy)]
pub struct QrDecoder {
    rs: ReedSolomonDecoder<'static>,
    mirror_retry: bool,
}

impl QrDecoder {
    /// Decoder with the mirrored retry taken from `QR_MIRROR_RETRY` (on by default)
    pub fn new() -> Self {
        Self {
            rs: ReedSolomonDecoder::qr_code(),
            mirror_retry: mirror_retry_default(),
        }
    }

    pub fn with_mirror_retry(mut self, enabled: bool) -> Self {
        self.mirror_retry = enabled;
        self
    }

    pub fn mirror_retry(&self) -> bool {
        self.mirror_retry
    }

    /// Decode a sampled module grid.
    pub fn decode(&self, matrix: &BitMatrix) -> Result<DecoderResult, DecodeError> {
        let mut parser = BitMatrixParser::new(matrix.clone())?;
        self.decode_with_error_positions(&mut parser)
    }

    /// Run the pipeline against `source`, retrying once mirrored.
    ///
    /// If the mirrored attempt fails as well, the error of the normal attempt
    /// is returned.
    pub fn decode_with_error_positions<S: CodewordSource>(
        &self,
        source: &mut S,
    ) -> Result<DecoderResult, DecodeError> {
        let mut attempt = Attempt::Normal;
        loop {
            attempt = match attempt {
                Attempt::Normal => match self.correct_symbol(source, false) {
                    Ok(result) => return Ok(result),
                    Err(err) if self.mirror_retry && err.triggers_mirror_retry() => {
                        if cfg!(debug_assertions) && debug_enabled() {
                            eprintln!("DEBUG: Normal reading failed ({}), retrying mirrored", err);
                        }
                        Attempt::Mirrored(err)
                    }
                    Err(err) => return Err(err),
                },
                Attempt::Mirrored(original) => {
                    return self.mirrored_attempt(source).map_err(|mirror_err| {
                        if cfg!(debug_assertions) && debug_enabled() {
                            eprintln!("DEBUG: Mirrored reading failed too ({})", mirror_err);
                        }
                        original
                    });
                }
            };
        }
    }

    fn mirrored_attempt<S: CodewordSource>(
        &self,
        source: &mut S,
    ) -> Result<DecoderResult, DecodeError> {
        source.remask();
        source.set_mirror(true);
        // Version and format are read before the grid is flipped
        source.read_version()?;
        source.read_format_information()?;
        source.mirror();
        self.correct_symbol(source, true)
    }

    fn correct_symbol<S: CodewordSource>(
        &self,
        source: &mut S,
        mirrored: bool,
    ) -> Result<DecoderResult, DecodeError> {
        let version = source.read_version()?;
        let format = source.read_format_information()?;
        let raw_codewords = source.read_codewords()?;
        let blocks = DataBlock::get_data_blocks(&raw_codewords, version, format.ec_level)?;

        let total_data: usize = blocks.iter().map(DataBlock::num_data_codewords).sum();
        let mut data = Vec::with_capacity(total_data);
        let mut error_positions = Vec::with_capacity(blocks.len());
        let mut errors_corrected = 0;

        for (block_index, mut block) in blocks.into_iter().enumerate() {
            let num_data_codewords = block.num_data_codewords();
            let positions =
                self.correct_errors_with_positions(block.codewords_mut(), num_data_codewords)?;
            if !positions.is_empty() && cfg!(debug_assertions) && debug_enabled() {
                eprintln!(
                    "DEBUG: Block {} corrected {} codewords at {:?}",
                    block_index,
                    positions.len(),
                    positions
                );
            }
            errors_corrected += positions.len();
            data.extend_from_slice(block.data());
            error_positions.push(BlockErrors {
                block_index,
                positions,
            });
        }

        if cfg!(debug_assertions) && debug_enabled() {
            eprintln!(
                "DEBUG: Decoded v{} {:?} mask {} ({} corrections, mirrored={})",
                version.number(),
                format.ec_level,
                format.mask_pattern.bits(),
                errors_corrected,
                mirrored
            );
        }

        Ok(DecoderResult {
            data,
            version,
            ec_level: format.ec_level,
            mask_pattern: format.mask_pattern,
            errors_corrected,
            error_positions,
            mirrored,
        })
    }

    /// Correct one block in place; returns the corrected indices in ascending order.
    ///
    /// The first `num_data_codewords` entries are data, the rest parity.
    pub fn correct_errors_with_positions(
        &self,
        codewords: &mut [u8],
        num_data_codewords: usize,
    ) -> Result<Vec<usize>, DecodeError> {
        if num_data_codewords >= codewords.len() {
            return Err(DecodeError::MalformedStructure(
                "data block has no error-correction codewords",
            ));
        }
        let two_s = codewords.len() - num_data_codewords;
        let mut positions = self.rs.decode_with_error_positions(codewords, two_s)?;
        positions.sort_unstable();
        Ok(positions)
    }
}

impl Default for QrDecoder {
    fn default() -> Self {
        Self::new()
    }
}
