//! qr_trace - QR code error correction that reports where it corrected
//!
//! Takes a sampled QR module grid, splits its codewords into error-correction
//! blocks and runs a Reed-Solomon decoder over GF(256) on each block. Besides
//! the corrected data, every result lists the corrected codeword positions of
//! every block. Codes that only read correctly when mirrored are retried once
//! with a transposed reading.

#![warn(missing_docs)]
#![allow(clippy::missing_docs_in_private_items)]

/// QR code decoding modules (Reed-Solomon, format and version info, block decoder)
#[allow(missing_docs)]
pub mod decoder;
/// Error type shared by every decoding stage
pub mod error;
/// Core data structures (BitMatrix, Version, DecoderResult, etc.)
#[allow(missing_docs)]
pub mod models;
/// Synthetic symbol fixtures for tests and benches
#[doc(hidden)]
#[allow(missing_docs)]
pub mod tools;

pub use decoder::parser::{BitMatrixParser, CodewordSource};
pub use decoder::qr_decoder::QrDecoder;
pub use decoder::reed_solomon::{GaloisField, GfPoly, ReedSolomonDecoder};
pub use error::DecodeError;
pub use models::{BitMatrix, BlockErrors, DecoderResult, ECLevel, MaskPattern, Version};

use decoder::config::{debug_enabled, parallel_batch_min};
use rayon::prelude::*;

/// Decode one sampled module grid with the default decoder.
///
/// # Example
/// ```no_run
/// use qr_trace::{BitMatrix, decode_matrix};
///
/// let grid = std::fs::read_to_string("symbol.txt").unwrap();
/// let matrix = BitMatrix::parse_grid(&grid).unwrap();
/// let result = decode_matrix(&matrix).unwrap();
/// for block in &result.error_positions {
///     println!("block {}: {:?}", block.block_index, block.positions);
/// }
/// ```
pub fn decode_matrix(matrix: &BitMatrix) -> Result<DecoderResult, DecodeError> {
    QrDecoder::new().decode(matrix)
}

/// Decode independent grids with the default decoder; see [`decode_batch_with`].
pub fn decode_batch(matrices: &[BitMatrix]) -> Vec<Result<DecoderResult, DecodeError>> {
    decode_batch_with(&QrDecoder::new(), matrices)
}

/// Decode independent grids, in parallel once the batch is large enough.
///
/// Results come back in input order. Batches smaller than
/// `QR_PARALLEL_BATCH_MIN` (default 4) are decoded on the calling thread.
pub fn decode_batch_with(
    decoder: &QrDecoder,
    matrices: &[BitMatrix],
) -> Vec<Result<DecoderResult, DecodeError>> {
    let threshold = parallel_batch_min();
    if cfg!(debug_assertions) && debug_enabled() {
        eprintln!(
            "DEBUG: Decoding batch of {} grids ({})",
            matrices.len(),
            if matrices.len() >= threshold {
                "parallel"
            } else {
                "sequential"
            }
        );
    }

    if matrices.len() >= threshold {
        matrices.par_iter().map(|m| decoder.decode(m)).collect()
    } else {
        matrices.iter().map(|m| decoder.decode(m)).collect()
    }
}
