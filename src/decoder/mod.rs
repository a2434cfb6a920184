//! QR code error correction and decoding
//!
//! This module contains everything between a sampled module grid and the
//! corrected data codewords:
//! - Reed-Solomon decoding with error positions
//! - Format and version information
//! - Codeword extraction, unmasking and block deinterleaving
//! - The block decoder with its mirrored retry

/// Codeword extraction from the QR matrix
pub mod bitstream;
pub mod config;
/// Splitting raw codewords into error-correction blocks
pub mod data_block;
/// Format information (mask pattern, EC level)
pub mod format;
/// Function module mask builder (finder/timing/format/alignment/version)
pub mod function_mask;
/// Codeword source trait and the bit-matrix implementation
pub mod parser;
/// Block decoder and mirrored-retry pipeline
pub mod qr_decoder;
/// Reed-Solomon error correction
pub mod reed_solomon;
/// Block structure tables (ECC codewords/blocks)
pub mod tables;
/// Data mask removal
pub mod unmask;
/// Version information (versions 7-40)
pub mod version;
