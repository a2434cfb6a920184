//! Reading version, format information and codewords out of a sampled grid

use crate::decoder::bitstream::read_codewords;
use crate::decoder::format::FormatInfo;
use crate::decoder::function_mask::FunctionMask;
use crate::decoder::tables::total_codewords;
use crate::decoder::unmask::unmask;
use crate::decoder::version::VersionInfo;
use crate::error::DecodeError;
use crate::models::{BitMatrix, MaskPattern, Version};

/// Source of the raw codewords of one symbol.
///
/// The decoder drives this interface; a failed attempt can be retried by
/// restoring the grid (`remask`), switching to mirrored reads and
/// transposing the grid (`mirror`).
pub trait CodewordSource {
    fn read_version(&mut self) -> Result<Version, DecodeError>;
    fn read_format_information(&mut self) -> Result<FormatInfo, DecodeError>;
    /// Unmask the data region and read all codewords in placement order
    fn read_codewords(&mut self) -> Result<Vec<u8>, DecodeError>;
    /// Undo any unmasking done by `read_codewords`
    fn remask(&mut self);
    /// Switch coordinate-swapped reads on or off; clears cached metadata
    fn set_mirror(&mut self, mirror: bool);
    /// Transpose the underlying grid
    fn mirror(&mut self);
}

/// `CodewordSource` over a square `BitMatrix`
#[derive(Debug, Clone)]
pub struct BitMatrixParser {
    matrix: BitMatrix,
    parsed_version: Option<Version>,
    parsed_format: Option<FormatInfo>,
    applied_mask: Option<(Version, MaskPattern)>,
    mirror: bool,
}

impl BitMatrixParser {
    pub fn new(matrix: BitMatrix) -> Result<Self, DecodeError> {
        let dimension = matrix.height();
        if matrix.width() != dimension || Version::from_dimension(dimension).is_none() {
            return Err(DecodeError::MalformedStructure("grid is not a QR-sized square"));
        }
        Ok(Self {
            matrix,
            parsed_version: None,
            parsed_format: None,
            applied_mask: None,
            mirror: false,
        })
    }

    pub fn matrix(&self) -> &BitMatrix {
        &self.matrix
    }

    pub fn is_mirrored(&self) -> bool {
        self.mirror
    }
}

impl CodewordSource for BitMatrixParser {
    fn read_version(&mut self) -> Result<Version, DecodeError> {
        if let Some(version) = self.parsed_version {
            return Ok(version);
        }
        let version = VersionInfo::read(&self.matrix, self.mirror)?;
        self.parsed_version = Some(version);
        Ok(version)
    }

    fn read_format_information(&mut self) -> Result<FormatInfo, DecodeError> {
        if let Some(format) = self.parsed_format {
            return Ok(format);
        }
        let format = FormatInfo::read(&self.matrix, self.mirror)?;
        self.parsed_format = Some(format);
        Ok(format)
    }

    fn read_codewords(&mut self) -> Result<Vec<u8>, DecodeError> {
        let version = self.read_version()?;
        let format = self.read_format_information()?;
        let func = FunctionMask::new(version);

        self.remask();
        unmask(&mut self.matrix, format.mask_pattern, &func);
        self.applied_mask = Some((version, format.mask_pattern));

        let codewords = read_codewords(&self.matrix, &func);
        if codewords.len() != total_codewords(version) {
            return Err(DecodeError::MalformedStructure(
                "codeword count does not match version",
            ));
        }
        Ok(codewords)
    }

    fn remask(&mut self) {
        if let Some((version, mask)) = self.applied_mask.take() {
            unmask(&mut self.matrix, mask, &FunctionMask::new(version));
        }
    }

    fn set_mirror(&mut self, mirror: bool) {
        self.parsed_version = None;
        self.parsed_format = None;
        self.mirror = mirror;
    }

    fn mirror(&mut self) {
        self.matrix.transpose_in_place();
    }
}
