/// QR code version (1-40, Model 2)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Version(u8);

impl Version {
    /// Create a version, `None` outside 1-40
    pub fn new(number: u8) -> Option<Self> {
        if (1..=40).contains(&number) {
            Some(Self(number))
        } else {
            None
        }
    }

    /// Version implied by a symbol dimension (21, 25, ... 177)
    pub fn from_dimension(dimension: usize) -> Option<Self> {
        if dimension < 21 || dimension % 4 != 1 {
            return None;
        }
        u8::try_from((dimension - 17) / 4).ok().and_then(Self::new)
    }

    /// Get the version number
    pub fn number(&self) -> u8 {
        self.0
    }

    /// Get the size in modules (width = height)
    pub fn size(&self) -> usize {
        4 * (self.0 as usize) + 17
    }

    /// Versions 7+ carry an explicit version information block
    pub fn has_version_info(&self) -> bool {
        self.0 >= 7
    }
}

/// Error correction level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ECLevel {
    /// Low (~7% recovery capacity)
    L,
    /// Medium (~15% recovery capacity)
    M,
    /// Quartile (~25% recovery capacity)
    Q,
    /// High (~30% recovery capacity)
    H,
}

impl ECLevel {
    /// Decode the two EC bits of the format information (01=L, 00=M, 11=Q, 10=H)
    pub fn from_format_bits(bits: u8) -> Self {
        match bits & 0x03 {
            0b01 => ECLevel::L,
            0b00 => ECLevel::M,
            0b11 => ECLevel::Q,
            _ => ECLevel::H,
        }
    }

    /// The two EC bits as written in the format information
    pub fn format_bits(&self) -> u8 {
        match self {
            ECLevel::L => 0b01,
            ECLevel::M => 0b00,
            ECLevel::Q => 0b11,
            ECLevel::H => 0b10,
        }
    }

    /// Row index into the block tables (L, M, Q, H)
    pub fn ordinal(&self) -> usize {
        match self {
            ECLevel::L => 0,
            ECLevel::M => 1,
            ECLevel::Q => 2,
            ECLevel::H => 3,
        }
    }
}

/// Mask pattern (0-7)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MaskPattern {
    /// (i + j) % 2 == 0
    Pattern0 = 0,
    /// i % 2 == 0
    Pattern1 = 1,
    /// j % 3 == 0
    Pattern2 = 2,
    /// (i + j) % 3 == 0
    Pattern3 = 3,
    /// (i/2 + j/3) % 2 == 0
    Pattern4 = 4,
    /// (i*j)%2 + (i*j)%3 == 0
    Pattern5 = 5,
    /// ((i*j)%2 + (i*j)%3) % 2 == 0
    Pattern6 = 6,
    /// ((i+j)%2 + (i*j)%3) % 2 == 0
    Pattern7 = 7,
}

impl MaskPattern {
    /// Get mask pattern from the low three bits
    pub fn from_bits(bits: u8) -> Self {
        match bits & 0x07 {
            0 => MaskPattern::Pattern0,
            1 => MaskPattern::Pattern1,
            2 => MaskPattern::Pattern2,
            3 => MaskPattern::Pattern3,
            4 => MaskPattern::Pattern4,
            5 => MaskPattern::Pattern5,
            6 => MaskPattern::Pattern6,
            _ => MaskPattern::Pattern7,
        }
    }

    pub fn bits(&self) -> u8 {
        *self as u8
    }

    /// Check if the module at row i, column j is inverted by this mask
    pub fn is_masked(&self, i: usize, j: usize) -> bool {
        match self {
            MaskPattern::Pattern0 => (i + j) % 2 == 0,
            MaskPattern::Pattern1 => i % 2 == 0,
            MaskPattern::Pattern2 => j % 3 == 0,
            MaskPattern::Pattern3 => (i + j) % 3 == 0,
            MaskPattern::Pattern4 => (i / 2 + j / 3) % 2 == 0,
            MaskPattern::Pattern5 => ((i * j) % 2 + (i * j) % 3) == 0,
            MaskPattern::Pattern6 => (((i * j) % 2) + ((i * j) % 3)) % 2 == 0,
            MaskPattern::Pattern7 => (((i + j) % 2) + ((i * j) % 3)) % 2 == 0,
        }
    }
}

/// Corrected positions for one error-correction block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockErrors {
    /// Index of the block in the deinterleaved order
    pub block_index: usize,
    /// Ascending codeword indices within the block that were corrected
    pub positions: Vec<usize>,
}

/// Outcome of a successful decode
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecoderResult {
    /// Corrected data codewords of all blocks, in block order
    pub data: Vec<u8>,
    /// QR code version
    pub version: Version,
    /// Error correction level
    pub ec_level: ECLevel,
    /// Mask pattern used
    pub mask_pattern: MaskPattern,
    /// Total number of corrected codewords across all blocks
    pub errors_corrected: usize,
    /// One entry per block, in block order
    pub error_positions: Vec<BlockErrors>,
    /// The code only decoded when read mirrored
    pub mirrored: bool,
}

impl DecoderResult {
    /// Positions per block without the block index, e.g. `[[1, 25]]`
    pub fn positions_by_block(&self) -> Vec<Vec<usize>> {
        self.error_positions
            .iter()
            .map(|block| block.positions.clone())
            .collect()
    }
}
