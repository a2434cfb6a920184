/// Version information for QR codes v7+
use crate::decoder::config::format_max_bit_errors;
use crate::error::DecodeError;
use crate::models::{BitMatrix, Version};

/// BCH(18,6) generator: x^12 + x^11 + x^10 + x^9 + x^8 + x^5 + x^2 + 1
const VERSION_GENERATOR: u32 = 0x1F25;

/// 18-bit version words for versions 7..=40
const VERSION_DECODE_INFO: [u32; 34] = build_version_lookup();

const fn build_version_lookup() -> [u32; 34] {
    let mut table = [0u32; 34];
    let mut i = 0;
    while i < 34 {
        table[i] = encode_version_bits(i as u8 + 7);
        i += 1;
    }
    table
}

pub(crate) const fn encode_version_bits(version: u8) -> u32 {
    let data = (version & 0x3F) as u32;
    let mut value = data << 12;
    let mut bit = 17;
    while bit >= 12 {
        if value & (1 << bit) != 0 {
            value ^= VERSION_GENERATOR << (bit - 12);
        }
        bit -= 1;
    }
    (data << 12) | (value & 0xFFF)
}

/// Module coordinates (x, y) of the two version blocks; index `i` holds bit `i`.
pub(crate) fn version_bit_positions(dimension: usize) -> [[(usize, usize); 18]; 2] {
    let mut top_right = [(0usize, 0usize); 18];
    let mut bottom_left = [(0usize, 0usize); 18];
    for i in 0..18 {
        top_right[i] = (dimension - 11 + i % 3, i / 3);
        bottom_left[i] = (i / 3, dimension - 11 + i % 3);
    }
    [top_right, bottom_left]
}

/// Version info is 18 bits (6 data + 12 ECC), stored next to two finders
pub struct VersionInfo;

impl VersionInfo {
    /// Read the version of a square matrix.
    ///
    /// Versions up to 6 follow from the dimension alone. Larger ones are read
    /// from the top-right block, then the bottom-left one, and must agree
    /// with the dimension.
    pub fn read(matrix: &BitMatrix, mirror: bool) -> Result<Version, DecodeError> {
        let dimension = matrix.width();
        let provisional = Version::from_dimension(dimension)
            .ok_or(DecodeError::MalformedStructure("dimension is not a QR size"))?;
        if !provisional.has_version_info() {
            return Ok(provisional);
        }

        for positions in version_bit_positions(dimension) {
            let bits = positions.iter().enumerate().fold(0u32, |bits, (i, &(x, y))| {
                let dark = if mirror { matrix.get(y, x) } else { matrix.get(x, y) };
                bits | ((dark as u32) << i)
            });
            if let Some(version) = Self::decode(bits) {
                if version.size() == dimension {
                    return Ok(version);
                }
            }
        }
        Err(DecodeError::MalformedStructure("unreadable version information"))
    }

    /// Closest version word within the tolerated bit distance
    pub fn decode(version_bits: u32) -> Option<Version> {
        let mut best_difference = u32::MAX;
        let mut best_version = 0u8;
        for (i, &target) in VERSION_DECODE_INFO.iter().enumerate() {
            let number = i as u8 + 7;
            if target == version_bits {
                return Version::new(number);
            }
            let difference = (version_bits ^ target).count_ones();
            if difference < best_difference {
                best_difference = difference;
                best_version = number;
            }
        }
        if best_difference <= format_max_bit_errors() {
            Version::new(best_version)
        } else {
            None
        }
    }
}
