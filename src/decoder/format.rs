/// Format information (EC level + mask) of a QR code
use crate::decoder::config::format_max_bit_errors;
use crate::error::DecodeError;
use crate::models::{BitMatrix, ECLevel, MaskPattern};

/// XOR mask applied to every format information word
const FORMAT_INFO_MASK_QR: u16 = 0x5412;

/// BCH(15,5) generator: x^10 + x^8 + x^5 + x^4 + x^2 + x + 1
const FORMAT_GENERATOR: u16 = 0x537;

/// Masked 15-bit format words, indexed by their 5 data bits
const FORMAT_INFO_DECODE_LOOKUP: [u16; 32] = build_format_lookup();

const fn build_format_lookup() -> [u16; 32] {
    let mut table = [0u16; 32];
    let mut data = 0;
    while data < 32 {
        table[data] = encode_format_bits(data as u8);
        data += 1;
    }
    table
}

/// 5 data bits -> masked 15-bit format word
pub(crate) const fn encode_format_bits(data: u8) -> u16 {
    let data = (data & 0x1F) as u16;
    let mut value = data << 10;
    let mut bit = 14;
    while bit >= 10 {
        if value & (1 << bit) != 0 {
            value ^= FORMAT_GENERATOR << (bit - 10);
        }
        bit -= 1;
    }
    ((data << 10) | (value & 0x3FF)) ^ FORMAT_INFO_MASK_QR
}

/// Module coordinates (x, y) of both format copies, most significant bit first.
pub(crate) fn format_bit_positions(dimension: usize) -> [[(usize, usize); 15]; 2] {
    let mut first = [(0usize, 0usize); 15];
    let mut idx = 0;
    for x in 0..6 {
        first[idx] = (x, 8);
        idx += 1;
    }
    for pos in [(7, 8), (8, 8), (8, 7)] {
        first[idx] = pos;
        idx += 1;
    }
    for y in (0..6).rev() {
        first[idx] = (8, y);
        idx += 1;
    }

    let mut second = [(0usize, 0usize); 15];
    let mut idx = 0;
    for y in ((dimension - 7)..dimension).rev() {
        second[idx] = (8, y);
        idx += 1;
    }
    for x in (dimension - 8)..dimension {
        second[idx] = (x, 8);
        idx += 1;
    }

    [first, second]
}

/// Format info is 15 bits (5 data + 10 ECC), stored twice
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FormatInfo {
    pub ec_level: ECLevel,
    pub mask_pattern: MaskPattern,
}

impl FormatInfo {
    /// Read both format copies; `mirror` swaps the coordinates of every read.
    pub fn read(matrix: &BitMatrix, mirror: bool) -> Result<Self, DecodeError> {
        let dimension = matrix.width();
        if dimension < 21 {
            return Err(DecodeError::MalformedStructure("matrix too small for format info"));
        }

        let [first, second] = format_bit_positions(dimension);
        let read_word = |positions: &[(usize, usize); 15]| {
            positions.iter().fold(0u16, |bits, &(x, y)| {
                let dark = if mirror { matrix.get(y, x) } else { matrix.get(x, y) };
                (bits << 1) | dark as u16
            })
        };

        Self::decode(read_word(&first), read_word(&second))
            .ok_or(DecodeError::MalformedStructure("unreadable format information"))
    }

    /// Decode two masked 15-bit copies.
    ///
    /// Some encoders forget the XOR mask, so the unmasked reading is tried as well.
    pub fn decode(masked_bits1: u16, masked_bits2: u16) -> Option<Self> {
        Self::do_decode(masked_bits1, masked_bits2).or_else(|| {
            Self::do_decode(
                masked_bits1 ^ FORMAT_INFO_MASK_QR,
                masked_bits2 ^ FORMAT_INFO_MASK_QR,
            )
        })
    }

    fn do_decode(masked_bits1: u16, masked_bits2: u16) -> Option<Self> {
        let mut best_difference = u32::MAX;
        let mut best_format = 0u8;
        for (data, &target) in FORMAT_INFO_DECODE_LOOKUP.iter().enumerate() {
            if target == masked_bits1 || target == masked_bits2 {
                return Some(Self::from_data_bits(data as u8));
            }
            let mut difference = (masked_bits1 ^ target).count_ones();
            if masked_bits1 != masked_bits2 {
                difference = difference.min((masked_bits2 ^ target).count_ones());
            }
            if difference < best_difference {
                best_difference = difference;
                best_format = data as u8;
            }
        }
        if best_difference <= format_max_bit_errors() {
            Some(Self::from_data_bits(best_format))
        } else {
            None
        }
    }

    fn from_data_bits(data: u8) -> Self {
        Self {
            ec_level: ECLevel::from_format_bits((data >> 3) & 0x03),
            mask_pattern: MaskPattern::from_bits(data & 0x07),
        }
    }

    /// The masked 15-bit word for this format
    pub fn encode(&self) -> u16 {
        encode_format_bits((self.ec_level.format_bits() << 3) | self.mask_pattern.bits())
    }
}
