//! Synthetic fixtures shared by tests, benches and the CLI's test data.
//!
//! Builds correctly encoded codeword blocks and module grids so the decoder
//! can be exercised without a camera pipeline.

use crate::decoder::bitstream::data_module_order;
use crate::decoder::format::{FormatInfo, format_bit_positions};
use crate::decoder::function_mask::{FunctionMask, alignment_pattern_positions};
use crate::decoder::reed_solomon::{GaloisField, GfPoly};
use crate::decoder::tables::block_layout;
use crate::decoder::version::{encode_version_bits, version_bit_positions};
use crate::error::DecodeError;
use crate::models::{BitMatrix, ECLevel, MaskPattern, Version};

/// Systematic RS encoding: `data` followed by `num_ecc` parity symbols.
///
/// The generator polynomial has roots `α^(b)..α^(b + num_ecc - 1)` where `b`
/// is the field's generator base.
pub fn rs_encode(field: &GaloisField, data: &[u8], num_ecc: usize) -> Vec<u8> {
    let base = field.generator_base();
    let generator = (0..num_ecc).fold(GfPoly::one(field), |acc, i| {
        acc.multiply(&GfPoly::from_normalized(field, vec![1, field.exp(i + base)]))
    });
    // Coefficients below the leading 1, highest degree first
    let taps = &generator.coefficients()[1..];

    let mut parity = vec![0u8; num_ecc];
    for &byte in data {
        let factor = byte ^ parity.first().copied().unwrap_or(0);
        parity.rotate_left(1);
        if let Some(last) = parity.last_mut() {
            *last = 0;
        }
        for (p, &tap) in parity.iter_mut().zip(taps) {
            *p ^= field.multiply(tap, factor);
        }
    }

    let mut codeword = Vec::with_capacity(data.len() + num_ecc);
    codeword.extend_from_slice(data);
    codeword.extend_from_slice(&parity);
    codeword
}

/// Split data codewords into blocks, append parity and interleave them the
/// way a symbol stores them.
pub fn interleave_blocks(
    data: &[u8],
    version: Version,
    ec_level: ECLevel,
) -> Result<Vec<u8>, DecodeError> {
    let layout = block_layout(version, ec_level)?;
    if data.len() != layout.total_data_codewords() {
        return Err(DecodeError::MalformedStructure(
            "data length does not match block layout",
        ));
    }

    let field = GaloisField::qr_code_field();
    let mut blocks = Vec::with_capacity(layout.num_blocks);
    let mut offset = 0;
    for b in 0..layout.num_blocks {
        let len = layout.data_codewords_in_block(b);
        blocks.push(rs_encode(field, &data[offset..offset + len], layout.ecc_per_block));
        offset += len;
    }

    let longest_data = layout.data_codewords_in_block(layout.num_blocks - 1);
    let mut raw = Vec::with_capacity(layout.total_codewords);
    for i in 0..longest_data {
        for (b, block) in blocks.iter().enumerate() {
            if i < layout.data_codewords_in_block(b) {
                raw.push(block[i]);
            }
        }
    }
    for i in 0..layout.ecc_per_block {
        for (b, block) in blocks.iter().enumerate() {
            raw.push(block[layout.data_codewords_in_block(b) + i]);
        }
    }
    Ok(raw)
}

struct BitBuffer {
    bytes: Vec<u8>,
    len: usize,
}

impl BitBuffer {
    fn new() -> Self {
        Self {
            bytes: Vec::new(),
            len: 0,
        }
    }

    fn push_bits(&mut self, value: u32, count: usize) {
        for i in (0..count).rev() {
            if self.len % 8 == 0 {
                self.bytes.push(0);
            }
            if (value >> i) & 1 == 1 {
                if let Some(byte) = self.bytes.last_mut() {
                    *byte |= 0x80 >> (self.len % 8);
                }
            }
            self.len += 1;
        }
    }
}

/// Byte-mode segment for `payload`, terminated and padded to the data
/// capacity of `(version, ec_level)`.
pub fn byte_mode_data(
    payload: &[u8],
    version: Version,
    ec_level: ECLevel,
) -> Result<Vec<u8>, DecodeError> {
    let capacity = block_layout(version, ec_level)?.total_data_codewords();
    let count_bits = if version.number() <= 9 { 8 } else { 16 };
    if 4 + count_bits + payload.len() * 8 > capacity * 8 {
        return Err(DecodeError::MalformedStructure("payload does not fit"));
    }

    let mut buffer = BitBuffer::new();
    buffer.push_bits(0b0100, 4);
    buffer.push_bits(payload.len() as u32, count_bits);
    for &byte in payload {
        buffer.push_bits(byte as u32, 8);
    }
    let terminator = (capacity * 8 - buffer.len).min(4);
    buffer.push_bits(0, terminator);

    let mut data = buffer.bytes;
    for pad in [0xEC, 0x11].into_iter().cycle() {
        if data.len() >= capacity {
            break;
        }
        data.push(pad);
    }
    Ok(data)
}

/// Lay out a complete symbol: function patterns, format and version words and
/// the masked codewords in placement order.
pub fn build_matrix(
    version: Version,
    ec_level: ECLevel,
    mask_pattern: MaskPattern,
    codewords: &[u8],
) -> BitMatrix {
    let size = version.size();
    let mut matrix = BitMatrix::new(size, size);

    for (left, top) in [(0, 0), (size - 7, 0), (0, size - 7)] {
        draw_square_rings(&mut matrix, left + 3, top + 3, 3);
    }
    for i in 8..size - 8 {
        matrix.set(i, 6, i % 2 == 0);
        matrix.set(6, i, i % 2 == 0);
    }
    let align = alignment_pattern_positions(version);
    for &cx in &align {
        for &cy in &align {
            let near_finder = (cx <= 8 && cy <= 8)
                || (cx >= size - 9 && cy <= 8)
                || (cx <= 8 && cy >= size - 9);
            if !near_finder {
                draw_square_rings(&mut matrix, cx, cy, 2);
            }
        }
    }
    matrix.set(8, size - 8, true);

    let format = FormatInfo {
        ec_level,
        mask_pattern,
    }
    .encode();
    for positions in format_bit_positions(size) {
        for (k, &(x, y)) in positions.iter().enumerate() {
            matrix.set(x, y, (format >> (14 - k)) & 1 == 1);
        }
    }

    if version.has_version_info() {
        let bits = encode_version_bits(version.number());
        for positions in version_bit_positions(size) {
            for (i, &(x, y)) in positions.iter().enumerate() {
                matrix.set(x, y, (bits >> i) & 1 == 1);
            }
        }
    }

    let func = FunctionMask::new(version);
    for (k, (x, y)) in data_module_order(&func).into_iter().enumerate() {
        let bit = codewords
            .get(k / 8)
            .is_some_and(|&byte| (byte >> (7 - k % 8)) & 1 == 1);
        matrix.set(x, y, bit ^ mask_pattern.is_masked(y, x));
    }

    matrix
}

/// Encode `payload` in byte mode into a finished symbol.
pub fn build_symbol(
    payload: &[u8],
    version: Version,
    ec_level: ECLevel,
    mask_pattern: MaskPattern,
) -> Result<BitMatrix, DecodeError> {
    let data = byte_mode_data(payload, version, ec_level)?;
    let codewords = interleave_blocks(&data, version, ec_level)?;
    Ok(build_matrix(version, ec_level, mask_pattern, &codewords))
}

/// Finder (radius 3) or alignment (radius 2) pattern centred on (cx, cy):
/// dark everywhere except the ring just inside the outer edge.
fn draw_square_rings(matrix: &mut BitMatrix, cx: usize, cy: usize, radius: usize) {
    for y in cy - radius..=cy + radius {
        for x in cx - radius..=cx + radius {
            let distance = x.abs_diff(cx).max(y.abs_diff(cy));
            matrix.set(x, y, distance + 1 != radius);
        }
    }
}
