//! Integration tests for grid decoding regressions
//!
//! These tests go through the public API only: grids are rendered to text,
//! parsed back and decoded, and the reported per-block error positions are
//! checked against the damage that was injected.

use qr_trace::tools::{build_matrix, build_symbol, byte_mode_data, interleave_blocks};
use qr_trace::{
    BitMatrix, DecodeError, ECLevel, GaloisField, MaskPattern, QrDecoder, ReedSolomonDecoder,
    Version, decode_batch, decode_matrix,
};

/// Data codewords of "Hello, Audrey!" as a 1-M byte-mode symbol
const HELLO_AUDREY_DATA: [u8; 16] = [
    0x40, 0xE4, 0x86, 0x56, 0xC6, 0xC6, 0xF2, 0xC2, 0x04, 0x17, 0x56, 0x47, 0x26, 0x57, 0x92,
    0x10,
];

fn v(n: u8) -> Version {
    Version::new(n).unwrap()
}

/// Load a checked-in grid. The fixtures under `tests/fixtures/` were rendered
/// by Kazuhiko Arase's QRCode for JavaScript, not by this crate.
fn load_fixture(name: &str) -> BitMatrix {
    let path = format!("{}/tests/fixtures/{}", env!("CARGO_MANIFEST_DIR"), name);
    let text = std::fs::read_to_string(&path).expect("Failed to read fixture grid");
    BitMatrix::parse_grid(&text).expect("Fixture grid should parse")
}

/// Flip a whole codeword of the placed symbol by re-rendering with damage
fn damaged_symbol(
    payload: &[u8],
    version: Version,
    ec_level: ECLevel,
    mask: MaskPattern,
    damage: &[(usize, u8)],
) -> (Vec<u8>, BitMatrix) {
    let data = byte_mode_data(payload, version, ec_level).unwrap();
    let mut raw = interleave_blocks(&data, version, ec_level).unwrap();
    for &(index, pattern) in damage {
        raw[index] ^= pattern;
    }
    (data, build_matrix(version, ec_level, mask, &raw))
}

#[test]
fn test_grid_text_roundtrip_decodes() {
    let matrix = build_symbol(b"Hello, Audrey!", v(1), ECLevel::M, MaskPattern::Pattern0).unwrap();
    let text = matrix.to_grid_string();
    let parsed = BitMatrix::parse_grid(&text).unwrap();
    assert_eq!(parsed, matrix);

    let result = decode_matrix(&parsed).unwrap();
    assert_eq!(result.errors_corrected, 0);
    assert_eq!(result.positions_by_block(), vec![Vec::<usize>::new()]);
}

#[test]
fn test_externally_encoded_symbol_decodes() {
    let matrix = load_fixture("hello_audrey_1m.txt");
    assert_eq!((matrix.width(), matrix.height()), (21, 21));

    let result = decode_matrix(&matrix).unwrap();
    assert_eq!(result.version, v(1));
    assert_eq!(result.ec_level, ECLevel::M);
    assert_eq!(result.mask_pattern, MaskPattern::Pattern6);
    assert!(!result.mirrored);
    assert_eq!(result.errors_corrected, 0);
    assert_eq!(result.data, HELLO_AUDREY_DATA);
}

#[test]
fn test_externally_encoded_symbol_with_codewords_1_and_25_corrupted() {
    // Raw codeword 1 flipped with 0xFF and codeword 25 with 0x0F before placement
    let matrix = load_fixture("hello_audrey_1m_corrupted_1_25.txt");
    let result = decode_matrix(&matrix).unwrap();
    assert_eq!(result.positions_by_block(), vec![vec![1, 25]]);
    assert_eq!(result.errors_corrected, 2);
    assert_eq!(result.data, HELLO_AUDREY_DATA);
    // The fixture builder agrees with the external encoder
    let rebuilt = byte_mode_data(b"Hello, Audrey!", v(1), ECLevel::M).unwrap();
    assert_eq!(rebuilt, HELLO_AUDREY_DATA);

    let mut mirrored = matrix.clone();
    mirrored.transpose_in_place();
    let result = decode_matrix(&mirrored).unwrap();
    assert!(result.mirrored);
    assert_eq!(result.positions_by_block(), vec![vec![1, 25]]);
    assert_eq!(result.data, HELLO_AUDREY_DATA);
}

#[test]
fn test_hello_audrey_two_corrupted_codewords() {
    let (data, matrix) = damaged_symbol(
        b"Hello, Audrey!",
        v(1),
        ECLevel::M,
        MaskPattern::Pattern6,
        &[(1, 0xFF), (25, 0x0F)],
    );
    let result = decode_matrix(&matrix).unwrap();
    assert_eq!(result.positions_by_block(), vec![vec![1, 25]]);
    assert_eq!(result.errors_corrected, 2);
    assert_eq!(result.data, data);
}

#[test]
fn test_every_mask_and_level_decodes() {
    for bits in 0..8 {
        for ec_level in [ECLevel::L, ECLevel::M, ECLevel::Q, ECLevel::H] {
            let mask = MaskPattern::from_bits(bits);
            let matrix = build_symbol(b"mask sweep", v(2), ec_level, mask).unwrap();
            let result = decode_matrix(&matrix).unwrap();
            assert_eq!(result.mask_pattern, mask);
            assert_eq!(result.ec_level, ec_level);
        }
    }
}

#[test]
fn test_large_version_multi_block() {
    // 10-H: 6 short blocks of 15 and 2 long blocks of 16 data codewords, 28 parity each
    let (data, matrix) = damaged_symbol(
        b"a longer payload spread over eight blocks",
        v(10),
        ECLevel::H,
        MaskPattern::Pattern1,
        &[(0, 0x11), (8, 0x22), (9, 0x33)],
    );
    let result = decode_matrix(&matrix).unwrap();
    assert_eq!(result.version, v(10));
    assert_eq!(result.error_positions.len(), 8);
    // Raw 0 and 8 are codewords 0 and 1 of block 0, raw 9 is codeword 1 of block 1
    let positions = result.positions_by_block();
    assert_eq!(positions[0], vec![0, 1]);
    assert_eq!(positions[1], vec![1]);
    assert!(positions[2..].iter().all(Vec::is_empty));
    assert_eq!(result.data, data);
}

#[test]
fn test_versions_with_narrow_first_alignment_gap() {
    for n in [36, 39] {
        let matrix = build_symbol(b"hi", v(n), ECLevel::L, MaskPattern::Pattern0).unwrap();
        let result = decode_matrix(&matrix).unwrap();
        assert_eq!(result.version, v(n));
        assert_eq!(result.errors_corrected, 0);
    }
}

#[test]
fn test_mirrored_grid_and_disabled_retry() {
    let mut matrix =
        build_symbol(b"mirror me", v(7), ECLevel::M, MaskPattern::Pattern4).unwrap();
    matrix.transpose_in_place();

    let result = QrDecoder::new().with_mirror_retry(true).decode(&matrix).unwrap();
    assert!(result.mirrored);
    assert_eq!(result.version, v(7));

    assert!(QrDecoder::new().with_mirror_retry(false).decode(&matrix).is_err());
}

#[test]
fn test_too_much_damage_fails() {
    let damage: Vec<(usize, u8)> = (0..10).map(|i| (i * 2, 0xA5)).collect();
    let (_, matrix) =
        damaged_symbol(b"Hello, Audrey!", v(1), ECLevel::M, MaskPattern::Pattern2, &damage);
    let err = decode_matrix(&matrix).unwrap_err();
    assert!(matches!(
        err,
        DecodeError::CorrectionFailed(_) | DecodeError::BadErrorLocation { .. }
    ));
}

#[test]
fn test_batch_keeps_input_order() {
    let mut matrices: Vec<BitMatrix> = (0..6)
        .map(|i| {
            let payload = format!("item {}", i);
            build_symbol(payload.as_bytes(), v(1), ECLevel::L, MaskPattern::from_bits(i)).unwrap()
        })
        .collect();
    matrices.push(BitMatrix::new(21, 21));

    let results = decode_batch(&matrices);
    assert_eq!(results.len(), 7);
    for (i, result) in results.iter().take(6).enumerate() {
        let result = result.as_ref().unwrap();
        assert_eq!(result.mask_pattern, MaskPattern::from_bits(i as u8));
    }
    assert!(results[6].is_err());
}

#[test]
fn test_rs_decoder_public_api() {
    let field = GaloisField::data_matrix_field();
    let data = b"ECC200".to_vec();
    let mut received = qr_trace::tools::rs_encode(field, &data, 8);
    received[0] ^= 0x01;
    received[10] ^= 0x80;
    let decoder = ReedSolomonDecoder::new(field);
    let mut positions = decoder.decode_with_error_positions(&mut received, 8).unwrap();
    positions.sort_unstable();
    assert_eq!(positions, vec![0, 10]);
    assert_eq!(&received[..6], data.as_slice());
}
