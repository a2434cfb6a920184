use criterion::{black_box, criterion_group, criterion_main, BatchSize, Criterion};
use qr_trace::tools::{build_symbol, rs_encode};
use qr_trace::{ECLevel, GaloisField, MaskPattern, QrDecoder, ReedSolomonDecoder, Version, decode_batch};

fn sample_block(num_data: usize, num_ecc: usize) -> Vec<u8> {
    let data: Vec<u8> = (0..num_data).map(|i| (i * 31 + 7) as u8).collect();
    rs_encode(GaloisField::qr_code_field(), &data, num_ecc)
}

fn bench_rs_clean_block(c: &mut Criterion) {
    let decoder = ReedSolomonDecoder::qr_code();
    let block = sample_block(118, 30);
    c.bench_function("rs_decode_148_clean", |b| {
        b.iter_batched(
            || block.clone(),
            |mut received| decoder.decode_with_error_positions(black_box(&mut received), 30),
            BatchSize::SmallInput,
        )
    });
}

fn bench_rs_max_errors(c: &mut Criterion) {
    let decoder = ReedSolomonDecoder::qr_code();
    let mut block = sample_block(118, 30);
    for k in 0..15 {
        block[k * 9] ^= 0x5A;
    }
    c.bench_function("rs_decode_148_15_errors", |b| {
        b.iter_batched(
            || block.clone(),
            |mut received| decoder.decode_with_error_positions(black_box(&mut received), 30),
            BatchSize::SmallInput,
        )
    });
}

fn bench_decode_symbol(c: &mut Criterion) {
    let version = Version::new(10).unwrap();
    let matrix = build_symbol(b"benchmark payload", version, ECLevel::M, MaskPattern::Pattern3)
        .expect("symbol fits");
    let decoder = QrDecoder::new();
    c.bench_function("decode_v10_m_symbol", |b| {
        b.iter(|| decoder.decode(black_box(&matrix)))
    });
}

fn bench_decode_batch(c: &mut Criterion) {
    let version = Version::new(4).unwrap();
    let matrices: Vec<_> = (0..64)
        .map(|i| {
            let payload = format!("batch item {}", i);
            build_symbol(payload.as_bytes(), version, ECLevel::Q, MaskPattern::from_bits(i as u8))
                .expect("symbol fits")
        })
        .collect();
    c.bench_function("decode_batch_64_v4_q", |b| {
        b.iter(|| decode_batch(black_box(&matrices)))
    });
}

criterion_group!(
    benches,
    bench_rs_clean_block,
    bench_rs_max_errors,
    bench_decode_symbol,
    bench_decode_batch
);
criterion_main!(benches);
