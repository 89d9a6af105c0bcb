//! Benchmarks for the per-candidate verification cost.
//!
//! Run with: `cargo bench --bench probe`

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use zipbrute::crypto::ZipCrypto;
use zipbrute::search::{FullCheck, Verifier};

const ARCHIVE: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/__fixtures__/zip/ab_two_members.zip");

/// Key setup plus header decryption, the work most candidates stop after.
fn bench_header_check(c: &mut Criterion) {
    let header = [0x5d, 0xed, 0x11, 0x50, 0xd6, 0x62, 0xfb, 0x83, 0xc6, 0x05, 0xfa, 0x6b];

    c.bench_function("zipcrypto_header_check", |b| {
        b.iter(|| {
            let mut buf = header;
            ZipCrypto::new(black_box(b"QZ")).verify_header(&mut buf, 0x36).is_ok()
        });
    });
}

fn bench_verify(c: &mut Criterion) {
    let verifier = Verifier::inspect(ARCHIVE, FullCheck::Always).unwrap();
    let mut probe = verifier.open_probe().unwrap();

    let mut group = c.benchmark_group("verify");
    group.bench_function("wrong_password", |b| {
        b.iter(|| verifier.verify(&mut probe, black_box("QZ")).unwrap());
    });
    group.bench_function("correct_password", |b| {
        b.iter(|| verifier.verify(&mut probe, black_box("AB")).unwrap());
    });
    group.finish();
}

criterion_group!(benches, bench_header_check, bench_verify);
criterion_main!(benches);
