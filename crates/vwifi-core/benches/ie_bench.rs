//! Criterion benchmarks for information element handling.
//!
//! The announcer builds one advertisement per scan or connect, so these
//! numbers bound the per-announcement cost.
//!
//! Run with:
//! ```bash
//! cargo bench --package vwifi-core --bench ie_bench
//! ```

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use vwifi_core::domain::ie::{self, InformationElement};
use vwifi_core::{Ssid, SyntheticAccessPoint};

fn bench_encode_ssid(c: &mut Criterion) {
    let elements = vec![InformationElement::Ssid(SyntheticAccessPoint::ssid())];
    c.bench_function("ie_encode_ssid", |b| {
        b.iter(|| ie::encode(black_box(&elements)).unwrap())
    });
}

fn bench_parse_mixed_block(c: &mut Criterion) {
    let elements = vec![
        InformationElement::Ssid(Ssid::try_from("bench-network").unwrap()),
        InformationElement::Unknown {
            eid: 221,
            payload: vec![0x00, 0x50, 0xF2, 0x01, 0x01, 0x00],
        },
        InformationElement::Unknown {
            eid: 1,
            payload: vec![0x82, 0x84, 0x8B, 0x96],
        },
    ];
    let block = ie::encode(&elements).unwrap();
    c.bench_function("ie_parse_mixed_block", |b| {
        b.iter(|| ie::parse(black_box(&block)).unwrap())
    });
}

fn bench_advertisement(c: &mut Criterion) {
    c.bench_function("synthetic_advertisement", |b| {
        b.iter(SyntheticAccessPoint::advertisement)
    });
}

criterion_group!(
    benches,
    bench_encode_ssid,
    bench_parse_mixed_block,
    bench_advertisement
);
criterion_main!(benches);
