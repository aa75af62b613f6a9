use criterion::{criterion_group, criterion_main, Criterion};
use ifwatch::aggregator;
use ifwatch::capture::{FrameMeta, LinkProtocol};
use ifwatch::classify::{classify, FilterState};
use ifwatch::cli::RateUnit;
use ifwatch::registry::InterfaceEntry;
use std::hint::black_box;

fn sample_entry(display_index: u32) -> InterfaceEntry {
    InterfaceEntry {
        name: format!("eth{display_index}"),
        if_index: display_index + 1,
        display_index,
        total: 0,
        ipv4_total: 0,
        ipv6_total: 0,
        non_ip_total: 0,
        bad_checksum_total: 0,
        span_bytes: 1_000_000,
        bytes_accumulated: 0,
        current_rate: 0.0,
        peak_rate: 0.0,
    }
}

fn ipv4_frame() -> [u8; 20] {
    let mut header = [0u8; 20];
    header[0] = 0x45;
    header[3] = 20;
    header[8] = 64;
    header[9] = 6;
    header[12..16].copy_from_slice(&[10, 0, 0, 1]);
    header[16..20].copy_from_slice(&[10, 0, 0, 2]);
    // header checksum over the zeroed checksum field
    let mut sum = 0u32;
    for word in header.chunks_exact(2) {
        sum += u32::from(u16::from_be_bytes([word[0], word[1]]));
    }
    while sum >> 16 != 0 {
        sum = (sum & 0xFFFF) + (sum >> 16);
    }
    header[10..12].copy_from_slice(&(!(sum as u16)).to_be_bytes());
    header
}

fn benchmark_on_packet(c: &mut Criterion) {
    c.bench_function("aggregator_on_packet", |b| {
        let mut entry = sample_entry(1);
        b.iter(|| {
            aggregator::on_packet(
                black_box(&mut entry),
                black_box(1500),
                LinkProtocol::Ipv4,
                true,
            );
        });
    });
}

fn benchmark_refresh_rates(c: &mut Criterion) {
    c.bench_function("refresh_rates_32_entries", |b| {
        let mut entries: Vec<InterfaceEntry> = (1..=32).map(sample_entry).collect();
        b.iter(|| {
            for entry in entries.iter_mut() {
                entry.span_bytes = 1_000_000;
            }
            aggregator::refresh_rates(black_box(&mut entries), RateUnit::Kilobits, 5.0);
        });
    });
}

fn benchmark_classify_ipv4(c: &mut Criterion) {
    let frame = ipv4_frame();
    let meta = FrameMeta {
        if_index: 2,
        protocol: LinkProtocol::Ipv4,
        ethertype: 0x0800,
        hatype: 0xFFFE,
    };
    let filter = FilterState::default();

    c.bench_function("classify_ipv4_frame", |b| {
        b.iter(|| {
            let classification = classify(black_box(&frame), &meta, &filter);
            black_box(classification);
        });
    });
}

criterion_group!(
    benches,
    benchmark_on_packet,
    benchmark_refresh_rates,
    benchmark_classify_ipv4
);
criterion_main!(benches);
