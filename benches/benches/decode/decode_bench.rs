use std::{hint::black_box, io::Cursor};

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use travelbook_core::{
    append_log, read_log, LogReader, LogWriter, RawHeader, RawPoint, Track, TrackSink,
    POINT_RECORD_SIZE,
};

fn build_log(n: u32) -> Vec<u8> {
    let header = RawHeader {
        start_time_string: "130615_143000_090".to_string(),
        start_point_description: "Storgata 12".to_string(),
        ..Default::default()
    };

    let mut writer = LogWriter::new(Cursor::new(Vec::new()), header).unwrap();
    for i in 0..n {
        writer
            .write_point(&RawPoint {
                lon: 1_896_512 + i as i32,
                lat: 6_965_278 - i as i32,
                alt: 40,
                time_offset_ms: i * 1_000,
                speed: 36.0,
                ..Default::default()
            })
            .unwrap();
    }
    writer.finish().unwrap().into_inner()
}

fn bench_decode(c: &mut Criterion) {
    let mut group = c.benchmark_group("decode");

    for n in [1_000u32, 10_000, 100_000] {
        let raw = build_log(n);
        group.throughput(Throughput::Bytes((n as usize * POINT_RECORD_SIZE) as u64));
        group.bench_with_input(BenchmarkId::from_parameter(n), &raw, |b, raw| {
            b.iter(|| read_log(Cursor::new(black_box(raw.as_slice()))).unwrap());
        });
    }

    group.finish();
}

fn bench_normalize(c: &mut Criterion) {
    let mut group = c.benchmark_group("append_log");

    for n in [1_000u32, 100_000] {
        let raw = build_log(n);
        group.throughput(Throughput::Elements(n as u64));
        group.bench_with_input(BenchmarkId::from_parameter(n), &raw, |b, raw| {
            b.iter(|| {
                let mut track = Track::default();
                track.new_track("bench", "").unwrap();
                let reader = LogReader::new(Cursor::new(raw.as_slice())).unwrap();
                append_log(&mut track, reader, 2).unwrap();
                black_box(track.point_count())
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_decode, bench_normalize);
criterion_main!(benches);
