use std::{fs, io::Cursor};

use chrono::{TimeZone, Utc};
use tempfile::NamedTempFile;
use travelbook_core::{
    append_log, check_monotonic, read_log, ByteCursor, LogError, LogReader, LogWriter, RawHeader,
    RawHeaderExt, RawPoint, Track, TrackSink, POINT_RECORD_SIZE,
};

// ===========================================================================
// Helpers: детерминированные тест-данные
// ===========================================================================

fn deterministic_header(start_time: &str) -> RawHeader {
    RawHeader {
        favorite: 0,
        log_type: 1,
        log_start_time: 3_020_000,
        log_duration: 1_811,
        log_length: 1_811,
        start_point_description: "Storgata 12, 9008 Tromsø".to_string(),
        end_point_description: "Hansjordnesbukta, Tromsø".to_string(),
        start_time_string: start_time.to_string(),
        programmed_destination_description: "Полярный музей — 極地博物館".to_string(),
        end_lon: 1_895_540,
        end_lat: 6_965_180,
        point_count: 0,
    }
}

fn deterministic_point(i: u32) -> RawPoint {
    RawPoint {
        lon: 1_896_512 + 7 * i as i32,
        lat: 6_965_278 - 3 * i as i32,
        alt: 40 + (i % 5) as i32,
        time_offset_ms: i * 1_000,
        speed: 18.0 * (i % 4) as f32,
        signal_quality: 3,
        speeding: (i % 2) as i8,
        gsm_signal_quality: 3,
        internet_signal_quality: 2,
        battery_status: -1,
    }
}

/// Строит валидный лог из `n` точек (Test Vector #1).
fn build_log(
    start_time: &str,
    n: u32,
) -> Vec<u8> {
    let mut writer =
        LogWriter::new(Cursor::new(Vec::new()), deterministic_header(start_time)).unwrap();
    for i in 0..n {
        writer.write_point(&deterministic_point(i)).unwrap();
    }
    writer.finish().unwrap().into_inner()
}

fn write_temp_log(
    start_time: &str,
    n: u32,
) -> NamedTempFile {
    let tmp = NamedTempFile::new().unwrap();
    fs::write(tmp.path(), build_log(start_time, n)).unwrap();
    tmp
}

// ===========================================================================
// Test Vector #1: минимальный валидный файл
// ===========================================================================

#[test]
fn test_vector_1_byte_layout() {
    let bytes = build_log("130615_143000_090", 2);
    let header_len = deterministic_header("130615_143000_090").encoded_len();

    assert_eq!(&bytes[0..4], b"5FRT", "magic");
    // point_count: последние 4 байта заголовка
    assert_eq!(&bytes[header_len - 4..header_len], &[2, 0, 0, 0]);
    assert_eq!(bytes.len(), header_len + 2 * POINT_RECORD_SIZE);
    // Первая точка начинается сразу после заголовка
    assert_eq!(
        &bytes[header_len..header_len + 4],
        &1_896_512i32.to_le_bytes()
    );
}

#[test]
fn test_vector_1_header_round_trip_non_ascii() {
    let raw = build_log("130615_143000_090", 3);
    let reader = LogReader::new(Cursor::new(raw)).unwrap();

    let mut expected = deterministic_header("130615_143000_090");
    expected.point_count = 3;

    assert_eq!(reader.header(), &expected);
    assert_eq!(
        reader.header().programmed_destination_description,
        "Полярный музей — 極地博物館"
    );
}

#[test]
fn test_vector_1_exact_point_count() {
    for n in [0u32, 1, 2, 17, 500] {
        let (header, points) = read_log(Cursor::new(build_log("130615_143000_090", n))).unwrap();

        assert_eq!(header.point_count, n);
        assert_eq!(points.len(), n as usize);
        for (i, p) in points.iter().enumerate() {
            assert_eq!(*p, deterministic_point(i as u32));
        }
    }
}

#[test]
fn test_vector_1_idempotent_decode() {
    let raw = build_log("130615_143000_090", 25);

    let first = read_log(Cursor::new(raw.clone())).unwrap();
    let second = read_log(Cursor::new(raw)).unwrap();

    assert_eq!(first.0, second.0);
    assert_eq!(first.1.len(), second.1.len());
    for (a, b) in first.1.iter().zip(&second.1) {
        // Побитовое сравнение, включая f32
        assert_eq!(a.speed.to_bits(), b.speed.to_bits());
        assert_eq!(a, b);
    }
}

#[test]
fn test_vector_1_points_monotonic() {
    let (_, points) = read_log(Cursor::new(build_log("130615_143000_090", 50))).unwrap();
    assert_eq!(check_monotonic(&points), None);
}

// ===========================================================================
// Test Vector #2: повреждённые файлы
// ===========================================================================

#[test]
fn test_vector_2_truncated_points_region() {
    let full = build_log("130615_143000_090", 4);
    let header_len = deterministic_header("130615_143000_090").encoded_len();

    for cut in header_len..full.len() {
        let result = read_log(Cursor::new(full[..cut].to_vec()));
        assert!(
            matches!(result, Err(LogError::TruncatedInput { .. })),
            "cut at {cut}"
        );
    }
}

#[test]
fn test_vector_2_wrong_version_magic() {
    let mut raw = build_log("130615_143000_090", 1);
    raw[0] = b'4';

    let mut cursor = ByteCursor::new(Cursor::new(raw));
    let err = RawHeader::decode(&mut cursor).unwrap_err();

    assert!(matches!(err, LogError::UnsupportedFormat { magic } if &magic == b"4FRT"));
    assert_eq!(cursor.position(), 4);
}

#[test]
fn test_vector_2_point_count_larger_than_data() {
    let mut raw = build_log("130615_143000_090", 2);
    let header_len = deterministic_header("130615_143000_090").encoded_len();
    raw[header_len - 4..header_len].copy_from_slice(&3u32.to_le_bytes());

    let reader = LogReader::new(Cursor::new(raw)).unwrap();
    let results: Vec<_> = reader.into_points().collect();

    assert_eq!(results.len(), 3);
    assert!(results[0].is_ok());
    assert!(results[1].is_ok());
    assert!(matches!(results[2], Err(LogError::TruncatedInput { .. })));
}

// ===========================================================================
// Test Vector #3: сборка нескольких логов в один трек
// ===========================================================================

#[test]
fn test_vector_3_merge_logs_into_segments() {
    let files = [
        write_temp_log("130615_143000_090", 5),
        write_temp_log("130616_080000_000", 0),
        write_temp_log("130617_120000_030", 12),
    ];

    let mut track = Track::default();
    track.new_track("Lofoten", "three days").unwrap();

    for f in &files {
        let reader = LogReader::open(f.path()).unwrap();
        let stats = append_log(&mut track, reader, 2).unwrap();
        assert_eq!(stats.first_non_monotonic, None);
    }

    let track = track.finalize().unwrap();

    assert_eq!(track.name, "Lofoten");
    assert_eq!(track.description, "three days");
    assert_eq!(track.segments.len(), 3);
    assert_eq!(track.segments[0].points.len(), 5);
    assert_eq!(track.segments[1].points.len(), 0);
    assert_eq!(track.segments[2].points.len(), 12);

    // 14:30 + 90 min − 2h
    assert_eq!(
        track.segments[0].points[0].timestamp,
        Utc.with_ymd_and_hms(2013, 6, 15, 14, 0, 0).unwrap()
    );
    assert_eq!(
        track.segments[0].points[4].timestamp,
        Utc.with_ymd_and_hms(2013, 6, 15, 14, 0, 4).unwrap()
    );
    // 12:00 + 30 min − 2h
    assert_eq!(
        track.segments[2].points[0].timestamp,
        Utc.with_ymd_and_hms(2013, 6, 17, 10, 30, 0).unwrap()
    );
    assert!((track.segments[2].points[0].latitude - 69.65278).abs() < 1e-9);
}

#[test]
fn test_vector_3_bad_start_time_aborts_log() {
    let tmp = write_temp_log("not a time", 3);

    let mut track = Track::default();
    let err = append_log(&mut track, LogReader::open(tmp.path()).unwrap(), 0).unwrap_err();

    assert!(matches!(err, LogError::MalformedTimestamp(_)));
    // Сегмент не начат
    assert!(track.segments.is_empty());
}

#[test]
fn test_vector_3_non_monotonic_reported() {
    let mut writer = LogWriter::new(
        Cursor::new(Vec::new()),
        deterministic_header("130615_143000_000"),
    )
    .unwrap();
    for ms in [0u32, 1_000, 500, 2_000] {
        writer
            .write_point(&RawPoint {
                time_offset_ms: ms,
                ..deterministic_point(0)
            })
            .unwrap();
    }
    let raw = writer.finish().unwrap().into_inner();

    let mut track = Track::default();
    track.new_track("", "").unwrap();
    let stats = append_log(&mut track, LogReader::new(Cursor::new(raw)).unwrap(), 0).unwrap();

    assert_eq!(stats.points, 4);
    assert_eq!(stats.first_non_monotonic, Some(2));
    // Точки не переупорядочиваются
    assert!(track.segments[0].points[2].timestamp < track.segments[0].points[1].timestamp);
}
