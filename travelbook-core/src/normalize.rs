//! Приведение сырых точек к градусам, метрам, м/с и абсолютному времени.
//!
//! Время старта лога хранится строкой `YYMMDD_HHMMSS_OOO` в локальном
//! часовом поясе устройства, где `OOO` это дополнительное смещение в минутах.
//! Сам часовой пояс в файле не записан, его передаёт вызывающий код:
//!
//! ```text
//! utc_start = local_start + OOO минут − tz_correction часов
//! ```

use chrono::{DateTime, NaiveDateTime, TimeDelta, Utc};
use travelbook_types::{
    LogError, LogResult, NormalizedPoint, RawHeader, RawPoint, COORD_SCALE, KMH_TO_MPS,
};

/// Длина части `YYMMDD_HHMMSS`.
const LOCAL_TIME_LEN: usize = 13;

/// Длина суффикса со смещением в минутах.
const OFFSET_LEN: usize = 3;

/// Вычисляет абсолютное (UTC) время старта лога.
///
/// `tz_correction_hours`: смещение локального времени устройства
/// относительно UTC (CET → 1, CEST → 2, EST → −5).
pub fn parse_start_time(
    start_time_string: &str,
    tz_correction_hours: i32,
) -> LogResult<DateTime<Utc>> {
    let malformed = |why: &str| {
        LogError::malformed_timestamp(format!("{start_time_string:?}: {why}"))
    };

    let local = start_time_string
        .get(..LOCAL_TIME_LEN)
        .ok_or_else(|| malformed("too short"))?;
    let rest = &start_time_string[LOCAL_TIME_LEN..];

    let shape_ok = local.bytes().enumerate().all(|(i, b)| match i {
        6 => b == b'_',
        _ => b.is_ascii_digit(),
    });
    if !shape_ok {
        return Err(malformed("expected YYMMDD_HHMMSS"));
    }

    let offset_text = rest
        .strip_prefix('_')
        .filter(|s| s.len() == OFFSET_LEN)
        .ok_or_else(|| malformed("expected _OOO minute offset suffix"))?;
    let offset_minutes: i64 = offset_text
        .parse()
        .map_err(|_| malformed("minute offset is not an integer"))?;

    let local_start = NaiveDateTime::parse_from_str(local, "%y%m%d_%H%M%S")
        .map_err(|e| malformed(&e.to_string()))?;

    local_start
        .checked_add_signed(TimeDelta::minutes(offset_minutes))
        .and_then(|t| t.checked_sub_signed(TimeDelta::hours(tz_correction_hours as i64)))
        .map(|t| t.and_utc())
        .ok_or_else(|| malformed("time out of range"))
}

/// Переводит одну точку в нормализованные единицы.
pub fn normalize_point(
    raw: &RawPoint,
    start: DateTime<Utc>,
) -> NormalizedPoint {
    NormalizedPoint {
        latitude: raw.lat as f64 * COORD_SCALE,
        longitude: raw.lon as f64 * COORD_SCALE,
        elevation: raw.alt as f64,
        timestamp: start + TimeDelta::milliseconds(raw.time_offset_ms as i64),
        speed: raw.speed as f64 * KMH_TO_MPS,
    }
}

/// Нормализатор точек одного лога.
#[derive(Debug, Clone, Copy)]
pub struct Normalizer {
    start: DateTime<Utc>,
}

impl Normalizer {
    /// Создаёт нормализатор по заголовку лога.
    pub fn new(
        header: &RawHeader,
        tz_correction_hours: i32,
    ) -> LogResult<Self> {
        Ok(Self {
            start: parse_start_time(&header.start_time_string, tz_correction_hours)?,
        })
    }

    /// UTC-время старта лога.
    pub fn start(&self) -> DateTime<Utc> {
        self.start
    }

    pub fn normalize(
        &self,
        raw: &RawPoint,
    ) -> NormalizedPoint {
        normalize_point(raw, self.start)
    }
}

/// Потоковая проверка того, что `time_offset_ms` не убывает.
///
/// Формат это не гарантирует, поэтому нарушение только фиксируется.
#[derive(Debug, Default, Clone)]
pub struct MonotonicityCheck {
    last: Option<u32>,
    seen: usize,
    first_violation: Option<usize>,
    violations: usize,
}

impl MonotonicityCheck {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn observe(
        &mut self,
        point: &RawPoint,
    ) {
        if let Some(last) = self.last {
            if point.time_offset_ms < last {
                self.violations += 1;
                self.first_violation.get_or_insert(self.seen);
            }
        }

        self.last = Some(point.time_offset_ms);
        self.seen += 1;
    }

    /// Индекс первой точки, время которой меньше времени предыдущей.
    pub fn first_violation(&self) -> Option<usize> {
        self.first_violation
    }

    /// Количество точек, нарушивших порядок.
    pub fn violations(&self) -> usize {
        self.violations
    }
}

/// Индекс первой точки с убывающим `time_offset_ms`, если такая есть.
pub fn check_monotonic(points: &[RawPoint]) -> Option<usize> {
    let mut check = MonotonicityCheck::new();
    for p in points {
        check.observe(p);
    }
    check.first_violation()
}
