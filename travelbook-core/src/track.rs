//! Сборка одного трека из нескольких логов: каждый лог становится сегментом.

use std::io::Read;

use log::debug;
use travelbook_types::{LogError, LogResult, NormalizedPoint};

use crate::{
    normalize::{MonotonicityCheck, Normalizer},
    serialization::LogReader,
};

/// Приёмник точек трека (например, GPX-писатель).
///
/// Порядок вызовов: `new_track`, затем для каждого лога `new_segment` и
/// серия `add_point`, в конце `finalize`.
pub trait TrackSink {
    /// Результат финализации (записанный поток, собранный трек и т.п.).
    type Output;
    type Error: From<LogError>;

    fn new_track(
        &mut self,
        name: &str,
        description: &str,
    ) -> Result<(), Self::Error>;

    fn new_segment(&mut self) -> Result<(), Self::Error>;

    /// Добавляет точку в текущий сегмент. До первого `new_segment` возвращает
    /// [`LogError::NoActiveSegment`].
    fn add_point(
        &mut self,
        point: NormalizedPoint,
    ) -> Result<(), Self::Error>;

    fn finalize(self) -> Result<Self::Output, Self::Error>
    where
        Self: Sized;
}

/// Непрерывная последовательность точек из одного лога.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Segment {
    pub points: Vec<NormalizedPoint>,
}

/// Трек в памяти: имя, описание и сегменты в порядке входных файлов.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Track {
    pub name: String,
    pub description: String,
    pub segments: Vec<Segment>,
}

impl Track {
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            segments: Vec::new(),
        }
    }

    /// Начинает новый сегмент; последующие точки попадают в него.
    pub fn begin_segment(&mut self) {
        self.segments.push(Segment::default());
    }

    /// Добавляет точку в последний сегмент.
    pub fn push_point(
        &mut self,
        point: NormalizedPoint,
    ) -> LogResult<()> {
        self.segments
            .last_mut()
            .ok_or(LogError::NoActiveSegment)?
            .points
            .push(point);

        Ok(())
    }

    /// Общее число точек во всех сегментах.
    pub fn point_count(&self) -> usize {
        self.segments.iter().map(|s| s.points.len()).sum()
    }
}

impl TrackSink for Track {
    type Output = Track;
    type Error = LogError;

    fn new_track(
        &mut self,
        name: &str,
        description: &str,
    ) -> LogResult<()> {
        *self = Track::new(name, description);
        Ok(())
    }

    fn new_segment(&mut self) -> LogResult<()> {
        self.begin_segment();
        Ok(())
    }

    fn add_point(
        &mut self,
        point: NormalizedPoint,
    ) -> LogResult<()> {
        self.push_point(point)
    }

    fn finalize(self) -> LogResult<Track> {
        Ok(self)
    }
}

/// Итог добавления одного лога в трек.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SegmentStats {
    /// Точек добавлено в сегмент
    pub points: u32,
    /// Индекс первой точки с убывающим временем (если есть)
    pub first_non_monotonic: Option<usize>,
}

/// Добавляет лог в трек отдельным сегментом.
///
/// Читатель потребляется: источник закрывается по завершении, в том числе
/// при ошибке. Первая ошибка декодирования прерывает обработку лога.
pub fn append_log<R: Read, S: TrackSink>(
    sink: &mut S,
    reader: LogReader<R>,
    tz_correction_hours: i32,
) -> Result<SegmentStats, S::Error> {
    let normalizer = Normalizer::new(reader.header(), tz_correction_hours)?;
    let (header, points) = reader.into_parts();

    debug!(
        "Segment start {} ({} points, from {:?} to {:?})",
        normalizer.start(),
        header.point_count,
        header.start_point_description,
        header.end_point_description
    );

    sink.new_segment()?;

    let mut check = MonotonicityCheck::new();
    let mut count = 0u32;

    for raw in points {
        let raw = raw?;
        check.observe(&raw);
        sink.add_point(normalizer.normalize(&raw))?;
        count += 1;
    }

    if let Some(idx) = check.first_violation() {
        debug!(
            "time offsets decrease {} time(s), first at point #{idx}",
            check.violations()
        );
    }

    Ok(SegmentStats {
        points: count,
        first_non_monotonic: check.first_violation(),
    })
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};

    use super::*;

    fn point(lat: f64) -> NormalizedPoint {
        NormalizedPoint {
            latitude: lat,
            longitude: 0.0,
            elevation: 0.0,
            timestamp: Utc.with_ymd_and_hms(2013, 6, 15, 14, 0, 0).unwrap(),
            speed: 0.0,
        }
    }

    #[test]
    fn test_add_point_without_segment_fails() {
        let mut track = Track::default();
        track.new_track("name", "desc").unwrap();

        let err = track.add_point(point(1.0)).unwrap_err();
        assert!(matches!(err, LogError::NoActiveSegment));
    }

    #[test]
    fn test_points_go_to_latest_segment() {
        let mut track = Track::default();
        track.new_track("Trip", "").unwrap();

        track.new_segment().unwrap();
        track.add_point(point(1.0)).unwrap();
        track.add_point(point(2.0)).unwrap();
        track.new_segment().unwrap();
        track.add_point(point(3.0)).unwrap();

        let track = track.finalize().unwrap();

        assert_eq!(track.name, "Trip");
        assert_eq!(track.segments.len(), 2);
        assert_eq!(track.segments[0].points.len(), 2);
        assert_eq!(track.segments[1].points[0].latitude, 3.0);
        assert_eq!(track.point_count(), 3);
    }

    #[test]
    fn test_empty_segment_is_kept() {
        let mut track = Track::new("", "");
        track.begin_segment();
        track.begin_segment();

        assert_eq!(track.segments.len(), 2);
        assert_eq!(track.point_count(), 0);
    }
}
