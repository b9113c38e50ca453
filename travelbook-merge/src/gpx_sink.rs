//! Запись трека в GPX 1.1 через крейт `gpx`.
//!
//! Скорость точек в файл не попадает: в GPX 1.1 у `<trkpt>` нет элемента
//! `speed`, а писатель `gpx` 0.10 не умеет выводить его ни для какой версии.

use std::io::Write;

use geo_types::Point;
use gpx::{Gpx, GpxVersion, TrackSegment, Waypoint};
use log::debug;
use time::OffsetDateTime;
use travelbook_core::{NormalizedPoint, Track, TrackSink};

use crate::{MergeError, MergeResult};

/// Значение атрибута `creator` в выходном GPX.
pub const GPX_CREATOR: &str = concat!("travelbook-merge ", env!("CARGO_PKG_VERSION"));

/// GPX 1.1 писатель: собирает трек в памяти и пишет его целиком в
/// [`TrackSink::finalize`].
pub struct GpxSink<W: Write> {
    writer: W,
    track: Track,
}

impl<W: Write> GpxSink<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            track: Track::default(),
        }
    }
}

impl<W: Write> TrackSink for GpxSink<W> {
    type Output = W;
    type Error = MergeError;

    fn new_track(
        &mut self,
        name: &str,
        description: &str,
    ) -> MergeResult<()> {
        Ok(self.track.new_track(name, description)?)
    }

    fn new_segment(&mut self) -> MergeResult<()> {
        Ok(self.track.new_segment()?)
    }

    fn add_point(
        &mut self,
        point: NormalizedPoint,
    ) -> MergeResult<()> {
        Ok(self.track.add_point(point)?)
    }

    fn finalize(mut self) -> MergeResult<W> {
        let gpx = to_gpx(&self.track)?;

        debug!(
            "Writing GPX: {} segment(s), {} point(s)",
            self.track.segments.len(),
            self.track.point_count()
        );

        gpx::write(&gpx, &mut self.writer).map_err(|e| MergeError::Gpx(e.to_string()))?;
        self.writer.flush()?;

        Ok(self.writer)
    }
}

/// Переводит трек в документ GPX 1.1 с одним `<trk>`.
///
/// Пустые имя и описание не записываются.
pub fn to_gpx(track: &Track) -> MergeResult<Gpx> {
    let mut trk = gpx::Track::new();
    trk.name = non_empty(&track.name);
    trk.description = non_empty(&track.description);

    for segment in &track.segments {
        let mut seg = TrackSegment::new();
        for p in &segment.points {
            seg.points.push(to_waypoint(p)?);
        }
        trk.segments.push(seg);
    }

    Ok(Gpx {
        version: GpxVersion::Gpx11,
        creator: Some(GPX_CREATOR.to_string()),
        tracks: vec![trk],
        ..Default::default()
    })
}

fn to_waypoint(p: &NormalizedPoint) -> MergeResult<Waypoint> {
    // Точность формата: миллисекунды
    let nanos = i128::from(p.timestamp.timestamp_millis()) * 1_000_000;
    let time = OffsetDateTime::from_unix_timestamp_nanos(nanos)
        .map_err(|e| MergeError::Gpx(format!("timestamp {}: {e}", p.timestamp)))?;

    let mut wp = Waypoint::new(Point::new(p.longitude, p.latitude));
    wp.elevation = Some(p.elevation);
    wp.time = Some(time.into());

    Ok(wp)
}

fn non_empty(s: &str) -> Option<String> {
    if s.is_empty() {
        None
    } else {
        Some(s.to_string())
    }
}
