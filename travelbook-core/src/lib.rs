//! Библиотека формата travelbook-логов версии 5 (`5FRT`)
//!
//! Декодирование бинарных GPS-логов в точки трека, приведение единиц и
//! времени, сборка нескольких логов в сегменты одного трека.
//!
//! # Быстрый старт
//!
//! ```no_run
//! use travelbook_core::{append_log, LogReader, Track, TrackSink};
//!
//! let mut track = Track::default();
//! track.new_track("Trip", "")?;
//!
//! for path in ["day1.log", "day2.log"] {
//!     let reader = LogReader::open(path)?;
//!     append_log(&mut track, reader, 2)?;
//! }
//!
//! let track = track.finalize()?;
//! println!("{} segments, {} points", track.segments.len(), track.point_count());
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod binary;
pub mod format;
pub mod normalize;
pub mod serialization;
pub mod track;

pub use binary::*;
pub use format::*;
pub use normalize::*;
pub use serialization::*;
pub use track::*;
pub use travelbook_types::*;
