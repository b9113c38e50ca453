use std::{
    io::BufWriter,
    path::{Path, PathBuf},
    time::Instant,
};

use log::{debug, info, warn};
use travelbook_core::{append_log, LogReader, TrackSink};

use crate::{gpx_sink::GpxSink, MergeConfig, MergeError, MergeResult};

/// Итог обработки одного входного лога.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileSummary {
    pub path: PathBuf,
    pub points: u32,
    pub first_non_monotonic: Option<usize>,
}

/// Итог всего объединения.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MergeSummary {
    pub files: Vec<FileSummary>,
    pub total_points: u64,
    pub duration_secs: f64,
}

/// Объединяет входные логи в один GPX-трек.
pub struct MergePipeline {
    config: MergeConfig,
}

impl MergePipeline {
    /// Создаёт пайплайн, предварительно проверив конфигурацию.
    pub fn new(config: MergeConfig) -> MergeResult<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &MergeConfig {
        &self.config
    }

    /// Пишет GPX в [`MergeConfig::output`]. Блокируется до завершения.
    pub fn run(&self) -> MergeResult<MergeSummary> {
        let out = self.config.output.open()?;
        let sink = GpxSink::new(BufWriter::new(out));

        let (_, summary) = self.run_with(sink)?;
        Ok(summary)
    }

    /// Прогоняет все входные логи через произвольный приёмник.
    ///
    /// Первая ошибка прерывает весь пакет; финализация не выполняется.
    pub fn run_with<S>(
        &self,
        mut sink: S,
    ) -> MergeResult<(S::Output, MergeSummary)>
    where
        S: TrackSink<Error = MergeError>,
    {
        let cfg = &self.config;
        let started = Instant::now();

        sink.new_track(&cfg.track_name, &cfg.track_description)?;

        let mut summary = MergeSummary::default();
        for path in &cfg.inputs {
            let file = self.append_file(&mut sink, path)?;
            summary.total_points += u64::from(file.points);
            summary.files.push(file);
        }

        let output = sink.finalize()?;
        summary.duration_secs = started.elapsed().as_secs_f64();

        info!(
            "Merged {} log(s), {} point(s)",
            summary.files.len(),
            summary.total_points
        );

        Ok((output, summary))
    }

    fn append_file<S>(
        &self,
        sink: &mut S,
        path: &Path,
    ) -> MergeResult<FileSummary>
    where
        S: TrackSink<Error = MergeError>,
    {
        debug!("Reading {path:?}");

        let reader = LogReader::open(path).map_err(|e| MergeError::from(e).with_path(path))?;

        if self.config.dump_header {
            eprintln!("{}", serde_json::to_string_pretty(reader.header())?);
        }

        let stats = append_log(sink, reader, self.config.tz_offset_hours)
            .map_err(|e| e.with_path(path))?;

        if let Some(idx) = stats.first_non_monotonic {
            warn!("{path:?}: time offsets go backwards at point {idx}");
        }

        Ok(FileSummary {
            path: path.to_path_buf(),
            points: stats.points,
            first_non_monotonic: stats.first_non_monotonic,
        })
    }
}

impl std::fmt::Display for MergeSummary {
    fn fmt(
        &self,
        f: &mut std::fmt::Formatter<'_>,
    ) -> std::fmt::Result {
        writeln!(f, "━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━")?;
        for file in &self.files {
            write!(f, "  {:<28}: {} points", file.path.display(), file.points)?;
            if let Some(idx) = file.first_non_monotonic {
                write!(f, " (non-monotonic at {idx})")?;
            }
            writeln!(f)?;
        }
        writeln!(f, "  Segments      : {}", self.files.len())?;
        writeln!(f, "  Points        : {}", self.total_points)?;
        writeln!(f, "  Duration      : {:.3}s", self.duration_secs)?;
        write!(f, "━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━")
    }
}
