use std::{
    fs::File,
    io::{self, Write},
    path::PathBuf,
};

use crate::{MergeError, MergeResult};

/// Максимальное по модулю смещение часового пояса (UTC−12 … UTC+14).
pub const MAX_TZ_OFFSET_HOURS: i32 = 14;

/// Куда писать GPX.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum OutputTarget {
    /// Стандартный вывод (по умолчанию).
    #[default]
    Stdout,
    /// Файл по пути.
    File(PathBuf),
}

/// Полная конфигурация объединения логов.
#[derive(Debug, Clone)]
pub struct MergeConfig {
    /// Входные логи; порядок определяет порядок сегментов
    pub inputs: Vec<PathBuf>,
    /// Куда писать GPX
    pub output: OutputTarget,
    /// Имя трека (может быть пустым)
    pub track_name: String,
    /// Описание трека (может быть пустым)
    pub track_description: String,
    /// Смещение локального времени устройства относительно UTC, часы
    pub tz_offset_hours: i32,
    /// Печатать заголовки логов в JSON (stderr)
    pub dump_header: bool,
}

////////////////////////////////////////////////////////////////////////////////
// Собственные методы
////////////////////////////////////////////////////////////////////////////////

impl OutputTarget {
    /// Открывает поток для записи. Файл создаётся (или обрезается).
    pub fn open(&self) -> io::Result<Box<dyn Write>> {
        Ok(match self {
            OutputTarget::Stdout => Box::new(io::stdout().lock()),
            OutputTarget::File(path) => Box::new(File::create(path)?),
        })
    }
}

impl MergeConfig {
    /// Проверяет конфигурацию до начала работы.
    pub fn validate(&self) -> MergeResult<()> {
        if self.inputs.is_empty() {
            return Err(MergeError::Config(
                "at least one input log is required".to_string(),
            ));
        }

        if !tz_offset_in_range(self.tz_offset_hours) {
            return Err(MergeError::Config(format!(
                "time zone offset {}h is out of range ±{MAX_TZ_OFFSET_HOURS}h",
                self.tz_offset_hours
            )));
        }

        Ok(())
    }
}

////////////////////////////////////////////////////////////////////////////////
// Общие реализации трейтов для OutputTarget, MergeConfig
////////////////////////////////////////////////////////////////////////////////

impl std::fmt::Display for OutputTarget {
    fn fmt(
        &self,
        f: &mut std::fmt::Formatter<'_>,
    ) -> std::fmt::Result {
        match self {
            OutputTarget::Stdout => write!(f, "<stdout>"),
            OutputTarget::File(path) => write!(f, "{}", path.display()),
        }
    }
}

impl std::str::FromStr for OutputTarget {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "" | "-" => Ok(OutputTarget::Stdout),
            path => Ok(OutputTarget::File(PathBuf::from(path))),
        }
    }
}

impl Default for MergeConfig {
    fn default() -> Self {
        Self {
            inputs: Vec::new(),
            output: OutputTarget::Stdout,
            track_name: String::new(),
            track_description: String::new(),
            tz_offset_hours: 0,
            dump_header: false,
        }
    }
}

/// Парсит смещение часового пояса в часах.
///
/// Поддерживает необязательный префикс `UTC`/`GMT` (регистронезависимо).
///
/// # Примеры
/// ```
/// use travelbook_merge::config::parse_tz_offset;
/// assert_eq!(parse_tz_offset("2").unwrap(), 2);
/// assert_eq!(parse_tz_offset("-5").unwrap(), -5);
/// assert_eq!(parse_tz_offset("UTC+1").unwrap(), 1);
/// ```
pub fn parse_tz_offset(s: &str) -> Result<i32, String> {
    let s = s.trim();
    let lower = s.to_lowercase();

    let num_str = lower
        .strip_prefix("utc")
        .or_else(|| lower.strip_prefix("gmt"))
        .unwrap_or(lower.as_str())
        .trim();

    if num_str.is_empty() {
        return Ok(0);
    }

    let hours: i32 = num_str
        .parse()
        .map_err(|e| format!("Invalid time zone offset '{s}': {e}"))?;

    if !tz_offset_in_range(hours) {
        return Err(format!(
            "Time zone offset '{s}' is out of range ±{MAX_TZ_OFFSET_HOURS}h"
        ));
    }

    Ok(hours)
}

fn tz_offset_in_range(hours: i32) -> bool {
    (-MAX_TZ_OFFSET_HOURS..=MAX_TZ_OFFSET_HOURS).contains(&hours)
}

////////////////////////////////////////////////////////////////////////////////
// Тесты
////////////////////////////////////////////////////////////////////////////////
