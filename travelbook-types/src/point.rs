use chrono::{DateTime, Utc};
use serde::Serialize;

/// Точка трека в том виде, в каком она лежит в файле (21 байт).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct RawPoint {
    /// Долгота, ×10⁻⁵ градуса
    pub lon: i32,
    /// Широта, ×10⁻⁵ градуса
    pub lat: i32,
    /// Высота в метрах (систематическая ошибка не скорректирована)
    pub alt: i32,
    /// Миллисекунды от первой точки лога (0 для первой точки)
    pub time_offset_ms: u32,
    /// Скорость, км/ч
    pub speed: f32,
    /// Непрозрачные поля хранятся без интерпретации
    pub signal_quality: i8,
    pub speeding: i8,
    pub gsm_signal_quality: i8,
    pub internet_signal_quality: i8,
    pub battery_status: i8,
}

/// Точка после приведения к градусам, метрам, м/с и UTC.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct NormalizedPoint {
    /// Широта, градусы
    pub latitude: f64,
    /// Долгота, градусы
    pub longitude: f64,
    /// Высота, метры
    pub elevation: f64,
    /// Абсолютное время точки (UTC)
    pub timestamp: DateTime<Utc>,
    /// Скорость, м/с
    pub speed: f64,
}
