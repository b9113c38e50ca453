use serde::Serialize;

use crate::COORD_SCALE;

/// Заголовок travelbook-лога версии 5 (`5FRT`).
///
/// Поля перечислены в порядке их расположения в файле. Значение большинства
/// числовых полей неизвестно, они хранятся как есть, без интерпретации.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct RawHeader {
    /// Назначение неизвестно
    pub favorite: i32,
    /// Назначение неизвестно
    pub log_type: u8,
    /// Назначение неизвестно (на timestamp не похоже)
    pub log_start_time: u32,
    /// Назначение неизвестно (с реальной длительностью не сходится)
    pub log_duration: u32,
    /// Назначение неизвестно (обычно равно `log_duration`)
    pub log_length: u32,
    /// Место старта записи на карте (обычно адрес)
    pub start_point_description: String,
    /// Место окончания записи на карте (обычно адрес)
    pub end_point_description: String,
    /// Локальное время старта в виде `YYMMDD_HHMMSS_OOO`
    pub start_time_string: String,
    /// Запрограммированная точка назначения навигации
    pub programmed_destination_description: String,
    /// Долгота конечной точки, ×10⁻⁵ градуса
    pub end_lon: i32,
    /// Широта конечной точки, ×10⁻⁵ градуса
    pub end_lat: i32,
    /// Количество точек, следующих за заголовком
    pub point_count: u32,
}

impl RawHeader {
    /// Конечная точка записи `(lat, lon)` в градусах.
    pub fn end_position(&self) -> (f64, f64) {
        (
            self.end_lat as f64 * COORD_SCALE,
            self.end_lon as f64 * COORD_SCALE,
        )
    }
}
