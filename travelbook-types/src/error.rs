use thiserror::Error;

/// Результат для операций декодирования travelbook-логов.
pub type LogResult<T> = std::result::Result<T, LogError>;

/// Типы ошибок формата 5FRT.
#[derive(Debug, Error)]
pub enum LogError {
    /// Магические байты не совпали с `5FRT` (другая версия формата или не лог)
    #[error("Unsupported format: magic \"{}\", expected \"5FRT\"", .magic.escape_ascii())]
    UnsupportedFormat { magic: [u8; 4] },

    /// Источник закончился раньше, чем требует раскладка поля
    #[error("Truncated input at offset {offset}: {needed} more bytes required")]
    TruncatedInput { offset: u64, needed: usize },

    /// Некорректная UTF-16 последовательность в текстовом поле
    #[error("Invalid UTF-16 text at offset {offset}")]
    TextDecodeError { offset: u64 },

    /// Строка времени старта не соответствует `YYMMDD_HHMMSS_OOO`
    #[error("Malformed start time string: {0}")]
    MalformedTimestamp(String),

    /// Точка добавлена в трек до создания первого сегмента (ошибка вызывающего кода)
    #[error("No active segment: new_segment() must be called before add_point()")]
    NoActiveSegment,

    /// Ошибки ввода/вывода (автоконвертируются из std::io::Error)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl LogError {
    /// Удобные конструкторы
    pub fn truncated(
        offset: u64,
        needed: usize,
    ) -> Self {
        Self::TruncatedInput { offset, needed }
    }

    pub fn malformed_timestamp<S: Into<String>>(s: S) -> Self {
        Self::MalformedTimestamp(s.into())
    }

    /// `true` для ошибок, вызванных содержимым файла (а не I/O или вызывающим кодом).
    pub fn is_data_error(&self) -> bool {
        matches!(
            self,
            Self::UnsupportedFormat { .. }
                | Self::TruncatedInput { .. }
                | Self::TextDecodeError { .. }
                | Self::MalformedTimestamp(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unsupported_format_message_shows_magic() {
        let err = LogError::UnsupportedFormat { magic: *b"4FRT" };

        assert!(err.to_string().contains("\"4FRT\""));
    }

    #[test]
    fn test_data_error_classification() {
        assert!(LogError::truncated(10, 4).is_data_error());
        assert!(LogError::malformed_timestamp("x").is_data_error());
        assert!(!LogError::NoActiveSegment.is_data_error());
        assert!(!LogError::from(std::io::Error::other("disk")).is_data_error());
    }
}
