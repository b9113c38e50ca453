use std::path::PathBuf;

use thiserror::Error;
use travelbook_core::LogError;

pub type MergeResult<T> = std::result::Result<T, MergeError>;

#[derive(Debug, Error)]
pub enum MergeError {
    /// Ошибка декодирования конкретного входного файла
    #[error("{path:?}: {source}")]
    Decode {
        path: PathBuf,
        #[source]
        source: LogError,
    },

    /// Ошибка формата 5FRT без привязки к файлу
    #[error("Log error: {0}")]
    Log(#[from] LogError),

    /// Ошибка записи выходного файла
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Ошибка сериализации заголовка в JSON
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Ошибка формирования GPX
    #[error("GPX error: {0}")]
    Gpx(String),

    /// Некорректная конфигурация
    #[error("Config error: {0}")]
    Config(String),
}

impl MergeError {
    /// Привязывает ошибку формата к входному файлу.
    pub fn with_path(
        self,
        path: impl Into<PathBuf>,
    ) -> Self {
        match self {
            MergeError::Log(source) => MergeError::Decode {
                path: path.into(),
                source,
            },
            other => other,
        }
    }

    /// `true`, если виноват входной файл (повреждён или не 5FRT).
    pub fn is_data_error(&self) -> bool {
        match self {
            MergeError::Decode { source, .. } | MergeError::Log(source) => {
                source.is_data_error()
            }
            _ => false,
        }
    }
}
