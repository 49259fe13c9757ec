use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// 存储层错误. 由 [`crate::VisitCounter`] 在边界处吞掉并转换为回退结果.
#[derive(Debug, Error)]
pub enum Error {
    /// The backing store could not be read or written.
    #[error("counter store {path:?} unavailable: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// A configuration value could not be understood.
    #[error("invalid value {value:?} for {key}")]
    InvalidOption { key: &'static str, value: String },
}

impl Error {
    pub(crate) fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Error::Io {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
