use std::io;

/// Why a row of the path table could not be read.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum RowError {
    #[error("expected 4 columns (ray_id, x, y, angle), found {0}")]
    ColumnCount(usize),
    #[error("invalid {column} value `{value}`")]
    InvalidValue { column: &'static str, value: String },
}

/// Top-level error type for loading plot inputs.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Io(#[from] io::Error),

    #[error("path data, line {line}: {source}")]
    DataLoad {
        line: usize,
        #[source]
        source: RowError,
    },
}

pub type Result<T> = core::result::Result<T, Error>;
