use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum DataLoadError {
    #[error("file not found: {}", path.display())]
    Missing { path: PathBuf },

    #[error("read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("parse {}: {source}", path.display())]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("open workbook {}: {source}", path.display())]
    Workbook {
        path: PathBuf,
        #[source]
        source: calamine::Error,
    },

    #[error("{}: workbook has no worksheets", path.display())]
    NoWorksheet { path: PathBuf },

    #[error("{}: missing required column {column:?}", path.display())]
    MissingColumn { path: PathBuf, column: String },

    #[error("{}: no header row", path.display())]
    EmptyHeader { path: PathBuf },
}

impl DataLoadError {
    pub fn path(&self) -> &std::path::Path {
        match self {
            DataLoadError::Missing { path }
            | DataLoadError::Io { path, .. }
            | DataLoadError::Csv { path, .. }
            | DataLoadError::Workbook { path, .. }
            | DataLoadError::NoWorksheet { path }
            | DataLoadError::MissingColumn { path, .. }
            | DataLoadError::EmptyHeader { path } => path,
        }
    }

    pub fn is_missing(&self) -> bool {
        matches!(self, DataLoadError::Missing { .. })
    }
}

pub type Result<T> = std::result::Result<T, DataLoadError>;
