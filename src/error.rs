//! Failure modes for ingestion and engine lookups.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("could not open '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("CSV error in '{path}': {source}")]
    Csv {
        path: String,
        #[source]
        source: csv::Error,
    },

    #[error("workbook error in '{path}': {source}")]
    Workbook {
        path: String,
        #[source]
        source: calamine::Error,
    },

    #[error("unsupported file format '{0}' (expected .csv, .xlsx, .xls or .ods)")]
    UnsupportedFormat(String),

    #[error("missing required column '{0}'")]
    MissingColumn(String),

    #[error("workbook '{0}' has no worksheets")]
    EmptyWorkbook(String),
}

/// A computation referenced an outlet column the loaded data does not have.
/// Non-fatal: the affected section is skipped, everything else still renders.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("column '{column}' not present in the loaded data")]
pub struct MissingColumnError {
    pub column: String,
}
