//! Errors shared by every landex crate

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A grid with no rows or columns, or data that does not fill its shape
    #[error("Bad grid shape: {width} columns x {height} rows")]
    InvalidDimensions { width: usize, height: usize },

    #[error("Cell ({row}, {col}) is outside a {rows} x {cols} grid")]
    IndexOutOfBounds {
        row: usize,
        col: usize,
        rows: usize,
        cols: usize,
    },

    #[error("Grid shapes differ: expected {er} x {ec}, got {ar} x {ac}")]
    SizeMismatch { er: usize, ec: usize, ar: usize, ac: usize },

    #[error("Unsupported data type: {0}")]
    UnsupportedDataType(String),

    #[error("Unsupported CRS: {0}")]
    UnsupportedCrs(String),

    #[error("Cannot load spatial reference cache {}: {reason}", path.display())]
    SrsCache { path: PathBuf, reason: String },

    #[error("Output already exists: {} (pass overwrite to replace it)", .0.display())]
    OutputExists(PathBuf),

    #[error("Vector data error: {0}")]
    Vector(String),

    #[error("Invalid {name} {value}: {reason}")]
    InvalidParameter {
        name: &'static str,
        value: String,
        reason: String,
    },

    #[error("Workflow configuration error: {0}")]
    Config(String),

    /// An operation ran but its result is unusable, such as an empty region
    #[error("Exclusion error: {0}")]
    Algorithm(String),

    #[error("{0}")]
    Other(String),
}

impl From<geojson::Error> for Error {
    fn from(e: geojson::Error) -> Self {
        Error::Vector(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
