use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum LdpcError {
    #[error("invalid code dimensions: {0}")]
    Dimensions(String),
    #[error("{table} table has {actual} entries, expected {expected}")]
    TableSize {
        table: &'static str,
        expected: usize,
        actual: usize,
    },
    #[error("check {check} references variable {variable}, only {limit} columns are stored")]
    VariableOutOfRange {
        check: usize,
        variable: usize,
        limit: usize,
    },
    #[error("column {variable} references check {check}, code has {limit} checks")]
    CheckOutOfRange {
        variable: usize,
        check: usize,
        limit: usize,
    },
    #[error("check {check} has weight {weight}, maximum row weight is {max}")]
    RowWeight { check: usize, weight: usize, max: usize },
    #[error("column {variable} has weight {weight}, maximum column weight is {max}")]
    ColumnWeight {
        variable: usize,
        weight: usize,
        max: usize,
    },
    #[error("duplicate edge between check {check} and variable {variable}")]
    DuplicateEdge { check: usize, variable: usize },
    #[error("check {check} has {degree} edge(s), at least two are required")]
    DegenerateCheck { check: usize, degree: usize },
    #[error("check {check} lists variable {variable} but the column table does not list it back")]
    Inconsistent { check: usize, variable: usize },
    #[error("soft input has {actual} values, code length is {expected}")]
    InputLength { expected: usize, actual: usize },
    #[error("soft input {index} is not a finite LLR ({value})")]
    NonFiniteInput { index: usize, value: f64 },
    #[error("decoder type {0:?} is not supported")]
    UnsupportedStrategy(String),
    #[error("{name} must be finite and positive, got {value}")]
    InvalidScaleFactor { name: &'static str, value: f32 },
    #[error("iteration budget must be at least one")]
    ZeroIterations,
    #[error("no test vectors configured for this code")]
    MissingTestVectors,
    #[error("{}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("configuration error: {0}")]
    Config(#[from] toml::de::Error),
}

impl LdpcError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        LdpcError::Io {
            path: path.into(),
            source,
        }
    }
}
