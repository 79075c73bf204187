use std::path::PathBuf;

use thiserror::Error;

/// Result alias used throughout the pipeline stages.
pub type Result<T> = std::result::Result<T, PipelineError>;

/// Every way a pipeline run can fail.  The message names the stage.
#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("load: cannot open {}: {error}", .path.display())]
    Io { path: PathBuf, error: std::io::Error },

    #[error("load: {0}")]
    Format(FormatError),

    #[error("features: {0}")]
    Parse(ParseError),

    #[error("fit: {0}")]
    Dimension(DimensionError),

    #[error("fit: {0}")]
    Degenerate(NumericalDegeneracy),

    #[error("config: {0}")]
    Config(ConfigError),
}

// Stage errors are wrapped, not exposed as `source()`, so each message
// appears once in an `{:#}` chain.
macro_rules! impl_from_stage {
    ($($variant:ident($ty:ty)),* $(,)?) => {
        $(
            impl From<$ty> for PipelineError {
                fn from(e: $ty) -> Self {
                    PipelineError::$variant(e)
                }
            }
        )*
    };
}

impl_from_stage!(
    Format(FormatError),
    Parse(ParseError),
    Dimension(DimensionError),
    Degenerate(NumericalDegeneracy),
    Config(ConfigError),
);

// ---------------------------------------------------------------------------
// Loader
// ---------------------------------------------------------------------------

#[derive(Error, Debug)]
pub enum FormatError {
    #[error("missing header row")]
    MissingHeader,

    #[error("duplicate header column '{0}'")]
    DuplicateHeader(String),

    /// `row` is the 0-based data row, `line` the 1-based line in the file.
    #[error("row {row} (line {line}): expected {expected} fields, found {found}")]
    RowWidth {
        row: usize,
        line: u64,
        expected: usize,
        found: usize,
    },

    #[error("malformed CSV near row {row}: {error}")]
    Csv { row: usize, error: csv::Error },
}

// ---------------------------------------------------------------------------
// Feature builder
// ---------------------------------------------------------------------------

#[derive(Error, Debug)]
#[error("column '{column}', row {row}: cannot parse '{value}' as {expected}")]
pub struct ParseError {
    pub column: String,
    pub row: usize,
    pub value: String,
    pub expected: &'static str,
}

// ---------------------------------------------------------------------------
// Fitter
// ---------------------------------------------------------------------------

#[derive(Error, Debug, PartialEq)]
pub enum DimensionError {
    #[error("no feature columns selected")]
    NoFeatures,

    #[error("table has no rows")]
    NoRows,

    #[error("design matrix has {columns} columns but {names} feature names")]
    FeatureCount { columns: usize, names: usize },

    #[error("design matrix has {rows} rows but response has {response} entries")]
    RowMismatch { rows: usize, response: usize },

    #[error("column '{column}' has {found} entries, table has {expected} rows")]
    ColumnLength {
        column: String,
        expected: usize,
        found: usize,
    },
}

#[derive(Error, Debug, PartialEq)]
pub enum NumericalDegeneracy {
    #[error("singular value decomposition did not converge")]
    SvdFailed,

    #[error("X^T X is singular; the normal equations have no unique solution")]
    SingularGram,
}

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

#[derive(Error, Debug, PartialEq)]
pub enum ConfigError {
    #[error("column '{0}' not found")]
    MissingColumn(String),

    #[error("column '{0}' already exists")]
    ColumnExists(String),

    #[error("column '{column}' holds {kind} values and cannot enter the design matrix")]
    NonNumeric { column: String, kind: &'static str },

    #[error("column '{column}' holds {kind} values, expected {expected}")]
    WrongKind {
        column: String,
        kind: &'static str,
        expected: &'static str,
    },

    #[error("categorical label list for '{0}' is empty")]
    EmptyLabels(String),

    #[error("label '{0}' appears more than once")]
    DuplicateLabel(String),
}
