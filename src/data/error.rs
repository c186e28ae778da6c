use thiserror::Error;

// ---------------------------------------------------------------------------
// Load failures – the upload produced no dataset
// ---------------------------------------------------------------------------

/// Reasons an experiment file could not be turned into a [`Dataset`].
///
/// [`Dataset`]: super::model::Dataset
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("file has {found} lines but {expected} metadata lines must be skipped")]
    TruncatedHeader { expected: usize, found: usize },

    #[error("no column header row after the metadata block")]
    MissingHeader,

    #[error("delimiter '{0}' is not a single-byte character")]
    InvalidDelimiter(char),

    #[error("file contains a header but no data rows")]
    NoRows,

    #[error("line {line}: expected {expected} fields, found {found}")]
    RowWidth {
        line: usize,
        expected: usize,
        found: usize,
    },

    #[error("line {line}, column '{column}': '{value}' is not a number")]
    UnparsableNumber {
        line: usize,
        column: String,
        value: String,
    },

    #[error("line {line}, column '{column}': numeric column has an empty field")]
    MissingValue { line: usize, column: String },

    #[error("malformed delimited text: {0}")]
    Csv(#[from] csv::Error),
}

// ---------------------------------------------------------------------------
// Analysis failures – surfaced to the presentation layer
// ---------------------------------------------------------------------------

/// Failures raised while deriving results from a loaded dataset.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DataError {
    #[error("no data in the selected range")]
    EmptySelection,

    #[error("column '{0}' is not present in the dataset")]
    MissingColumn(String),

    #[error("column '{0}' does not hold numeric values")]
    NonNumericColumn(String),

    #[error("'{0}' is not a known differential pressure sensor")]
    InvalidSensor(String),

    #[error("at least two columns are needed to correlate variables")]
    NotEnoughColumns,

    #[error("regression needs at least {needed} points, got {found}")]
    TooFewPoints { needed: usize, found: usize },

    #[error("x values are constant, no regression line can be fitted")]
    DegenerateFit,
}
