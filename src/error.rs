use thiserror::Error;

/// A single row that could not become a [`ProteomicsRecord`](crate::data::model::ProteomicsRecord).
///
/// Rejections never abort a batch; the driver collects them next to the
/// retained rows.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RecordError {
    #[error("row {row} ({id}): column {column} is missing")]
    MissingField {
        row: usize,
        id: String,
        column: String,
    },

    #[error("row {row} ({id}): {field} value '{value}' is not a number")]
    NotNumeric {
        row: usize,
        id: String,
        field: &'static str,
        value: String,
    },

    #[error("row {row} ({id}): {field} value {value} is out of range")]
    OutOfRange {
        row: usize,
        id: String,
        field: &'static str,
        value: f64,
    },
}

impl RecordError {
    /// Zero-based index of the rejected data row.
    pub fn row(&self) -> usize {
        match self {
            RecordError::MissingField { row, .. }
            | RecordError::NotNumeric { row, .. }
            | RecordError::OutOfRange { row, .. } => *row,
        }
    }

    /// Identifying cell of the rejected row, or `<unknown>` when unreadable.
    pub fn id(&self) -> &str {
        match self {
            RecordError::MissingField { id, .. }
            | RecordError::NotNumeric { id, .. }
            | RecordError::OutOfRange { id, .. } => id,
        }
    }
}

/// A description whose first token has no `|` delimiter.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DescriptionError {
    #[error("misparse: {description}")]
    Unparseable { description: String },
}

impl DescriptionError {
    /// The description exactly as it was handed to the parser.
    pub fn description(&self) -> &str {
        match self {
            DescriptionError::Unparseable { description } => description,
        }
    }
}

/// A column lookup that does not match the table's shape.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ColumnError {
    #[error("no column named '{0}'")]
    UnknownName(String),

    #[error("column index {index} is out of range ({width} columns)")]
    IndexOutOfRange { index: usize, width: usize },
}

/// Invalid threshold or column configuration.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("threshold {name} must be finite, got {value}")]
    NotFinite { name: &'static str, value: f64 },

    #[error("threshold {name} must not be negative, got {value}")]
    Negative { name: &'static str, value: f64 },

    #[error("max_p_value must lie in [0, 1], got {0}")]
    PValueRange(f64),

    #[error("min_passing must be between 1 and 3, got {0}")]
    MinPassing(usize),

    #[error("column reference must not be empty")]
    EmptyColumn,
}
