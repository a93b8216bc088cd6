use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{ColumnError, ConfigError, RecordError};

// ---------------------------------------------------------------------------
// Table – already-split rows handed over by the I/O layer
// ---------------------------------------------------------------------------

/// A header row plus data rows, every cell kept as text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Table {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl Table {
    pub fn new(headers: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        Table { headers, rows }
    }

    /// Number of data rows (header excluded).
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Resolve a column reference against the header row.
    pub fn column_index(&self, column: &ColumnRef) -> Result<usize, ColumnError> {
        match column {
            ColumnRef::Name(name) => self
                .headers
                .iter()
                .position(|h| h == name)
                .ok_or_else(|| ColumnError::UnknownName(name.clone())),
            ColumnRef::Index(index) if *index < self.headers.len() => Ok(*index),
            ColumnRef::Index(index) => Err(ColumnError::IndexOutOfRange {
                index: *index,
                width: self.headers.len(),
            }),
        }
    }

    /// Keep only `columns`, in the order given. Short rows get empty cells.
    pub fn project(&self, columns: &[ColumnRef]) -> Result<Table, ColumnError> {
        let indices = columns
            .iter()
            .map(|c| self.column_index(c))
            .collect::<Result<Vec<_>, _>>()?;

        let headers: Vec<String> = indices.iter().map(|&i| self.headers[i].clone()).collect();
        let rows: Vec<Vec<String>> = self
            .rows
            .iter()
            .map(|row| {
                indices
                    .iter()
                    .map(|&i| row.get(i).cloned().unwrap_or_default())
                    .collect()
            })
            .collect();

        Ok(Table { headers, rows })
    }
}

// ---------------------------------------------------------------------------
// ColumnRef – name- or index-based lookup
// ---------------------------------------------------------------------------

/// Locates a column either by header text or by zero-based position.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum ColumnRef {
    Name(String),
    Index(usize),
}

impl ColumnRef {
    pub fn name(name: impl Into<String>) -> Self {
        ColumnRef::Name(name.into())
    }
}

/// All-digit text is an index; anything else is a header name.
impl FromStr for ColumnRef {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() {
            return Err(ConfigError::EmptyColumn);
        }
        if s.bytes().all(|b| b.is_ascii_digit()) {
            if let Ok(index) = s.parse::<usize>() {
                return Ok(ColumnRef::Index(index));
            }
        }
        Ok(ColumnRef::Name(s.to_string()))
    }
}

impl TryFrom<String> for ColumnRef {
    type Error = ConfigError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<ColumnRef> for String {
    fn from(c: ColumnRef) -> Self {
        c.to_string()
    }
}

impl fmt::Display for ColumnRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ColumnRef::Name(n) => write!(f, "{n}"),
            ColumnRef::Index(i) => write!(f, "{i}"),
        }
    }
}

// ---------------------------------------------------------------------------
// RecordColumns – where the four record fields live
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RecordColumns {
    pub id: ColumnRef,
    pub peptide_matches: ColumnRef,
    pub fold_change: ColumnRef,
    pub p_value: ColumnRef,
}

impl Default for RecordColumns {
    /// Column names of the EB proteomics export.
    fn default() -> Self {
        RecordColumns {
            id: ColumnRef::name("CTL##"),
            peptide_matches: ColumnRef::name("Peptide Matches"),
            fold_change: ColumnRef::name("Fold Change (RifR/GspE)"),
            p_value: ColumnRef::name("P-value"),
        }
    }
}

impl RecordColumns {
    /// Column order used when projecting a table down to the record fields.
    pub fn as_vec(&self) -> Vec<ColumnRef> {
        vec![
            self.id.clone(),
            self.peptide_matches.clone(),
            self.fold_change.clone(),
            self.p_value.clone(),
        ]
    }

    pub fn resolve(&self, table: &Table) -> Result<ColumnIndices, ColumnError> {
        Ok(ColumnIndices {
            id: table.column_index(&self.id)?,
            peptide_matches: table.column_index(&self.peptide_matches)?,
            fold_change: table.column_index(&self.fold_change)?,
            p_value: table.column_index(&self.p_value)?,
        })
    }
}

/// [`RecordColumns`] resolved against one table's header row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnIndices {
    pub id: usize,
    pub peptide_matches: usize,
    pub fold_change: usize,
    pub p_value: usize,
}

// ---------------------------------------------------------------------------
// ProteomicsRecord – one measurement row
// ---------------------------------------------------------------------------

/// One parsed measurement row. Immutable once built.
#[derive(Debug, Clone, PartialEq)]
pub struct ProteomicsRecord {
    /// Position of the row in the source table (header excluded).
    pub row: usize,
    pub id: String,
    pub peptide_matches: f64,
    pub fold_change: f64,
    pub p_value: f64,
    /// The source row, cell for cell.
    pub raw: Vec<String>,
}

impl ProteomicsRecord {
    /// Build a record from raw cells. Every numeric field must parse and
    /// lie in its domain, otherwise the whole row is rejected.
    pub fn from_row(
        row: usize,
        cells: &[String],
        columns: &ColumnIndices,
        headers: &[String],
    ) -> Result<Self, RecordError> {
        let id = cells
            .get(columns.id)
            .cloned()
            .ok_or_else(|| missing_field(row, "<unknown>", headers, columns.id))?;

        let number = |field: &'static str, index: usize| -> Result<f64, RecordError> {
            parse_number(row, &id, field, cell(cells, headers, row, &id, index)?)
        };
        let peptide_matches = number("peptide_matches", columns.peptide_matches)?;
        let fold_change = number("fold_change", columns.fold_change)?;
        let p_value = number("p_value", columns.p_value)?;

        if peptide_matches < 0.0 {
            return Err(RecordError::OutOfRange {
                row,
                id,
                field: "peptide_matches",
                value: peptide_matches,
            });
        }
        if !(0.0..=1.0).contains(&p_value) {
            return Err(RecordError::OutOfRange {
                row,
                id,
                field: "p_value",
                value: p_value,
            });
        }

        Ok(ProteomicsRecord {
            row,
            id,
            peptide_matches,
            fold_change,
            p_value,
            raw: cells.to_vec(),
        })
    }
}

fn cell<'a>(
    cells: &'a [String],
    headers: &[String],
    row: usize,
    id: &str,
    index: usize,
) -> Result<&'a str, RecordError> {
    cells
        .get(index)
        .map(String::as_str)
        .ok_or_else(|| missing_field(row, id, headers, index))
}

fn missing_field(row: usize, id: &str, headers: &[String], index: usize) -> RecordError {
    RecordError::MissingField {
        row,
        id: id.to_string(),
        column: headers
            .get(index)
            .cloned()
            .unwrap_or_else(|| index.to_string()),
    }
}

fn parse_number(
    row: usize,
    id: &str,
    field: &'static str,
    text: &str,
) -> Result<f64, RecordError> {
    match text.trim().parse::<f64>() {
        Ok(v) if v.is_finite() => Ok(v),
        _ => Err(RecordError::NotNumeric {
            row,
            id: id.to_string(),
            field,
            value: text.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(cells: &[&str]) -> Vec<String> {
        cells.iter().map(|s| s.to_string()).collect()
    }

    fn eb_table() -> Table {
        Table::new(
            strings(&["CTL##", "Gene", "Peptide Matches", "Fold Change (RifR/GspE)", "P-value"]),
            vec![strings(&["CTL0001", "gyrA", "3", "-2.5", "0.01"])],
        )
    }

    #[test]
    fn column_ref_parses_digits_as_index() {
        assert_eq!("3".parse::<ColumnRef>().unwrap(), ColumnRef::Index(3));
        assert_eq!("P-value".parse::<ColumnRef>().unwrap(), ColumnRef::name("P-value"));
        assert_eq!("3a".parse::<ColumnRef>().unwrap(), ColumnRef::name("3a"));
        assert!("".parse::<ColumnRef>().is_err());
    }

    #[test]
    fn column_index_by_name_and_position() {
        let t = eb_table();
        assert_eq!(t.column_index(&ColumnRef::name("P-value")), Ok(4));
        assert_eq!(t.column_index(&ColumnRef::Index(1)), Ok(1));
        assert_eq!(
            t.column_index(&ColumnRef::Index(9)),
            Err(ColumnError::IndexOutOfRange { index: 9, width: 5 })
        );
        assert_eq!(
            t.column_index(&ColumnRef::name("CT##")),
            Err(ColumnError::UnknownName("CT##".into()))
        );
    }

    #[test]
    fn project_keeps_requested_order() {
        let t = eb_table();
        let p = t.project(&RecordColumns::default().as_vec()).unwrap();
        assert_eq!(
            p.headers,
            strings(&["CTL##", "Peptide Matches", "Fold Change (RifR/GspE)", "P-value"])
        );
        assert_eq!(p.rows, vec![strings(&["CTL0001", "3", "-2.5", "0.01"])]);
    }

    #[test]
    fn record_from_valid_row() {
        let t = eb_table();
        let cols = RecordColumns::default().resolve(&t).unwrap();
        let rec = ProteomicsRecord::from_row(0, &t.rows[0], &cols, &t.headers).unwrap();
        assert_eq!(rec.id, "CTL0001");
        assert_eq!(rec.peptide_matches, 3.0);
        assert_eq!(rec.fold_change, -2.5);
        assert_eq!(rec.p_value, 0.01);
        assert_eq!(rec.raw, t.rows[0]);
    }

    #[test]
    fn record_accepts_padded_numbers() {
        let t = eb_table();
        let cols = RecordColumns::default().resolve(&t).unwrap();
        let row = strings(&["CTL0002", "x", " 2 ", " 1.5", "0.05 "]);
        let rec = ProteomicsRecord::from_row(1, &row, &cols, &t.headers).unwrap();
        assert_eq!(rec.peptide_matches, 2.0);
        assert_eq!(rec.p_value, 0.05);
    }

    #[test]
    fn record_rejects_bad_numbers() {
        let t = eb_table();
        let cols = RecordColumns::default().resolve(&t).unwrap();

        let row = strings(&["CTL0003", "x", "two", "1.5", "0.01"]);
        let err = ProteomicsRecord::from_row(2, &row, &cols, &t.headers).unwrap_err();
        assert!(matches!(err, RecordError::NotNumeric { field: "peptide_matches", .. }));
        assert_eq!(err.id(), "CTL0003");
        assert_eq!(err.row(), 2);

        let row = strings(&["CTL0004", "x", "2", "NaN", "0.01"]);
        let err = ProteomicsRecord::from_row(3, &row, &cols, &t.headers).unwrap_err();
        assert!(matches!(err, RecordError::NotNumeric { field: "fold_change", .. }));

        let row = strings(&["CTL0005", "x", "2", "1.0", "1.5"]);
        let err = ProteomicsRecord::from_row(4, &row, &cols, &t.headers).unwrap_err();
        assert!(matches!(err, RecordError::OutOfRange { field: "p_value", .. }));

        let row = strings(&["CTL0006", "x", "-1", "1.0", "0.5"]);
        let err = ProteomicsRecord::from_row(5, &row, &cols, &t.headers).unwrap_err();
        assert!(matches!(err, RecordError::OutOfRange { field: "peptide_matches", .. }));
    }

    #[test]
    fn short_row_is_missing_field() {
        let t = eb_table();
        let cols = RecordColumns::default().resolve(&t).unwrap();
        let row = strings(&["CTL0007", "x", "2"]);
        let err = ProteomicsRecord::from_row(6, &row, &cols, &t.headers).unwrap_err();
        assert_eq!(
            err,
            RecordError::MissingField {
                row: 6,
                id: "CTL0007".into(),
                column: "Fold Change (RifR/GspE)".into(),
            }
        );

        let err = ProteomicsRecord::from_row(7, &[], &cols, &t.headers).unwrap_err();
        assert_eq!(err.id(), "<unknown>");
    }

    #[test]
    fn missing_id_cell_names_the_id_column() {
        let headers = strings(&["Peptide Matches", "Fold Change (RifR/GspE)", "P-value", "CTL##"]);
        let t = Table::new(headers, vec![]);
        let cols = RecordColumns::default().resolve(&t).unwrap();
        let row = strings(&["3", "2.0", "0.01"]);
        let err = ProteomicsRecord::from_row(0, &row, &cols, &t.headers).unwrap_err();
        assert_eq!(
            err,
            RecordError::MissingField {
                row: 0,
                id: "<unknown>".into(),
                column: "CTL##".into(),
            }
        );
    }
}
