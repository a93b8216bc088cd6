use log::{debug, warn};
use serde::{Deserialize, Serialize};

use super::model::{ProteomicsRecord, RecordColumns, Table};
use crate::error::{ColumnError, ConfigError, RecordError};

// ---------------------------------------------------------------------------
// Thresholds: the three significance criteria and the vote
// ---------------------------------------------------------------------------

/// One of the independent significance criteria.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Criterion {
    PeptideMatches,
    FoldChange,
    PValue,
}

impl Criterion {
    pub const ALL: [Criterion; 3] = [
        Criterion::PeptideMatches,
        Criterion::FoldChange,
        Criterion::PValue,
    ];
}

/// Cut-offs for the 2-of-3 significance vote.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Thresholds {
    /// Passes when `peptide_matches >= min_peptide_matches`.
    pub min_peptide_matches: f64,
    /// Passes when `|fold_change| >= min_abs_fold_change`.
    pub min_abs_fold_change: f64,
    /// Passes when `p_value <= max_p_value`.
    pub max_p_value: f64,
    /// How many criteria must pass for a record to be kept.
    pub min_passing: usize,
}

impl Default for Thresholds {
    fn default() -> Self {
        Thresholds {
            min_peptide_matches: 2.0,
            min_abs_fold_change: 1.5,
            max_p_value: 0.05,
            min_passing: 2,
        }
    }
}

impl Thresholds {
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (name, value) in [
            ("min_peptide_matches", self.min_peptide_matches),
            ("min_abs_fold_change", self.min_abs_fold_change),
            ("max_p_value", self.max_p_value),
        ] {
            if !value.is_finite() {
                return Err(ConfigError::NotFinite { name, value });
            }
            if value < 0.0 {
                return Err(ConfigError::Negative { name, value });
            }
        }
        if self.max_p_value > 1.0 {
            return Err(ConfigError::PValueRange(self.max_p_value));
        }
        if !(1..=Criterion::ALL.len()).contains(&self.min_passing) {
            return Err(ConfigError::MinPassing(self.min_passing));
        }
        Ok(())
    }

    pub fn passes(&self, criterion: Criterion, record: &ProteomicsRecord) -> bool {
        match criterion {
            Criterion::PeptideMatches => record.peptide_matches >= self.min_peptide_matches,
            Criterion::FoldChange => record.fold_change.abs() >= self.min_abs_fold_change,
            Criterion::PValue => record.p_value <= self.max_p_value,
        }
    }

    /// Criteria the record satisfies, in [`Criterion::ALL`] order.
    pub fn passing(&self, record: &ProteomicsRecord) -> Vec<Criterion> {
        Criterion::ALL
            .into_iter()
            .filter(|&c| self.passes(c, record))
            .collect()
    }

    pub fn is_significant(&self, record: &ProteomicsRecord) -> bool {
        self.passing(record).len() >= self.min_passing
    }
}

// ---------------------------------------------------------------------------
// Filtering a batch
// ---------------------------------------------------------------------------

/// Outcome of filtering one batch: kept records plus per-row rejections.
#[derive(Debug, Clone, Default)]
pub struct FilterReport {
    /// Significant records, in input order.
    pub retained: Vec<ProteomicsRecord>,
    /// Rows that could not be parsed into a record.
    pub rejected: Vec<RecordError>,
    /// Valid records that failed the vote.
    pub excluded: usize,
}

/// Keep only significant records, preserving input order.
pub fn filter_records<I>(records: I, thresholds: &Thresholds) -> Vec<ProteomicsRecord>
where
    I: IntoIterator<Item = ProteomicsRecord>,
{
    records
        .into_iter()
        .filter(|r| thresholds.is_significant(r))
        .collect()
}

/// Parse every row of `table` and filter the valid ones.
///
/// A malformed row is logged and reported, never fatal. Only a column
/// lookup that fails against the header row aborts.
pub fn filter_rows(
    table: &Table,
    columns: &RecordColumns,
    thresholds: &Thresholds,
) -> Result<FilterReport, ColumnError> {
    let indices = columns.resolve(table)?;
    let mut report = FilterReport::default();

    for (row, cells) in table.rows.iter().enumerate() {
        match ProteomicsRecord::from_row(row, cells, &indices, &table.headers) {
            Ok(record) if thresholds.is_significant(&record) => report.retained.push(record),
            Ok(record) => {
                debug!("Excluding {} ({:?} passed)", record.id, thresholds.passing(&record));
                report.excluded += 1;
            }
            Err(e) => {
                warn!("Rejecting malformed row {row} ({}): {e}", e.id());
                report.rejected.push(e);
            }
        }
    }

    Ok(report)
}
