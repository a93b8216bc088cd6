//! End-to-end flows over one [`Table`].
//!
//! ```text
//!   Table ──► filter_rows ──► Reduction { table, rejected }
//!
//!   Table ──► parse_description ──► NumberResolver ──► EnrichedTable
//!                  │
//!                  └── controls (no `|`) are dropped
//! ```

use std::collections::BTreeMap;
use std::path::Path;

use anyhow::{Context, Result};
use log::{debug, info};

use crate::data::description::{ParsedName, parse_description};
use crate::data::filter::{Thresholds, filter_rows};
use crate::data::model::{ColumnRef, RecordColumns, Table};
use crate::error::RecordError;

/// Header names appended by the enrichment flow.
pub const ENRICHED_COLUMNS: [&str; 4] =
    ["Protein Prefix", "Protein Name", "CTL Number", "CT Number"];

// ---------------------------------------------------------------------------
// Reduction flow
// ---------------------------------------------------------------------------

/// Significant rows of the input plus the rows that could not be read.
#[derive(Debug, Clone)]
pub struct Reduction {
    /// Original headers, retained rows unchanged and in input order.
    pub table: Table,
    pub rejected: Vec<RecordError>,
}

/// Keep the rows whose record passes the significance vote.
pub fn reduce(
    table: &Table,
    columns: &RecordColumns,
    thresholds: &Thresholds,
) -> Result<Reduction> {
    thresholds.validate().context("invalid thresholds")?;
    let report = filter_rows(table, columns, thresholds).context("locating record columns")?;

    info!(
        "Reduced {} rows to {} ({} excluded, {} malformed)",
        table.len(),
        report.retained.len(),
        report.excluded,
        report.rejected.len()
    );

    let rows: Vec<Vec<String>> = report.retained.into_iter().map(|r| r.raw).collect();
    Ok(Reduction {
        table: Table::new(table.headers.clone(), rows),
        rejected: report.rejected,
    })
}

// ---------------------------------------------------------------------------
// CTL / CT number lookup
// ---------------------------------------------------------------------------

/// A resolved `(ctl_number, ct_number)` pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneNumbers {
    pub ctl_number: String,
    pub ct_number: String,
}

/// Maps a protein accession to its CTL and CT numbers.
pub trait NumberResolver {
    fn resolve(&self, name: &str) -> Option<GeneNumbers>;
}

/// Leaves every CTL/CT number absent.
#[derive(Debug, Clone, Copy, Default)]
pub struct Unresolved;

impl NumberResolver for Unresolved {
    fn resolve(&self, _name: &str) -> Option<GeneNumbers> {
        None
    }
}

/// Lookup from a fixed accession → numbers table.
#[derive(Debug, Clone, Default)]
pub struct MappingResolver {
    entries: BTreeMap<String, GeneNumbers>,
}

impl MappingResolver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(
        &mut self,
        name: impl Into<String>,
        ctl_number: impl Into<String>,
        ct_number: impl Into<String>,
    ) {
        self.entries.insert(
            name.into(),
            GeneNumbers {
                ctl_number: ctl_number.into(),
                ct_number: ct_number.into(),
            },
        );
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Build from a table whose first three columns are name, CTL number
    /// and CT number. Rows with fewer cells are skipped.
    pub fn from_table(table: &Table) -> Self {
        let mut resolver = Self::new();
        for row in &table.rows {
            if let [name, ctl, ct, ..] = row.as_slice() {
                resolver.insert(name.trim(), ctl.trim(), ct.trim());
            } else {
                debug!("Skipping short mapping row {row:?}");
            }
        }
        resolver
    }

    pub fn from_path(path: &Path) -> Result<Self> {
        let table = crate::data::loader::load_file(path)
            .with_context(|| format!("loading mapping {}", path.display()))?;
        let resolver = Self::from_table(&table);
        info!("Loaded {} accession mappings", resolver.len());
        Ok(resolver)
    }
}

impl NumberResolver for MappingResolver {
    fn resolve(&self, name: &str) -> Option<GeneNumbers> {
        self.entries.get(name).cloned()
    }
}

impl<F> NumberResolver for F
where
    F: Fn(&str) -> Option<GeneNumbers>,
{
    fn resolve(&self, name: &str) -> Option<GeneNumbers> {
        self(name)
    }
}

// ---------------------------------------------------------------------------
// Enrichment flow
// ---------------------------------------------------------------------------

/// An input row extended with its parsed name and looked-up numbers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnrichedRow {
    pub cells: Vec<String>,
    pub parsed: ParsedName,
    pub numbers: Option<GeneNumbers>,
}

impl EnrichedRow {
    /// Original cells followed by prefix, name, CTL number and CT number.
    pub fn values(&self) -> Vec<Option<String>> {
        let mut out: Vec<Option<String>> = self.cells.iter().cloned().map(Some).collect();
        out.push(Some(self.parsed.prefix.clone()));
        out.push(Some(self.parsed.name.clone()));
        out.push(self.numbers.as_ref().map(|n| n.ctl_number.clone()));
        out.push(self.numbers.as_ref().map(|n| n.ct_number.clone()));
        out
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnrichedTable {
    pub headers: Vec<String>,
    pub rows: Vec<EnrichedRow>,
    /// Rows dropped because their description did not parse.
    pub controls: usize,
}

impl EnrichedTable {
    /// Flatten for the output sink; absent numbers become empty cells.
    pub fn to_table(&self) -> Table {
        let rows: Vec<Vec<String>> = self
            .rows
            .iter()
            .map(|r| r.values().into_iter().map(Option::unwrap_or_default).collect())
            .collect();
        Table::new(self.headers.clone(), rows)
    }
}

/// Parse the description column of every row and append the results.
/// Rows whose description has no `|` are treated as controls and dropped.
pub fn enrich(
    table: &Table,
    description: &ColumnRef,
    resolver: &dyn NumberResolver,
) -> Result<EnrichedTable> {
    let desc_idx = table
        .column_index(description)
        .context("locating description column")?;

    let mut headers = table.headers.clone();
    headers.extend(ENRICHED_COLUMNS.iter().map(|h| h.to_string()));

    let width = table.headers.len();
    let mut rows = Vec::with_capacity(table.len());
    let mut controls = 0;
    for (row_no, cells) in table.rows.iter().enumerate() {
        let text = cells.get(desc_idx).map(String::as_str).unwrap_or("");
        let parsed = match parse_description(text) {
            Ok(parsed) => parsed,
            Err(e) => {
                debug!("Dropping control: {}", e.description());
                controls += 1;
                continue;
            }
        };

        // Appended columns must line up with their headers.
        let mut cells = cells.clone();
        if cells.len() != width {
            debug!("Row {row_no}: resizing {} cells to {width} columns", cells.len());
            cells.resize(width, String::new());
        }

        let numbers = resolver.resolve(&parsed.name);
        rows.push(EnrichedRow {
            cells,
            parsed,
            numbers,
        });
    }

    info!("Enriched {} rows, dropped {} controls", rows.len(), controls);
    Ok(EnrichedTable {
        headers,
        rows,
        controls,
    })
}

// ---------------------------------------------------------------------------
// Name summary
// ---------------------------------------------------------------------------

/// First and last protein name carrying a given accession prefix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NameSummary {
    pub first: String,
    pub last: String,
    pub matched: usize,
    /// Rows whose name does not carry the prefix.
    pub not_considered: usize,
}

/// `None` when no row's name starts with `prefix`.
pub fn summarize_names(rows: &[EnrichedRow], prefix: &str) -> Option<NameSummary> {
    let mut names: Vec<&str> = rows
        .iter()
        .map(|r| r.parsed.name.as_str())
        .filter(|n| n.starts_with(prefix))
        .collect();
    names.sort_unstable();

    let first = names.first()?.to_string();
    let last = names.last()?.to_string();
    Some(NameSummary {
        first,
        last,
        matched: names.len(),
        not_considered: rows.len() - names.len(),
    })
}
