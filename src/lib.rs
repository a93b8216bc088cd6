//! Significance filtering of proteomics exports and translation of protein
//! descriptions into accession prefix / name pairs.

pub mod cli;
pub mod config;
pub mod data;
pub mod error;
pub mod pipeline;

pub use config::Config;
pub use data::description::{ParsedName, parse_description};
pub use data::filter::{Criterion, FilterReport, Thresholds, filter_records, filter_rows};
pub use data::model::{ColumnRef, ProteomicsRecord, RecordColumns, Table};
pub use error::{ColumnError, ConfigError, DescriptionError, RecordError};
pub use pipeline::{
    EnrichedRow, EnrichedTable, GeneNumbers, MappingResolver, NameSummary, NumberResolver,
    Reduction, Unresolved, enrich, reduce, summarize_names,
};
