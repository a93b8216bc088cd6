//! Data layer: core types, loading, filtering and description parsing.
//!
//! Architecture:
//! ```text
//!  .csv / .tsv / .json / .parquet
//!        │
//!        ▼
//!   ┌──────────┐
//!   │  loader   │  parse file → Table
//!   └──────────┘
//!        │
//!        ▼
//!   ┌──────────────────┐
//!   │ ProteomicsRecord  │  id, peptide matches, fold change, p-value
//!   └──────────────────┘
//!        │
//!        ▼
//!   ┌──────────┐
//!   │  filter   │  2-of-3 significance vote → retained records
//!   └──────────┘
//!
//!   description: "gb|AGJ65242.2 ..." → (gb, AGJ65242.2)
//! ```

pub mod description;
pub mod filter;
pub mod loader;
pub mod model;
