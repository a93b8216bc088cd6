use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use clap::{Args, Parser, Subcommand};
use log::{info, warn};

use crate::config::Config;
use crate::data::loader::{load_file, write_table};
use crate::data::model::ColumnRef;
use crate::pipeline::{self, MappingResolver, NumberResolver, Unresolved};

/// Filter proteomics exports and translate protein accessions.
#[derive(Parser, Debug)]
#[command(name = "ctprotein2gene")]
#[command(author, version, about, long_about = None)]
#[command(arg_required_else_help = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Debug-level logging (RUST_LOG overrides)
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Keep rows passing at least two of the three significance criteria
    Reduce {
        #[command(flatten)]
        io: IoArgs,

        /// Column holding the record id
        #[arg(long)]
        id_column: Option<ColumnRef>,

        /// Column holding the peptide match count
        #[arg(long)]
        peptide_column: Option<ColumnRef>,

        /// Column holding the fold change
        #[arg(long)]
        fold_change_column: Option<ColumnRef>,

        /// Column holding the p-value
        #[arg(long)]
        p_value_column: Option<ColumnRef>,

        #[arg(long)]
        min_peptide_matches: Option<f64>,

        #[arg(long)]
        min_abs_fold_change: Option<f64>,

        #[arg(long)]
        max_p_value: Option<f64>,

        /// Write only the four record columns
        #[arg(long)]
        project: bool,
    },

    /// Append protein prefix, name, CTL and CT numbers parsed from descriptions
    Enrich {
        #[command(flatten)]
        io: IoArgs,

        /// Column holding the protein description (name or zero-based index),
        /// looked up after --column projection
        #[arg(short, long)]
        description_column: Option<ColumnRef>,

        /// Keep only these columns, in order, before enriching (repeatable)
        #[arg(long = "column", value_name = "COLUMN")]
        columns: Vec<ColumnRef>,

        /// CSV of accession,CTL number,CT number used to fill the lookups
        #[arg(short, long)]
        mapping: Option<PathBuf>,

        /// Print the first and last accession carrying the name prefix
        #[arg(long)]
        summary: bool,

        /// Accession prefix considered by --summary
        #[arg(long)]
        name_prefix: Option<String>,
    },
}

#[derive(Args, Debug)]
pub struct IoArgs {
    /// Input table (.csv, .tsv, .txt, .json, .parquet)
    #[arg(short, long)]
    pub input: PathBuf,

    /// Output file
    #[arg(short, long)]
    pub output: PathBuf,

    /// JSON settings file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Output field delimiter
    #[arg(long, default_value_t = ',')]
    pub delimiter: char,
}

impl IoArgs {
    fn load_config(&self) -> Result<Config> {
        match &self.config {
            Some(path) => Config::load(path),
            None => Ok(Config::default()),
        }
    }

    fn delimiter_byte(&self) -> Result<u8> {
        if !self.delimiter.is_ascii() {
            bail!("delimiter must be a single ASCII character, got {:?}", self.delimiter);
        }
        Ok(self.delimiter as u8)
    }
}

pub fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Reduce {
            io,
            id_column,
            peptide_column,
            fold_change_column,
            p_value_column,
            min_peptide_matches,
            min_abs_fold_change,
            max_p_value,
            project,
        } => {
            let mut config = io.load_config()?;
            let columns = &mut config.record_columns;
            override_with(&mut columns.id, id_column);
            override_with(&mut columns.peptide_matches, peptide_column);
            override_with(&mut columns.fold_change, fold_change_column);
            override_with(&mut columns.p_value, p_value_column);
            let thresholds = &mut config.thresholds;
            override_with(&mut thresholds.min_peptide_matches, min_peptide_matches);
            override_with(&mut thresholds.min_abs_fold_change, min_abs_fold_change);
            override_with(&mut thresholds.max_p_value, max_p_value);

            let table = load_file(&io.input)?;
            let reduction = pipeline::reduce(&table, &config.record_columns, &config.thresholds)?;
            if !reduction.rejected.is_empty() {
                warn!("Skipped {} malformed rows", reduction.rejected.len());
            }

            let out = if project {
                reduction
                    .table
                    .project(&config.record_columns.as_vec())
                    .context("projecting record columns")?
            } else {
                reduction.table
            };
            write_table(&io.output, &out, io.delimiter_byte()?)
        }

        Commands::Enrich {
            io,
            description_column,
            columns,
            mapping,
            summary,
            name_prefix,
        } => {
            let mut config = io.load_config()?;
            override_with(&mut config.description_column, description_column);
            override_with(&mut config.name_prefix, name_prefix);
            if !columns.is_empty() {
                config.project_columns = columns;
            }

            let resolver = load_resolver(mapping.as_deref())?;
            let mut table = load_file(&io.input)?;
            if !config.project_columns.is_empty() {
                table = table
                    .project(&config.project_columns)
                    .context("projecting input columns")?;
            }
            let enriched =
                pipeline::enrich(&table, &config.description_column, resolver.as_ref())?;

            if summary {
                match pipeline::summarize_names(&enriched.rows, &config.name_prefix) {
                    Some(s) => {
                        println!("First {} protein: {}", config.name_prefix, s.first);
                        println!("Last {} protein: {}", config.name_prefix, s.last);
                        println!(
                            "Non-{} proteins not considered: {}",
                            config.name_prefix, s.not_considered
                        );
                    }
                    None => println!("No {} proteins found.", config.name_prefix),
                }
            }

            write_table(&io.output, &enriched.to_table(), io.delimiter_byte()?)
        }
    }
}

fn override_with<T>(slot: &mut T, value: Option<T>) {
    if let Some(v) = value {
        *slot = v;
    }
}

fn load_resolver(mapping: Option<&Path>) -> Result<Box<dyn NumberResolver>> {
    match mapping {
        Some(path) => Ok(Box::new(MappingResolver::from_path(path)?)),
        None => {
            info!("No mapping given; CTL and CT numbers stay empty");
            Ok(Box::new(Unresolved))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_reduce_with_overrides() {
        let cli = Cli::try_parse_from([
            "ctprotein2gene", "reduce", "-i", "in.csv", "-o", "out.csv",
            "--p-value-column", "4", "--max-p-value", "0.01", "--project",
        ])
        .unwrap();
        match cli.command {
            Commands::Reduce { io, p_value_column, max_p_value, project, .. } => {
                assert_eq!(io.input, PathBuf::from("in.csv"));
                assert_eq!(io.delimiter, ',');
                assert_eq!(p_value_column, Some(ColumnRef::Index(4)));
                assert_eq!(max_p_value, Some(0.01));
                assert!(project);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn parses_enrich_description_by_name() {
        let cli = Cli::try_parse_from([
            "ctprotein2gene", "-v", "enrich", "-i", "in.csv", "-o", "out.tsv",
            "-d", "Protein", "--delimiter", "\t", "--summary",
        ])
        .unwrap();
        assert!(cli.verbose);
        match cli.command {
            Commands::Enrich { io, description_column, summary, .. } => {
                assert_eq!(description_column, Some(ColumnRef::name("Protein")));
                assert_eq!(io.delimiter_byte().unwrap(), b'\t');
                assert!(summary);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn enrich_columns_are_repeatable() {
        let cli = Cli::try_parse_from([
            "ctprotein2gene", "enrich", "-i", "in.csv", "-o", "out.csv",
            "--column", "1", "--column", "16", "--column", "P Value",
        ])
        .unwrap();
        let Commands::Enrich { columns, .. } = cli.command else {
            panic!("expected enrich");
        };
        assert_eq!(
            columns,
            vec![ColumnRef::Index(1), ColumnRef::Index(16), ColumnRef::name("P Value")]
        );
    }

    #[test]
    fn rejects_non_ascii_delimiter() {
        let cli = Cli::try_parse_from([
            "ctprotein2gene", "reduce", "-i", "a.csv", "-o", "b.csv", "--delimiter", "§",
        ])
        .unwrap();
        let Commands::Reduce { io, .. } = cli.command else {
            panic!("expected reduce");
        };
        assert!(io.delimiter_byte().is_err());
    }

    #[test]
    fn requires_input() {
        assert!(Cli::try_parse_from(["ctprotein2gene", "reduce", "-o", "b.csv"]).is_err());
    }
}
