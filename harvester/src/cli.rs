//! Command-line arguments for a harvest run.

use clap::Parser;
use std::path::PathBuf;

use crate::congress::{BillType, SourceKind};

/// Fetch congressional bills and flatten them into CSV tables
#[derive(Parser, Debug, Clone)]
#[command(name = "bill-harvest")]
#[command(version)]
pub struct Args {
    /// Bill type to walk
    #[arg(long = "bill-type", value_enum, default_value_t = BillType::Hr)]
    pub bill_type: BillType,

    /// Congress (session) number
    #[arg(long, default_value_t = 114, value_parser = clap::value_parser!(u32).range(1..=200))]
    pub session: u32,

    /// First bill number of the range (inclusive)
    #[arg(long, default_value_t = 1, value_parser = clap::value_parser!(u32).range(1..))]
    pub low: u32,

    /// Last bill number of the range (inclusive)
    #[arg(long, default_value_t = 99, value_parser = clap::value_parser!(u32).range(1..))]
    pub high: u32,

    /// Explicit comma-separated bill numbers; overrides --low/--high
    #[arg(long, value_delimiter = ',', value_parser = clap::value_parser!(u32).range(1..))]
    pub ids: Vec<u32>,

    /// Catalog to fetch from
    #[arg(long, value_enum, default_value_t = SourceKind::GovTrack)]
    pub source: SourceKind,

    /// Read GovTrack bulk files from this local mirror instead of the network
    #[arg(long = "data-dir")]
    pub data_dir: Option<PathBuf>,

    /// Path to the YAML configuration file
    #[arg(long, default_value = "config.yaml")]
    pub config: String,

    /// Directory for CSV output (overrides output.dir)
    #[arg(long = "output-dir")]
    pub output_dir: Option<PathBuf>,

    /// Skip the roster join and follower enrichment
    #[arg(long = "no-roster")]
    pub no_roster: bool,

    /// Log at debug level regardless of logging.level
    #[arg(short, long)]
    pub verbose: bool,
}

/// Argument combinations clap cannot check on its own.
#[derive(Debug, thiserror::Error)]
pub enum ArgsError {
    #[error("--high ({high}) must not be below --low ({low})")]
    InvertedRange { low: u32, high: u32 },

    #[error("--data-dir holds GovTrack bulk files and cannot be used with --source={0}")]
    DataDirSource(SourceKind),
}

impl Args {
    /// # Errors
    /// Returns an error if the identifier range is inverted or a local data
    /// directory is combined with a non-GovTrack source.
    pub fn validate(&self) -> Result<(), ArgsError> {
        if self.ids.is_empty() && self.high < self.low {
            return Err(ArgsError::InvertedRange {
                low: self.low,
                high: self.high,
            });
        }
        if self.data_dir.is_some() && self.source != SourceKind::GovTrack {
            return Err(ArgsError::DataDirSource(self.source));
        }
        Ok(())
    }

    /// Bill numbers to walk, in order.
    #[must_use]
    pub fn bill_numbers(&self) -> Vec<u32> {
        if self.ids.is_empty() {
            (self.low..=self.high).collect()
        } else {
            self.ids.clone()
        }
    }
}
