use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Lookup filename shipped with ACS 5-year releases.
pub const DEFAULT_LOOKUP: &str = "ACS_5yr_Seq_Table_Number_Lookup.txt";

#[derive(Parser, Debug)]
#[command(name = "acs-to-sqlite")]
#[command(version, about = "Load a Census ACS 5-year release into a SQLite database")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Load a release directory into a SQLite database
    Load {
        /// Directory containing the release files
        input_dir: PathBuf,

        /// Output SQLite database path
        output_db: PathBuf,

        /// Lookup file name inside the release directory
        #[arg(short, long, default_value = DEFAULT_LOOKUP)]
        lookup: String,
    },

    /// List the logical tables described by a release's lookup file
    Tables {
        /// Directory containing the release files
        input_dir: PathBuf,

        /// Lookup file name inside the release directory
        #[arg(short, long, default_value = DEFAULT_LOOKUP)]
        lookup: String,
    },
}

impl Cli {
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}
