use clap::{Parser, Subcommand, ValueEnum};
use simplelog::LevelFilter;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author, version, about = "Pair exported photos and videos with their JSON metadata sidecars")]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable file logging to takeoutsort.log
    #[arg(long = "log", global = true)]
    pub log: bool,

    /// Log level for file logging (debug, info, warn, error)
    #[arg(long, default_value_t = LevelFilter::Debug, global = true)]
    pub log_level: LevelFilter,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Scan an export and report how many media files have sidecars
    Scan {
        /// Export root (the folder containing "Google Photos")
        #[arg(required = true)]
        export_dir: PathBuf,

        /// Scan albums in parallel
        #[arg(long)]
        parallel: bool,

        /// Parse every sidecar and attach the metadata
        #[arg(long)]
        load_metadata: bool,

        /// Sort the listing
        #[arg(long, value_enum)]
        sort: Option<SortOrder>,

        /// Output format
        #[arg(long, value_enum, default_value_t = OutputFormat::Summary)]
        output: OutputFormat,
    },

    /// Show the albums of an export with their media and JSON file counts
    Summary {
        /// Export root
        #[arg(required = true)]
        export_dir: PathBuf,
    },

    /// Normalize a single sidecar and print the result as JSON
    Inspect {
        /// Sidecar JSON file
        #[arg(required = true)]
        sidecar: PathBuf,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum SortOrder {
    /// Oldest first, by capture time or file modification time
    Date,
    /// Largest first
    Size,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum OutputFormat {
    /// Statistics table
    Summary,
    /// One media path per line
    Paths,
    /// JSON report
    Json,
}
