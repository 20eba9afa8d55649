use anyhow::Result;
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;
use simplelog::{CombinedLogger, Config, LevelFilter, SharedLogger, TermLogger, WriteLogger};
use std::collections::BTreeMap;
use std::fs::File;
use std::path::Path;
use takeoutsort::takeout_core::cli::{OutputFormat, SortOrder};
use takeoutsort::takeout_core::{
    Cli, Commands, ExportScanner, MediaEntry, Metadata, MetadataLoadReport, ScanStats, TagValue,
    read_sidecar,
};

#[derive(Serialize)]
struct EntryReport<'a> {
    path: &'a Path,
    kind: &'static str,
    sidecar: Option<&'a Path>,
    metadata: Option<&'a Metadata>,
    tags: BTreeMap<&'static str, TagValue>,
}

impl<'a> EntryReport<'a> {
    fn new(entry: &'a MediaEntry) -> Self {
        EntryReport {
            path: entry.path(),
            kind: entry.kind().as_str(),
            sidecar: entry.sidecar(),
            metadata: entry.metadata(),
            tags: entry.metadata().map(Metadata::to_tags).unwrap_or_default(),
        }
    }
}

#[derive(Serialize)]
struct ScanReport<'a> {
    stats: &'a ScanStats,
    metadata: Option<MetadataLoadReport>,
    media: Vec<EntryReport<'a>>,
}

#[derive(Serialize)]
struct InspectReport<'a> {
    metadata: &'a Metadata,
    tags: BTreeMap<&'static str, TagValue>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize loggers
    let mut loggers: Vec<Box<dyn SharedLogger>> = vec![TermLogger::new(
        LevelFilter::Warn,
        Config::default(),
        simplelog::TerminalMode::Mixed,
        simplelog::ColorChoice::Auto,
    )];

    if cli.log {
        loggers.push(WriteLogger::new(
            cli.log_level,
            Config::default(),
            File::create("takeoutsort.log")?,
        ));
    }

    CombinedLogger::init(loggers)?;

    match cli.command {
        Commands::Scan {
            export_dir,
            parallel,
            load_metadata,
            sort,
            output,
        } => {
            let scanner = ExportScanner::open(&export_dir)?.with_parallel(parallel);
            let mut scan = scanner.scan()?;

            let load_report = if load_metadata {
                let bar_style = ProgressStyle::default_bar()
                    .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta}) {msg}")?;
                let bar = ProgressBar::new(scan.media.len() as u64).with_style(bar_style);
                bar.set_message("Reading sidecars");
                let report = scan.media.load_metadata_with(|done, _| bar.set_position(done as u64));
                bar.finish_with_message("Sidecars read");
                Some(report)
            } else {
                None
            };

            match sort {
                Some(SortOrder::Date) => scan.media.sort_by_date(false),
                Some(SortOrder::Size) => scan.media.sort_by_size(true),
                None => {}
            }

            match output {
                OutputFormat::Summary => {
                    println!("Export: {}", export_dir.display());
                    println!("─────────────────────────────────");
                    print!("{}", scan.stats);
                    if let Some(report) = load_report {
                        println!("Metadata loaded:  {:>7}", report.loaded);
                        println!("  Empty sidecars: {:>7}", report.empty);
                        println!("  Failed:         {:>7}", report.failed);
                    }
                }
                OutputFormat::Paths => {
                    for entry in scan.media.iter() {
                        println!("{}", entry.path().display());
                    }
                }
                OutputFormat::Json => {
                    let report = ScanReport {
                        stats: &scan.stats,
                        metadata: load_report,
                        media: scan.media.iter().map(EntryReport::new).collect(),
                    };
                    println!("{}", serde_json::to_string_pretty(&report)?);
                }
            }
        }

        Commands::Summary { export_dir } => {
            let scanner = ExportScanner::open(&export_dir)?;
            print!("{}", scanner.summary()?);
        }

        Commands::Inspect { sidecar } => {
            let metadata = read_sidecar(&sidecar)?;
            let report = InspectReport {
                tags: metadata.to_tags(),
                metadata: &metadata,
            };
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
    }

    Ok(())
}
