//! ledgerdig - Recover accounting records from raw indexed-file dumps
//!
//! This tool reads the chart of accounts, account balances, customers and
//! vendors out of `.DAT` files without a schema and writes them as CSV and
//! JSON.

use anyhow::{bail, Context, Result};
use clap::Parser;
use ledgerdig_core::{
    extract_with_fallback, ExtractionResult, Exporter, FileHeader, PatternSource, SourceKind,
    SourceSet,
};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, trace, Level};
use tracing_subscriber::EnvFilter;
use walkdir::WalkDir;

/// Recover chart of accounts, balances, customers and vendors from .DAT dumps
#[derive(Parser, Debug)]
#[command(name = "ledgerdig")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Directory containing the extracted .DAT files
    #[arg(short, long, env = "DATA_DIR")]
    input: PathBuf,

    /// Output directory for CSV and JSON files
    #[arg(short, long, env = "OUTPUT_DIR", default_value = "./output")]
    output: PathBuf,

    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Dry run - extract and report counts without writing files
    #[arg(long)]
    dry_run: bool,

    /// Only list recognized input files with their header diagnostics
    #[arg(long)]
    list_only: bool,
}

/// Input files found in the data directory
#[derive(Debug, Default)]
struct Discovery {
    sources: SourceSet,
    /// Every `.DAT` file, recognized or not
    dat_files: usize,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing
    let level = match cli.verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(level.into()))
        .with_target(false)
        .init();

    let discovery = discover(&cli.input)?;
    info!(
        "Found {} .DAT files, {} recognized",
        discovery.dat_files,
        discovery.sources.len()
    );

    if cli.list_only {
        return list_sources(&discovery.sources);
    }

    let engine = PatternSource::new(discovery.sources);
    let result = extract_with_fallback(None, &engine).context("Extraction failed")?;
    print_counts(&result);

    if cli.dry_run {
        println!("Dry run: nothing written");
        return Ok(());
    }

    let summary = Exporter::new(&cli.output)
        .write(&result)
        .with_context(|| format!("Failed to write output to {}", cli.output.display()))?;

    for path in &summary.written {
        println!("Wrote {}", path.display());
    }

    Ok(())
}

/// Locate the known data files in `dir`, matching names case-insensitively
fn discover(dir: &Path) -> Result<Discovery> {
    if !dir.exists() {
        bail!("Data directory not found: {}", dir.display());
    }
    if !dir.is_dir() {
        bail!("Path is not a directory: {}", dir.display());
    }

    info!("Scanning directory: {}", dir.display());

    let mut discovery = Discovery::default();

    for entry in WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .follow_links(false)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|e| e.ok())
    {
        let path = entry.path();
        if !path.is_file() {
            continue;
        }

        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            continue;
        };

        if !is_dat_file(name) {
            trace!("Skipping non-data file: {}", path.display());
            continue;
        }
        discovery.dat_files += 1;

        match SourceKind::from_file_name(name) {
            Some(kind) if discovery.sources.get(kind).is_none() => {
                debug!("Found {} at {}", kind, path.display());
                discovery.sources.insert(kind, path);
            }
            Some(kind) => debug!("Ignoring duplicate {}: {}", kind, path.display()),
            None => trace!("Unrecognized data file: {}", path.display()),
        }
    }

    if discovery.dat_files == 0 {
        bail!(
            "No .DAT files found in {} (extract the company backup archive first)",
            dir.display()
        );
    }

    if discovery.sources.is_empty() {
        let known: Vec<_> = SourceKind::ALL.iter().map(|k| k.file_name()).collect();
        bail!(
            "None of the expected data files ({}) found in {}",
            known.join(", "),
            dir.display()
        );
    }

    Ok(discovery)
}

fn is_dat_file(name: &str) -> bool {
    Path::new(name)
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("dat"))
}

/// Short content fingerprint (first 8 chars of blake3)
fn fingerprint(data: &[u8]) -> String {
    let hash = blake3::hash(data);
    hash.to_hex()[..8].to_string()
}

fn list_sources(sources: &SourceSet) -> Result<()> {
    for kind in SourceKind::ALL {
        let Some(path) = sources.get(kind) else {
            println!("{:<13} missing", kind.file_name());
            continue;
        };

        let data =
            fs::read(path).with_context(|| format!("Failed to read {}", path.display()))?;

        let header = match FileHeader::parse(&data) {
            Ok(h) => format!(
                "sig {}  records {}  keys {}",
                h.signature_hex(),
                h.record_count,
                h.key_count
            ),
            Err(e) => format!("header unreadable ({})", e),
        };

        println!(
            "{:<13} {:>10} bytes  {}  blake3 {}",
            kind.file_name(),
            data.len(),
            header,
            fingerprint(&data)
        );
    }
    Ok(())
}

fn print_counts(result: &ExtractionResult) {
    println!("Accounts:  {}", result.chart_of_accounts.len());
    println!("Balances:  {}", result.balances.len());
    println!("Customers: {}", result.customers.len());
    println!("Vendors:   {}", result.vendors.len());
    if result.is_empty() {
        println!("Nothing recovered; the files may not contain recognizable records");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn touch(dir: &Path, name: &str) {
        fs::write(dir.join(name), [0u8; 4]).unwrap();
    }

    #[test]
    fn test_discover_missing_directory() {
        let temp_dir = TempDir::new().unwrap();
        let err = discover(&temp_dir.path().join("nope")).unwrap_err();
        assert!(err.to_string().contains("not found"));
    }

    #[test]
    fn test_discover_not_a_directory() {
        let temp_dir = TempDir::new().unwrap();
        touch(temp_dir.path(), "CHART.DAT");
        let err = discover(&temp_dir.path().join("CHART.DAT")).unwrap_err();
        assert!(err.to_string().contains("not a directory"));
    }

    #[test]
    fn test_discover_requires_dat_files() {
        let temp_dir = TempDir::new().unwrap();
        touch(temp_dir.path(), "readme.txt");
        let err = discover(temp_dir.path()).unwrap_err();
        assert!(err.to_string().contains("No .DAT files"));
    }

    #[test]
    fn test_discover_matches_case_insensitively() {
        let temp_dir = TempDir::new().unwrap();
        touch(temp_dir.path(), "chart.dat");
        touch(temp_dir.path(), "Vendor.Dat");
        touch(temp_dir.path(), "JOURNAL.DAT");
        touch(temp_dir.path(), "notes.txt");

        let discovery = discover(temp_dir.path()).unwrap();
        assert_eq!(discovery.dat_files, 3);
        assert_eq!(discovery.sources.len(), 2);
        assert!(discovery.sources.get(SourceKind::Chart).is_some());
        assert!(discovery.sources.get(SourceKind::Vendor).is_some());
        assert!(discovery.sources.get(SourceKind::ChartAr).is_none());
    }

    #[test]
    fn test_discover_rejects_unrecognized_only() {
        let temp_dir = TempDir::new().unwrap();
        touch(temp_dir.path(), "JOURNAL.DAT");
        touch(temp_dir.path(), "GENERAL.dat");
        let err = discover(temp_dir.path()).unwrap_err();
        assert!(err.to_string().contains("None of the expected data files"));
        assert!(err.to_string().contains("CHART.DAT"));
    }

    #[test]
    fn test_is_dat_file() {
        assert!(is_dat_file("CHART.DAT"));
        assert!(is_dat_file("chart.dat"));
        assert!(!is_dat_file("chart.dat.bak"));
        assert!(!is_dat_file("DAT"));
    }

    #[test]
    fn test_fingerprint() {
        let a = fingerprint(b"hello");
        let b = fingerprint(b"hello");
        let c = fingerprint(b"world");

        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_eq!(a.len(), 8);
    }

    #[test]
    fn verify_cli() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
