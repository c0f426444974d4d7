// zip-starter CLI - build and inspect starter archives locally

mod output;
mod payload;

use std::path::{Path, PathBuf};
use std::time::Duration;

use clap::{Parser, Subcommand};
use colored::Colorize;
use zip_starter_core::{EntrySummary, FetchConfig, HttpFetcher, Payload};

/// zip-starter - Starter archive builder
#[derive(Parser)]
#[command(name = "zip-starter")]
#[command(version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build a starter archive from a JSON document
    Build {
        /// JSON file to use as the payload ("-" for stdin); starts empty if omitted
        payload: Option<String>,

        /// Set payload fields as key=value pairs (can be specified multiple times)
        #[arg(short, long = "set", value_name = "KEY=VALUE")]
        set: Vec<String>,

        /// Path used to name the archive when the payload has no uuid
        #[arg(short, long, default_value = "")]
        path: String,

        /// Directory to write the archive into
        #[arg(short, long, default_value = ".")]
        output: PathBuf,

        /// Give up on the remote document after this many seconds
        #[arg(long, value_name = "SECS")]
        fetch_timeout_secs: Option<u64>,

        /// List the entries without writing the archive
        #[arg(long)]
        dry_run: bool,
    },
    /// List the entries of an existing archive
    List {
        /// Path to the .zip file
        path: PathBuf,
    },
}

fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Build {
            payload,
            set,
            path,
            output,
            fetch_timeout_secs,
            dry_run,
        } => handle_build(
            payload.as_deref(),
            &set,
            &path,
            &output,
            fetch_timeout_secs,
            dry_run,
        ),
        Commands::List { path } => handle_list(&path),
    };

    if let Err(e) = result {
        eprintln!("{} {}", "✗".red().bold(), e);
        std::process::exit(1);
    }
}

fn handle_build(
    source: Option<&str>,
    assignments: &[String],
    path: &str,
    output_dir: &Path,
    fetch_timeout_secs: Option<u64>,
    dry_run: bool,
) -> anyhow::Result<()> {
    let mut payload = match source {
        Some(source) => payload::read_payload(source)?,
        None => Payload::new(),
    };
    payload::apply_assignments(&mut payload, assignments)?;

    let name = zip_starter_core::resolve_name(path, &payload)?;

    let fetcher = HttpFetcher::new(FetchConfig {
        timeout: fetch_timeout_secs.map(Duration::from_secs),
        max_body_bytes: None,
    });
    let archive = zip_starter_core::assemble(&name, &payload, &fetcher)?;

    if dry_run {
        let entries = zip_starter_core::read_entries(std::io::Cursor::new(archive.bytes()))?;
        println!("{} ({} bytes)", archive.filename(), archive.bytes().len());
        print_entries(&entries);
        return Ok(());
    }

    let written = output::write_archive(output_dir, &archive)?;
    println!(
        "{} Starter archive written to: {}",
        "✓".green().bold(),
        written.display()
    );
    if archive.fetch_outcome().attempted() {
        println!("  Included remote document as {}", name.html_entry());
    }

    Ok(())
}

fn handle_list(path: &Path) -> anyhow::Result<()> {
    let file = std::fs::File::open(path)
        .map_err(|e| anyhow::anyhow!("Failed to open '{}': {}", path.display(), e))?;
    let entries = zip_starter_core::read_entries(file)?;

    println!("{}", path.display());
    print_entries(&entries);
    Ok(())
}

fn print_entries(entries: &[EntrySummary]) {
    for entry in entries {
        if entry.is_dir {
            println!("  {}", entry.name.cyan());
        } else {
            println!("  {:<40} {:>10} bytes", entry.name, entry.size);
        }
    }
}
