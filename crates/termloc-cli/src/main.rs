//! termloc CLI
//!
//! Command-line tool for preparing term registries for Crowdin and
//! collecting the translations it produces.

use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use termloc_core::{
    build_all, export_term_file, merge_term_file, parse_csv, scan_translations, ProjectConfig,
};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "termloc")]
#[command(about = "Crowdin export and translation merge for term registries", long_about = None)]
#[command(version)]
struct Cli {
    /// Directory that term file paths are relative to
    #[arg(short, long, global = true, default_value = ".")]
    root: PathBuf,

    /// Project configuration (JSON); built-in defaults when omitted
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Log debug output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write Crowdin source files for every configured term table
    Export,

    /// Merge per-language Crowdin files into combined translation tables
    Merge,

    /// Export, then merge (the usual full run)
    Build,

    /// Report which translation files exist under the root
    Status,

    /// Write the default configuration to a file
    InitConfig {
        /// Output path for the configuration file
        #[arg(short, long)]
        output: PathBuf,
    },

    /// Display a CSV file such as a combined translations table
    Show {
        /// Path to CSV file
        #[arg(short, long)]
        file: PathBuf,

        /// Maximum number of rows to display
        #[arg(short, long)]
        limit: Option<usize>,
    },
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if let Err(e) = run(cli) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn run(cli: Cli) -> termloc_core::Result<()> {
    let config = cli.config.as_deref();

    match cli.command {
        Commands::Export => cmd_export(&cli.root, &load_config(config)?),
        Commands::Merge => cmd_merge(&cli.root, &load_config(config)?),
        Commands::Build => cmd_build(&cli.root, &load_config(config)?),
        Commands::Status => cmd_status(&cli.root, &load_config(config)?),
        Commands::InitConfig { output } => cmd_init_config(&output),
        Commands::Show { file, limit } => cmd_show(&file, limit),
    }
}

fn load_config(path: Option<&Path>) -> termloc_core::Result<ProjectConfig> {
    match path {
        Some(path) => {
            tracing::debug!("loading configuration from {}", path.display());
            ProjectConfig::load(path)
        }
        None => Ok(ProjectConfig::default()),
    }
}

fn cmd_export(root: &Path, config: &ProjectConfig) -> termloc_core::Result<()> {
    for term_file in config.term_files_in(root) {
        export_term_file(&term_file, config)?;
    }
    Ok(())
}

fn cmd_merge(root: &Path, config: &ProjectConfig) -> termloc_core::Result<()> {
    for term_file in config.term_files_in(root) {
        merge_term_file(&term_file, config)?;
    }
    Ok(())
}

fn cmd_build(root: &Path, config: &ProjectConfig) -> termloc_core::Result<()> {
    let results = build_all(root, config)?;

    for result in &results {
        println!(
            "{}: {} strings exported, {} terms translated",
            result.term_file.base().display(),
            result.export.records.len(),
            result.translations.term_count()
        );
    }
    tracing::info!("done");

    Ok(())
}

fn cmd_status(root: &Path, config: &ProjectConfig) -> termloc_core::Result<()> {
    let result = scan_translations(root, config)?;

    println!("Scanned {}", result.root.display());
    println!("Found {} term table(s) with translation files", result.sets.len());
    println!();

    for set in &result.sets {
        let mut flags = Vec::new();
        if !set.has_source {
            flags.push("no source table");
        }
        if set.has_combined {
            flags.push("combined table present");
        }
        let flags = if flags.is_empty() {
            String::new()
        } else {
            format!(" [{}]", flags.join(", "))
        };

        println!("{}{}", set.term_file.base().display(), flags);
        println!("  present: {}", set.present.join(", "));
        if !set.missing.is_empty() {
            println!("  missing: {}", set.missing.join(", "));
        }
    }

    Ok(())
}

fn cmd_init_config(output: &Path) -> termloc_core::Result<()> {
    ProjectConfig::default().save(output)?;
    println!("Created configuration file: {}", output.display());
    println!();
    println!("Edit the file to list your term tables, then run:");
    println!("  termloc --config {} build", output.display());

    Ok(())
}

fn cmd_show(file: &Path, limit: Option<usize>) -> termloc_core::Result<()> {
    let table = parse_csv(file)?;

    println!("File: {}", file.display());
    println!("Columns: {}", table.column_count());
    println!("Rows: {}", table.row_count());
    println!();

    let header: Vec<&str> = table.columns.iter().map(|c| c.name.as_str()).collect();
    println!("{}", header.join("\t"));
    println!("{}", "-".repeat(header.len() * 12));

    let row_limit = limit.unwrap_or(table.row_count());
    for row in table.rows.iter().take(row_limit) {
        println!("{}", row.cells.join("\t"));
    }

    if table.row_count() > row_limit {
        println!("... ({} more rows)", table.row_count() - row_limit);
    }

    Ok(())
}
