//! termloc-core: Core library for translating vocabulary term registries
//!
//! This library provides functionality to:
//! - Read term tables and Crowdin files from CSV
//! - Export translatable term fields as Crowdin source files
//! - Merge per-language Crowdin files into one combined translations table
//! - Scan directories for translation files and report coverage

pub mod config;
pub mod error;
pub mod exporter;
pub mod merger;
pub mod parser;
pub mod pipeline;
pub mod scanner;
pub mod table;

pub use config::{OutputField, ProjectConfig, TermFile, TranslatableField};
pub use error::{Error, Result};
pub use exporter::{export_table, export_term_file, write_crowdin, ExportRecord, ExportReport};
pub use merger::{
    collect_translations, merge_term_file, quote_minimal, write_translations, CombinedTranslations,
};
pub use parser::{parse_csv, parse_csv_str};
pub use pipeline::{build_all, build_term_file, BuildResult};
pub use scanner::{scan_translations, ScanResult, TranslationSet};
pub use table::{Column, Row, Table};
