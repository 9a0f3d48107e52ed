//! Exporter: turns a term table into a Crowdin source file
//!
//! Every translatable field of every current term becomes one
//! `identifier,context,text` row, where the identifier is
//! `<term_localName>:<field>` and is the join key used when translations
//! come back.

use crate::config::{ProjectConfig, TermFile};
use crate::error::{Error, Result};
use crate::parser::parse_csv;
use crate::table::Table;
use regex::Regex;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use std::sync::LazyLock;

/// Header of every Crowdin file
pub const CROWDIN_HEADER: [&str; 3] = ["identifier", "context", "text"];

pub const TERM_LOCAL_NAME: &str = "term_localName";
pub const TERM_LABEL: &str = "label";
pub const TERM_DEPRECATED: &str = "term_deprecated";

const EXAMPLES_FIELD: &str = "examples";

/// A backtick-quoted example plus trailing separators
static QUOTED_EXAMPLE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"`[^`]+`[;., \n]*").expect("valid regex"));

/// One row of a Crowdin source file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportRecord {
    pub identifier: String,
    pub context: String,
    pub text: String,
}

/// Records produced from one term table, with skip counters
#[derive(Debug, Clone, Default)]
pub struct ExportReport {
    pub records: Vec<ExportRecord>,
    /// Terms left out because they are deprecated
    pub deprecated_skipped: usize,
    /// Examples fields left out because they held nothing but examples
    pub examples_skipped: usize,
}

/// Build the Crowdin records for a parsed term table
pub fn export_table(table: &Table, config: &ProjectConfig) -> Result<ExportReport> {
    let name_idx = table.require_column(TERM_LOCAL_NAME)?;
    let label_idx = table.require_column(TERM_LABEL)?;
    let deprecated_idx = table.require_column(TERM_DEPRECATED)?;

    // Fields absent from this table are simply never offered
    let fields: Vec<(usize, &str, &str)> = config
        .translatable_fields
        .iter()
        .filter_map(|f| {
            table
                .find_column(&f.name)
                .map(|c| (c.index, f.name.as_str(), f.label.as_str()))
        })
        .collect();

    let mut report = ExportReport::default();

    for row in &table.rows {
        if row.text(deprecated_idx) == "true" {
            report.deprecated_skipped += 1;
            continue;
        }

        let local_name = row.text(name_idx);
        let term_label = row.text(label_idx);

        for &(idx, field, field_label) in &fields {
            let text = row.text(idx);
            if text.is_empty() {
                continue;
            }

            if field == EXAMPLES_FIELD && only_examples(text) {
                report.examples_skipped += 1;
                continue;
            }

            report.records.push(ExportRecord {
                identifier: format!("{}:{}", local_name, field),
                context: format!(
                    "{} for {} {}{}",
                    field_label, term_label, config.term_namespace, local_name
                ),
                text: text.to_string(),
            });
        }
    }

    Ok(report)
}

/// True when removing the quoted examples leaves less than two characters
pub fn only_examples(text: &str) -> bool {
    QUOTED_EXAMPLE.replace_all(text, "").chars().count() < 2
}

/// Write records as a Crowdin CSV with standard minimal quoting
pub fn write_crowdin<W: Write>(writer: W, records: &[ExportRecord]) -> csv::Result<()> {
    let mut csv_writer = csv::WriterBuilder::new()
        .quote_style(csv::QuoteStyle::Necessary)
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(writer);

    csv_writer.write_record(CROWDIN_HEADER)?;
    for record in records {
        csv_writer.write_record([&record.identifier, &record.context, &record.text])?;
    }
    csv_writer.flush()?;
    Ok(())
}

/// Write records to a Crowdin CSV file
pub fn write_crowdin_file<P: AsRef<Path>>(path: P, records: &[ExportRecord]) -> Result<()> {
    let path = path.as_ref();
    let file = File::create(path).map_err(|e| Error::FileWrite {
        path: path.to_path_buf(),
        source: e,
    })?;

    write_crowdin(BufWriter::new(file), records).map_err(|e| Error::Csv {
        path: path.to_path_buf(),
        source: e,
    })
}

/// Export `<base>.csv` to `<base>.<source_language>.csv`
pub fn export_term_file(term_file: &TermFile, config: &ProjectConfig) -> Result<ExportReport> {
    let source = term_file.source_path();
    tracing::info!("processing source file {}", source.display());

    let table = parse_csv(&source)?;
    let report = export_table(&table, config)?;

    let output = term_file.language_path(&config.source_language);
    write_crowdin_file(&output, &report.records)?;

    tracing::info!(
        "wrote {} strings to {} ({} deprecated terms skipped, {} examples-only fields skipped)",
        report.records.len(),
        output.display(),
        report.deprecated_skipped,
        report.examples_skipped
    );

    Ok(report)
}
