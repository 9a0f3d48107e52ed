//! Merge engine for combining per-language Crowdin files into one wide table
//!
//! Each language file contributes `<field>_<lang>` values to the entry of the
//! term named by the identifier's prefix. Terms keep the order in which they
//! were first seen, walking languages in configured order and rows in file
//! order.

use crate::config::{ProjectConfig, TermFile};
use crate::error::{Error, Result};
use crate::parser::parse_csv;
use crate::table::Table;
use indexmap::IndexMap;
use std::collections::HashMap;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// Translations gathered for a single term, keyed by `<field>_<lang>`
pub type TermTranslations = HashMap<String, String>;

/// Translations accumulated across language files, in first-seen term order
#[derive(Debug, Clone, Default)]
pub struct CombinedTranslations {
    terms: IndexMap<String, TermTranslations>,
    /// Language files that contributed, in merge order
    pub sources: Vec<PathBuf>,
}

impl CombinedTranslations {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one translated value, overwriting any earlier value for the same key
    pub fn insert(&mut self, local_name: &str, field: &str, lang: &str, text: impl Into<String>) {
        self.terms
            .entry(local_name.to_string())
            .or_default()
            .insert(translation_key(field, lang), text.into());
    }

    /// Look up one translated value
    pub fn get(&self, local_name: &str, field: &str, lang: &str) -> Option<&str> {
        self.terms
            .get(local_name)
            .and_then(|t| t.get(&translation_key(field, lang)))
            .map(String::as_str)
    }

    /// Number of distinct terms seen
    pub fn term_count(&self) -> usize {
        self.terms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    /// Terms in first-seen order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &TermTranslations)> {
        self.terms.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Add every row of one language's Crowdin table
    pub fn add_language_table(&mut self, table: &Table, lang: &str) -> Result<usize> {
        let id_idx = table.require_column("identifier")?;
        let text_idx = table.require_column("text")?;

        for (row_idx, row) in table.rows.iter().enumerate() {
            let identifier = row.text(id_idx);
            let (local_name, field) =
                split_identifier(identifier).ok_or_else(|| Error::MalformedIdentifier {
                    identifier: identifier.to_string(),
                    row: row_idx + 1,
                    path: table.source_path.clone(),
                })?;

            self.insert(local_name, field, lang, row.text(text_idx));
        }

        self.sources.push(table.source_path.clone());
        Ok(table.rows.len())
    }
}

fn translation_key(field: &str, lang: &str) -> String {
    format!("{}_{}", field, lang)
}

/// Split `term:field` on the first colon
pub fn split_identifier(identifier: &str) -> Option<(&str, &str)> {
    identifier.split_once(':')
}

/// Read every configured language file that exists for a term table
pub fn collect_translations(
    term_file: &TermFile,
    config: &ProjectConfig,
) -> Result<CombinedTranslations> {
    let mut combined = CombinedTranslations::new();

    for lang in &config.languages {
        let path = term_file.language_path(lang);
        if !path.exists() {
            tracing::debug!("no {} translations at {}", lang, path.display());
            continue;
        }

        tracing::info!("reading {}", path.display());
        let table = parse_csv(&path)?;
        combined.add_language_table(&table, lang)?;
    }

    Ok(combined)
}

/// Header of the combined table: `term_localName`, then each output field
/// across each language
pub fn translation_columns(config: &ProjectConfig) -> Vec<String> {
    let mut columns = vec!["term_localName".to_string()];
    for field in &config.output_fields {
        for lang in &config.languages {
            columns.push(translation_key(&field.column, lang));
        }
    }
    columns
}

/// Write the combined table
///
/// Quoting is deliberately minimal: a cell is quoted, with embedded quotes
/// doubled, only when it contains a comma or a quote. Newlines pass through
/// unquoted. Downstream scripts parse this exact shape.
pub fn write_translations<W: Write>(
    mut writer: W,
    combined: &CombinedTranslations,
    config: &ProjectConfig,
) -> std::io::Result<()> {
    writeln!(writer, "{}", translation_columns(config).join(","))?;

    for (local_name, translations) in combined.iter() {
        write!(writer, "{}", local_name)?;
        for field in &config.output_fields {
            for lang in &config.languages {
                match translations.get(&translation_key(&field.name, lang)) {
                    Some(text) => write!(writer, ",{}", quote_minimal(text))?,
                    None => write!(writer, ",")?,
                }
            }
        }
        writeln!(writer)?;
    }

    writer.flush()
}

/// Quote a cell only if it contains `,` or `"`
pub fn quote_minimal(text: &str) -> String {
    if text.contains(',') || text.contains('"') {
        format!("\"{}\"", text.replace('"', "\"\""))
    } else {
        text.to_string()
    }
}

/// Write the combined table to a file
pub fn write_translations_file<P: AsRef<Path>>(
    path: P,
    combined: &CombinedTranslations,
    config: &ProjectConfig,
) -> Result<()> {
    let path = path.as_ref();
    let file = File::create(path).map_err(|e| Error::FileWrite {
        path: path.to_path_buf(),
        source: e,
    })?;

    write_translations(BufWriter::new(file), combined, config).map_err(|e| Error::FileWrite {
        path: path.to_path_buf(),
        source: e,
    })
}

/// Merge the language files of a term table into `<base>-translations.csv`
pub fn merge_term_file(term_file: &TermFile, config: &ProjectConfig) -> Result<CombinedTranslations> {
    let output = term_file.translations_path();
    tracing::info!("generating file {}", output.display());

    let combined = collect_translations(term_file, config)?;
    write_translations_file(&output, &combined, config)?;

    tracing::info!(
        "merged {} terms from {} language files",
        combined.term_count(),
        combined.sources.len()
    );

    Ok(combined)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::OutputField;
    use crate::parser::parse_csv_str;

    fn small_config() -> ProjectConfig {
        ProjectConfig {
            languages: vec!["en".to_string(), "de".to_string()],
            ..ProjectConfig::default()
        }
    }

    fn render(combined: &CombinedTranslations, config: &ProjectConfig) -> String {
        let mut out = Vec::new();
        write_translations(&mut out, combined, config).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_split_identifier_first_colon() {
        assert_eq!(split_identifier("basisOfRecord:label"), Some(("basisOfRecord", "label")));
        assert_eq!(split_identifier("a:b:c"), Some(("a", "b:c")));
        assert_eq!(split_identifier("nocolon"), None);
    }

    #[test]
    fn test_columns_field_outer_language_inner() {
        assert_eq!(
            translation_columns(&small_config()),
            vec![
                "term_localName",
                "label_en",
                "label_de",
                "definition_en",
                "definition_de",
            ]
        );
    }

    #[test]
    fn test_merge_languages_in_first_seen_order() {
        let en = parse_csv_str(
            "identifier,context,text\n\
             b:label,ctx,Bee\n\
             a:label,ctx,Ay\n",
            "terms.en.csv",
        )
        .unwrap();
        let de = parse_csv_str(
            "identifier,context,text\n\
             c:label,ctx,Zeh\n\
             a:dcterms_description,ctx,Beschreibung\n",
            "terms.de.csv",
        )
        .unwrap();

        let mut combined = CombinedTranslations::new();
        combined.add_language_table(&en, "en").unwrap();
        combined.add_language_table(&de, "de").unwrap();

        let order: Vec<&str> = combined.iter().map(|(name, _)| name).collect();
        assert_eq!(order, vec!["b", "a", "c"]);
        assert_eq!(combined.get("a", "dcterms_description", "de"), Some("Beschreibung"));

        assert_eq!(
            render(&combined, &small_config()),
            "term_localName,label_en,label_de,definition_en,definition_de\n\
             b,Bee,,,\n\
             a,Ay,,,Beschreibung\n\
             c,,Zeh,,\n"
        );
    }

    #[test]
    fn test_unlisted_fields_are_not_written() {
        let mut combined = CombinedTranslations::new();
        combined.insert("t", "notes", "en", "A note");

        assert_eq!(
            render(&combined, &small_config()),
            "term_localName,label_en,label_de,definition_en,definition_de\nt,,,,\n"
        );
    }

    #[test]
    fn test_later_value_overwrites() {
        let mut combined = CombinedTranslations::new();
        combined.insert("t", "label", "en", "first");
        combined.insert("u", "label", "en", "other");
        combined.insert("t", "label", "en", "second");

        assert_eq!(combined.get("t", "label", "en"), Some("second"));
        assert_eq!(combined.iter().next().map(|(n, _)| n), Some("t"));
    }

    #[test]
    fn test_quote_minimal() {
        assert_eq!(quote_minimal("plain"), "plain");
        assert_eq!(quote_minimal("a, b"), "\"a, b\"");
        assert_eq!(quote_minimal("say \"x\""), "\"say \"\"x\"\"\"");
        assert_eq!(quote_minimal("two\nlines"), "two\nlines");
    }

    #[test]
    fn test_malformed_identifier() {
        let table = parse_csv_str("identifier,context,text\nok:label,,x\nbroken,,y\n", "terms.fr.csv")
            .unwrap();

        let mut combined = CombinedTranslations::new();
        match combined.add_language_table(&table, "fr") {
            Err(Error::MalformedIdentifier { identifier, row, .. }) => {
                assert_eq!(identifier, "broken");
                assert_eq!(row, 2);
            }
            other => panic!("expected MalformedIdentifier, got {:?}", other),
        }
    }

    #[test]
    fn test_missing_text_column() {
        let table = parse_csv_str("identifier,context\na:label,ctx\n", "terms.de.csv").unwrap();
        let result = CombinedTranslations::new().add_language_table(&table, "de");
        assert!(matches!(result, Err(Error::MissingColumn { ref column, .. }) if column == "text"));
    }

    #[test]
    fn test_merge_term_file_skips_missing_languages() {
        let dir = tempfile::tempdir().unwrap();
        let term_file = TermFile::new(dir.path().join("terms"));
        std::fs::write(
            term_file.language_path("de"),
            "identifier,context,text\nt:label,ctx,\"Etikett, kurz\"\n",
        )
        .unwrap();

        let mut config = small_config();
        config.output_fields = vec![OutputField::new("label", "label")];

        let combined = merge_term_file(&term_file, &config).unwrap();
        assert_eq!(combined.sources.len(), 1);

        let written = std::fs::read_to_string(term_file.translations_path()).unwrap();
        assert_eq!(written, "term_localName,label_en,label_de\nt,,\"Etikett, kurz\"\n");
    }

    #[test]
    fn test_merge_with_no_language_files() {
        let dir = tempfile::tempdir().unwrap();
        let term_file = TermFile::new(dir.path().join("terms"));

        let combined = merge_term_file(&term_file, &small_config()).unwrap();
        assert!(combined.is_empty());

        let written = std::fs::read_to_string(term_file.translations_path()).unwrap();
        assert_eq!(written, "term_localName,label_en,label_de,definition_en,definition_de\n");
    }
}
