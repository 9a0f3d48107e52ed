//! Project configuration: which tables to process, which fields to translate,
//! and which languages to collect.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

/// A field offered for translation, with the label shown to translators
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranslatableField {
    /// Column name in the source table (e.g., "dcterms_description")
    pub name: String,
    /// Display label used in the translator context (e.g., "Description")
    pub label: String,
}

impl TranslatableField {
    pub fn new(name: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            label: label.into(),
        }
    }
}

/// A field promoted into the combined translations table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputField {
    /// Field name as it appears in translation identifiers
    pub name: String,
    /// Column prefix in the combined table (e.g., "definition" for "definition_de")
    pub column: String,
}

impl OutputField {
    pub fn new(name: impl Into<String>, column: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            column: column.into(),
        }
    }
}

/// Configuration shared by the exporter and the merger
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectConfig {
    /// Term tables to process, as paths without the `.csv` extension
    pub term_files: Vec<String>,
    /// Fields offered for translation, in export order
    pub translatable_fields: Vec<TranslatableField>,
    /// Fields written to the combined translations table, in column order
    pub output_fields: Vec<OutputField>,
    /// Language codes collected by the merger, in column order
    pub languages: Vec<String>,
    /// Prefix joined with `term_localName` to form a term's URL
    pub term_namespace: String,
    /// Language code of the exported source file
    pub source_language: String,
}

impl Default for ProjectConfig {
    fn default() -> Self {
        Self {
            term_files: vec!["terms/terms".to_string()],
            translatable_fields: vec![
                TranslatableField::new("label", "Label"),
                TranslatableField::new("rdfs_comment", "Comment"),
                TranslatableField::new("dcterms_description", "Description"),
                TranslatableField::new("examples", "Examples"),
                TranslatableField::new("definition", "Definition"),
                TranslatableField::new("notes", "Notes"),
            ],
            output_fields: vec![
                OutputField::new("label", "label"),
                OutputField::new("dcterms_description", "definition"),
            ],
            languages: ["en", "de", "es", "fr", "ko", "nl", "ru", "zh-Hans", "zh-Hant"]
                .iter()
                .map(|l| l.to_string())
                .collect(),
            term_namespace: "http://rs.tdwg.org/dwc/terms/".to_string(),
            source_language: "en".to_string(),
        }
    }
}

impl ProjectConfig {
    /// Load a configuration from JSON and validate it
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref()).map_err(|e| Error::FileRead {
            path: path.as_ref().to_path_buf(),
            source: e,
        })?;
        let config: ProjectConfig = serde_json::from_str(&content).map_err(Error::Json)?;
        config.validate()?;
        Ok(config)
    }

    /// Save the configuration to JSON
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        fs::write(path.as_ref(), content).map_err(|e| Error::FileWrite {
            path: path.as_ref().to_path_buf(),
            source: e,
        })?;
        Ok(())
    }

    /// Reject configurations that would produce ambiguous identifiers or columns
    pub fn validate(&self) -> Result<()> {
        if self.languages.is_empty() {
            return Err(Error::Config("no languages configured".to_string()));
        }

        let mut seen = HashSet::new();
        for lang in &self.languages {
            if lang.is_empty() || lang.contains(['.', '/', '\\']) {
                return Err(Error::Config(format!("invalid language code '{}'", lang)));
            }
            if !seen.insert(lang.as_str()) {
                return Err(Error::Config(format!("duplicate language '{}'", lang)));
            }
        }

        let mut seen = HashSet::new();
        for field in &self.translatable_fields {
            if field.name.contains(':') {
                return Err(Error::Config(format!(
                    "field name '{}' must not contain ':'",
                    field.name
                )));
            }
            if !seen.insert(field.name.as_str()) {
                return Err(Error::Config(format!("duplicate field '{}'", field.name)));
            }
        }

        let mut columns = HashSet::new();
        let mut names = HashSet::new();
        for field in &self.output_fields {
            if field.column.is_empty() || field.column.contains([',', '"']) {
                return Err(Error::Config(format!(
                    "invalid output column '{}'",
                    field.column
                )));
            }
            if !columns.insert(field.column.as_str()) {
                return Err(Error::Config(format!(
                    "duplicate output column '{}'",
                    field.column
                )));
            }
            if !names.insert(field.name.as_str()) {
                return Err(Error::Config(format!(
                    "duplicate output field '{}'",
                    field.name
                )));
            }
            if !seen.contains(field.name.as_str()) {
                tracing::warn!(
                    "output field '{}' is not a translatable field; its columns will stay empty",
                    field.name
                );
            }
        }

        Ok(())
    }

    /// Configured term tables resolved against a root directory
    pub fn term_files_in(&self, root: &Path) -> Vec<TermFile> {
        self.term_files
            .iter()
            .map(|base| TermFile::new(root.join(base)))
            .collect()
    }
}

/// Paths belonging to one term table
///
/// Given the base `terms/terms`, the files are `terms/terms.csv` (source),
/// `terms/terms.<lang>.csv` (one per language, including the exported source
/// language) and `terms/terms-translations.csv` (combined output).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TermFile {
    base: PathBuf,
}

impl TermFile {
    pub fn new(base: impl Into<PathBuf>) -> Self {
        Self { base: base.into() }
    }

    /// Base path without extension
    pub fn base(&self) -> &Path {
        &self.base
    }

    /// The source term table
    pub fn source_path(&self) -> PathBuf {
        self.with_suffix(".csv")
    }

    /// The Crowdin file for one language
    pub fn language_path(&self, lang: &str) -> PathBuf {
        self.with_suffix(&format!(".{}.csv", lang))
    }

    /// The combined translations table
    pub fn translations_path(&self) -> PathBuf {
        self.with_suffix("-translations.csv")
    }

    fn with_suffix(&self, suffix: &str) -> PathBuf {
        let mut s = self.base.clone().into_os_string();
        s.push(suffix);
        PathBuf::from(s)
    }
}
