//! Directory scanner for discovering term tables and their translation files

use crate::config::{ProjectConfig, TermFile};
use crate::error::Result;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// A term table together with the language files found next to it
#[derive(Debug, Clone)]
pub struct TranslationSet {
    pub term_file: TermFile,
    /// Whether `<base>.csv` itself exists
    pub has_source: bool,
    /// Configured languages with a `<base>.<lang>.csv`, in configured order
    pub present: Vec<String>,
    /// Configured languages without one, in configured order
    pub missing: Vec<String>,
    /// Whether `<base>-translations.csv` exists
    pub has_combined: bool,
}

/// Result of scanning a directory tree
#[derive(Debug, Clone)]
pub struct ScanResult {
    pub root: PathBuf,
    /// Discovered sets, sorted by base path
    pub sets: Vec<TranslationSet>,
}

impl ScanResult {
    /// Find a set by its base path
    pub fn find_set(&self, base: &Path) -> Option<&TranslationSet> {
        self.sets.iter().find(|s| s.term_file.base() == base)
    }
}

/// Walk `root` and group `<base>.<lang>.csv` files by base
///
/// Only configured language codes count, so an unrelated `foo.bar.csv` does
/// not create a set. Plain `<base>.csv` files with no language files are
/// skipped as well; they may not be term tables at all.
pub fn scan_translations(root: &Path, config: &ProjectConfig) -> Result<ScanResult> {
    let mut found: BTreeMap<PathBuf, Vec<String>> = BTreeMap::new();

    for entry in WalkDir::new(root).follow_links(true) {
        let entry = match entry {
            Ok(entry) => entry,
            // An unreadable root means there is nothing to report
            Err(e) if e.depth() == 0 => return Err(e.into()),
            Err(e) => {
                tracing::warn!("skipping unreadable entry: {}", e);
                continue;
            }
        };
        let path = entry.path();

        if !entry.file_type().is_file() || !path.extension().is_some_and(|ext| ext == "csv") {
            continue;
        }

        let Some(stem) = path.file_stem().and_then(|s| s.to_str()) else {
            continue;
        };

        if let Some((base, lang)) = split_language(stem, &config.languages) {
            found
                .entry(path.with_file_name(base))
                .or_default()
                .push(lang.to_string());
        }
    }

    let sets = found
        .into_iter()
        .map(|(base, langs)| {
            let term_file = TermFile::new(base);
            let (present, missing): (Vec<String>, Vec<String>) = config
                .languages
                .iter()
                .cloned()
                .partition(|l| langs.contains(l));

            TranslationSet {
                has_source: term_file.source_path().is_file(),
                has_combined: term_file.translations_path().is_file(),
                term_file,
                present,
                missing,
            }
        })
        .collect();

    Ok(ScanResult {
        root: root.to_path_buf(),
        sets,
    })
}

/// Split `terms.zh-Hans` into (`terms`, `zh-Hans`) when the suffix is a known language
fn split_language<'a>(stem: &'a str, languages: &[String]) -> Option<(&'a str, &'a str)> {
    let (base, lang) = stem.rsplit_once('.')?;
    if base.is_empty() || !languages.iter().any(|l| l == lang) {
        return None;
    }
    Some((base, lang))
}
