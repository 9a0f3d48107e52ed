//! Full export-then-merge run over every configured term table

use crate::config::{ProjectConfig, TermFile};
use crate::error::Result;
use crate::exporter::{export_term_file, ExportReport};
use crate::merger::{merge_term_file, CombinedTranslations};
use std::path::Path;

/// Outcome of building one term table
#[derive(Debug, Clone)]
pub struct BuildResult {
    pub term_file: TermFile,
    pub export: ExportReport,
    pub translations: CombinedTranslations,
}

/// Export the source file, then merge all language files (the fresh source
/// file included) into the combined table
pub fn build_term_file(term_file: &TermFile, config: &ProjectConfig) -> Result<BuildResult> {
    let export = export_term_file(term_file, config)?;
    let translations = merge_term_file(term_file, config)?;

    Ok(BuildResult {
        term_file: term_file.clone(),
        export,
        translations,
    })
}

/// Build every configured term table under `root`, stopping at the first error
pub fn build_all(root: &Path, config: &ProjectConfig) -> Result<Vec<BuildResult>> {
    config
        .term_files_in(root)
        .iter()
        .map(|tf| build_term_file(tf, config))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_round_trip_preserves_text() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("terms")).unwrap();
        fs::write(
            dir.path().join("terms/terms.csv"),
            "term_localName,label,term_deprecated,dcterms_description\n\
             basisOfRecord,Basis Of Record,false,\"The nature of the data record, e.g. \"\"specimen\"\".\"\n\
             oldTerm,Old Term,true,Gone\n",
        )
        .unwrap();

        let config = ProjectConfig::default();
        let results = build_all(dir.path(), &config).unwrap();
        assert_eq!(results.len(), 1);

        let result = &results[0];
        assert_eq!(result.export.records.len(), 2);
        assert_eq!(result.export.deprecated_skipped, 1);
        assert_eq!(
            result
                .translations
                .get("basisOfRecord", "dcterms_description", "en"),
            Some("The nature of the data record, e.g. \"specimen\".")
        );
        assert_eq!(result.translations.get("oldTerm", "label", "en"), None);

        let combined = fs::read_to_string(dir.path().join("terms/terms-translations.csv")).unwrap();
        let mut lines = combined.lines();
        assert!(lines
            .next()
            .unwrap()
            .starts_with("term_localName,label_en,label_de,"));
        assert_eq!(
            lines.next().unwrap(),
            "basisOfRecord,Basis Of Record,,,,,,,,,\
             \"The nature of the data record, e.g. \"\"specimen\"\".\",,,,,,,,"
        );
        assert_eq!(lines.next(), None);
    }

    #[test]
    fn test_build_fails_on_missing_source() {
        let dir = tempfile::tempdir().unwrap();
        let result = build_all(dir.path(), &ProjectConfig::default());
        assert!(matches!(result, Err(crate::Error::FileRead { .. })));
    }
}
