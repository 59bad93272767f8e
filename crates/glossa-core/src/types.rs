//! Core data types for Glossa.
//!
//! This module defines the value types shared by the store, the path
//! resolver and the index:
//!
//! - **`TermRecord`**: one glossary entry, validated at construction
//! - **`LanguagePair`**: the source/target language codes of a glossary
//! - **`GlossaryRef`**: how a glossary was addressed (short name or explicit path)
//! - **`Glossary`**: a reference plus its language pair

use crate::error::{GlossaError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

/// A single glossary entry.
///
/// Both terms are required and non-empty. `note` is always present; an
/// unspecified note is the empty string, never `None`, and is written to disk
/// as `note: ''`.
///
/// Deserialization goes through the same validation as [`TermRecord::new`],
/// so a record loaded from a file upholds the same invariants as one built
/// in code.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawTermRecord")]
pub struct TermRecord {
    source_term: String,
    target_term: String,
    note: String,
}

impl TermRecord {
    /// Create a validated record.
    pub fn new(
        source_term: impl Into<String>,
        target_term: impl Into<String>,
        note: impl Into<String>,
    ) -> Result<Self> {
        let source_term = source_term.into();
        let target_term = target_term.into();

        if source_term.is_empty() {
            return Err(GlossaError::invalid_term("source_term must not be empty"));
        }
        if target_term.is_empty() {
            return Err(GlossaError::invalid_term("target_term must not be empty"));
        }

        Ok(TermRecord {
            source_term,
            target_term,
            note: note.into(),
        })
    }

    pub fn source_term(&self) -> &str {
        &self.source_term
    }

    pub fn target_term(&self) -> &str {
        &self.target_term
    }

    pub fn note(&self) -> &str {
        &self.note
    }

    /// True if this record holds exactly the given bilingual pair.
    pub fn is_pair(&self, source_term: &str, target_term: &str) -> bool {
        self.source_term == source_term && self.target_term == target_term
    }

    /// Apply a partial update.
    ///
    /// An empty `target_term` or `note` keeps the current value; there is no
    /// way to distinguish "unspecified" from "clear this field".
    pub fn merged(&self, target_term: &str, note: &str) -> TermRecord {
        TermRecord {
            source_term: self.source_term.clone(),
            target_term: if target_term.is_empty() {
                self.target_term.clone()
            } else {
                target_term.to_string()
            },
            note: if note.is_empty() {
                self.note.clone()
            } else {
                note.to_string()
            },
        }
    }
}

impl fmt::Display for TermRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] [{}]", self.source_term, self.target_term)
    }
}

/// On-disk shape of a record before validation.
#[derive(Deserialize)]
struct RawTermRecord {
    source_term: String,
    target_term: String,
    #[serde(default)]
    note: Option<String>,
}

impl TryFrom<RawTermRecord> for TermRecord {
    type Error = GlossaError;

    fn try_from(raw: RawTermRecord) -> Result<Self> {
        TermRecord::new(raw.source_term, raw.target_term, raw.note.unwrap_or_default())
    }
}

/// Source and target language codes of a glossary (e.g. `en` -> `ja`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LanguagePair {
    pub source: String,
    pub target: String,
}

impl LanguagePair {
    /// Create a language pair, rejecting codes that cannot appear in a
    /// glossary file name.
    pub fn new(source: impl Into<String>, target: impl Into<String>) -> Result<Self> {
        let source = source.into();
        let target = target.into();
        validate_language_code(&source)?;
        validate_language_code(&target)?;
        Ok(LanguagePair { source, target })
    }
}

impl fmt::Display for LanguagePair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {}", self.source, self.target)
    }
}

fn validate_language_code(code: &str) -> Result<()> {
    if code.is_empty() {
        return Err(GlossaError::invalid_glossary("language code must not be empty"));
    }
    if code
        .chars()
        .any(|c| c == '.' || c.is_whitespace() || is_separator(c))
    {
        return Err(GlossaError::invalid_glossary(format!(
            "language code '{}' may not contain '.', whitespace or path separators",
            code
        )));
    }
    Ok(())
}

fn is_separator(c: char) -> bool {
    c == '/' || c == std::path::MAIN_SEPARATOR
}

/// How a glossary was addressed by the caller.
///
/// Decided once at the boundary: a name with a directory separator is a
/// path to an existing file location and is used verbatim, anything else is
/// a short name living under the glossary home.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GlossaryRef {
    ShortName(String),
    ExplicitPath(PathBuf),
}

impl GlossaryRef {
    /// Classify a user-supplied glossary name.
    pub fn parse(name: &str) -> Result<Self> {
        if name.trim().is_empty() {
            return Err(GlossaError::invalid_glossary("glossary name must not be empty"));
        }

        if name.chars().any(is_separator) {
            Ok(GlossaryRef::ExplicitPath(PathBuf::from(name)))
        } else {
            Ok(GlossaryRef::ShortName(name.to_string()))
        }
    }

    /// The name shown to users and attached to lookup hits.
    ///
    /// For explicit paths this is the file name up to its first `.`.
    pub fn display_name(&self) -> String {
        match self {
            GlossaryRef::ShortName(name) => name.clone(),
            GlossaryRef::ExplicitPath(path) => path
                .file_name()
                .and_then(|n| n.to_str())
                .and_then(|n| n.split('.').next())
                .unwrap_or_default()
                .to_string(),
        }
    }
}

impl fmt::Display for GlossaryRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GlossaryRef::ShortName(name) => write!(f, "{}", name),
            GlossaryRef::ExplicitPath(path) => write!(f, "{}", path.display()),
        }
    }
}

/// A glossary identity: where it lives and which languages it maps.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Glossary {
    pub reference: GlossaryRef,
    pub languages: LanguagePair,
}

impl Glossary {
    /// Build a glossary identity from raw user input.
    pub fn new(name: &str, source_language: &str, target_language: &str) -> Result<Self> {
        Ok(Glossary {
            reference: GlossaryRef::parse(name)?,
            languages: LanguagePair::new(source_language, target_language)?,
        })
    }

    pub fn name(&self) -> String {
        self.reference.display_name()
    }
}

/// The parts of a home glossary file name: `<name>.<source>.<target>.<ext>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GlossaryFileName {
    pub name: String,
    pub languages: LanguagePair,
}

impl GlossaryFileName {
    /// Parse a glossary file name, returning `None` if it does not follow the
    /// home naming convention.
    pub fn parse(path: &Path, extension: &str) -> Option<Self> {
        let file_name = path.file_name()?.to_str()?;
        let stem = file_name.strip_suffix(extension)?.strip_suffix('.')?;

        let mut parts = stem.rsplitn(3, '.');
        let target = parts.next()?;
        let source = parts.next()?;
        let name = parts.next()?;

        if name.is_empty() {
            return None;
        }

        let languages = LanguagePair::new(source, target).ok()?;
        Some(GlossaryFileName {
            name: name.to_string(),
            languages,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_term_record_requires_terms() {
        assert!(TermRecord::new("spec", "テスト", "").is_ok());
        assert!(matches!(
            TermRecord::new("", "テスト", ""),
            Err(GlossaError::InvalidTerm { .. })
        ));
        assert!(matches!(
            TermRecord::new("spec", "", ""),
            Err(GlossaError::InvalidTerm { .. })
        ));
    }

    #[test]
    fn test_merged_keeps_fields_on_empty() {
        let record = TermRecord::new("spec", "テスト", "備考").unwrap();

        let updated = record.merged("スペック", "");
        assert_eq!(updated.target_term(), "スペック");
        assert_eq!(updated.note(), "備考");

        let updated = record.merged("", "新しい備考");
        assert_eq!(updated.target_term(), "テスト");
        assert_eq!(updated.note(), "新しい備考");

        assert_eq!(record.merged("", ""), record);
    }

    #[test]
    fn test_missing_note_loads_as_empty() {
        let yaml = "- source_term: spec\n  target_term: テスト\n";
        let records: Vec<TermRecord> = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(records[0].note(), "");

        let yaml = "- source_term: spec\n  target_term: テスト\n  note:\n";
        let records: Vec<TermRecord> = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(records[0].note(), "");
    }

    #[test]
    fn test_empty_source_term_rejected_on_load() {
        let yaml = "- source_term: ''\n  target_term: テスト\n  note: ''\n";
        let result: std::result::Result<Vec<TermRecord>, _> = serde_yaml::from_str(yaml);
        assert!(result.is_err());
    }

    #[test]
    fn test_empty_note_is_written() {
        let record = TermRecord::new("spec", "テスト", "").unwrap();
        let yaml = serde_yaml::to_string(&vec![record]).unwrap();
        assert!(yaml.contains("note: ''"));
        assert!(yaml.contains("source_term: spec"));
    }

    #[test]
    fn test_glossary_ref_parse() {
        assert_eq!(
            GlossaryRef::parse("spec").unwrap(),
            GlossaryRef::ShortName("spec".to_string())
        );
        assert_eq!(
            GlossaryRef::parse("docs/spec.yml").unwrap(),
            GlossaryRef::ExplicitPath(PathBuf::from("docs/spec.yml"))
        );
        assert!(GlossaryRef::parse("  ").is_err());
    }

    #[test]
    fn test_display_name() {
        let r = GlossaryRef::parse("/tmp/project/terms.en.ja.yml").unwrap();
        assert_eq!(r.display_name(), "terms");
        assert_eq!(GlossaryRef::parse("spec").unwrap().display_name(), "spec");
    }

    #[test]
    fn test_language_pair_validation() {
        assert!(LanguagePair::new("en", "ja").is_ok());
        assert!(LanguagePair::new("zh-TW", "en_US").is_ok());
        assert!(LanguagePair::new("", "ja").is_err());
        assert!(LanguagePair::new("e.n", "ja").is_err());
        assert!(LanguagePair::new("en", "j/a").is_err());
    }

    #[test]
    fn test_glossary_file_name() {
        let parsed = GlossaryFileName::parse(Path::new("/home/g/spec.en.ja.yml"), "yml").unwrap();
        assert_eq!(parsed.name, "spec");
        assert_eq!(parsed.languages, LanguagePair::new("en", "ja").unwrap());

        let parsed =
            GlossaryFileName::parse(Path::new("my.project.en.ja.yml"), "yml").unwrap();
        assert_eq!(parsed.name, "my.project");

        assert!(GlossaryFileName::parse(Path::new("en.ja.yml"), "yml").is_none());
        assert!(GlossaryFileName::parse(Path::new("spec.en.ja.json"), "yml").is_none());
        assert!(GlossaryFileName::parse(Path::new("spec.yml"), "yml").is_none());
    }
}
