//! Glossary term store.
//!
//! A [`TermStore`] is bound to one glossary file and performs every operation
//! as a complete read-modify-write cycle: nothing is cached between calls, so
//! each mutation acts on what is currently on disk.
//!
//! ## File Format
//!
//! A YAML sequence of mappings, in insertion order:
//!
//! ```yaml
//! - source_term: spec
//!   target_term: テスト
//!   note: ''
//! - source_term: spec
//!   target_term: 仕様
//!   note: 備考
//! ```
//!
//! An empty glossary is an empty file. `add` appends a one-element sequence
//! to the end of the file; `update` and `delete` rewrite the whole file via a
//! temporary file and a rename.
//!
//! There is no locking. Two processes mutating the same file at once can
//! lose updates.

use crate::error::{GlossaError, Result};
use crate::types::TermRecord;
use std::fmt;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{debug, info, instrument};

/// Result of a mutating store operation that completed without error.
///
/// `DuplicatePair` and `TermNotFound` leave the file untouched; they are
/// reported to the user rather than failing the command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MutationOutcome {
    /// A new record was appended
    Added,
    /// An existing record was replaced in place
    Updated,
    /// This many records were removed
    Deleted { count: usize },
    /// The operation would have produced a duplicate (source, target) pair
    DuplicatePair {
        source_term: String,
        target_term: String,
    },
    /// No record matched
    TermNotFound {
        source_term: String,
        target_term: Option<String>,
    },
}

impl MutationOutcome {
    /// True if the glossary file was modified.
    pub fn changed(&self) -> bool {
        matches!(
            self,
            MutationOutcome::Added | MutationOutcome::Updated | MutationOutcome::Deleted { .. }
        )
    }
}

impl fmt::Display for MutationOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MutationOutcome::Added => write!(f, "term added"),
            MutationOutcome::Updated => write!(f, "term updated"),
            MutationOutcome::Deleted { count: 1 } => write!(f, "term deleted"),
            MutationOutcome::Deleted { count } => write!(f, "{} terms deleted", count),
            MutationOutcome::DuplicatePair {
                source_term,
                target_term,
            } => write!(f, "[{}] [{}] pair already exists", source_term, target_term),
            MutationOutcome::TermNotFound {
                source_term,
                target_term: Some(target_term),
            } => write!(
                f,
                "source_term:{} target_term:{} not found",
                source_term, target_term
            ),
            MutationOutcome::TermNotFound {
                source_term,
                target_term: None,
            } => write!(f, "source_term:{} not found", source_term),
        }
    }
}

/// Loads, mutates and persists the records of a single glossary file.
///
/// ## Example
///
/// ```rust,ignore
/// use glossa_core::{PathResolver, TermStore};
///
/// let resolver = PathResolver::new("/home/me/.glossa");
/// let store = TermStore::new(resolver.build_path("spec", "en", "ja"));
/// store.create()?;
/// store.add("spec", "テスト", "")?;
/// ```
#[derive(Debug, Clone)]
pub struct TermStore {
    path: PathBuf,
}

impl TermStore {
    /// Bind a store to a resolved glossary path. Nothing is read until an
    /// operation is invoked.
    pub fn new(path: impl AsRef<Path>) -> Self {
        TermStore {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Check if the glossary file exists.
    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    /// Create an empty glossary file, including missing parent directories.
    #[instrument(skip(self), fields(path = %self.path.display()))]
    pub fn create(&self) -> Result<()> {
        if self.exists() {
            return Err(GlossaError::GlossaryExists {
                path: self.path.clone(),
            });
        }

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&self.path)
            .map_err(|e| match e.kind() {
                std::io::ErrorKind::AlreadyExists => GlossaError::GlossaryExists {
                    path: self.path.clone(),
                },
                _ => GlossaError::Io(e),
            })?;

        info!("Glossary created");
        Ok(())
    }

    /// All records, in file order.
    pub fn records(&self) -> Result<Vec<TermRecord>> {
        self.check_exists()?;
        let contents = fs::read_to_string(&self.path)?;
        self.parse(&contents)
    }

    /// All records with the given source term, in file order.
    pub fn lookup_translations(&self, source_term: &str) -> Result<Vec<TermRecord>> {
        Ok(self
            .records()?
            .into_iter()
            .filter(|r| r.source_term() == source_term)
            .collect())
    }

    /// Append a record unless the (source, target) pair is already present.
    #[instrument(skip(self), fields(path = %self.path.display()))]
    pub fn add(&self, source_term: &str, target_term: &str, note: &str) -> Result<MutationOutcome> {
        self.check_exists()?;
        let record = TermRecord::new(source_term, target_term, note)?;

        let contents = fs::read_to_string(&self.path)?;
        let records = self.parse(&contents)?;

        if records.iter().any(|r| r.is_pair(source_term, target_term)) {
            let outcome = MutationOutcome::DuplicatePair {
                source_term: source_term.to_string(),
                target_term: target_term.to_string(),
            };
            info!(%outcome, "Add skipped");
            return Ok(outcome);
        }

        let mut chunk = String::new();
        if !contents.is_empty() && !contents.ends_with('\n') {
            chunk.push('\n');
        }
        chunk.push_str(&to_yaml(std::slice::from_ref(&record))?);

        if self.appends_cleanly(&contents, &chunk, records.len()) {
            let mut file = OpenOptions::new().append(true).open(&self.path)?;
            file.write_all(chunk.as_bytes())?;
        } else {
            // Flow sequences, `---` or `...` markers: a block item appended
            // after them would not parse, so rewrite in canonical form.
            let mut records = records;
            records.push(record.clone());
            self.write_records(&records)?;
        }

        info!(term = %record, "Term added");
        Ok(MutationOutcome::Added)
    }

    /// Replace the target term and/or note of the first record matching
    /// `(source_term, target_term)`.
    ///
    /// Empty `new_target_term` or `note` keep the current values. Refuses to
    /// rename onto a pair held by a different record.
    #[instrument(skip(self), fields(path = %self.path.display()))]
    pub fn update(
        &self,
        source_term: &str,
        target_term: &str,
        new_target_term: &str,
        note: &str,
    ) -> Result<MutationOutcome> {
        let mut records = self.records()?;
        let position = find_term_index(&records, source_term, target_term);

        let duplicate = !new_target_term.is_empty()
            && records
                .iter()
                .enumerate()
                .any(|(i, r)| Some(i) != position && r.is_pair(source_term, new_target_term));
        if duplicate {
            let outcome = MutationOutcome::DuplicatePair {
                source_term: source_term.to_string(),
                target_term: new_target_term.to_string(),
            };
            info!(%outcome, "Update skipped");
            return Ok(outcome);
        }

        let Some(position) = position else {
            return Ok(self.not_found(source_term, Some(target_term)));
        };

        records[position] = records[position].merged(new_target_term, note);
        self.write_records(&records)?;

        info!(term = %records[position], index = position, "Term updated");
        Ok(MutationOutcome::Updated)
    }

    /// Remove the first record matching `(source_term, target_term)`.
    #[instrument(skip(self), fields(path = %self.path.display()))]
    pub fn delete(&self, source_term: &str, target_term: &str) -> Result<MutationOutcome> {
        let mut records = self.records()?;

        let Some(position) = find_term_index(&records, source_term, target_term) else {
            return Ok(self.not_found(source_term, Some(target_term)));
        };

        let removed = records.remove(position);
        self.write_records(&records)?;

        info!(term = %removed, index = position, "Term deleted");
        Ok(MutationOutcome::Deleted { count: 1 })
    }

    /// Remove every record whose source term is `source_term`.
    ///
    /// This is a separate, explicit bulk operation; callers are expected to
    /// have confirmed it with the user.
    #[instrument(skip(self), fields(path = %self.path.display()))]
    pub fn delete_all(&self, source_term: &str) -> Result<MutationOutcome> {
        let mut records = self.records()?;
        let before = records.len();
        records.retain(|r| r.source_term() != source_term);
        let count = before - records.len();

        if count == 0 {
            return Ok(self.not_found(source_term, None));
        }

        self.write_records(&records)?;

        info!(source_term, count, "Terms deleted");
        Ok(MutationOutcome::Deleted { count })
    }

    fn not_found(&self, source_term: &str, target_term: Option<&str>) -> MutationOutcome {
        let outcome = MutationOutcome::TermNotFound {
            source_term: source_term.to_string(),
            target_term: target_term.map(str::to_string),
        };
        info!(%outcome, "No matching term");
        outcome
    }

    /// True if appending `chunk` to `contents` yields exactly one more record.
    fn appends_cleanly(&self, contents: &str, chunk: &str, current: usize) -> bool {
        if contents.trim().is_empty() {
            return true;
        }
        let combined = format!("{}{}", contents, chunk);
        matches!(self.parse(&combined), Ok(records) if records.len() == current + 1)
    }

    fn check_exists(&self) -> Result<()> {
        if !self.exists() {
            return Err(GlossaError::GlossaryNotFound {
                path: self.path.clone(),
            });
        }
        Ok(())
    }

    fn parse(&self, contents: &str) -> Result<Vec<TermRecord>> {
        if contents.trim().is_empty() {
            return Ok(Vec::new());
        }

        let records: Option<Vec<TermRecord>> =
            serde_yaml::from_str(contents).map_err(|e| GlossaError::MalformedGlossary {
                path: self.path.clone(),
                reason: e.to_string(),
            })?;

        let records = records.unwrap_or_default();
        debug!(terms = records.len(), "Glossary loaded");
        Ok(records)
    }

    /// Rewrite the whole file with `records`.
    ///
    /// Writes to a temporary sibling and renames it over the target. A
    /// symlinked glossary is resolved first so the link itself survives.
    fn write_records(&self, records: &[TermRecord]) -> Result<()> {
        let target = if fs::symlink_metadata(&self.path)?.file_type().is_symlink() {
            fs::canonicalize(&self.path)?
        } else {
            self.path.clone()
        };

        let contents = if records.is_empty() {
            String::new()
        } else {
            to_yaml(records)?
        };

        let temp_path = temp_path_for(&target);
        fs::write(&temp_path, contents)?;
        if let Err(e) = fs::rename(&temp_path, &target) {
            let _ = fs::remove_file(&temp_path);
            return Err(e.into());
        }

        debug!(path = %target.display(), terms = records.len(), "Glossary rewritten");
        Ok(())
    }
}

/// Index of the first record holding the pair. Corrupted files may contain
/// duplicates; the earliest one wins.
fn find_term_index(records: &[TermRecord], source_term: &str, target_term: &str) -> Option<usize> {
    records.iter().position(|r| r.is_pair(source_term, target_term))
}

fn to_yaml(records: &[TermRecord]) -> Result<String> {
    serde_yaml::to_string(records).map_err(|e| GlossaError::serialization(e.to_string()))
}

fn temp_path_for(path: &Path) -> PathBuf {
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    path.with_file_name(format!(".{}.tmp", file_name))
}
