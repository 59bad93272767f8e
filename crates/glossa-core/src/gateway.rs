//! Bridge between glossary files and the search index.
//!
//! The gateway owns no index state. Every call opens a session on the
//! backend, does its work and lets the session drop before returning,
//! whether it succeeded or not.

use crate::backend::{IndexBackend, IndexSession, LocalIndexBackend};
use crate::error::{GlossaError, Result};
use crate::index::{IndexStats, IndexedTerm, LookupHit, TermFilter, TermQuery};
use crate::path::{PathResolver, DEFAULT_EXTENSION};
use crate::persistence::IndexStore;
use crate::store::TermStore;
use crate::types::{GlossaryFileName, LanguagePair};
use std::path::Path;
use tracing::{info, instrument, warn};

/// Rebuilds and queries the term index.
///
/// ## Example
///
/// ```rust,ignore
/// use glossa_core::{IndexGateway, IndexStore};
///
/// let gateway = IndexGateway::local(IndexStore::new("/home/me/.glossa/.index"));
/// gateway.index_all(Path::new("/home/me/.glossa"))?;
/// for hit in gateway.lookup("spec", "en", "ja", None)? {
///     println!("{} ({})", hit.record.target_term(), hit.glossary);
/// }
/// ```
#[derive(Debug, Clone)]
pub struct IndexGateway<B = LocalIndexBackend> {
    backend: B,
    extension: String,
}

impl IndexGateway<LocalIndexBackend> {
    /// Gateway over an index stored on the local filesystem.
    pub fn local(store: IndexStore) -> Self {
        IndexGateway::new(LocalIndexBackend::new(store))
    }
}

impl<B: IndexBackend> IndexGateway<B> {
    pub fn new(backend: B) -> Self {
        IndexGateway {
            backend,
            extension: DEFAULT_EXTENSION.to_string(),
        }
    }

    /// Extension of the glossary files picked up by [`Self::index_all`].
    pub fn with_extension(mut self, extension: impl Into<String>) -> Self {
        self.extension = extension.into();
        self
    }

    /// Replace the index with every glossary found directly under `home`.
    ///
    /// Files whose names do not follow `<name>.<source>.<target>.<ext>` are
    /// skipped. A glossary that cannot be parsed aborts the rebuild and leaves
    /// the previous index in place.
    #[instrument(skip(self, home), fields(home = %home.display()))]
    pub fn index_all(&self, home: &Path) -> Result<IndexStats> {
        let mut session = self.backend.open()?;

        let resolver = PathResolver::new(home).with_extension(self.extension.clone());
        let pattern = resolver.home_pattern();
        let entries = glob::glob(&pattern).map_err(|e| GlossaError::ConfigError {
            reason: format!("invalid glossary home {}: {}", home.display(), e),
        })?;

        let mut terms = Vec::new();
        let mut glossary_count = 0u32;

        for entry in entries {
            let path = entry.map_err(|e| GlossaError::Io(e.into_error()))?;
            if !path.is_file() {
                continue;
            }

            let Some(file_name) = GlossaryFileName::parse(&path, &self.extension) else {
                warn!(path = %path.display(), "Skipping file with unrecognised name");
                continue;
            };

            let records = TermStore::new(&path).records()?;
            info!(
                glossary = %file_name.name,
                languages = %file_name.languages,
                terms = records.len(),
                "Indexing glossary"
            );

            terms.extend(records.into_iter().map(|record| {
                IndexedTerm::new(file_name.name.clone(), file_name.languages.clone(), record)
            }));
            glossary_count += 1;
        }

        session.rebuild(terms, glossary_count)
    }

    /// Look up `source_term` in glossaries with the given language pair,
    /// optionally restricted to one glossary.
    pub fn lookup(
        &self,
        source_term: &str,
        source_language: &str,
        target_language: &str,
        glossary: Option<&str>,
    ) -> Result<Vec<LookupHit>> {
        let languages = LanguagePair::new(source_language, target_language)?;
        let mut query = TermQuery::new(source_term).with_filter(TermFilter::LanguagePair(languages));
        if let Some(glossary) = glossary {
            query = query.with_filter(TermFilter::Glossary(glossary.to_string()));
        }
        self.search(&query)
    }

    /// Run an arbitrary query. The query text must not be blank.
    pub fn search(&self, query: &TermQuery) -> Result<Vec<LookupHit>> {
        if query.text().trim().is_empty() {
            return Err(GlossaError::invalid_term("lookup term must not be empty"));
        }
        let session = self.backend.open()?;
        session.query(query)
    }

    /// Statistics of the stored index.
    pub fn status(&self) -> Result<IndexStats> {
        let session = self.backend.open()?;
        session.stats()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn setup() -> (TempDir, PathResolver, IndexGateway) {
        let temp_dir = TempDir::new().unwrap();
        let resolver = PathResolver::new(temp_dir.path().join("home"));
        let gateway = IndexGateway::local(IndexStore::new(temp_dir.path().join("home/.index")));
        (temp_dir, resolver, gateway)
    }

    fn glossary(resolver: &PathResolver, name: &str, from: &str, to: &str) -> TermStore {
        let store = TermStore::new(resolver.build_path(name, from, to));
        store.create().unwrap();
        store
    }

    #[test]
    fn test_index_all_and_lookup() {
        let (_temp_dir, resolver, gateway) = setup();

        let spec = glossary(&resolver, "spec", "en", "ja");
        spec.add("spec", "テスト", "備考").unwrap();
        spec.add("bug", "バグ", "").unwrap();

        let other = glossary(&resolver, "other", "en", "ja");
        other.add("spec", "仕様", "").unwrap();

        let french = glossary(&resolver, "french", "en", "fr");
        french.add("spec", "spécification", "").unwrap();

        let stats = gateway.index_all(resolver.home()).unwrap();
        assert_eq!(stats.glossary_count, 3);
        assert_eq!(stats.term_count, 4);

        let hits = gateway.lookup("spec", "en", "ja", None).unwrap();
        assert_eq!(hits.len(), 2);
        let mut glossaries: Vec<_> = hits.iter().map(|h| h.glossary.as_str()).collect();
        glossaries.sort();
        assert_eq!(glossaries, vec!["other", "spec"]);

        let hits = gateway.lookup("spec", "en", "ja", Some("spec")).unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].record.target_term(), "テスト");
        assert_eq!(hits[0].record.note(), "備考");
    }

    #[test]
    fn test_index_home_with_glob_metacharacters() {
        let temp_dir = TempDir::new().unwrap();
        let resolver = PathResolver::new(temp_dir.path().join("glossaries[work]"));
        let gateway = IndexGateway::local(IndexStore::new(resolver.home().join(".index")));
        glossary(&resolver, "spec", "en", "ja").add("spec", "テスト", "").unwrap();

        let stats = gateway.index_all(resolver.home()).unwrap();
        assert_eq!(stats.glossary_count, 1);
        assert_eq!(stats.term_count, 1);
        assert_eq!(gateway.lookup("spec", "en", "ja", None).unwrap().len(), 1);
    }

    #[test]
    fn test_lookup_empty_term_rejected() {
        let (_temp_dir, resolver, gateway) = setup();
        glossary(&resolver, "spec", "en", "ja").add("spec", "テスト", "").unwrap();
        gateway.index_all(resolver.home()).unwrap();

        assert!(matches!(
            gateway.lookup("", "en", "ja", None),
            Err(GlossaError::InvalidTerm { .. })
        ));
        assert!(matches!(
            gateway.search(&TermQuery::new("  ")),
            Err(GlossaError::InvalidTerm { .. })
        ));
    }

    #[test]
    fn test_lookup_no_match_is_empty() {
        let (_temp_dir, resolver, gateway) = setup();
        glossary(&resolver, "spec", "en", "ja");

        gateway.index_all(resolver.home()).unwrap();
        assert!(gateway.lookup("anything", "en", "ja", None).unwrap().is_empty());
    }

    #[test]
    fn test_index_skips_unrelated_files() {
        let (_temp_dir, resolver, gateway) = setup();
        glossary(&resolver, "spec", "en", "ja").add("spec", "テスト", "").unwrap();
        fs::write(resolver.home().join("notes.yml"), "just: notes\n").unwrap();
        fs::write(resolver.home().join("readme.txt"), "hello").unwrap();

        let stats = gateway.index_all(resolver.home()).unwrap();
        assert_eq!(stats.glossary_count, 1);
        assert_eq!(stats.term_count, 1);
    }

    #[test]
    fn test_index_rebuild_replaces_content() {
        let (_temp_dir, resolver, gateway) = setup();
        let spec = glossary(&resolver, "spec", "en", "ja");
        spec.add("spec", "テスト", "").unwrap();
        gateway.index_all(resolver.home()).unwrap();

        spec.delete("spec", "テスト").unwrap();
        spec.add("bug", "バグ", "").unwrap();
        gateway.index_all(resolver.home()).unwrap();

        assert!(gateway.lookup("spec", "en", "ja", None).unwrap().is_empty());
        assert_eq!(gateway.lookup("bug", "en", "ja", None).unwrap().len(), 1);
        assert_eq!(gateway.status().unwrap().term_count, 1);
    }

    #[test]
    fn test_malformed_glossary_keeps_previous_index() {
        let (_temp_dir, resolver, gateway) = setup();
        glossary(&resolver, "spec", "en", "ja").add("spec", "テスト", "").unwrap();
        gateway.index_all(resolver.home()).unwrap();

        fs::write(resolver.build_path("broken", "en", "ja"), "- [unclosed\n").unwrap();
        assert!(matches!(
            gateway.index_all(resolver.home()),
            Err(GlossaError::MalformedGlossary { .. })
        ));
        assert_eq!(gateway.lookup("spec", "en", "ja", None).unwrap().len(), 1);
    }

    #[test]
    fn test_lookup_before_index() {
        let (_temp_dir, _resolver, gateway) = setup();
        let err = gateway.lookup("spec", "en", "ja", None).unwrap_err();
        assert!(err.requires_reindex());
    }

    #[test]
    fn test_index_unavailable() {
        let temp_dir = TempDir::new().unwrap();
        let blocker = temp_dir.path().join("blocker");
        fs::write(&blocker, b"").unwrap();

        let gateway = IndexGateway::local(IndexStore::new(blocker.join("index")));
        assert!(matches!(
            gateway.index_all(temp_dir.path()),
            Err(GlossaError::IndexUnavailable { .. })
        ));
    }
}
