//! Index backend traits.
//!
//! The gateway talks to the search index only through these traits, so the
//! storage behind it can be swapped without touching the term store or the
//! command layer. The contract is intentionally narrow: rebuild everything,
//! or query.
//!
//! A backend hands out sessions. A session is the span during which the index
//! is open; it is released when the session is dropped, on every exit path.

use crate::error::Result;
use crate::index::{IndexStats, IndexedTerm, LookupHit, TermIndex, TermQuery};
use crate::persistence::IndexStore;
use tracing::debug;

/// Something that can open an index for a single rebuild or lookup.
pub trait IndexBackend {
    type Session: IndexSession;

    /// Open the index. Fails if the backing storage cannot be reached.
    fn open(&self) -> Result<Self::Session>;
}

/// An open index.
pub trait IndexSession {
    /// Drop all existing content and index `terms` from `glossary_count`
    /// glossaries instead.
    fn rebuild(&mut self, terms: Vec<IndexedTerm>, glossary_count: u32) -> Result<IndexStats>;

    /// Run a query. No match is an empty result, not an error.
    fn query(&self, query: &TermQuery) -> Result<Vec<LookupHit>>;

    /// Statistics of the currently stored index.
    fn stats(&self) -> Result<IndexStats>;
}

/// Index kept on the local filesystem by an [`IndexStore`].
#[derive(Debug, Clone)]
pub struct LocalIndexBackend {
    store: IndexStore,
}

impl LocalIndexBackend {
    pub fn new(store: IndexStore) -> Self {
        LocalIndexBackend { store }
    }
}

impl IndexBackend for LocalIndexBackend {
    type Session = LocalIndexSession;

    fn open(&self) -> Result<LocalIndexSession> {
        self.store.ensure_dir()?;
        debug!(path = %self.store.base_dir().display(), "Index opened");
        Ok(LocalIndexSession {
            store: self.store.clone(),
            loaded: None,
        })
    }
}

/// Session over a [`LocalIndexBackend`]. The index file is read on each query
/// unless this session rebuilt it, and written immediately on rebuild.
#[derive(Debug)]
pub struct LocalIndexSession {
    store: IndexStore,
    loaded: Option<TermIndex>,
}

impl IndexSession for LocalIndexSession {
    fn rebuild(&mut self, terms: Vec<IndexedTerm>, glossary_count: u32) -> Result<IndexStats> {
        let mut index = TermIndex::new();
        index.replace_all(terms, glossary_count);
        self.store.save(&index)?;

        let stats = index.stats();
        self.loaded = Some(index);
        Ok(stats)
    }

    fn query(&self, query: &TermQuery) -> Result<Vec<LookupHit>> {
        match &self.loaded {
            Some(index) => Ok(index.search(query)),
            None => Ok(self.store.load()?.search(query)),
        }
    }

    fn stats(&self) -> Result<IndexStats> {
        match &self.loaded {
            Some(index) => Ok(index.stats()),
            None => Ok(self.store.load()?.stats()),
        }
    }
}

impl Drop for LocalIndexSession {
    fn drop(&mut self) {
        debug!(path = %self.store.base_dir().display(), "Index closed");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::GlossaError;
    use crate::types::{LanguagePair, TermRecord};
    use tempfile::TempDir;

    #[test]
    fn test_rebuild_then_query() {
        let temp_dir = TempDir::new().unwrap();
        let backend = LocalIndexBackend::new(IndexStore::new(temp_dir.path().join("idx")));

        {
            let mut session = backend.open().unwrap();
            let stats = session
                .rebuild(
                    vec![IndexedTerm::new(
                        "spec",
                        LanguagePair::new("en", "ja").unwrap(),
                        TermRecord::new("spec", "テスト", "").unwrap(),
                    )],
                    1,
                )
                .unwrap();
            assert_eq!(stats.term_count, 1);
        }

        let session = backend.open().unwrap();
        let hits = session.query(&TermQuery::new("spec")).unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].glossary, "spec");
        assert_eq!(session.stats().unwrap().glossary_count, 1);
    }

    #[test]
    fn test_query_without_index() {
        let temp_dir = TempDir::new().unwrap();
        let backend = LocalIndexBackend::new(IndexStore::new(temp_dir.path()));

        let session = backend.open().unwrap();
        assert!(matches!(
            session.query(&TermQuery::new("spec")),
            Err(GlossaError::IndexNotFound { .. })
        ));
    }
}
