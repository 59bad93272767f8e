//! In-memory term index spanning many glossaries.
//!
//! The `TermIndex` holds every record of every indexed glossary together with
//! the glossary it came from, and answers [`TermQuery`] lookups. It is built
//! in one pass by the indexer and persisted by [`crate::persistence::IndexStore`];
//! there are no incremental updates.
//!
//! ## Matching
//!
//! A query matches a term when the query text is a case-insensitive substring
//! of the term's `source_term`. Results are ranked:
//!
//! - exact match above prefix match above substring match
//! - terms from the preferred glossary above others
//! - shorter source terms above longer ones
//!
//! Ties keep index order.

use crate::types::{LanguagePair, TermRecord};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};

/// A record together with the glossary it was indexed from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexedTerm {
    /// Short name of the owning glossary
    pub glossary: String,

    /// Language pair of the owning glossary
    pub languages: LanguagePair,

    pub record: TermRecord,

    /// Pre-computed lowercase source term for case-insensitive matching
    source_lower: String,
}

impl IndexedTerm {
    pub fn new(glossary: impl Into<String>, languages: LanguagePair, record: TermRecord) -> Self {
        IndexedTerm {
            glossary: glossary.into(),
            languages,
            source_lower: record.source_term().to_lowercase(),
            record,
        }
    }
}

/// Statistics about the index
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IndexStats {
    /// Number of glossary files indexed
    pub glossary_count: u32,

    /// Number of terms indexed
    pub term_count: u64,

    /// When the index was last rebuilt
    pub last_updated: Option<DateTime<Utc>>,
}

/// Restricts which indexed terms a query may return.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TermFilter {
    /// Only terms from glossaries with this language pair
    LanguagePair(LanguagePair),

    /// Only terms from the named glossary
    Glossary(String),
}

impl TermFilter {
    fn accepts(&self, term: &IndexedTerm) -> bool {
        match self {
            TermFilter::LanguagePair(pair) => &term.languages == pair,
            TermFilter::Glossary(name) => &term.glossary == name,
        }
    }
}

/// A lookup request against the index.
#[derive(Debug, Clone)]
pub struct TermQuery {
    text_lower: String,
    filters: Vec<TermFilter>,
    preferred_glossary: Option<String>,
    limit: Option<usize>,
}

impl TermQuery {
    /// Match source terms containing `text` (case-insensitive).
    pub fn new(text: &str) -> Self {
        TermQuery {
            text_lower: text.to_lowercase(),
            filters: Vec::new(),
            preferred_glossary: None,
            limit: None,
        }
    }

    /// The lowercased query text.
    pub fn text(&self) -> &str {
        &self.text_lower
    }

    pub fn with_filter(mut self, filter: TermFilter) -> Self {
        self.filters.push(filter);
        self
    }

    /// Rank terms from this glossary ahead of the rest.
    pub fn prefer_glossary(mut self, glossary: impl Into<String>) -> Self {
        self.preferred_glossary = Some(glossary.into());
        self
    }

    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    fn score(&self, term: &IndexedTerm) -> Option<u32> {
        if !self.filters.iter().all(|f| f.accepts(term)) {
            return None;
        }

        let source = &term.source_lower;
        let kind_score = if *source == self.text_lower {
            3000
        } else if source.starts_with(&self.text_lower) {
            2000
        } else if source.contains(&self.text_lower) {
            1000
        } else {
            return None;
        };

        let preferred = self.preferred_glossary.as_deref() == Some(term.glossary.as_str());
        let glossary_boost = if preferred { 500 } else { 0 };
        let length_score = 100u32.saturating_sub(source.chars().count() as u32);

        Some(kind_score + glossary_boost + length_score)
    }
}

/// One lookup result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LookupHit {
    pub record: TermRecord,

    /// Glossary the record belongs to
    pub glossary: String,

    /// Relevance score (higher is more relevant)
    pub score: u32,
}

/// The set of indexed terms.
#[derive(Debug, Default)]
pub struct TermIndex {
    terms: Vec<IndexedTerm>,
    stats: IndexStats,
}

impl TermIndex {
    /// Create a new empty index.
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild from already-loaded parts (used when loading from disk).
    pub fn from_parts(terms: Vec<IndexedTerm>, stats: IndexStats) -> Self {
        TermIndex { terms, stats }
    }

    pub fn len(&self) -> usize {
        self.terms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    pub fn stats(&self) -> IndexStats {
        self.stats.clone()
    }

    pub fn terms(&self) -> &[IndexedTerm] {
        &self.terms
    }

    /// Replace the whole content of the index.
    #[instrument(skip(self, terms))]
    pub fn replace_all(&mut self, terms: Vec<IndexedTerm>, glossary_count: u32) {
        info!(
            terms = terms.len(),
            glossaries = glossary_count,
            "Replacing index content"
        );

        self.stats = IndexStats {
            glossary_count,
            term_count: terms.len() as u64,
            last_updated: Some(Utc::now()),
        };
        self.terms = terms;
    }

    /// Find terms matching the query, best first.
    pub fn search(&self, query: &TermQuery) -> Vec<LookupHit> {
        let mut hits: Vec<LookupHit> = self
            .terms
            .iter()
            .filter_map(|term| {
                query.score(term).map(|score| LookupHit {
                    record: term.record.clone(),
                    glossary: term.glossary.clone(),
                    score,
                })
            })
            .collect();

        // Stable: equal scores keep index order
        hits.sort_by(|a, b| b.score.cmp(&a.score));

        if let Some(limit) = query.limit {
            hits.truncate(limit);
        }

        debug!(query = %query.text_lower, hits = hits.len(), "Index searched");
        hits
    }
}
