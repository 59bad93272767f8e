//! # Glossa Core Library
//!
//! This crate provides the glossary term store and the term index behind the
//! `glossa` command. A glossary is a YAML file of `(source_term, target_term,
//! note)` records for one language pair; the index spans every glossary in a
//! home directory for cross-glossary lookup.
//!
//! ## Architecture
//!
//! - **Types** (`types`): Term records, language pairs and glossary identity
//! - **Path** (`path`): Mapping glossary names to files under the home
//! - **Store** (`store`): Reading and mutating one glossary file
//! - **Index** (`index`): In-memory term index and query scoring
//! - **Backend** (`backend`): Traits the gateway uses to reach the index
//! - **Gateway** (`gateway`): Rebuilding and querying the index
//! - **Persistence** (`persistence`): On-disk storage of the index
//! - **Registry** (`registry`): Linking project glossaries into the home
//! - **Config** (`config`): Global and per-project configuration
//!
//! ## Example
//!
//! ```rust,ignore
//! use glossa_core::{Glossary, PathResolver, TermStore};
//!
//! let resolver = PathResolver::new("/home/me/.glossa");
//! let glossary = Glossary::new("spec", "en", "ja")?;
//!
//! let store = TermStore::new(resolver.resolve(&glossary));
//! store.create()?;
//! store.add("spec", "テスト", "")?;
//! ```

pub mod backend;
pub mod config;
pub mod error;
pub mod gateway;
pub mod index;
pub mod path;
pub mod persistence;
pub mod registry;
pub mod store;
pub mod types;

// Re-export commonly used types
pub use backend::{IndexBackend, IndexSession, LocalIndexBackend};
pub use config::{Config, ProjectConfig};
pub use error::{GlossaError, Result};
pub use gateway::IndexGateway;
pub use index::{IndexStats, LookupHit, TermFilter, TermQuery};
pub use path::PathResolver;
pub use persistence::IndexStore;
pub use store::{MutationOutcome, TermStore};
pub use types::{Glossary, GlossaryRef, LanguagePair, TermRecord};
