//! Persistence layer for the term index.
//!
//! This module handles saving and loading the [`TermIndex`] to/from disk. The
//! index is derived data (it can always be rebuilt from the glossary files),
//! so the format favours simple, fast loading with corruption detection over
//! long-term compatibility.
//!
//! ## Index File Format
//!
//! ```text
//! [Header: 32 bytes]
//!   - Magic: "GLSX" (4 bytes)
//!   - Version: u32 (4 bytes)
//!   - Flags: u32 (4 bytes) - compression
//!   - Term count: u64 (8 bytes)
//!   - Reserved: 12 bytes
//!
//! [Payload: variable]
//!   - bincode StoredIndex, optionally LZ4 compressed
//!
//! [Footer: 8 bytes]
//!   - CRC32 checksum of the payload: u32
//!   - Magic: "XSLG" (4 bytes)
//! ```

use crate::error::{GlossaError, Result};
use crate::index::{IndexStats, IndexedTerm, TermIndex};
use crate::types::{LanguagePair, TermRecord};
use serde::{Deserialize, Serialize};
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Magic bytes at the start of index files
pub const MAGIC_HEADER: &[u8; 4] = b"GLSX";
/// Magic bytes at the end of index files (reversed)
pub const MAGIC_FOOTER: &[u8; 4] = b"XSLG";
/// Current index format version
pub const INDEX_VERSION: u32 = 1;

const HEADER_LEN: usize = 32;
const FOOTER_LEN: usize = 8;

/// Flags for index file format
#[derive(Debug, Clone, Copy)]
pub struct IndexFlags(u32);

impl IndexFlags {
    /// No compression
    pub const NONE: Self = IndexFlags(0);
    /// LZ4 compression
    pub const COMPRESSED_LZ4: Self = IndexFlags(1);

    fn is_compressed(&self) -> bool {
        self.0 & 1 != 0
    }
}

/// Header structure for the index file
#[derive(Debug, Clone, Serialize, Deserialize)]
struct IndexHeader {
    magic: [u8; 4],
    version: u32,
    flags: u32,
    term_count: u64,
    reserved: [u8; 12],
}

impl IndexHeader {
    fn new(term_count: u64, flags: IndexFlags) -> Self {
        IndexHeader {
            magic: *MAGIC_HEADER,
            version: INDEX_VERSION,
            flags: flags.0,
            term_count,
            reserved: [0; 12],
        }
    }

    fn validate(&self) -> Result<()> {
        if self.magic != *MAGIC_HEADER {
            return Err(GlossaError::IndexCorrupted {
                reason: "Invalid magic bytes in header".to_string(),
            });
        }
        if self.version != INDEX_VERSION {
            return Err(GlossaError::IndexVersionMismatch {
                found: self.version,
                expected: INDEX_VERSION,
            });
        }
        Ok(())
    }
}

/// Term as stored on disk
#[derive(Debug, Clone, Serialize, Deserialize)]
struct StoredTerm {
    glossary: String,
    source_language: String,
    target_language: String,
    source_term: String,
    target_term: String,
    note: String,
}

impl From<&IndexedTerm> for StoredTerm {
    fn from(term: &IndexedTerm) -> Self {
        StoredTerm {
            glossary: term.glossary.clone(),
            source_language: term.languages.source.clone(),
            target_language: term.languages.target.clone(),
            source_term: term.record.source_term().to_string(),
            target_term: term.record.target_term().to_string(),
            note: term.record.note().to_string(),
        }
    }
}

impl StoredTerm {
    fn into_indexed_term(self) -> Result<IndexedTerm> {
        let languages = LanguagePair::new(self.source_language, self.target_language)
            .map_err(|e| GlossaError::IndexCorrupted {
                reason: e.to_string(),
            })?;
        let record = TermRecord::new(self.source_term, self.target_term, self.note).map_err(
            |e| GlossaError::IndexCorrupted {
                reason: e.to_string(),
            },
        )?;
        Ok(IndexedTerm::new(self.glossary, languages, record))
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct StoredIndex {
    stats: IndexStats,
    terms: Vec<StoredTerm>,
}

/// Manages persistence of the index to disk.
///
/// ## Example
///
/// ```rust,ignore
/// use glossa_core::{IndexStore, TermIndex};
///
/// let store = IndexStore::new("/home/me/.glossa/.index");
/// store.save(&TermIndex::new())?;
/// let loaded = store.load()?;
/// ```
#[derive(Debug, Clone)]
pub struct IndexStore {
    /// Base directory for storing index files
    base_dir: PathBuf,

    /// Whether to use compression
    use_compression: bool,
}

impl IndexStore {
    /// Create a new IndexStore with the given base directory.
    ///
    /// The directory is created on first save.
    pub fn new(base_dir: impl AsRef<Path>) -> Self {
        IndexStore {
            base_dir: base_dir.as_ref().to_path_buf(),
            use_compression: true,
        }
    }

    /// Set whether to use compression when saving.
    pub fn with_compression(mut self, compress: bool) -> Self {
        self.use_compression = compress;
        self
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    /// Get the path to the main index file.
    pub fn index_path(&self) -> PathBuf {
        self.base_dir.join("terms.idx")
    }

    /// Get the path to a backup index file.
    fn backup_path(&self) -> PathBuf {
        self.base_dir.join("terms.idx.bak")
    }

    /// Get the path to a temporary file during save.
    fn temp_path(&self) -> PathBuf {
        self.base_dir.join("terms.idx.tmp")
    }

    /// Check if an index file exists.
    pub fn exists(&self) -> bool {
        self.index_path().exists()
    }

    /// Make sure the index directory exists and is a directory.
    pub fn ensure_dir(&self) -> Result<()> {
        fs::create_dir_all(&self.base_dir).map_err(|e| GlossaError::IndexUnavailable {
            path: self.base_dir.clone(),
            reason: e.to_string(),
        })?;

        if !self.base_dir.is_dir() {
            return Err(GlossaError::IndexUnavailable {
                path: self.base_dir.clone(),
                reason: "not a directory".to_string(),
            });
        }
        Ok(())
    }

    /// Save the index to disk.
    ///
    /// Uses atomic write (write to temp, then rename) to prevent corruption.
    pub fn save(&self, index: &TermIndex) -> Result<()> {
        self.ensure_dir()?;

        let stored = StoredIndex {
            stats: index.stats(),
            terms: index.terms().iter().map(StoredTerm::from).collect(),
        };
        let term_count = stored.terms.len() as u64;

        info!(
            path = %self.index_path().display(),
            terms = term_count,
            "Saving index to disk"
        );

        let bytes = bincode::serialize(&stored)?;
        let (flags, payload) = if self.use_compression {
            (IndexFlags::COMPRESSED_LZ4, lz4_flex::compress_prepend_size(&bytes))
        } else {
            (IndexFlags::NONE, bytes)
        };

        let temp_path = self.temp_path();
        {
            let file = File::create(&temp_path)?;
            let mut writer = BufWriter::new(file);

            let header_bytes = bincode::serialize(&IndexHeader::new(term_count, flags))?;
            writer.write_all(&header_bytes)?;
            writer.write_all(&payload)?;

            let checksum = crc32fast::hash(&payload);
            writer.write_all(&checksum.to_le_bytes())?;
            writer.write_all(MAGIC_FOOTER)?;

            writer.flush()?;
        }

        // Backup existing index
        let index_path = self.index_path();
        let backup_path = self.backup_path();
        if index_path.exists() {
            if let Err(e) = fs::remove_file(&backup_path) {
                if e.kind() != std::io::ErrorKind::NotFound {
                    warn!(path = %backup_path.display(), error = %e, "Could not remove old index backup");
                }
            }
            if let Err(e) = fs::rename(&index_path, &backup_path) {
                warn!(path = %backup_path.display(), error = %e, "Could not back up previous index");
            }
        }

        fs::rename(&temp_path, &index_path)?;

        debug!(compressed = self.use_compression, "Index saved successfully");
        Ok(())
    }

    /// Load the index from disk.
    pub fn load(&self) -> Result<TermIndex> {
        let index_path = self.index_path();

        if !self.exists() {
            return Err(GlossaError::IndexNotFound { path: index_path });
        }

        info!(path = %index_path.display(), "Loading index from disk");

        let data = fs::read(&index_path)?;
        if data.len() < HEADER_LEN + FOOTER_LEN {
            return Err(GlossaError::IndexCorrupted {
                reason: format!("File too short ({} bytes)", data.len()),
            });
        }

        let header: IndexHeader = bincode::deserialize(&data[..HEADER_LEN]).map_err(|e| {
            GlossaError::IndexCorrupted {
                reason: format!("Unreadable header: {}", e),
            }
        })?;
        header.validate()?;

        let payload = &data[HEADER_LEN..data.len() - FOOTER_LEN];
        let footer = &data[data.len() - FOOTER_LEN..];

        if &footer[4..8] != MAGIC_FOOTER {
            return Err(GlossaError::IndexCorrupted {
                reason: "Invalid footer magic bytes".to_string(),
            });
        }

        let stored_checksum = u32::from_le_bytes([footer[0], footer[1], footer[2], footer[3]]);
        let computed_checksum = crc32fast::hash(payload);
        if stored_checksum != computed_checksum {
            return Err(GlossaError::IndexCorrupted {
                reason: format!(
                    "Checksum mismatch: expected {:08x}, got {:08x}",
                    stored_checksum, computed_checksum
                ),
            });
        }

        let flags = IndexFlags(header.flags);
        let decompressed = if flags.is_compressed() {
            lz4_flex::decompress_size_prepended(payload).map_err(|e| {
                GlossaError::IndexCorrupted {
                    reason: format!("Decompression failed: {}", e),
                }
            })?
        } else {
            payload.to_vec()
        };

        let stored: StoredIndex =
            bincode::deserialize(&decompressed).map_err(|e| GlossaError::IndexCorrupted {
                reason: format!("Deserialization failed: {}", e),
            })?;

        if stored.terms.len() as u64 != header.term_count {
            warn!(
                header = header.term_count,
                actual = stored.terms.len(),
                "Term count in header does not match payload"
            );
        }

        let terms = stored
            .terms
            .into_iter()
            .map(StoredTerm::into_indexed_term)
            .collect::<Result<Vec<_>>>()?;

        let index = TermIndex::from_parts(terms, stored.stats);
        info!(terms = index.len(), "Index loaded successfully");
        Ok(index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::index::TermQuery;
    use tempfile::TempDir;

    fn make_index() -> TermIndex {
        let languages = LanguagePair::new("en", "ja").unwrap();
        let mut index = TermIndex::new();
        index.replace_all(
            vec![
                IndexedTerm::new(
                    "spec",
                    languages.clone(),
                    TermRecord::new("spec", "テスト", "備考").unwrap(),
                ),
                IndexedTerm::new(
                    "spec",
                    languages,
                    TermRecord::new("bug", "バグ", "").unwrap(),
                ),
            ],
            1,
        );
        index
    }

    #[test]
    fn test_save_and_load() {
        let temp_dir = TempDir::new().unwrap();
        let store = IndexStore::new(temp_dir.path());

        let index = make_index();
        store.save(&index).unwrap();
        assert!(store.exists());

        let loaded = store.load().unwrap();
        assert_eq!(loaded.terms(), index.terms());
        assert_eq!(loaded.stats(), index.stats());

        let hits = loaded.search(&TermQuery::new("spec"));
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].record.note(), "備考");
    }

    #[test]
    fn test_save_and_load_uncompressed() {
        let temp_dir = TempDir::new().unwrap();
        let store = IndexStore::new(temp_dir.path()).with_compression(false);

        let index = make_index();
        store.save(&index).unwrap();
        let loaded = store.load().unwrap();
        assert_eq!(loaded.len(), index.len());
    }

    #[test]
    fn test_save_keeps_backup() {
        let temp_dir = TempDir::new().unwrap();
        let store = IndexStore::new(temp_dir.path());

        store.save(&TermIndex::new()).unwrap();
        store.save(&make_index()).unwrap();

        assert!(store.backup_path().exists());
        assert_eq!(store.load().unwrap().len(), 2);
    }

    #[test]
    fn test_save_survives_blocked_backup() {
        let temp_dir = TempDir::new().unwrap();
        let store = IndexStore::new(temp_dir.path());
        store.save(&TermIndex::new()).unwrap();

        // A directory in the backup's place can be neither removed nor
        // replaced by a file.
        fs::create_dir_all(store.backup_path().join("occupied")).unwrap();

        store.save(&make_index()).unwrap();
        assert_eq!(store.load().unwrap().len(), 2);
        assert!(store.backup_path().is_dir());
    }

    #[test]
    fn test_load_nonexistent() {
        let temp_dir = TempDir::new().unwrap();
        let store = IndexStore::new(temp_dir.path());

        let result = store.load();
        assert!(matches!(result, Err(GlossaError::IndexNotFound { .. })));
    }

    #[test]
    fn test_corrupted_index() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join("terms.idx"), b"not a valid index file").unwrap();

        let store = IndexStore::new(temp_dir.path());
        assert!(matches!(
            store.load(),
            Err(GlossaError::IndexCorrupted { .. })
        ));
    }

    #[test]
    fn test_checksum_mismatch() {
        let temp_dir = TempDir::new().unwrap();
        let store = IndexStore::new(temp_dir.path()).with_compression(false);
        store.save(&make_index()).unwrap();

        let mut data = fs::read(store.index_path()).unwrap();
        data[HEADER_LEN + 2] ^= 0xff;
        fs::write(store.index_path(), data).unwrap();

        assert!(matches!(
            store.load(),
            Err(GlossaError::IndexCorrupted { .. })
        ));
    }

    #[test]
    fn test_unavailable_dir() {
        let temp_dir = TempDir::new().unwrap();
        let blocker = temp_dir.path().join("file");
        fs::write(&blocker, b"").unwrap();

        let store = IndexStore::new(blocker.join("index"));
        assert!(matches!(
            store.ensure_dir(),
            Err(GlossaError::IndexUnavailable { .. })
        ));
    }
}
