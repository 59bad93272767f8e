//! Registration of project glossaries.
//!
//! A glossary kept inside a project (addressed by explicit path) is invisible
//! to the indexer, which only scans the glossary home. Registering it places a
//! symlink in the home under the short-name path, so it is indexed like any
//! other glossary while the file itself stays in the project.

use crate::error::{GlossaError, Result};
use crate::path::PathResolver;
use crate::types::{GlossaryRef, LanguagePair};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::info;

/// Link the glossary at `source` into the home as `name`.
///
/// Returns the path of the created link.
pub fn register(
    source: &Path,
    name: &str,
    languages: &LanguagePair,
    resolver: &PathResolver,
) -> Result<PathBuf> {
    if !source.is_file() {
        return Err(GlossaError::GlossaryNotFound {
            path: source.to_path_buf(),
        });
    }

    let link = link_path(name, languages, resolver)?;
    if fs::symlink_metadata(&link).is_ok() {
        return Err(GlossaError::GlossaryExists { path: link });
    }

    fs::create_dir_all(resolver.home())?;
    let target = fs::canonicalize(source)?;
    symlink(&target, &link)?;

    info!(source = %target.display(), link = %link.display(), "Glossary registered");
    Ok(link)
}

/// Remove the home link created by [`register`].
///
/// Regular glossary files in the home are never removed here.
pub fn unregister(name: &str, languages: &LanguagePair, resolver: &PathResolver) -> Result<PathBuf> {
    let link = link_path(name, languages, resolver)?;

    let metadata = match fs::symlink_metadata(&link) {
        Ok(metadata) => metadata,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            return Err(GlossaError::GlossaryNotFound { path: link });
        }
        Err(e) => return Err(e.into()),
    };

    if !metadata.file_type().is_symlink() {
        return Err(GlossaError::invalid_glossary(format!(
            "{} is not a registered glossary",
            link.display()
        )));
    }

    fs::remove_file(&link)?;
    info!(link = %link.display(), "Glossary unregistered");
    Ok(link)
}

fn link_path(name: &str, languages: &LanguagePair, resolver: &PathResolver) -> Result<PathBuf> {
    let GlossaryRef::ShortName(short_name) = GlossaryRef::parse(name)? else {
        return Err(GlossaError::invalid_glossary(format!(
            "registered name '{}' must not contain a path separator",
            name
        )));
    };
    Ok(resolver.build_path(&short_name, &languages.source, &languages.target))
}

#[cfg(unix)]
fn symlink(target: &Path, link: &Path) -> io::Result<()> {
    std::os::unix::fs::symlink(target, link)
}

#[cfg(windows)]
fn symlink(target: &Path, link: &Path) -> io::Result<()> {
    std::os::windows::fs::symlink_file(target, link)
}
