//! Glossary file location.
//!
//! Short-named glossaries live directly under the glossary home as
//! `<home>/<name>.<source>.<target>.<ext>`. Explicit paths are used as given.

use crate::types::{Glossary, GlossaryRef};
use std::path::{Path, PathBuf};

/// Default extension of glossary files.
pub const DEFAULT_EXTENSION: &str = "yml";

/// Derives glossary file paths from a configured home directory.
#[derive(Debug, Clone)]
pub struct PathResolver {
    home: PathBuf,
    extension: String,
}

impl PathResolver {
    /// Create a resolver rooted at `home` using the default extension.
    pub fn new(home: impl AsRef<Path>) -> Self {
        PathResolver {
            home: home.as_ref().to_path_buf(),
            extension: DEFAULT_EXTENSION.to_string(),
        }
    }

    /// Use a different file extension (without the leading dot).
    pub fn with_extension(mut self, extension: impl Into<String>) -> Self {
        self.extension = extension.into();
        self
    }

    pub fn home(&self) -> &Path {
        &self.home
    }

    pub fn extension(&self) -> &str {
        &self.extension
    }

    /// Build the path for a glossary given as a raw name.
    ///
    /// A name containing a directory separator is returned unchanged and the
    /// language arguments are ignored.
    pub fn build_path(&self, name: &str, source_language: &str, target_language: &str) -> PathBuf {
        if name.contains('/') || name.contains(std::path::MAIN_SEPARATOR) {
            return PathBuf::from(name);
        }
        self.short_name_path(name, source_language, target_language)
    }

    /// Resolve an already-classified glossary to its file path.
    pub fn resolve(&self, glossary: &Glossary) -> PathBuf {
        match &glossary.reference {
            GlossaryRef::ShortName(name) => self.short_name_path(
                name,
                &glossary.languages.source,
                &glossary.languages.target,
            ),
            GlossaryRef::ExplicitPath(path) => path.clone(),
        }
    }

    /// Glob pattern matching every glossary file in the home directory.
    ///
    /// Glob metacharacters in the home path itself are escaped.
    pub fn home_pattern(&self) -> String {
        let home = glob::Pattern::escape(&self.home.to_string_lossy());
        Path::new(&home)
            .join(format!("*.{}", self.extension))
            .to_string_lossy()
            .into_owned()
    }

    fn short_name_path(&self, name: &str, source_language: &str, target_language: &str) -> PathBuf {
        self.home.join(format!(
            "{}.{}.{}.{}",
            name, source_language, target_language, self.extension
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_name_path() {
        let resolver = PathResolver::new("/home/user/.glossa");
        assert_eq!(
            resolver.build_path("spec", "en", "ja"),
            PathBuf::from("/home/user/.glossa/spec.en.ja.yml")
        );
    }

    #[test]
    fn test_build_path_is_deterministic() {
        let resolver = PathResolver::new("/g");
        let a = resolver.build_path("spec", "en", "ja");
        let b = resolver.build_path("spec", "en", "ja");
        assert_eq!(a, b);
        assert_ne!(a, resolver.build_path("spec", "ja", "en"));
    }

    #[test]
    fn test_explicit_path_bypasses_languages() {
        let resolver = PathResolver::new("/g");
        assert_eq!(
            resolver.build_path("project/terms.yml", "en", "ja"),
            PathBuf::from("project/terms.yml")
        );
        assert_eq!(
            resolver.build_path("/abs/terms.yml", "fr", "de"),
            PathBuf::from("/abs/terms.yml")
        );
    }

    #[test]
    fn test_resolve_matches_build_path() {
        let resolver = PathResolver::new("/g");
        let glossary = Glossary::new("spec", "en", "ja").unwrap();
        assert_eq!(
            resolver.resolve(&glossary),
            resolver.build_path("spec", "en", "ja")
        );

        let glossary = Glossary::new("docs/terms.yml", "en", "ja").unwrap();
        assert_eq!(resolver.resolve(&glossary), PathBuf::from("docs/terms.yml"));
    }

    #[test]
    fn test_custom_extension() {
        let resolver = PathResolver::new("/g").with_extension("yaml");
        assert_eq!(
            resolver.build_path("spec", "en", "ja"),
            PathBuf::from("/g/spec.en.ja.yaml")
        );
        assert!(resolver.home_pattern().ends_with("*.yaml"));
    }

    #[test]
    fn test_home_pattern_escapes_metacharacters() {
        let resolver = PathResolver::new("/g/glossaries[work]");
        let pattern = glob::Pattern::new(&resolver.home_pattern()).unwrap();

        assert!(pattern.matches_path(Path::new("/g/glossaries[work]/spec.en.ja.yml")));
        assert!(!pattern.matches_path(Path::new("/g/glossariesw/spec.en.ja.yml")));
    }
}
