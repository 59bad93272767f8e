//! Application state and option resolution.

use glossa_core::{
    Config, Glossary, IndexGateway, LanguagePair, PathResolver,
    ProjectConfig, TermStore,
};
use std::path::PathBuf;
use thiserror::Error;
use tracing::{debug, info};

/// A required option that was given neither on the command line nor in a
/// project file.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum OptionError {
    #[error("no glossary selected: pass -g/--glossary or set `glossary` in .glossa.toml")]
    MissingGlossary,

    #[error(
        "no source language selected: pass -S/--source-language or set `source_language` in .glossa.toml"
    )]
    MissingSourceLanguage,

    #[error(
        "no target language selected: pass -T/--target-language or set `target_language` in .glossa.toml"
    )]
    MissingTargetLanguage,
}

/// Options shared by every subcommand.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GlobalOptions {
    pub glossary: Option<String>,
    pub source_language: Option<String>,
    pub target_language: Option<String>,
    pub home: Option<PathBuf>,
}

impl GlobalOptions {
    /// Fill options missing from the command line with project file values.
    pub fn or_project(self, project: ProjectConfig) -> Self {
        GlobalOptions {
            glossary: self.glossary.or(project.glossary),
            source_language: self.source_language.or(project.source_language),
            target_language: self.target_language.or(project.target_language),
            home: self.home.or(project.home),
        }
    }
}

/// Shared application state.
pub struct App {
    /// Configuration
    pub config: Config,

    /// Glossary home directory
    pub home: PathBuf,

    /// Resolved options
    pub options: GlobalOptions,
}

impl App {
    /// Create a new application instance, merging the command line with the
    /// nearest project file and the global configuration.
    pub fn new(config: Config, options: GlobalOptions) -> anyhow::Result<Self> {
        let cwd = std::env::current_dir()?;
        let project = match ProjectConfig::discover(&cwd)? {
            Some((path, project)) => {
                debug!(path = %path.display(), "Using project file");
                project
            }
            None => ProjectConfig::default(),
        };

        Self::with_project(config, options, project)
    }

    fn with_project(
        config: Config,
        options: GlobalOptions,
        project: ProjectConfig,
    ) -> anyhow::Result<Self> {
        let options = options.or_project(project);
        let home = match &options.home {
            Some(home) => home.clone(),
            None => config.glossary_home()?,
        };

        info!(home = %home.display(), "Application initialized");

        Ok(App {
            config,
            home,
            options,
        })
    }

    pub fn resolver(&self) -> PathResolver {
        self.config.resolver(&self.home)
    }

    pub fn gateway(&self) -> IndexGateway {
        IndexGateway::local(self.config.index_store(&self.home))
            .with_extension(self.config.format.extension.clone())
    }

    /// The selected glossary name, if any.
    pub fn glossary_name(&self) -> Option<&str> {
        self.options.glossary.as_deref()
    }

    /// The selected language pair.
    pub fn languages(&self) -> anyhow::Result<LanguagePair> {
        let source = self
            .options
            .source_language
            .as_deref()
            .ok_or(OptionError::MissingSourceLanguage)?;
        let target = self
            .options
            .target_language
            .as_deref()
            .ok_or(OptionError::MissingTargetLanguage)?;
        Ok(LanguagePair::new(source, target)?)
    }

    /// The selected glossary with its language pair.
    pub fn glossary(&self) -> anyhow::Result<Glossary> {
        let name = self.glossary_name().ok_or(OptionError::MissingGlossary)?;
        let languages = self.languages()?;
        Ok(Glossary::new(name, &languages.source, &languages.target)?)
    }

    /// The store for the selected glossary.
    pub fn store(&self) -> anyhow::Result<(Glossary, TermStore)> {
        let glossary = self.glossary()?;
        let store = TermStore::new(self.resolver().resolve(&glossary));
        Ok((glossary, store))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glossa_core::GlossaryRef;
    use std::path::Path;

    fn config_with_home(home: &str) -> Config {
        let mut config = Config::default();
        config.general.home = Some(PathBuf::from(home));
        config
    }

    #[test]
    fn test_command_line_wins_over_project() {
        let cli = GlobalOptions {
            glossary: Some("cli".to_string()),
            ..Default::default()
        };
        let project = ProjectConfig {
            glossary: Some("project".to_string()),
            source_language: Some("en".to_string()),
            target_language: Some("ja".to_string()),
            home: None,
        };

        let merged = cli.or_project(project);
        assert_eq!(merged.glossary.as_deref(), Some("cli"));
        assert_eq!(merged.source_language.as_deref(), Some("en"));
        assert_eq!(merged.target_language.as_deref(), Some("ja"));
    }

    #[test]
    fn test_home_precedence() {
        let app = App::with_project(
            config_with_home("/global"),
            GlobalOptions::default(),
            ProjectConfig {
                home: Some(PathBuf::from("/project")),
                ..Default::default()
            },
        )
        .unwrap();
        assert_eq!(app.home, Path::new("/project"));

        let app = App::with_project(
            config_with_home("/global"),
            GlobalOptions::default(),
            ProjectConfig::default(),
        )
        .unwrap();
        assert_eq!(app.home, Path::new("/global"));
    }

    #[test]
    fn test_store_path_for_short_name() {
        let app = App::with_project(
            config_with_home("/g"),
            GlobalOptions {
                glossary: Some("spec".to_string()),
                source_language: Some("en".to_string()),
                target_language: Some("ja".to_string()),
                home: None,
            },
            ProjectConfig::default(),
        )
        .unwrap();

        let (glossary, store) = app.store().unwrap();
        assert_eq!(glossary.reference, GlossaryRef::ShortName("spec".to_string()));
        assert_eq!(store.path(), Path::new("/g/spec.en.ja.yml"));
    }

    #[test]
    fn test_missing_options_name_the_flag() {
        let app = App::with_project(
            config_with_home("/g"),
            GlobalOptions {
                glossary: Some("spec".to_string()),
                source_language: Some("en".to_string()),
                ..Default::default()
            },
            ProjectConfig::default(),
        )
        .unwrap();

        let err = app.glossary().unwrap_err();
        assert_eq!(
            err.downcast_ref::<OptionError>(),
            Some(&OptionError::MissingTargetLanguage)
        );
        assert!(err.to_string().contains("-T/--target-language"));

        let app = App::with_project(
            config_with_home("/g"),
            GlobalOptions::default(),
            ProjectConfig::default(),
        )
        .unwrap();
        assert_eq!(
            app.glossary().unwrap_err().downcast_ref::<OptionError>(),
            Some(&OptionError::MissingGlossary)
        );
    }
}
