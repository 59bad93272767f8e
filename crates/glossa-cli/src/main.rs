//! # Glossa CLI
//!
//! Command-line interface for managing bilingual glossaries.
//!
//! ## Commands
//!
//! - `glossa create` - Create an empty glossary
//! - `glossa add` / `update` / `delete` - Edit the terms of a glossary
//! - `glossa lookup` - Search every indexed glossary for a term
//! - `glossa index` - Rebuild the term index from the glossary home
//! - `glossa status` - Show index status and statistics
//! - `glossa register` / `unregister` - Link a project glossary into the home
//! - `glossa show` - List the terms of a glossary
//!
//! ## Example Usage
//!
//! ```bash
//! glossa -g spec -S en -T ja create
//! glossa -g spec -S en -T ja add -s spec -t テスト -n 備考
//! glossa index
//! glossa -S en -T ja lookup -s spec
//! ```
//!
//! The glossary and languages may also come from a `.glossa.toml` in the
//! current directory or one of its parents.

mod app;
mod commands;

use app::{App, GlobalOptions};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Glossa - Per-project bilingual glossaries
#[derive(Parser)]
#[command(name = "glossa")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Glossary name, or a path to a glossary file
    #[arg(short = 'g', long, global = true, env = "GLOSSA_GLOSSARY")]
    glossary: Option<String>,

    /// Source language code (e.g. "en")
    #[arg(short = 'S', long, global = true)]
    source_language: Option<String>,

    /// Target language code (e.g. "ja")
    #[arg(short = 'T', long, global = true)]
    target_language: Option<String>,

    /// Glossary home directory
    #[arg(short = 'H', long, global = true, env = "GLOSSA_HOME")]
    home: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create an empty glossary
    #[command(alias = "new")]
    Create,

    /// Add a term to the glossary
    Add {
        /// Source term
        #[arg(short = 's', long)]
        source_term: String,

        /// Target term
        #[arg(short = 't', long)]
        target_term: String,

        /// Free-form note
        #[arg(short, long, default_value = "")]
        note: String,
    },

    /// Change the target term or note of an existing term
    Update {
        /// Source term of the entry to change
        #[arg(short = 's', long)]
        source_term: String,

        /// Current target term of the entry to change
        #[arg(short = 't', long)]
        target_term: String,

        /// New target term (empty keeps the current one)
        #[arg(long, default_value = "")]
        new_target: String,

        /// New note (empty keeps the current one)
        #[arg(short, long, default_value = "")]
        note: String,
    },

    /// Delete a term from the glossary
    Delete {
        /// Source term
        #[arg(short = 's', long)]
        source_term: String,

        /// Target term of the single entry to delete
        #[arg(short = 't', long, required_unless_present = "all")]
        target_term: Option<String>,

        /// Delete every entry with this source term
        #[arg(long, conflicts_with = "target_term")]
        all: bool,

        /// Skip confirmation prompt
        #[arg(short, long, requires = "all")]
        force: bool,
    },

    /// Look up a term in the indexed glossaries
    Lookup {
        /// Source term to search for
        #[arg(short = 's', long)]
        source_term: String,

        /// Only search the selected glossary
        #[arg(long)]
        only: bool,

        /// Maximum number of results to show
        #[arg(short, long)]
        limit: Option<usize>,

        /// Output format (text, json)
        #[arg(short, long, default_value = "text")]
        output: OutputFormat,
    },

    /// Rebuild the term index from the glossary home
    Index,

    /// Show index status and statistics
    Status,

    /// Link the selected glossary file into the glossary home
    Register {
        /// Name to register under (defaults to the file name)
        name: Option<String>,
    },

    /// Remove a glossary link from the glossary home
    Unregister,

    /// List the terms of the glossary
    Show {
        /// Output format (text, json)
        #[arg(short, long, default_value = "text")]
        output: OutputFormat,
    },
}

#[derive(Clone, Debug, Default)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            _ => Err(format!("Unknown output format: {}", s)),
        }
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Load configuration
    let config = match &cli.config {
        Some(path) => glossa_core::Config::load_from(path)?,
        None => glossa_core::Config::load()?,
    };

    // Setup logging
    let log_level = if cli.quiet {
        "error".to_string()
    } else {
        match cli.verbose {
            0 => config.general.log_level.clone(),
            1 => "info".to_string(),
            2 => "debug".to_string(),
            _ => "trace".to_string(),
        }
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level)))
        .init();

    let options = GlobalOptions {
        glossary: cli.glossary,
        source_language: cli.source_language,
        target_language: cli.target_language,
        home: cli.home,
    };
    let app = App::new(config, options)?;

    // Execute command
    match cli.command {
        Commands::Create => commands::create::run(&app),
        Commands::Add {
            source_term,
            target_term,
            note,
        } => commands::add::run(&app, &source_term, &target_term, &note),
        Commands::Update {
            source_term,
            target_term,
            new_target,
            note,
        } => commands::update::run(&app, &source_term, &target_term, &new_target, &note),
        Commands::Delete {
            source_term,
            target_term,
            all,
            force,
        } => commands::delete::run(&app, &source_term, target_term.as_deref(), all, force),
        Commands::Lookup {
            source_term,
            only,
            limit,
            output,
        } => commands::lookup::run(&app, &source_term, only, limit, output),
        Commands::Index => commands::index::run(&app),
        Commands::Status => commands::status::run(&app),
        Commands::Register { name } => commands::register::run(&app, name.as_deref()),
        Commands::Unregister => commands::register::run_unregister(&app),
        Commands::Show { output } => commands::show::run(&app, output),
    }
}
