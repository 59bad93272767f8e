//! Status command - show index status and statistics.

use crate::app::App;
use glossa_core::GlossaError;

/// Run the status command.
pub fn run(app: &App) -> anyhow::Result<()> {
    println!("Glossa Index Status");
    println!("===================");
    println!();

    let stats = match app.gateway().status() {
        Ok(stats) => stats,
        Err(GlossaError::IndexNotFound { .. }) => {
            println!("No index found. Run 'glossa index' to build the index.");
            return Ok(());
        }
        Err(e) => return Err(e.into()),
    };

    println!("Summary:");
    println!("  Glossaries:   {}", stats.glossary_count);
    println!("  Terms:        {}", stats.term_count);

    if let Some(updated) = stats.last_updated {
        println!("  Last updated: {}", updated.format("%Y-%m-%d %H:%M:%S"));
    }

    println!();
    println!("Glossary home:   {}", app.home.display());
    println!("Index directory: {}", app.config.index_dir(&app.home).display());

    Ok(())
}
