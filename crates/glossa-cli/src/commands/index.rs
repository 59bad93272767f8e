//! Index command - rebuild the term index from the glossary home.

use crate::app::App;
use std::time::Instant;

/// Run the index command.
pub fn run(app: &App) -> anyhow::Result<()> {
    println!("Indexing glossaries in {}...", app.home.display());

    let start = Instant::now();
    let stats = app.gateway().index_all(&app.home)?;
    let elapsed = start.elapsed();

    println!();
    println!("Indexing complete!");
    println!("  Glossaries: {}", stats.glossary_count);
    println!("  Terms:      {}", stats.term_count);
    println!("  Time:       {:.2}s", elapsed.as_secs_f64());

    if let Some(updated) = stats.last_updated {
        println!("  Updated:    {}", updated.format("%Y-%m-%d %H:%M:%S"));
    }

    Ok(())
}
