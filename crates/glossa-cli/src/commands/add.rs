//! Add command - append a term to a glossary.

use crate::app::App;
use crate::commands::report;

/// Run the add command.
pub fn run(app: &App, source_term: &str, target_term: &str, note: &str) -> anyhow::Result<()> {
    let (_, store) = app.store()?;
    let outcome = store.add(source_term, target_term, note)?;
    report(&outcome);
    Ok(())
}
