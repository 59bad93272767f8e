//! Update command - change the target term or note of a term.

use crate::app::App;
use crate::commands::report;

/// Run the update command.
pub fn run(
    app: &App,
    source_term: &str,
    target_term: &str,
    new_target_term: &str,
    note: &str,
) -> anyhow::Result<()> {
    let (_, store) = app.store()?;
    let outcome = store.update(source_term, target_term, new_target_term, note)?;
    report(&outcome);
    Ok(())
}
