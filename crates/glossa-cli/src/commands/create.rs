//! Create command - create an empty glossary file.

use crate::app::App;

/// Run the create command.
pub fn run(app: &App) -> anyhow::Result<()> {
    let (glossary, store) = app.store()?;
    store.create()?;

    println!(
        "Created glossary {} ({}) at {}",
        glossary.name(),
        glossary.languages,
        store.path().display()
    );
    Ok(())
}
