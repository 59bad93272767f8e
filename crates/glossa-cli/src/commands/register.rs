//! Register and unregister commands - link project glossaries into the home.

use crate::app::App;
use anyhow::bail;
use glossa_core::{registry, GlossaryRef};

/// Run the register command.
///
/// The selected glossary must be given as a path; it is linked into the home
/// as `name`, or under its own file name.
pub fn run(app: &App, name: Option<&str>) -> anyhow::Result<()> {
    let glossary = app.glossary()?;
    let GlossaryRef::ExplicitPath(source) = &glossary.reference else {
        bail!(
            "glossary '{}' is already in the home, pass a file path with -g to register it",
            glossary.reference
        );
    };

    let name = match name {
        Some(name) => name.to_string(),
        None => glossary.name(),
    };

    let link = registry::register(source, &name, &glossary.languages, &app.resolver())?;
    println!("Registered {} as {}", source.display(), link.display());
    Ok(())
}

/// Run the unregister command.
pub fn run_unregister(app: &App) -> anyhow::Result<()> {
    let glossary = app.glossary()?;
    let link = registry::unregister(&glossary.name(), &glossary.languages, &app.resolver())?;
    println!("Unregistered {}", link.display());
    Ok(())
}
