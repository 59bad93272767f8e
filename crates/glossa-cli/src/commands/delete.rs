//! Delete command - remove one term, or every term with a source term.

use crate::app::App;
use crate::commands::report;
use std::io::{self, Write};

/// Run the delete command.
pub fn run(
    app: &App,
    source_term: &str,
    target_term: Option<&str>,
    all: bool,
    skip_confirm: bool,
) -> anyhow::Result<()> {
    let (glossary, store) = app.store()?;

    let outcome = match target_term {
        Some(target_term) if !all => store.delete(source_term, target_term)?,
        _ => {
            if !skip_confirm {
                print!(
                    "This will delete every term with source term [{}] from {}. Are you sure? [y/N] ",
                    source_term,
                    glossary.name()
                );
                io::stdout().flush()?;

                let mut input = String::new();
                io::stdin().read_line(&mut input)?;

                if !input.trim().eq_ignore_ascii_case("y") {
                    println!("Cancelled.");
                    return Ok(());
                }
            }
            store.delete_all(source_term)?
        }
    };

    report(&outcome);
    Ok(())
}
