//! Subcommand implementations.

pub mod add;
pub mod create;
pub mod delete;
pub mod index;
pub mod lookup;
pub mod register;
pub mod show;
pub mod status;
pub mod update;

use glossa_core::MutationOutcome;

/// Print the outcome of a store mutation.
///
/// Duplicates and missing terms are reported but do not fail the command.
pub(crate) fn report(outcome: &MutationOutcome) {
    println!("{}", outcome);
}
