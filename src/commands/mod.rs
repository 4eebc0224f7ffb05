// ABOUTME: Command module aggregator for the smoke-runner CLI.
// ABOUTME: Re-exports run and check command handlers.

mod check;
mod run;
mod runtime_connection;

pub use check::check;
pub use run::run;
