pub mod commands;
pub mod output;

use thiserror::Error;

use crate::errors::FormError;

pub use commands::{execute, Command, Invocation, USAGE};

#[derive(Debug, Error)]
pub enum CliError {
    #[error("{0}")]
    Usage(String),
    #[error(transparent)]
    Form(#[from] FormError),
    #[error(transparent)]
    Dialoguer(#[from] dialoguer::Error),
}

/// Parses `args` (without the program name) and runs the command.
pub fn run<I, S>(args: I) -> Result<(), CliError>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let invocation = Invocation::parse(args)?;
    tracing::debug!(command = ?invocation.command, "dispatching command");
    execute(invocation)
}
