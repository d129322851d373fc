pub mod cli;
pub mod commands;
pub mod error;
pub mod logger;

pub use error::{CliError, Result as CliResult};

#[cfg(test)]
mod tests;
