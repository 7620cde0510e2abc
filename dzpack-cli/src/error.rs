//! CLI error handling with user-friendly messages.

use std::fmt;
use std::io;
use std::process;

use dzpack::config::ConfigError;
use dzpack::task::LoadError;

/// Errors that stop the run before any image is processed.
#[derive(Debug)]
pub enum CliError {
    /// Failed to initialize logging
    LoggingInit(io::Error),
    /// Invalid configuration file or flag combination
    Config(ConfigError),
    /// Input or output list could not be read
    TaskList(LoadError),
    /// The async runtime could not be started
    Runtime(io::Error),
}

impl CliError {
    /// Print the error and exit with status 1.
    pub fn exit(&self) -> ! {
        eprintln!("Error: {}", self);

        if let CliError::TaskList(LoadError::OpenFailed { .. }) = self {
            eprintln!();
            eprintln!("Usage: dzpack --inputs <FILE> --outputs <FILE> [OPTIONS]");
            eprintln!("Run 'dzpack --help' for all options.");
        }

        process::exit(1)
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::LoggingInit(e) => write!(f, "Failed to initialize logging: {}", e),
            CliError::Config(e) => write!(f, "{}", e),
            CliError::TaskList(e) => write!(f, "{}", e),
            CliError::Runtime(e) => write!(f, "Failed to start runtime: {}", e),
        }
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CliError::LoggingInit(e) | CliError::Runtime(e) => Some(e),
            CliError::Config(e) => Some(e),
            CliError::TaskList(e) => Some(e),
        }
    }
}

impl From<ConfigError> for CliError {
    fn from(e: ConfigError) -> Self {
        CliError::Config(e)
    }
}

impl From<LoadError> for CliError {
    fn from(e: LoadError) -> Self {
        CliError::TaskList(e)
    }
}
