//! Printing errors

use kmprint_model::VersionTag;
use thiserror::Error;

pub type PrintResult<T> = Result<T, PrintError>;

#[derive(Debug, Clone, Error, PartialEq)]
pub enum PrintError {
    #[error("Unsupported metadata version: {version} (lowest supported: {baseline})")]
    UnsupportedVersion {
        version: VersionTag,
        baseline: VersionTag,
    },

    #[error("Invalid printer configuration: {message}")]
    Config { message: String },
}

impl From<toml::de::Error> for PrintError {
    fn from(err: toml::de::Error) -> Self {
        PrintError::Config {
            message: err.to_string(),
        }
    }
}
