//! Crate error type

use std::io;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A caller broke an API contract (bad cadence, bad setting)
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("i/o error: {0}")]
    Io(#[from] io::Error),

    #[error("malformed settings: {0}")]
    ConfigParse(#[from] toml::de::Error),
}
