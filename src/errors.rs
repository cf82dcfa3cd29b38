//! Error types for the store, user input and configuration.

use std::path::PathBuf;

use thiserror::Error;

/// Top-level error returned by commands.
#[derive(Debug, Error)]
pub enum FitoxError {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Input(#[from] InputError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Failures reading or writing the local data files.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to access {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("corrupt data file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to serialize data: {0}")]
    Serialize(#[source] serde_json::Error),

    #[error("task {id} not found")]
    TaskNotFound { id: u64 },
}

/// Rejected user input.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum InputError {
    #[error("invalid due date '{0}', use YYYY-MM-DD")]
    InvalidDate(String),

    #[error("invalid time slot '{0}', use HH:MM")]
    InvalidTime(String),

    #[error("unknown category '{0}' (expected Health, Study, Work or Personal)")]
    UnknownCategory(String),

    #[error("unknown priority '{0}' (expected Low, Medium or High)")]
    UnknownPriority(String),

    #[error("unknown sort field '{0}' (expected priority, due or status)")]
    UnknownSortField(String),

    #[error("task title cannot be empty")]
    EmptyTitle,

    #[error("{0} cannot be empty")]
    EmptyField(&'static str),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

pub type StoreResult<T> = std::result::Result<T, StoreError>;
pub type Result<T> = std::result::Result<T, FitoxError>;
