use std::path::PathBuf;
use thiserror::Error;

/// autorst error types
#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse config file: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error("Config validation error: {0}")]
    ConfigValidation(String),

    #[error("Cannot import {module}: {reason}")]
    ImportFailure { module: String, reason: String },

    #[error("File exists: {0}")]
    FileCollision(PathBuf),

    #[error("Backup source is not a file or directory: {0}")]
    BackupSourceInvalid(PathBuf),

    #[error("Hand-written docs found in {written_dir} but {index} does not exist")]
    HandWrittenIndexMissing { index: PathBuf, written_dir: PathBuf },

    #[error("Template error: {0}")]
    Template(#[from] tera::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid exclude pattern: {0}")]
    Regex(#[from] regex::Error),

    #[error("Directory walk error: {0}")]
    WalkDir(#[from] walkdir::Error),

    #[error("Parser error: {0}")]
    Parser(String),

    #[error("{0}")]
    Other(String),
}

/// Result type alias for autorst operations
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Create a config validation error
    pub fn config_validation(msg: impl Into<String>) -> Self {
        Error::ConfigValidation(msg.into())
    }

    /// Create an import failure for a namespace
    pub fn import_failure(module: impl Into<String>, reason: impl Into<String>) -> Self {
        Error::ImportFailure {
            module: module.into(),
            reason: reason.into(),
        }
    }

    /// Create a parser error
    pub fn parser(msg: impl Into<String>) -> Self {
        Error::Parser(msg.into())
    }

    /// Create a generic error
    pub fn other(msg: impl Into<String>) -> Self {
        Error::Other(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_io_error_display() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: Error = io_err.into();
        assert!(err.to_string().contains("IO error"));
    }

    #[test]
    fn test_import_failure_display() {
        let err = Error::import_failure("demo.broken", "syntax error on line 3");
        assert_eq!(err.to_string(), "Cannot import demo.broken: syntax error on line 3");
    }

    #[test]
    fn test_file_collision_display() {
        let err = Error::FileCollision(PathBuf::from("source/index.rst"));
        assert_eq!(err.to_string(), "File exists: source/index.rst");
    }

    #[test]
    fn test_hand_written_index_missing_display() {
        let err = Error::HandWrittenIndexMissing {
            index: PathBuf::from("source/written/index.rst"),
            written_dir: PathBuf::from("source/written"),
        };
        let msg = err.to_string();
        assert!(msg.contains("source/written/index.rst"));
        assert!(msg.contains("source/written "));
    }

    #[test]
    fn test_config_validation_display() {
        let err = Error::config_validation("apipath must not be empty");
        assert_eq!(err.to_string(), "Config validation error: apipath must not be empty");
    }

    #[test]
    fn test_regex_error_converts() {
        let err: Error = regex::Regex::new("(unclosed").unwrap_err().into();
        assert!(err.to_string().starts_with("Invalid exclude pattern"));
    }

    #[test]
    fn test_other_error() {
        let err = Error::other("something went wrong");
        assert_eq!(err.to_string(), "something went wrong");
    }

    #[test]
    fn test_error_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Error>();
    }
}
