//! Error types for the framelint engine

use thiserror::Error;

#[derive(Error, Debug)]
pub enum LintError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Scan error in {file} at line {line}: {message}")]
    Scan { file: String, line: usize, message: String },

    #[error("Simulation error: {message}")]
    Simulation { message: String },

    #[error("Patch error in {file} at line {line}: {message}")]
    Patch { file: String, line: usize, message: String },

    #[error("Edit conflict in {file}: {message}")]
    EditConflict { file: String, message: String },

    #[error("Config error: {message}")]
    Config { message: String },

    #[error("File not found: {path}")]
    FileNotFound { path: String },

    #[error("Invalid format: {message}")]
    InvalidFormat { message: String },
}

pub type Result<T> = std::result::Result<T, LintError>;

impl LintError {
    pub fn scan(file: impl Into<String>, line: usize, message: impl Into<String>) -> Self {
        Self::Scan {
            file: file.into(),
            line,
            message: message.into(),
        }
    }

    pub fn simulation(message: impl Into<String>) -> Self {
        Self::Simulation {
            message: message.into(),
        }
    }

    pub fn patch(file: impl Into<String>, line: usize, message: impl Into<String>) -> Self {
        Self::Patch {
            file: file.into(),
            line,
            message: message.into(),
        }
    }

    pub fn edit_conflict(file: impl Into<String>, message: impl Into<String>) -> Self {
        Self::EditConflict {
            file: file.into(),
            message: message.into(),
        }
    }

    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    pub fn invalid_format(message: impl Into<String>) -> Self {
        Self::InvalidFormat {
            message: message.into(),
        }
    }
}
