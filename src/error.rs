use std::path::PathBuf;

use thiserror::Error;

/// Main error type for media-tools
#[derive(Error, Debug)]
pub enum MediaToolsError {
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("Probe error: {0}")]
    Probe(#[from] ProbeError),

    #[error("Rename error: {0}")]
    Rename(#[from] RenameError),

    #[error("{tool} not found. Please install FFmpeg first.")]
    ToolMissing { tool: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(String),
}

/// Input validation errors, raised before any subprocess runs
#[derive(Error, Debug)]
pub enum ValidationError {
    #[error("Video file '{}' does not exist", .0.display())]
    SourceMissing(PathBuf),

    #[error("'{}' is not a file", .0.display())]
    NotAFile(PathBuf),

    #[error("n must be a positive integer, got {0}")]
    InvalidPartCount(i64),

    #[error("n must be at most {max}, got {requested}")]
    TooManyParts { requested: i64, max: usize },

    #[error("{0} cannot be empty")]
    EmptyInput(&'static str),

    #[error("{0} must be an integer")]
    NotAnInteger(&'static str),
}

/// Duration probing errors
#[derive(Error, Debug)]
pub enum ProbeError {
    #[error("{0} not found. Please install FFmpeg first.")]
    ToolMissing(String),

    #[error("Failed to run {tool}: {source}")]
    Spawn {
        tool: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to get video duration ({status}): {stderr}")]
    ToolFailed { status: String, stderr: String },

    #[error("Could not parse duration from probe output: {0:?}")]
    Unparseable(String),

    #[error("Invalid duration: {0}")]
    InvalidDuration(f64),
}

/// Errors raised while launching or reading an external tool
#[derive(Error, Debug)]
pub enum ToolError {
    #[error("{0} not found. Please install FFmpeg first.")]
    NotFound(String),

    #[error("{0}")]
    Io(#[from] std::io::Error),
}

/// Batch rename errors
#[derive(Error, Debug)]
pub enum RenameError {
    #[error("The path '{}' does not exist", .0.display())]
    PathMissing(PathBuf),

    #[error("The path '{}' is not a folder", .0.display())]
    NotADirectory(PathBuf),

    #[error("The prefix cannot be empty")]
    EmptyPrefix,

    #[error("No demanded files found to be renamed")]
    NoFiles,

    #[error("Starting serial number {start} is too large for {count} files")]
    StartTooLarge { start: u64, count: usize },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for convenience
pub type Result<T> = std::result::Result<T, MediaToolsError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_messages() {
        let err = ValidationError::InvalidPartCount(-3);
        assert_eq!(err.to_string(), "n must be a positive integer, got -3");

        let err = ValidationError::SourceMissing(PathBuf::from("/tmp/none.mp4"));
        assert_eq!(err.to_string(), "Video file '/tmp/none.mp4' does not exist");
    }

    #[test]
    fn test_from_conversions() {
        let err: MediaToolsError = ProbeError::Unparseable("N/A".to_string()).into();
        assert!(matches!(err, MediaToolsError::Probe(_)));

        let err: MediaToolsError = RenameError::NoFiles.into();
        assert!(err.to_string().contains("No demanded files"));
    }
}
