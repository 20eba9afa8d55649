use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum TakeoutError {
    // I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Directory walker error: {0}")]
    Walkdir(#[from] walkdir::Error),

    // Filesystem errors
    #[error("Path not found: {0}")]
    PathNotFound(PathBuf),

    #[error("Not a directory: {0}")]
    NotADirectory(PathBuf),

    #[error("Not a regular file: {0}")]
    NotAFile(PathBuf),

    // Export structure errors
    #[error("No photos directory found in {root}; available directories: {}", .available.join(", "))]
    Structure {
        root: PathBuf,
        available: Vec<String>,
    },

    #[error("Unsupported media type: {0}")]
    UnsupportedType(PathBuf),

    // Metadata errors
    #[error("Failed to parse sidecar {path}: {reason}")]
    Parse { path: PathBuf, reason: String },

    #[error("Invalid GPS coordinate: {0}")]
    InvalidCoordinate(String),

    #[error("Refusing to attach empty metadata to {0}")]
    EmptyMetadata(PathBuf),

    #[error("{what} is already set for {path}")]
    AlreadySet { what: &'static str, path: PathBuf },
}

impl TakeoutError {
    /// Whether this error only concerns a single file and should not abort a scan.
    pub fn is_per_file(&self) -> bool {
        matches!(
            self,
            TakeoutError::UnsupportedType(_)
                | TakeoutError::NotAFile(_)
                | TakeoutError::Parse { .. }
                | TakeoutError::InvalidCoordinate(_)
        )
    }
}

/// Result type for takeout operations.
pub type Result<T> = std::result::Result<T, TakeoutError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_structure_error_lists_directories() {
        let err = TakeoutError::Structure {
            root: PathBuf::from("/export"),
            available: vec!["Drive".to_string(), "Mail".to_string()],
        };
        let msg = err.to_string();
        assert!(msg.contains("/export"));
        assert!(msg.contains("Drive, Mail"));
        assert!(!err.is_per_file());
    }

    #[test]
    fn test_per_file_errors() {
        assert!(TakeoutError::UnsupportedType(PathBuf::from("a.txt")).is_per_file());
        assert!(
            TakeoutError::Parse {
                path: PathBuf::from("a.json"),
                reason: "bad".to_string()
            }
            .is_per_file()
        );
        assert!(!TakeoutError::PathNotFound(PathBuf::from("x")).is_per_file());
    }
}
