use std::path::PathBuf;
use thiserror::Error;
use validator::ValidationErrors;

#[derive(Error, Debug)]
pub enum MapGenError {
    // Generation errors
    #[error("Width/height must be > 1, got {width}x{height}")]
    InvalidDimensions { width: u32, height: u32 },

    #[error("Width/height must not exceed {max}, got {width}x{height}")]
    DimensionsTooLarge { width: u32, height: u32, max: u32 },

    #[error("No lattice nodes generated (requested {requested}, produced {produced})")]
    DegenerateNodeCount { requested: u32, produced: usize },

    #[error("Unknown algorithm: '{name}'")]
    UnknownAlgorithm { name: String },

    #[error("Invalid parameters: {reason}")]
    InvalidParameters { reason: String },

    // Config and output errors
    #[error("Failed to get config directory")]
    ConfigDirNotFound,

    #[error("Config file not found at path: {path}")]
    ConfigFileNotFound { path: PathBuf },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse config: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error("Failed to serialize config: {0}")]
    ConfigSerialize(#[from] toml::ser::Error),

    #[error("Failed to encode image: {0}")]
    Image(#[from] image::ImageError),
}

impl MapGenError {
    /// Flatten validator field errors into a single `InvalidParameters` error
    pub fn from_validation(errors: &ValidationErrors) -> Self {
        let mut details = errors
            .field_errors()
            .iter()
            .map(|(field, errors)| {
                let messages: Vec<String> = errors.iter().map(|e| e.code.to_string()).collect();
                format!("{field}: {}", messages.join(", "))
            })
            .collect::<Vec<String>>();
        details.sort();

        MapGenError::InvalidParameters {
            reason: details.join("; "),
        }
    }
}

/// Result type alias for all operations
pub type MapGenResult<T> = Result<T, MapGenError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_map_gen_error_display() {
        let err = MapGenError::InvalidDimensions {
            width: 1,
            height: 64,
        };
        assert_eq!(err.to_string(), "Width/height must be > 1, got 1x64");

        let err = MapGenError::DimensionsTooLarge {
            width: 4096,
            height: 64,
            max: 2048,
        };
        assert_eq!(err.to_string(), "Width/height must not exceed 2048, got 4096x64");

        let err = MapGenError::ConfigDirNotFound;
        assert_eq!(err.to_string(), "Failed to get config directory");

        let err = MapGenError::UnknownAlgorithm {
            name: "plasma".to_string(),
        };
        assert!(err.to_string().contains("plasma"));
    }
}
