use std::path::PathBuf;
use thiserror::Error;

/// Failures specific to locating or recognizing an application file.
///
/// I/O and parse failures are reported through `anyhow` with the file path
/// attached as context.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("unsupported config file format: {}", .0.display())]
    UnsupportedFormat(PathBuf),

    #[error("no config file matching {pattern:?} under {}", root.display())]
    NotFound { root: PathBuf, pattern: String },

    #[error("invalid config file pattern {pattern:?}: {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },
}
