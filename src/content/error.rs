//! Content loading errors

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while reading a single content file.
///
/// The repository never hands these to callers of its query operations;
/// they are logged and the affected slug is treated as absent.
#[derive(Error, Debug)]
pub enum ContentError {
    #[error("IO error when reading `{path}`")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid YAML front-matter in `{path}`")]
    FrontMatter {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },
}
