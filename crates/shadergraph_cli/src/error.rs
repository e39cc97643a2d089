// SPDX-License-Identifier: MIT OR Apache-2.0
//! Command errors.

use crate::textures::TextureError;
use shadergraph::MaterialError;
use std::path::PathBuf;

/// Errors that end a command
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    /// Reading or writing a file failed
    #[error("{path}: {source}")]
    Io {
        /// File path
        path: PathBuf,
        /// Underlying error
        source: std::io::Error,
    },

    /// The material could not be loaded or compiled
    #[error(transparent)]
    Material(#[from] MaterialError),

    /// A texture could not be loaded
    #[error(transparent)]
    Texture(#[from] TextureError),

    /// The material has no fragment graph
    #[error("Material has no fragment graph")]
    NoFragmentGraph,

    /// Type diagnostics were reported
    #[error("{0} edge(s) with incompatible port types")]
    TypeErrors(usize),

    /// Descriptor serialization failed
    #[error("Failed to write descriptor: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type for commands
pub type Result<T> = std::result::Result<T, CliError>;
