// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::fmt;
use thiserror::Error;

/// Errors that can occur during scene validation
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationError {
    /// Host references form a loop, so no canvas in it can reach a chain root
    CyclicHostChain {
        /// The chain path, closed by repeating its first canvas
        cycle: Vec<String>,
    },
    /// A canvas names a host that is not declared in the scene
    UnresolvedHost {
        /// The canvas with the dangling host reference
        canvas_id: String,
        /// The host that couldn't be resolved
        missing_host: String,
    },
    /// Two canvases share an id
    DuplicateCanvasId {
        /// The duplicate canvas ID
        canvas_id: String,
    },
    /// A canvas was declared with a zero height or width
    EmptyCanvas {
        canvas_id: String,
        height: usize,
        width: usize,
    },
    /// A canvas holds more cells than any canvas may
    OversizedCanvas {
        canvas_id: String,
        height: usize,
        width: usize,
    },
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::CyclicHostChain { cycle } => {
                write!(f, "Cyclic host chain detected: {}", cycle.join(" -> "))
            }
            ValidationError::UnresolvedHost {
                canvas_id,
                missing_host,
            } => {
                write!(
                    f,
                    "Canvas '{}' is hosted on '{}' which does not exist",
                    canvas_id, missing_host
                )
            }
            ValidationError::DuplicateCanvasId { canvas_id } => {
                write!(f, "Duplicate canvas ID: '{}'", canvas_id)
            }
            ValidationError::EmptyCanvas {
                canvas_id,
                height,
                width,
            } => {
                write!(
                    f,
                    "Canvas '{}' has empty dimensions {}x{}",
                    canvas_id, height, width
                )
            }
            ValidationError::OversizedCanvas {
                canvas_id,
                height,
                width,
            } => {
                write!(
                    f,
                    "Canvas '{}' is too large at {}x{}",
                    canvas_id, height, width
                )
            }
        }
    }
}

impl std::error::Error for ValidationError {}

/// Errors produced while loading a scene file.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    /// The file extension is neither YAML nor TOML.
    #[error("Unsupported scene format: '{0}'")]
    UnsupportedFormat(String),

    #[error("Scene validation failed:\n{}", .0.iter().map(|e| e.to_string()).collect::<Vec<_>>().join("\n"))]
    Invalid(Vec<ValidationError>),
}
