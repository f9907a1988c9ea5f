// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Message types for scene loading and spawning.

use crate::errors::ValidationError;
use crate::observability::messages::StructuredLog;
use std::fmt::{Display, Formatter};

/// Scene file failed validation.
///
/// # Log Level
/// `error!` - The scene cannot be spawned
///
/// # Example
/// ```
/// use sigil_engine::errors::ValidationError;
/// use sigil_engine::observability::messages::scene::SceneInvalid;
///
/// let errors = vec![ValidationError::DuplicateCanvasId { canvas_id: "root".into() }];
/// let msg = SceneInvalid {
///     source: "scene.yaml",
///     errors: &errors,
/// };
///
/// tracing::error!("{}", msg);
/// ```
pub struct SceneInvalid<'a> {
    pub source: &'a str,
    pub errors: &'a [ValidationError],
}

impl Display for SceneInvalid<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "Scene '{}' is invalid: ", self.source)?;
        for (i, error) in self.errors.iter().enumerate() {
            if i > 0 {
                write!(f, "; ")?;
            }
            write!(f, "{}", error)?;
        }
        Ok(())
    }
}

impl StructuredLog for SceneInvalid<'_> {
    fn log(&self) {
        tracing::error!(
            source = self.source,
            error_count = self.errors.len(),
            "{}", self
        );
    }
}

/// Every canvas of a scene has been spawned.
///
/// # Log Level
/// `info!` - Important operational event
pub struct SceneSpawned {
    pub canvas_count: usize,
    pub root_count: usize,
}

impl Display for SceneSpawned {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Scene spawned: {} canvases, {} chain roots",
            self.canvas_count, self.root_count
        )
    }
}

impl StructuredLog for SceneSpawned {
    fn log(&self) {
        tracing::info!(
            canvas_count = self.canvas_count,
            root_count = self.root_count,
            "{}", self
        );
    }
}

/// Every canvas of a scene has stopped.
///
/// # Log Level
/// `info!` - Important operational event
pub struct SceneStopped {
    pub canvas_count: usize,
    pub packets_processed: u64,
}

impl Display for SceneStopped {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Scene stopped: {} canvases processed {} packets",
            self.canvas_count, self.packets_processed
        )
    }
}

impl StructuredLog for SceneStopped {
    fn log(&self) {
        tracing::info!(
            canvas_count = self.canvas_count,
            packets_processed = self.packets_processed,
            "{}", self
        );
    }
}
