// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Message types for registry membership changes.

use crate::observability::messages::StructuredLog;
use std::fmt::{Display, Formatter};

/// A canvas record was inserted into the registry.
///
/// # Log Level
/// `debug!` - Routine, or `warn!` when an existing record was replaced
pub struct CanvasRegistered<'a> {
    pub canvas_id: &'a str,
    pub replaced: bool,
}

impl Display for CanvasRegistered<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        if self.replaced {
            write!(f, "Canvas '{}' registered, replacing a live record", self.canvas_id)
        } else {
            write!(f, "Canvas '{}' registered", self.canvas_id)
        }
    }
}

impl StructuredLog for CanvasRegistered<'_> {
    fn log(&self) {
        if self.replaced {
            tracing::warn!(canvas_id = self.canvas_id, replaced = true, "{}", self);
        } else {
            tracing::debug!(canvas_id = self.canvas_id, replaced = false, "{}", self);
        }
    }
}

/// A canvas record was removed from the registry.
///
/// # Log Level
/// `debug!` - Routine
pub struct CanvasDeregistered<'a> {
    pub canvas_id: &'a str,
}

impl Display for CanvasDeregistered<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "Canvas '{}' deregistered", self.canvas_id)
    }
}

impl StructuredLog for CanvasDeregistered<'_> {
    fn log(&self) {
        tracing::debug!(canvas_id = self.canvas_id, "{}", self);
    }
}
