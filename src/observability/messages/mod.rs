// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Centralized message types for structured logging.
//!
//! # Organization
//!
//! * `canvas` - canvas actor lifecycle, command execution and forwarding
//! * `space` - registry membership changes
//! * `scene` - scene file loading and spawning

pub mod canvas;
pub mod scene;
pub mod space;

use tracing::Span;

/// A log message that knows its own level and structured fields.
pub trait StructuredLog {
    /// Emit the message at its documented level.
    fn log(&self);

    /// A span carrying the same fields, for instrumenting work done on behalf of
    /// the message's subject.
    fn span(&self, _name: &str) -> Span {
        Span::none()
    }
}
