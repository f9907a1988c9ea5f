// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Observability module for structured logging and tracing.
//!
//! Diagnostic text for the engine lives in message types under [`messages`]. Each
//! one implements `Display` for its human-readable form and
//! [`messages::StructuredLog`] to emit itself with structured fields at the level
//! documented on the type. Actor code builds a message and calls `.log()` instead
//! of formatting strings inline.
//!
//! # Usage
//!
//! ```rust
//! use sigil_engine::observability::messages::canvas::HostUnavailable;
//! use sigil_engine::observability::messages::StructuredLog;
//!
//! HostUnavailable {
//!     canvas_id: "panel",
//!     host_id: "root",
//! }
//! .log();
//! ```

pub mod messages;

use tracing_subscriber::EnvFilter;

/// Install the global `fmt` subscriber.
///
/// `RUST_LOG` wins over `default_filter` when set. Calling this more than once is
/// harmless; later calls leave the first subscriber in place.
pub fn init_tracing(default_filter: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
}
