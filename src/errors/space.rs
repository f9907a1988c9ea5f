// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use thiserror::Error;

/// Delivery failures when addressing a canvas through the registry.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SpaceError {
    /// No canvas is registered under this id.
    #[error("Canvas '{0}' is not registered")]
    NotFound(String),

    /// The canvas is registered but its queue has no receiver any more.
    #[error("Canvas '{0}' stopped receiving")]
    Disconnected(String),
}
