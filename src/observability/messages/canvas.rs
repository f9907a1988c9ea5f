// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Message types for canvas actor events.
//!
//! This module contains message types for logging events related to:
//! * Actor lifecycle (start, stop)
//! * Command execution and rejected packets
//! * Host resolution and content forwarding

use crate::observability::messages::StructuredLog;
use std::fmt::{Display, Formatter};
use tracing::Span;

/// Canvas registered and entered its run loop.
///
/// # Log Level
/// `info!` - Important operational event
///
/// # Example
/// ```
/// use sigil_engine::observability::messages::canvas::CanvasStarted;
///
/// let msg = CanvasStarted {
///     canvas_id: "panel",
///     owner: "demo",
///     height: 4,
///     width: 10,
///     host: Some("root"),
/// };
///
/// tracing::info!("{}", msg);
/// ```
pub struct CanvasStarted<'a> {
    pub canvas_id: &'a str,
    pub owner: &'a str,
    pub height: usize,
    pub width: usize,
    pub host: Option<&'a str>,
}

impl Display for CanvasStarted<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Canvas '{}' started: {}x{}, owner={}, host={}",
            self.canvas_id,
            self.height,
            self.width,
            self.owner,
            self.host.unwrap_or("none")
        )
    }
}

impl StructuredLog for CanvasStarted<'_> {
    fn log(&self) {
        tracing::info!(
            canvas_id = self.canvas_id,
            owner = self.owner,
            height = self.height,
            width = self.width,
            host = self.host.unwrap_or("none"),
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::info_span!(
            "canvas",
            span_name = name,
            canvas_id = self.canvas_id,
            owner = self.owner,
        )
    }
}

/// Canvas left its run loop and deregistered.
///
/// # Log Level
/// `info!` - Important operational event
pub struct CanvasStopped<'a> {
    pub canvas_id: &'a str,
    pub reason: &'a str,
    pub packets_processed: u64,
}

impl Display for CanvasStopped<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Canvas '{}' stopped ({}) after {} packets",
            self.canvas_id, self.reason, self.packets_processed
        )
    }
}

impl StructuredLog for CanvasStopped<'_> {
    fn log(&self) {
        tracing::info!(
            canvas_id = self.canvas_id,
            reason = self.reason,
            packets_processed = self.packets_processed,
            "{}", self
        );
    }
}

/// A packet could not be executed and was dropped.
///
/// # Log Level
/// `warn!` - The actor continues, but a sender produced something unusable
///
/// # Example
/// ```
/// use sigil_engine::errors::PacketError;
/// use sigil_engine::observability::messages::canvas::PacketRejected;
///
/// let error = PacketError::UnknownCommand("explode".into());
/// let msg = PacketRejected {
///     canvas_id: "panel",
///     command: "explode",
///     error: &error,
/// };
///
/// tracing::warn!("{}", msg);
/// ```
pub struct PacketRejected<'a> {
    pub canvas_id: &'a str,
    pub command: &'a str,
    pub error: &'a dyn std::error::Error,
}

impl Display for PacketRejected<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Canvas '{}' dropped '{}' packet: {}",
            self.canvas_id, self.command, self.error
        )
    }
}

impl StructuredLog for PacketRejected<'_> {
    fn log(&self) {
        tracing::warn!(
            canvas_id = self.canvas_id,
            command = self.command,
            error = %self.error,
            "{}", self
        );
    }
}

/// Cells written by a write-class command.
///
/// # Log Level
/// `debug!` - Per-packet detail
pub struct CellsWritten<'a> {
    pub canvas_id: &'a str,
    pub command: &'a str,
    pub written: usize,
    pub requested: usize,
}

impl Display for CellsWritten<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Canvas '{}' wrote {}/{} cells for '{}'",
            self.canvas_id, self.written, self.requested, self.command
        )
    }
}

impl StructuredLog for CellsWritten<'_> {
    fn log(&self) {
        tracing::debug!(
            canvas_id = self.canvas_id,
            command = self.command,
            written = self.written,
            requested = self.requested,
            "{}", self
        );
    }
}

/// Translated cells relayed to the host.
///
/// # Log Level
/// `debug!` - Per-packet detail
pub struct CellsForwarded<'a> {
    pub canvas_id: &'a str,
    pub host_id: &'a str,
    pub forwarded: usize,
    pub dropped: usize,
}

impl Display for CellsForwarded<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Canvas '{}' forwarded {} cells to '{}' ({} outside host bounds)",
            self.canvas_id, self.forwarded, self.host_id, self.dropped
        )
    }
}

impl StructuredLog for CellsForwarded<'_> {
    fn log(&self) {
        tracing::debug!(
            canvas_id = self.canvas_id,
            host_id = self.host_id,
            forwarded = self.forwarded,
            dropped = self.dropped,
            "{}", self
        );
    }
}

/// Forwarding stopped because the canvas has no host.
///
/// # Log Level
/// `debug!` - Normal end of a chain
pub struct ChainRootReached<'a> {
    pub canvas_id: &'a str,
    pub command: &'a str,
}

impl Display for ChainRootReached<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Canvas '{}' is a chain root, '{}' not forwarded",
            self.canvas_id, self.command
        )
    }
}

impl StructuredLog for ChainRootReached<'_> {
    fn log(&self) {
        tracing::debug!(
            canvas_id = self.canvas_id,
            command = self.command,
            "{}", self
        );
    }
}

/// A `forward_to` packet arrived at its target.
///
/// # Log Level
/// `debug!` - Normal end of a chain
pub struct ForwardTargetReached<'a> {
    pub canvas_id: &'a str,
}

impl Display for ForwardTargetReached<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "Canvas '{}' is the forward target, chain ends here", self.canvas_id)
    }
}

impl StructuredLog for ForwardTargetReached<'_> {
    fn log(&self) {
        tracing::debug!(canvas_id = self.canvas_id, "{}", self);
    }
}

/// The configured host id does not resolve in the registry.
///
/// # Log Level
/// `warn!` - Content stays local until the host returns or is replaced
pub struct HostUnavailable<'a> {
    pub canvas_id: &'a str,
    pub host_id: &'a str,
}

impl Display for HostUnavailable<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Canvas '{}' cannot reach host '{}': not registered",
            self.canvas_id, self.host_id
        )
    }
}

impl StructuredLog for HostUnavailable<'_> {
    fn log(&self) {
        tracing::warn!(
            canvas_id = self.canvas_id,
            host_id = self.host_id,
            "{}", self
        );
    }
}

/// Host dimensions pulled and overlay/chart rebuilt.
///
/// # Log Level
/// `info!` - Chain topology change
pub struct HostSynced<'a> {
    pub canvas_id: &'a str,
    pub host_id: &'a str,
    pub host_height: usize,
    pub host_width: usize,
}

impl Display for HostSynced<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Canvas '{}' synced to host '{}' ({}x{})",
            self.canvas_id, self.host_id, self.host_height, self.host_width
        )
    }
}

impl StructuredLog for HostSynced<'_> {
    fn log(&self) {
        tracing::info!(
            canvas_id = self.canvas_id,
            host_id = self.host_id,
            host_height = self.host_height,
            host_width = self.host_width,
            "{}", self
        );
    }
}

/// Sending to a host queue failed after the host was resolved.
///
/// # Log Level
/// `warn!` - The host stopped between lookup and send
pub struct DeliveryFailed<'a> {
    pub canvas_id: &'a str,
    pub host_id: &'a str,
    pub error: &'a dyn std::error::Error,
}

impl Display for DeliveryFailed<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Canvas '{}' could not deliver to '{}': {}",
            self.canvas_id, self.host_id, self.error
        )
    }
}

impl StructuredLog for DeliveryFailed<'_> {
    fn log(&self) {
        tracing::warn!(
            canvas_id = self.canvas_id,
            host_id = self.host_id,
            error = %self.error,
            "{}", self
        );
    }
}

/// A configured host would loop back to this canvas and was dropped at startup.
///
/// # Log Level
/// `warn!` - The canvas runs as a chain root instead
pub struct CyclicHostDiscarded<'a> {
    pub canvas_id: &'a str,
    pub host_id: &'a str,
}

impl Display for CyclicHostDiscarded<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Canvas '{}' ignores host '{}': hosting there would create a cycle",
            self.canvas_id, self.host_id
        )
    }
}

impl StructuredLog for CyclicHostDiscarded<'_> {
    fn log(&self) {
        tracing::warn!(
            canvas_id = self.canvas_id,
            host_id = self.host_id,
            "{}", self
        );
    }
}
