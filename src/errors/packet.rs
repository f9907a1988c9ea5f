// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Errors raised while decoding or executing a command packet.
//!
//! None of these are fatal to a canvas actor: the packet is reported and dropped,
//! and the actor keeps serving its queue.

use thiserror::Error;

/// A packet that cannot be decoded into a command.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PacketError {
    /// The `cmd` field named a command this engine does not know.
    #[error("Unknown command '{0}'")]
    UnknownCommand(String),

    /// A write-class packet whose chart and metadata lists differ in length.
    #[error("Chart/metadata length mismatch: {chart} coordinates, {metadata} metadata entries")]
    ChartMismatch { chart: usize, metadata: usize },

    /// The `args` mapping is missing a field or holds a value of the wrong type.
    #[error("Invalid arguments for '{command}': {reason}")]
    InvalidArgs { command: String, reason: String },

    /// The raw text was not a packet at all.
    #[error("Malformed packet: {0}")]
    Malformed(String),
}

/// Failure while applying a decoded command to a canvas.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CommandError {
    #[error(transparent)]
    Packet(#[from] PacketError),

    /// `set_host` named a canvas that is not registered.
    #[error("Host '{0}' is not registered")]
    HostUnavailable(String),

    /// `set_host` would make the canvas its own ancestor.
    #[error("Hosting on '{0}' would create a cycle")]
    HostCycle(String),
}
