// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Canvas actors.
//!
//! Each canvas is a tokio task that owns a [`Buffer`](crate::buffer::Buffer) and an
//! unbounded inbound queue. Senders find the queue through the
//! [`Space`](crate::space::Space) registry and enqueue [`Envelope`]s; the task
//! applies each packet to its state machine in arrival order and, for forwarding
//! commands, enqueues a translated packet on its host's queue.
//!
//! * [`actor`] - lifecycle, run loop and the [`CanvasHandle`] returned by [`spawn`]
//! * [`state`] - the command state machine
//! * [`forwarding`] - local-to-host coordinate translation and the debug overlay

pub mod actor;
pub mod forwarding;
pub mod state;


pub use actor::{spawn, CanvasHandle};
pub use forwarding::ConversionChart;
pub use state::{CanvasState, Forward, Transition};

use tokio::sync::oneshot;

use crate::buffer::{render, Buffer, Coord};
use crate::packet::Packet;

/// Anything that can sit in a canvas queue.
#[derive(Debug)]
pub enum Envelope {
    Packet(Packet),
    /// Reply with a copy of the canvas' observable state once every envelope
    /// queued before this one has been handled.
    Snapshot(oneshot::Sender<CanvasSnapshot>),
}

/// Lifecycle of a canvas actor. `Stopped` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActorState {
    Starting,
    Running,
    Stopping,
    Stopped,
}

/// Point-in-time copy of a canvas.
#[derive(Debug, Clone, PartialEq)]
pub struct CanvasSnapshot {
    pub id: String,
    pub state: ActorState,
    pub height: usize,
    pub width: usize,
    pub fillvalue: char,
    pub origin: Coord,
    pub host: Option<String>,
    pub chart: Option<ConversionChart>,
    pub buffer: Buffer,
    pub overlay: Option<Buffer>,
    pub packets_processed: u64,
}

impl CanvasSnapshot {
    pub fn render(&self) -> String {
        render(&self.buffer, None)
    }

    pub fn glyph_at(&self, coord: Coord) -> Option<char> {
        self.buffer.get(coord).map(|cell| cell.glyph)
    }
}
