// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Canvas actor lifecycle.
//!
//! [`spawn`] performs the STARTING phase synchronously: it builds the buffer,
//! registers the canvas and resolves its host, so the canvas is addressable
//! through the registry as soon as `spawn` returns. The RUNNING loop then runs on
//! its own tokio task until a `!kill` packet, the termination token or a closed
//! queue ends it. On the way out the actor closes its queue, removes its own
//! registry record and publishes [`ActorState::Stopped`]. The last two also
//! happen if the loop panics.

use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender, WeakUnboundedSender};
use tokio::sync::{oneshot, watch};
use tokio::task::{JoinError, JoinHandle};
use tokio_util::sync::CancellationToken;
use tracing::Instrument;

use crate::canvas::state::{CanvasState, Forward, Transition};
use crate::canvas::{ActorState, CanvasSnapshot, Envelope};
use crate::config::CanvasConfig;
use crate::errors::SpaceError;
use crate::observability::messages::canvas::{
    CanvasStarted, CanvasStopped, CyclicHostDiscarded, DeliveryFailed, PacketRejected,
};
use crate::observability::messages::StructuredLog;
use crate::packet::Packet;
use crate::space::Space;

/// Owner-side handle to a running canvas.
///
/// Dropping the handle does not stop the canvas; the registry keeps its queue
/// open. Use [`terminate`](Self::terminate) or send a `!kill` packet.
#[derive(Debug)]
pub struct CanvasHandle {
    id: String,
    queue: UnboundedSender<Envelope>,
    terminator: CancellationToken,
    state: watch::Receiver<ActorState>,
    task: JoinHandle<u64>,
}

impl CanvasHandle {
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Enqueue a packet directly, bypassing the registry.
    pub fn send(&self, packet: Packet) -> Result<(), SpaceError> {
        self.queue
            .send(Envelope::Packet(packet))
            .map_err(|_| SpaceError::Disconnected(self.id.clone()))
    }

    /// Copy of the canvas after everything queued so far has been handled.
    ///
    /// Returns `None` once the actor has stopped.
    pub async fn snapshot(&self) -> Option<CanvasSnapshot> {
        let (reply, response) = oneshot::channel();
        self.queue.send(Envelope::Snapshot(reply)).ok()?;
        response.await.ok()
    }

    pub fn state(&self) -> ActorState {
        *self.state.borrow()
    }

    /// Fire the termination token. Queued packets are not processed.
    pub fn terminate(&self) {
        self.terminator.cancel();
    }

    /// Wait for the actor to stop. Yields the number of packets it processed.
    pub async fn join(self) -> Result<u64, JoinError> {
        self.task.await
    }
}

/// Start a canvas actor and register it in `space`.
///
/// Must be called from within a tokio runtime.
pub fn spawn(config: &CanvasConfig, space: &Space) -> CanvasHandle {
    let mut canvas = CanvasState::new(config);
    if let Some(host_id) = canvas.discard_cyclic_host(space) {
        CyclicHostDiscarded {
            canvas_id: canvas.id(),
            host_id: &host_id,
        }
        .log();
    }

    let (queue, receiver) = mpsc::unbounded_channel();
    let terminator = CancellationToken::new();
    space.register(canvas.record(queue.clone(), terminator.clone()));
    canvas.sync_host(space);

    let (height, width) = canvas.dimensions();
    let started = CanvasStarted {
        canvas_id: canvas.id(),
        owner: canvas.owner(),
        height,
        width,
        host: canvas.host(),
    };
    started.log();
    let span = started.span("run");

    let (lifecycle, state) = watch::channel(ActorState::Starting);
    let task = tokio::spawn(
        run(
            canvas,
            receiver,
            queue.downgrade(),
            terminator.clone(),
            space.clone(),
            lifecycle,
        )
        .instrument(span),
    );

    CanvasHandle {
        id: config.id.clone(),
        queue,
        terminator,
        state,
        task,
    }
}

/// Removes the canvas' own registry record and publishes
/// [`ActorState::Stopped`] when dropped, including when the run loop unwinds.
struct Registration {
    id: String,
    own_queue: WeakUnboundedSender<Envelope>,
    space: Space,
    lifecycle: watch::Sender<ActorState>,
}

impl Drop for Registration {
    fn drop(&mut self) {
        if let Some(queue) = self.own_queue.upgrade() {
            self.space.deregister(&self.id, &queue);
        }
        self.lifecycle.send_replace(ActorState::Stopped);
    }
}

async fn run(
    mut canvas: CanvasState,
    mut receiver: UnboundedReceiver<Envelope>,
    own_queue: WeakUnboundedSender<Envelope>,
    terminator: CancellationToken,
    space: Space,
    lifecycle: watch::Sender<ActorState>,
) -> u64 {
    lifecycle.send_replace(ActorState::Running);
    let registration = Registration {
        id: canvas.id().to_string(),
        own_queue,
        space: space.clone(),
        lifecycle,
    };
    let mut processed: u64 = 0;

    let reason = loop {
        let envelope = tokio::select! {
            biased;
            _ = terminator.cancelled() => break "terminated",
            envelope = receiver.recv() => envelope,
        };

        match envelope {
            None => break "queue closed",
            Some(Envelope::Snapshot(reply)) => {
                // Requester may have given up waiting.
                let _ = reply.send(canvas.snapshot(ActorState::Running, processed));
            }
            Some(Envelope::Packet(packet)) => {
                processed += 1;
                match canvas.apply(&packet, &space) {
                    Ok(Transition::Continue) => {}
                    Ok(Transition::Forward(forward)) => deliver(&canvas, forward),
                    Ok(Transition::Stop) => break "killed",
                    Err(error) => PacketRejected {
                        canvas_id: canvas.id(),
                        command: &packet.command.cmd,
                        error: &error,
                    }
                    .log(),
                }
            }
        }
    };

    registration.lifecycle.send_replace(ActorState::Stopping);
    receiver.close();
    CanvasStopped {
        canvas_id: canvas.id(),
        reason,
        packets_processed: processed,
    }
    .log();
    drop(registration);
    processed
}

fn deliver(canvas: &CanvasState, forward: Forward) {
    if forward.queue.send(Envelope::Packet(forward.packet)).is_err() {
        let error = SpaceError::Disconnected(forward.host_id.clone());
        DeliveryFailed {
            canvas_id: canvas.id(),
            host_id: &forward.host_id,
            error: &error,
        }
        .log();
    }
}
