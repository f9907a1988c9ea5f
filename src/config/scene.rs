// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::collections::HashSet;

use tokio::task::JoinError;

use crate::canvas::{spawn, CanvasHandle, CanvasSnapshot};
use crate::config::{CanvasConfig, SceneConfig};
use crate::observability::messages::scene::{SceneSpawned, SceneStopped};
use crate::observability::messages::StructuredLog;
use crate::packet::{Command, Packet};
use crate::space::Space;

/// The running canvases of a scene, in the order they were spawned.
#[derive(Debug)]
pub struct Scene {
    handles: Vec<CanvasHandle>,
    roots: Vec<String>,
}

impl Scene {
    /// Spawn every canvas of `config` into `space`, hosts before the canvases
    /// they host, so each canvas resolves its host at startup.
    pub fn spawn(config: &SceneConfig, space: &Space) -> Self {
        let ordered = spawn_order(config);
        let roots = ordered
            .iter()
            .filter(|canvas| canvas.host.is_none())
            .map(|canvas| canvas.id.clone())
            .collect::<Vec<_>>();
        let handles = ordered
            .into_iter()
            .map(|canvas| spawn(canvas, space))
            .collect::<Vec<_>>();

        SceneSpawned {
            canvas_count: handles.len(),
            root_count: roots.len(),
        }
        .log();

        Self { handles, roots }
    }

    pub fn handles(&self) -> &[CanvasHandle] {
        &self.handles
    }

    pub fn handle(&self, id: &str) -> Option<&CanvasHandle> {
        self.handles.iter().find(|handle| handle.id() == id)
    }

    /// Ids of the canvases that have no host.
    pub fn roots(&self) -> &[String] {
        &self.roots
    }

    /// Wait until everything sent so far has settled, and snapshot every canvas.
    ///
    /// Canvases are visited hosted-first, so anything a canvas forwards is already
    /// queued on its host when the host is asked. Snapshots come back in spawn
    /// order; stopped canvases are skipped.
    pub async fn flush(&self) -> Vec<CanvasSnapshot> {
        let mut snapshots = Vec::with_capacity(self.handles.len());
        for handle in self.handles.iter().rev() {
            if let Some(snapshot) = handle.snapshot().await {
                snapshots.push(snapshot);
            }
        }
        snapshots.reverse();
        snapshots
    }

    /// Send `!kill` to every canvas and wait for all of them to stop.
    ///
    /// Returns the total number of packets processed across the scene.
    pub async fn shutdown(self) -> Result<u64, JoinError> {
        for handle in &self.handles {
            // Already stopped canvases have nothing left to kill.
            let _ = handle.send(Packet::control(&Command::Kill));
        }
        let canvas_count = self.handles.len();
        let mut processed = 0;
        for handle in self.handles {
            processed += handle.join().await?;
        }
        SceneStopped {
            canvas_count,
            packets_processed: processed,
        }
        .log();
        Ok(processed)
    }
}

/// Canvases ordered so that every host precedes the canvases it hosts.
///
/// Declaration order is kept otherwise. Hosts that are not in the scene are
/// ignored, and a host loop is broken where it closes.
pub fn spawn_order(config: &SceneConfig) -> Vec<&CanvasConfig> {
    let mut ordered = Vec::with_capacity(config.canvases.len());
    let mut placed = HashSet::new();

    for canvas in &config.canvases {
        let mut chain = Vec::new();
        let mut on_chain = HashSet::new();
        let mut current = Some(canvas);

        while let Some(next) = current {
            if placed.contains(next.id.as_str()) || !on_chain.insert(next.id.as_str()) {
                break;
            }
            chain.push(next);
            current = next
                .host
                .as_deref()
                .and_then(|host| config.canvases.iter().find(|c| c.id == host));
        }

        for canvas in chain.into_iter().rev() {
            placed.insert(canvas.id.as_str());
            ordered.push(canvas);
        }
    }

    ordered
}
