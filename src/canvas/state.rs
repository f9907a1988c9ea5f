// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! The canvas command state machine.
//!
//! [`CanvasState::apply`] takes one packet and the registry, mutates the canvas,
//! and reports what the run loop should do next: keep going, enqueue a forwarded
//! packet on the host, or stop. It never sends anything itself and never holds the
//! registry lock across more than one registry call.

use std::collections::HashSet;

use tokio::sync::mpsc::UnboundedSender;
use tokio_util::sync::CancellationToken;

use crate::buffer::{bulk_write, generate, Buffer, CellPatch, Coord};
use crate::canvas::forwarding::{translate_cells, ConversionChart};
use crate::canvas::{ActorState, CanvasSnapshot, Envelope};
use crate::config::CanvasConfig;
use crate::errors::CommandError;
use crate::observability::messages::canvas::{
    CellsForwarded, CellsWritten, ChainRootReached, ForwardTargetReached, HostSynced,
    HostUnavailable,
};
use crate::observability::messages::StructuredLog;
use crate::packet::{Command, Packet};
use crate::space::{RecordUpdate, RegistryRecord, Space};

/// A translated packet bound for the host's queue.
#[derive(Debug)]
pub struct Forward {
    pub host_id: String,
    pub queue: UnboundedSender<Envelope>,
    pub packet: Packet,
}

/// What the run loop does after a packet has been applied.
#[derive(Debug)]
pub enum Transition {
    Continue,
    Forward(Forward),
    Stop,
}

/// Everything a canvas actor owns.
#[derive(Debug, Clone)]
pub struct CanvasState {
    id: String,
    owner: String,
    height: usize,
    width: usize,
    fillvalue: char,
    visible: bool,
    origin: Coord,
    host: Option<String>,
    chart: Option<ConversionChart>,
    overlay: Option<Buffer>,
    buffer: Buffer,
}

impl CanvasState {
    /// Build the canvas buffer. Host resolution happens in [`sync_host`](Self::sync_host).
    pub fn new(config: &CanvasConfig) -> Self {
        let buffer = generate(
            config.height,
            config.width,
            config.fillvalue,
            &config.owner,
            &config.id,
            config.visible,
        );
        Self {
            id: config.id.clone(),
            owner: config.owner.clone(),
            height: config.height,
            width: config.width,
            fillvalue: config.fillvalue,
            visible: config.visible,
            origin: config.origin,
            host: config.host.clone(),
            chart: None,
            overlay: None,
            buffer,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn owner(&self) -> &str {
        &self.owner
    }

    pub fn dimensions(&self) -> (usize, usize) {
        (self.height, self.width)
    }

    pub fn fillvalue(&self) -> char {
        self.fillvalue
    }

    pub fn origin(&self) -> Coord {
        self.origin
    }

    pub fn host(&self) -> Option<&str> {
        self.host.as_deref()
    }

    pub fn chart(&self) -> Option<&ConversionChart> {
        self.chart.as_ref()
    }

    pub fn overlay(&self) -> Option<&Buffer> {
        self.overlay.as_ref()
    }

    pub fn buffer(&self) -> &Buffer {
        &self.buffer
    }

    /// Registry record describing this canvas.
    pub fn record(
        &self,
        queue: UnboundedSender<Envelope>,
        terminator: CancellationToken,
    ) -> RegistryRecord {
        RegistryRecord {
            id: self.id.clone(),
            owner: self.owner.clone(),
            height: self.height,
            width: self.width,
            visible: self.visible,
            host: self.host.clone(),
            queue,
            terminator,
        }
    }

    pub fn snapshot(&self, state: ActorState, packets_processed: u64) -> CanvasSnapshot {
        CanvasSnapshot {
            id: self.id.clone(),
            state,
            height: self.height,
            width: self.width,
            fillvalue: self.fillvalue,
            origin: self.origin,
            host: self.host.clone(),
            chart: self.chart,
            buffer: self.buffer.clone(),
            overlay: self.overlay.clone(),
            packets_processed,
        }
    }

    /// Pull the host's dimensions from the registry and rebuild chart and overlay.
    ///
    /// If the host is not registered the previous chart is kept, rebuilt against
    /// its cached host dimensions so local changes (size, origin) still apply.
    /// Returns whether the host resolved.
    pub fn sync_host(&mut self, space: &Space) -> bool {
        let Some(host_id) = self.host.clone() else {
            return false;
        };
        match space.lookup(&host_id) {
            Some(record) => {
                self.rebuild_chart((record.height, record.width));
                HostSynced {
                    canvas_id: &self.id,
                    host_id: &host_id,
                    host_height: record.height,
                    host_width: record.width,
                }
                .log();
                true
            }
            None => {
                HostUnavailable {
                    canvas_id: &self.id,
                    host_id: &host_id,
                }
                .log();
                if let Some(chart) = self.chart {
                    self.rebuild_chart(chart.host_dimensions());
                }
                false
            }
        }
    }

    /// Whether hosting this canvas on `host_id` would close a loop in the chain.
    ///
    /// Walks host ids through the registry, one lookup per hop.
    pub fn would_cycle(&self, host_id: &str, space: &Space) -> bool {
        let mut current = Some(host_id.to_string());
        let mut seen = HashSet::new();
        while let Some(id) = current {
            if id == self.id || !seen.insert(id.clone()) {
                return true;
            }
            current = space.lookup(&id).and_then(|record| record.host);
        }
        false
    }

    /// Drop a host that would loop back to this canvas. Used before registration.
    pub fn discard_cyclic_host(&mut self, space: &Space) -> Option<String> {
        match self.host.as_deref() {
            Some(host_id) if self.would_cycle(host_id, space) => self.host.take(),
            _ => None,
        }
    }

    /// Execute one packet.
    pub fn apply(&mut self, packet: &Packet, space: &Space) -> Result<Transition, CommandError> {
        let command = packet.decode()?;

        match &command {
            Command::Write => {
                self.write(&command, packet);
                Ok(Transition::Continue)
            }
            Command::AutoForward => {
                if self.write(&command, packet) == 0 {
                    return Ok(Transition::Continue);
                }
                Ok(self.forward(&command, space))
            }
            Command::ForwardTo { target_id } => {
                self.write(&command, packet);
                if *target_id == self.id {
                    ForwardTargetReached {
                        canvas_id: &self.id,
                    }
                    .log();
                    return Ok(Transition::Continue);
                }
                Ok(self.forward(&command, space))
            }
            Command::Resize { height, width } => {
                self.height = *height;
                self.width = *width;
                self.regenerate();
                space.update(
                    &self.id,
                    RecordUpdate {
                        height: Some(*height),
                        width: Some(*width),
                        ..Default::default()
                    },
                );
                self.sync_host(space);
                Ok(Transition::Continue)
            }
            Command::SetOrigin { origin } => {
                self.origin = *origin;
                if let Some(chart) = self.chart {
                    self.rebuild_chart(chart.host_dimensions());
                }
                Ok(Transition::Continue)
            }
            Command::SetHost { target_id } => {
                let Some(record) = space.lookup(target_id) else {
                    return Err(CommandError::HostUnavailable(target_id.clone()));
                };
                if self.would_cycle(target_id, space) {
                    return Err(CommandError::HostCycle(target_id.clone()));
                }
                self.host = Some(target_id.clone());
                self.rebuild_chart((record.height, record.width));
                space.update(
                    &self.id,
                    RecordUpdate {
                        host: Some(target_id.clone()),
                        ..Default::default()
                    },
                );
                HostSynced {
                    canvas_id: &self.id,
                    host_id: target_id,
                    host_height: record.height,
                    host_width: record.width,
                }
                .log();
                Ok(Transition::Continue)
            }
            Command::SetFillvalue { value } => {
                self.fillvalue = *value;
                self.regenerate();
                self.sync_host(space);
                Ok(Transition::Continue)
            }
            Command::Clear => {
                self.regenerate();
                Ok(Transition::Continue)
            }
            Command::Kill => Ok(Transition::Stop),
        }
    }

    /// Write the packet's pairs and return how many landed.
    fn write(&mut self, command: &Command, packet: &Packet) -> usize {
        let written = bulk_write(&mut self.buffer, &packet.chart, &packet.metadata);
        CellsWritten {
            canvas_id: &self.id,
            command: command.name(),
            written,
            requested: packet.chart.len(),
        }
        .log();
        written
    }

    /// Relay every cell that differs from the fill glyph to the host.
    fn forward(&mut self, command: &Command, space: &Space) -> Transition {
        let Some(host_id) = self.host.clone() else {
            ChainRootReached {
                canvas_id: &self.id,
                command: command.name(),
            }
            .log();
            return Transition::Continue;
        };
        let Some(record) = space.lookup(&host_id) else {
            HostUnavailable {
                canvas_id: &self.id,
                host_id: &host_id,
            }
            .log();
            return Transition::Continue;
        };

        // Host was missing at startup and has registered since.
        let chart = match self.chart {
            Some(chart) => chart,
            None => self.rebuild_chart((record.height, record.width)),
        };

        let fillvalue = self.fillvalue;
        let cells = self
            .buffer
            .cells()
            .filter(|(_, cell)| cell.glyph != fillvalue)
            .map(|(coord, cell)| (coord, CellPatch::from(cell)));
        let translated = translate_cells(&chart, cells);
        CellsForwarded {
            canvas_id: &self.id,
            host_id: &host_id,
            forwarded: translated.chart.len(),
            dropped: translated.dropped,
        }
        .log();

        if translated.chart.is_empty() {
            return Transition::Continue;
        }
        Transition::Forward(Forward {
            packet: Packet::with_chart(command, translated.chart, translated.metadata),
            host_id,
            queue: record.queue,
        })
    }

    fn rebuild_chart(&mut self, host_dimensions: (usize, usize)) -> ConversionChart {
        let chart = ConversionChart::new(self.origin, (self.height, self.width), host_dimensions);
        self.overlay = Some(chart.overlay());
        self.chart = Some(chart);
        chart
    }

    fn regenerate(&mut self) {
        self.buffer = generate(
            self.height,
            self.width,
            self.fillvalue,
            &self.owner,
            &self.id,
            self.visible,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::PacketError;
    use tokio::sync::mpsc;

    fn config(id: &str, height: usize, width: usize) -> CanvasConfig {
        CanvasConfig::new(id, "tester", height, width).with_fillvalue('.')
    }

    /// Register `state` in `space`, returning the receiving end of its queue.
    fn register(state: &CanvasState, space: &Space) -> mpsc::UnboundedReceiver<Envelope> {
        let (queue, receiver) = mpsc::unbounded_channel();
        space.register(state.record(queue, CancellationToken::new()));
        receiver
    }

    fn write_packet(command: Command, cells: &[((i64, i64), char)]) -> Packet {
        Packet::with_chart(
            &command,
            cells.iter().map(|(coord, _)| Coord::from(*coord)).collect(),
            cells.iter().map(|(_, glyph)| CellPatch::glyph(*glyph)).collect(),
        )
    }

    #[test]
    fn test_write_skips_out_of_bounds() {
        let space = Space::new();
        let mut canvas = CanvasState::new(&config("a", 2, 2));

        let packet = write_packet(Command::Write, &[((0, 0), 'x'), ((2, 2), 'y'), ((-1, 0), 'z')]);
        let transition = canvas.apply(&packet, &space).unwrap();

        assert!(matches!(transition, Transition::Continue));
        assert_eq!(crate::buffer::render(canvas.buffer(), None), "x.\n..\n");
    }

    #[test]
    fn test_chart_mismatch_leaves_buffer_unchanged() {
        let space = Space::new();
        let mut canvas = CanvasState::new(&config("a", 2, 2));
        let before = canvas.buffer().clone();

        for command in [
            Command::Write,
            Command::AutoForward,
            Command::ForwardTo { target_id: "b".into() },
        ] {
            let packet = Packet::with_chart(
                &command,
                vec![Coord::new(0, 0), Coord::new(1, 1)],
                vec![CellPatch::glyph('x')],
            );
            let result = canvas.apply(&packet, &space);
            assert_eq!(
                result.unwrap_err(),
                CommandError::Packet(PacketError::ChartMismatch { chart: 2, metadata: 1 })
            );
        }
        assert_eq!(canvas.buffer(), &before);
    }

    #[test]
    fn test_overlapping_writes_merge_fields() {
        let space = Space::new();
        let mut canvas = CanvasState::new(&config("a", 1, 1));

        let first = Packet::with_chart(
            &Command::Write,
            vec![Coord::new(0, 0)],
            vec![CellPatch {
                glyph: Some('a'),
                owner: Some("first".into()),
                visible: Some(false),
                ..Default::default()
            }],
        );
        let second = Packet::with_chart(
            &Command::Write,
            vec![Coord::new(0, 0)],
            vec![CellPatch {
                glyph: Some('b'),
                visible: Some(true),
                ..Default::default()
            }],
        );
        canvas.apply(&first, &space).unwrap();
        canvas.apply(&second, &space).unwrap();

        let cell = canvas.buffer().get(Coord::new(0, 0)).unwrap();
        assert_eq!(cell.glyph, 'b');
        assert!(cell.visible);
        assert_eq!(cell.owner, "first");
        assert_eq!(cell.canvas_id, "a");
    }

    #[test]
    fn test_resize_regenerates_and_updates_registry() {
        let space = Space::new();
        let mut canvas = CanvasState::new(&config("a", 2, 2));
        let _rx = register(&canvas, &space);
        canvas
            .apply(&write_packet(Command::Write, &[((0, 0), 'x')]), &space)
            .unwrap();

        canvas
            .apply(&Packet::control(&Command::Resize { height: 3, width: 5 }), &space)
            .unwrap();

        assert_eq!(canvas.buffer().cell_count(), 15);
        assert!(canvas.buffer().cells().all(|(_, cell)| cell.glyph == '.'));
        let record = space.lookup("a").unwrap();
        assert_eq!((record.height, record.width), (3, 5));
    }

    #[test]
    fn test_set_fillvalue_discards_writes() {
        let space = Space::new();
        let mut canvas = CanvasState::new(&config("a", 1, 2));
        canvas
            .apply(&write_packet(Command::Write, &[((0, 0), 'x')]), &space)
            .unwrap();

        canvas
            .apply(&Packet::control(&Command::SetFillvalue { value: '~' }), &space)
            .unwrap();

        assert_eq!(canvas.fillvalue(), '~');
        assert_eq!(crate::buffer::render(canvas.buffer(), None), "~~\n");
    }

    #[test]
    fn test_clear_restores_fill() {
        let space = Space::new();
        let mut canvas = CanvasState::new(&config("a", 1, 2));
        canvas
            .apply(&write_packet(Command::Write, &[((0, 1), 'x')]), &space)
            .unwrap();
        canvas.apply(&Packet::control(&Command::Clear), &space).unwrap();
        assert_eq!(crate::buffer::render(canvas.buffer(), None), "..\n");
    }

    #[test]
    fn test_auto_forward_translates_into_host_space() {
        let space = Space::new();
        let host = CanvasState::new(&config("host", 5, 5));
        let mut host_rx = register(&host, &space);

        let mut child = CanvasState::new(
            &config("child", 2, 2).hosted_on("host", Coord::new(2, 3)),
        );
        let _child_rx = register(&child, &space);
        assert!(child.sync_host(&space));

        let packet = write_packet(Command::AutoForward, &[((0, 0), 'a'), ((1, 1), 'b')]);
        let Transition::Forward(forward) = child.apply(&packet, &space).unwrap() else {
            panic!("expected a forward");
        };

        assert_eq!(forward.host_id, "host");
        assert_eq!(forward.packet.decode().unwrap(), Command::AutoForward);
        // (1,1) lands at (3,4); (0,0) at (2,3). Host is 5 wide, so both fit.
        assert_eq!(forward.packet.chart, vec![Coord::new(2, 3), Coord::new(3, 4)]);
        assert_eq!(forward.packet.metadata[0].glyph, Some('a'));
        assert_eq!(forward.packet.metadata[0].canvas_id.as_deref(), Some("child"));

        forward.queue.send(Envelope::Packet(forward.packet)).unwrap();
        assert!(matches!(host_rx.try_recv(), Ok(Envelope::Packet(_))));
    }

    #[test]
    fn test_auto_forward_without_host_is_local_only() {
        let space = Space::new();
        let mut root = CanvasState::new(&config("root", 2, 2));

        let transition = root
            .apply(&write_packet(Command::AutoForward, &[((1, 1), 'z')]), &space)
            .unwrap();

        assert!(matches!(transition, Transition::Continue));
        assert_eq!(root.buffer().get(Coord::new(1, 1)).map(|c| c.glyph), Some('z'));
    }

    #[test]
    fn test_forward_to_stops_at_target() {
        let space = Space::new();
        let host = CanvasState::new(&config("host", 4, 4));
        let _host_rx = register(&host, &space);
        let mut mid = CanvasState::new(&config("mid", 2, 2).hosted_on("host", Coord::new(0, 0)));
        let _mid_rx = register(&mid, &space);
        mid.sync_host(&space);

        let to_mid = write_packet(Command::ForwardTo { target_id: "mid".into() }, &[((0, 0), 'q')]);
        assert!(matches!(mid.apply(&to_mid, &space).unwrap(), Transition::Continue));
        assert_eq!(mid.buffer().get(Coord::new(0, 0)).map(|c| c.glyph), Some('q'));

        let to_host = write_packet(Command::ForwardTo { target_id: "host".into() }, &[((0, 0), 'r')]);
        let Transition::Forward(forward) = mid.apply(&to_host, &space).unwrap() else {
            panic!("expected a forward");
        };
        assert_eq!(
            forward.packet.decode().unwrap(),
            Command::ForwardTo { target_id: "host".into() }
        );
    }

    #[test]
    fn test_set_host_unknown_keeps_previous_host() {
        let space = Space::new();
        let host = CanvasState::new(&config("host", 4, 4));
        let _host_rx = register(&host, &space);
        let mut child = CanvasState::new(&config("child", 2, 2).hosted_on("host", Coord::new(1, 1)));
        child.sync_host(&space);
        let chart_before = child.chart().copied();

        let result = child.apply(
            &Packet::control(&Command::SetHost { target_id: "ghost".into() }),
            &space,
        );

        assert_eq!(result.unwrap_err(), CommandError::HostUnavailable("ghost".into()));
        assert_eq!(child.host(), Some("host"));
        assert_eq!(child.chart().copied(), chart_before);
    }

    #[test]
    fn test_set_host_adopts_new_dimensions() {
        let space = Space::new();
        let big = CanvasState::new(&config("big", 8, 9));
        let _big_rx = register(&big, &space);
        let mut child = CanvasState::new(&config("child", 2, 2));
        let _child_rx = register(&child, &space);

        child
            .apply(&Packet::control(&Command::SetHost { target_id: "big".into() }), &space)
            .unwrap();

        assert_eq!(child.host(), Some("big"));
        assert_eq!(child.chart().map(|c| c.host_dimensions()), Some((8, 9)));
        assert_eq!(child.overlay().map(|o| o.cell_count()), Some(72));
        assert_eq!(space.lookup("child").and_then(|r| r.host).as_deref(), Some("big"));
    }

    #[test]
    fn test_set_host_rejects_cycles() {
        let space = Space::new();
        let top = CanvasState::new(&config("top", 4, 4).hosted_on("bottom", Coord::default()));
        let _top_rx = register(&top, &space);
        let mut bottom = CanvasState::new(&config("bottom", 2, 2));
        let _bottom_rx = register(&bottom, &space);

        let result = bottom.apply(
            &Packet::control(&Command::SetHost { target_id: "top".into() }),
            &space,
        );
        assert_eq!(result.unwrap_err(), CommandError::HostCycle("top".into()));

        let result = bottom.apply(
            &Packet::control(&Command::SetHost { target_id: "bottom".into() }),
            &space,
        );
        assert_eq!(result.unwrap_err(), CommandError::HostCycle("bottom".into()));
        assert_eq!(bottom.host(), None);
    }

    #[test]
    fn test_set_origin_uses_cached_host_dimensions() {
        let space = Space::new();
        let host = CanvasState::new(&config("host", 5, 5));
        let _host_rx = register(&host, &space);
        let mut child = CanvasState::new(&config("child", 2, 2).hosted_on("host", Coord::default()));
        child.sync_host(&space);

        // Host shrinks, child is not told.
        space.update("host", RecordUpdate { height: Some(1), width: Some(1), ..Default::default() });
        child
            .apply(&Packet::control(&Command::SetOrigin { origin: Coord::new(3, 3) }), &space)
            .unwrap();

        let chart = child.chart().copied().unwrap();
        assert_eq!(chart.origin(), Coord::new(3, 3));
        assert_eq!(chart.host_dimensions(), (5, 5));
    }

    #[test]
    fn test_stale_chart_drops_outside_snapshot_dimensions() {
        let space = Space::new();
        let host = CanvasState::new(&config("host", 3, 3));
        let _host_rx = register(&host, &space);
        let mut child = CanvasState::new(&config("child", 3, 3).hosted_on("host", Coord::new(1, 1)));
        child.sync_host(&space);

        // Host grows after the child synced; child still drops against 3x3.
        space.update("host", RecordUpdate { height: Some(9), width: Some(9), ..Default::default() });

        let packet = write_packet(
            Command::AutoForward,
            &[((0, 0), 'a'), ((1, 1), 'b'), ((2, 2), 'c')],
        );
        let Transition::Forward(forward) = child.apply(&packet, &space).unwrap() else {
            panic!("expected a forward");
        };
        assert_eq!(forward.packet.chart, vec![Coord::new(1, 1), Coord::new(2, 2)]);
    }

    #[test]
    fn test_late_host_builds_chart_on_first_forward() {
        let space = Space::new();
        let mut child = CanvasState::new(&config("child", 2, 2).hosted_on("late", Coord::new(0, 1)));
        assert!(!child.sync_host(&space));
        assert!(child.chart().is_none());

        let late = CanvasState::new(&config("late", 3, 3));
        let _late_rx = register(&late, &space);

        let packet = write_packet(Command::AutoForward, &[((0, 0), 'x')]);
        let Transition::Forward(forward) = child.apply(&packet, &space).unwrap() else {
            panic!("expected a forward");
        };
        assert_eq!(forward.packet.chart, vec![Coord::new(0, 1)]);
        assert!(child.chart().is_some());
    }

    #[test]
    fn test_auto_forward_relays_earlier_writes() {
        let space = Space::new();
        let host = CanvasState::new(&config("host", 3, 3));
        let _host_rx = register(&host, &space);
        let mut child = CanvasState::new(&config("child", 1, 2).hosted_on("host", Coord::default()));
        child.sync_host(&space);

        let local = write_packet(Command::Write, &[((0, 0), 'a')]);
        assert!(matches!(child.apply(&local, &space).unwrap(), Transition::Continue));

        let packet = write_packet(Command::AutoForward, &[((0, 1), 'b')]);
        let Transition::Forward(forward) = child.apply(&packet, &space).unwrap() else {
            panic!("expected a forward");
        };
        assert_eq!(forward.packet.chart, vec![Coord::new(0, 0), Coord::new(0, 1)]);
        let glyphs: Vec<_> = forward.packet.metadata.iter().map(|m| m.glyph).collect();
        assert_eq!(glyphs, vec![Some('a'), Some('b')]);
    }

    #[test]
    fn test_forward_skips_fill_glyphs() {
        let space = Space::new();
        let host = CanvasState::new(&config("host", 3, 3));
        let _host_rx = register(&host, &space);
        let mut child = CanvasState::new(&config("child", 1, 3).hosted_on("host", Coord::default()));
        child.sync_host(&space);

        let packet = write_packet(Command::AutoForward, &[((0, 0), '.'), ((0, 2), 'x')]);
        let Transition::Forward(forward) = child.apply(&packet, &space).unwrap() else {
            panic!("expected a forward");
        };
        assert_eq!(forward.packet.chart, vec![Coord::new(0, 2)]);
    }

    #[test]
    fn test_auto_forward_needs_a_landed_write() {
        let space = Space::new();
        let host = CanvasState::new(&config("host", 3, 3));
        let _host_rx = register(&host, &space);
        let mut child = CanvasState::new(&config("child", 2, 2).hosted_on("host", Coord::default()));
        child.sync_host(&space);
        child
            .apply(&write_packet(Command::Write, &[((0, 0), 'a')]), &space)
            .unwrap();

        let missed = write_packet(Command::AutoForward, &[((5, 5), 'b')]);
        assert!(matches!(child.apply(&missed, &space).unwrap(), Transition::Continue));

        // forward_to relays existing content even when nothing new landed.
        let relay = write_packet(Command::ForwardTo { target_id: "host".into() }, &[((5, 5), 'b')]);
        let Transition::Forward(forward) = child.apply(&relay, &space).unwrap() else {
            panic!("expected a forward");
        };
        assert_eq!(forward.packet.chart, vec![Coord::new(0, 0)]);
    }

    #[test]
    fn test_set_fillvalue_resyncs_host() {
        let space = Space::new();
        let host = CanvasState::new(&config("host", 4, 4));
        let _host_rx = register(&host, &space);
        let mut child = CanvasState::new(&config("child", 2, 2).hosted_on("host", Coord::default()));
        child.sync_host(&space);

        space.update("host", RecordUpdate { height: Some(6), width: Some(7), ..Default::default() });
        child
            .apply(&Packet::control(&Command::SetFillvalue { value: '~' }), &space)
            .unwrap();

        assert_eq!(child.chart().map(|c| c.host_dimensions()), Some((6, 7)));
        assert_eq!(child.overlay().map(|o| o.cell_count()), Some(42));
    }

    #[test]
    fn test_extreme_origin_is_harmless() {
        let space = Space::new();
        let host = CanvasState::new(&config("host", 4, 4));
        let _host_rx = register(&host, &space);
        let mut child = CanvasState::new(&config("child", 2, 2).hosted_on("host", Coord::default()));
        child.sync_host(&space);

        let origins = [
            Coord::new(i64::MAX, 0),
            Coord::new(0, i64::MAX),
            Coord::new(i64::MIN, i64::MIN),
        ];
        for origin in origins {
            child
                .apply(&Packet::control(&Command::SetOrigin { origin }), &space)
                .unwrap();
            let overlay = child.overlay().unwrap();
            assert!(overlay.cells().all(|(_, cell)| cell.glyph != '#'));

            let packet = write_packet(Command::AutoForward, &[((0, 0), 'x')]);
            assert!(matches!(child.apply(&packet, &space).unwrap(), Transition::Continue));
        }
    }

    #[test]
    fn test_oversized_resize_rejected() {
        let space = Space::new();
        let mut canvas = CanvasState::new(&config("a", 2, 2));
        let _rx = register(&canvas, &space);

        let packet = Packet::control(&Command::Resize { height: usize::MAX, width: 2 });
        assert!(matches!(
            canvas.apply(&packet, &space).unwrap_err(),
            CommandError::Packet(PacketError::InvalidArgs { .. })
        ));
        assert_eq!(canvas.dimensions(), (2, 2));
        assert_eq!(space.lookup("a").map(|r| (r.height, r.width)), Some((2, 2)));
    }

    #[test]
    fn test_kill_stops() {
        let space = Space::new();
        let mut canvas = CanvasState::new(&config("a", 1, 1));
        let transition = canvas.apply(&Packet::control(&Command::Kill), &space).unwrap();
        assert!(matches!(transition, Transition::Stop));
    }

    #[test]
    fn test_unknown_command_rejected() {
        let space = Space::new();
        let mut canvas = CanvasState::new(&config("a", 1, 1));
        let packet = Packet::from_json(r#"{"command": {"cmd": "teleport"}}"#).unwrap();
        assert_eq!(
            canvas.apply(&packet, &space).unwrap_err(),
            CommandError::Packet(PacketError::UnknownCommand("teleport".into()))
        );
    }
}
