// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Ready-made packets for callers that think in text rather than charts.

use crate::buffer::{wrapped_chart, CellPatch, Coord};
use crate::config::consts::MAX_CANVAS_CELLS;
use crate::errors::PacketError;
use crate::packet::{fits_cell_limit, Command, Packet};

/// Builds command packets, turning text into a wrapped chart plus metadata.
///
/// Text placement starts at the content origin and wraps at the target width.
/// An optional template is merged into every glyph's metadata, so a caller can
/// tag a whole message with an owner or visibility flag.
#[derive(Debug, Clone)]
pub struct PacketBuilder {
    content_origin: Coord,
    target_width: usize,
    template: Option<CellPatch>,
}

impl PacketBuilder {
    pub fn new(target_width: usize) -> Self {
        Self {
            content_origin: Coord::default(),
            target_width: target_width.max(1),
            template: None,
        }
    }

    /// Metadata merged into every generated glyph. The template's glyph, if any,
    /// is ignored since each cell takes its glyph from the text.
    pub fn set_template(&mut self, template: CellPatch) -> &mut Self {
        self.template = Some(template);
        self
    }

    /// Where text placement starts on the target canvas. May be out of bounds.
    pub fn set_content_origin(&mut self, origin: Coord) -> &mut Self {
        self.content_origin = origin;
        self
    }

    /// Zero is ignored.
    pub fn set_target_width(&mut self, width: usize) -> &mut Self {
        if width > 0 {
            self.target_width = width;
        }
        self
    }

    pub fn write(&self, text: &str) -> Result<Packet, PacketError> {
        self.text_packet(&Command::Write, text)
    }

    /// Like [`write`](Self::write), relayed through every host up to the chain root.
    pub fn auto_forward(&self, text: &str) -> Result<Packet, PacketError> {
        self.text_packet(&Command::AutoForward, text)
    }

    /// Like [`write`](Self::write), relayed up the chain until `target_id` is reached.
    pub fn forward_to(&self, target_id: &str, text: &str) -> Result<Packet, PacketError> {
        self.text_packet(
            &Command::ForwardTo {
                target_id: target_id.to_string(),
            },
            text,
        )
    }

    pub fn resize(&self, height: usize, width: usize) -> Result<Packet, PacketError> {
        if height == 0 || width == 0 {
            return Err(PacketError::InvalidArgs {
                command: Command::Resize { height, width }.name().to_string(),
                reason: format!("dimensions must be positive, got {}x{}", height, width),
            });
        }
        if !fits_cell_limit(height, width) {
            return Err(PacketError::InvalidArgs {
                command: Command::Resize { height, width }.name().to_string(),
                reason: format!("{}x{} exceeds the {} cell limit", height, width, MAX_CANVAS_CELLS),
            });
        }
        Ok(Packet::control(&Command::Resize { height, width }))
    }

    pub fn set_origin(&self, origin: Coord) -> Packet {
        Packet::control(&Command::SetOrigin { origin })
    }

    pub fn set_host(&self, host_id: &str) -> Packet {
        Packet::control(&Command::SetHost {
            target_id: host_id.to_string(),
        })
    }

    pub fn set_fillvalue(&self, value: char) -> Packet {
        Packet::control(&Command::SetFillvalue { value })
    }

    pub fn clear(&self) -> Packet {
        Packet::control(&Command::Clear)
    }

    pub fn kill(&self) -> Packet {
        Packet::control(&Command::Kill)
    }

    fn text_packet(&self, command: &Command, text: &str) -> Result<Packet, PacketError> {
        if text.is_empty() {
            return Err(PacketError::InvalidArgs {
                command: command.name().to_string(),
                reason: "text is empty".into(),
            });
        }

        let chart = wrapped_chart(self.content_origin, text, self.target_width);
        let metadata = text
            .chars()
            .filter(|ch| *ch != '\n')
            .map(|ch| {
                let mut patch = CellPatch::default();
                if let Some(template) = &self.template {
                    patch.merge(template);
                }
                patch.glyph = Some(ch);
                patch
            })
            .collect();

        Ok(Packet::with_chart(command, chart, metadata))
    }
}
