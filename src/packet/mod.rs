// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Command packets exchanged between canvas actors.
//!
//! A [`Packet`] is the wire/in-memory message: a command block (`cmd` name plus an
//! `args` mapping), a chart of target coordinates and the metadata to write at each
//! of them, paired by position:
//!
//! ```json
//! { "command":  { "cmd": "write", "args": {} },
//!   "chart":    [[0, 0], [0, 1]],
//!   "metadata": [{ "char": "h" }, { "char": "i" }] }
//! ```
//!
//! The command name stays a string on the wire so that external producers can send
//! anything. It is decoded exactly once, by [`Packet::decode`], into the closed
//! [`Command`] enum that the canvas state machine matches on.

pub mod builder;

pub use builder::PacketBuilder;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

use crate::buffer::{CellPatch, Coord};
use crate::config::consts::MAX_CANVAS_CELLS;
use crate::errors::PacketError;

pub const CMD_WRITE: &str = "write";
pub const CMD_AUTO_FORWARD: &str = "auto_forward";
pub const CMD_FORWARD_TO: &str = "forward_to";
pub const CMD_RESIZE: &str = "resize";
pub const CMD_SET_ORIGIN: &str = "set_origin";
pub const CMD_SET_HOST: &str = "set_host";
pub const CMD_SET_FILLVALUE: &str = "set_fillvalue";
pub const CMD_CLEAR: &str = "clear";
pub const CMD_KILL: &str = "!kill";

/// The `{cmd, args}` block of a packet, undecoded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommandBlock {
    pub cmd: String,
    #[serde(default)]
    pub args: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Packet {
    pub command: CommandBlock,
    #[serde(default)]
    pub chart: Vec<Coord>,
    #[serde(default)]
    pub metadata: Vec<CellPatch>,
}

/// Decoded form of a command block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Write,
    AutoForward,
    ForwardTo { target_id: String },
    Resize { height: usize, width: usize },
    SetOrigin { origin: Coord },
    SetHost { target_id: String },
    SetFillvalue { value: char },
    Clear,
    Kill,
}

impl Command {
    pub fn name(&self) -> &'static str {
        match self {
            Command::Write => CMD_WRITE,
            Command::AutoForward => CMD_AUTO_FORWARD,
            Command::ForwardTo { .. } => CMD_FORWARD_TO,
            Command::Resize { .. } => CMD_RESIZE,
            Command::SetOrigin { .. } => CMD_SET_ORIGIN,
            Command::SetHost { .. } => CMD_SET_HOST,
            Command::SetFillvalue { .. } => CMD_SET_FILLVALUE,
            Command::Clear => CMD_CLEAR,
            Command::Kill => CMD_KILL,
        }
    }

    /// Commands that carry a chart/metadata payload.
    pub fn is_write_class(&self) -> bool {
        matches!(
            self,
            Command::Write | Command::AutoForward | Command::ForwardTo { .. }
        )
    }

    pub fn encode(&self) -> CommandBlock {
        let args = match self {
            Command::ForwardTo { target_id } | Command::SetHost { target_id } => {
                json!({ "target_id": target_id })
            }
            Command::Resize { height, width } => json!({ "height": height, "width": width }),
            Command::SetOrigin { origin } => json!({ "row": origin.row, "col": origin.col }),
            Command::SetFillvalue { value } => json!({ "value": value }),
            Command::Write | Command::AutoForward | Command::Clear | Command::Kill => json!({}),
        };
        CommandBlock {
            cmd: self.name().to_string(),
            args: match args {
                Value::Object(map) => map,
                _ => Map::new(),
            },
        }
    }
}

#[derive(Deserialize)]
struct TargetArgs {
    #[serde(alias = "canvas_id", alias = "host")]
    target_id: String,
}

#[derive(Deserialize)]
struct ResizeArgs {
    height: usize,
    width: usize,
}

#[derive(Deserialize)]
struct OriginArgs {
    #[serde(alias = "y")]
    row: i64,
    #[serde(alias = "x")]
    col: i64,
}

#[derive(Deserialize)]
struct FillvalueArgs {
    #[serde(alias = "fillvalue")]
    value: char,
}

impl Packet {
    /// Packet with an empty chart, for control commands.
    pub fn control(command: &Command) -> Self {
        Self::with_chart(command, Vec::new(), Vec::new())
    }

    pub fn with_chart(command: &Command, chart: Vec<Coord>, metadata: Vec<CellPatch>) -> Self {
        Self {
            command: command.encode(),
            chart,
            metadata,
        }
    }

    pub fn from_json(raw: &str) -> Result<Self, PacketError> {
        serde_json::from_str(raw).map_err(|e| PacketError::Malformed(e.to_string()))
    }

    pub fn to_json(&self) -> Result<String, PacketError> {
        serde_json::to_string(self).map_err(|e| PacketError::Malformed(e.to_string()))
    }

    /// Decode the command block and check the chart/metadata pairing.
    pub fn decode(&self) -> Result<Command, PacketError> {
        let command = match self.command.cmd.as_str() {
            "" => return Err(PacketError::Malformed("missing command name".into())),
            CMD_WRITE => Command::Write,
            CMD_AUTO_FORWARD => Command::AutoForward,
            CMD_FORWARD_TO => {
                let args: TargetArgs = self.args()?;
                Command::ForwardTo {
                    target_id: args.target_id,
                }
            }
            CMD_RESIZE => {
                let args: ResizeArgs = self.args()?;
                if !fits_cell_limit(args.height, args.width) {
                    return Err(PacketError::InvalidArgs {
                        command: self.command.cmd.clone(),
                        reason: format!(
                            "{}x{} exceeds the {} cell limit",
                            args.height, args.width, MAX_CANVAS_CELLS
                        ),
                    });
                }
                Command::Resize {
                    height: args.height,
                    width: args.width,
                }
            }
            CMD_SET_ORIGIN => {
                let args: OriginArgs = self.args()?;
                Command::SetOrigin {
                    origin: Coord::new(args.row, args.col),
                }
            }
            CMD_SET_HOST => {
                let args: TargetArgs = self.args()?;
                Command::SetHost {
                    target_id: args.target_id,
                }
            }
            CMD_SET_FILLVALUE => {
                let args: FillvalueArgs = self.args()?;
                Command::SetFillvalue { value: args.value }
            }
            CMD_CLEAR => Command::Clear,
            CMD_KILL => Command::Kill,
            other => return Err(PacketError::UnknownCommand(other.to_string())),
        };

        if command.is_write_class() && self.chart.len() != self.metadata.len() {
            return Err(PacketError::ChartMismatch {
                chart: self.chart.len(),
                metadata: self.metadata.len(),
            });
        }
        Ok(command)
    }

    fn args<T: DeserializeOwned>(&self) -> Result<T, PacketError> {
        serde_json::from_value(Value::Object(self.command.args.clone())).map_err(|e| {
            PacketError::InvalidArgs {
                command: self.command.cmd.clone(),
                reason: e.to_string(),
            }
        })
    }
}

/// Whether a `height × width` buffer stays within [`MAX_CANVAS_CELLS`].
pub fn fits_cell_limit(height: usize, width: usize) -> bool {
    height
        .checked_mul(width)
        .is_some_and(|cells| cells <= MAX_CANVAS_CELLS)
}
