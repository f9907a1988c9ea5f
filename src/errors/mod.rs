// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

mod config;
mod packet;
mod space;

pub use config::{ConfigError, ValidationError};
pub use packet::{CommandError, PacketError};
pub use space::SpaceError;
