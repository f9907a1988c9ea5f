// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

pub mod buffer;     // grid buffers and layout helpers
pub mod canvas;     // canvas actors
pub mod config;     // scene files, validation and spawning
pub mod errors;     // error handling
pub mod observability;
pub mod packet;     // command packets
pub mod space;      // canvas registry
