// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

mod loader;
mod scene;
mod validation;

#[cfg(test)]
mod integration_tests;
pub mod consts;

pub use loader::{load_and_validate_scene, load_scene, CanvasConfig, SceneConfig};
pub use scene::{spawn_order, Scene};
pub use validation::validate_scene;
