// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::path::PathBuf;

use crate::buffer::Coord;
use crate::config::{load_and_validate_scene, Scene};
use crate::packet::PacketBuilder;
use crate::space::Space;

fn scene_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("configs").join(name)
}

/// The bundled YAML demo scene loads and validates
#[test]
fn test_demo_yaml_loading() {
    let scene = load_and_validate_scene(scene_path("demo-scene.yaml")).unwrap();

    assert_eq!(scene.log_filter, "info");
    assert_eq!(scene.canvases.len(), 3);
    assert_eq!(scene.canvases[0].id, "screen");
    assert_eq!(scene.canvases[1].host.as_deref(), Some("screen"));
    assert_eq!(scene.canvases[1].origin, Coord::new(1, 2));
    assert_eq!(scene.canvases[2].host.as_deref(), Some("window"));
}

/// The TOML rendition describes the same scene
#[test]
fn test_demo_toml_matches_yaml() {
    let yaml = load_and_validate_scene(scene_path("demo-scene.yaml")).unwrap();
    let toml = load_and_validate_scene(scene_path("demo-scene.toml")).unwrap();

    assert_eq!(yaml, toml);
}

/// Text written into the innermost canvas of the demo reaches the screen
#[tokio::test]
async fn test_demo_scene_end_to_end() {
    let config = load_and_validate_scene(scene_path("demo-scene.yaml")).unwrap();
    let space = Space::new();
    let scene = Scene::spawn(&config, &space);

    let packet = PacketBuilder::new(config.canvases[2].width)
        .auto_forward("hi")
        .unwrap();
    space.send("label", packet).unwrap();

    let snapshots = scene.flush().await;
    let screen = snapshots.iter().find(|s| s.id == "screen").unwrap();

    // label sits at (1, 1) in window, window at (1, 2) on screen.
    assert_eq!(screen.glyph_at(Coord::new(2, 3)), Some('h'));
    assert_eq!(screen.glyph_at(Coord::new(2, 4)), Some('i'));
    assert_eq!(
        screen.buffer.get(Coord::new(2, 3)).map(|c| c.canvas_id.as_str()),
        Some("label")
    );

    scene.shutdown().await.unwrap();
    assert!(space.is_empty());
}
