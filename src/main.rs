// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::env;

use anyhow::Context;
use sigil_engine::config::{load_scene, validate_scene, Scene};
use sigil_engine::errors::ConfigError;
use sigil_engine::observability::init_tracing;
use sigil_engine::observability::messages::scene::SceneInvalid;
use sigil_engine::observability::messages::StructuredLog;
use sigil_engine::packet::PacketBuilder;
use sigil_engine::space::Space;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args: Vec<String> = env::args().collect();

    if args.len() < 4 {
        eprintln!("Usage: {} <scene.yaml|scene.toml> <canvas_id> <text...>", args[0]);
        eprintln!("Example: {} configs/demo-scene.yaml label \"hello world\"", args[0]);
        std::process::exit(1);
    }

    let scene_file = &args[1];
    let canvas_id = &args[2];
    let text = args[3..].join(" ");

    let config =
        load_scene(scene_file).with_context(|| format!("Failed to load scene '{}'", scene_file))?;
    init_tracing(&config.log_filter);

    if let Err(errors) = validate_scene(&config) {
        SceneInvalid {
            source: scene_file,
            errors: &errors,
        }
        .log();
        return Err(ConfigError::Invalid(errors).into());
    }

    let target = config
        .canvases
        .iter()
        .find(|canvas| &canvas.id == canvas_id)
        .with_context(|| format!("Canvas '{}' is not declared in '{}'", canvas_id, scene_file))?;

    let space = Space::global();
    let scene = Scene::spawn(&config, space);

    let packet = PacketBuilder::new(target.width).auto_forward(&text)?;
    space.send(canvas_id, packet)?;

    for snapshot in scene.flush().await {
        if scene.roots().contains(&snapshot.id) {
            println!("[{}] {}x{}", snapshot.id, snapshot.height, snapshot.width);
            print!("{}", snapshot.render());
        }
    }

    scene.shutdown().await?;
    Ok(())
}
