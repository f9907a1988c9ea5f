// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Scene validation.
//!
//! A scene must be spawnable before any actor starts: every canvas id unique, every
//! canvas non-empty and within the cell limit, every `host` naming a declared
//! canvas, and no host chain looping back on itself. Checks run in that order and accumulate, except that
//! cycle detection only runs once ids and host references are sound, since it
//! walks the host graph those checks vouch for.
//!
//! # Cycle Detection
//! Each canvas has at most one host, so the host graph is a set of parent
//! pointers. A DFS with a recursion stack over those pointers finds any loop and
//! reports its path (`a -> b -> a`), in O(V) time overall.
//!
//! # Example
//! ```rust
//! use sigil_engine::config::{validate_scene, CanvasConfig, SceneConfig};
//! use sigil_engine::buffer::Coord;
//!
//! let scene = SceneConfig {
//!     canvases: vec![
//!         CanvasConfig::new("root", "demo", 4, 4),
//!         CanvasConfig::new("panel", "demo", 2, 2).hosted_on("root", Coord::new(1, 1)),
//!     ],
//!     ..Default::default()
//! };
//!
//! assert!(validate_scene(&scene).is_ok());
//! ```

use std::collections::{HashMap, HashSet};

use crate::config::SceneConfig;
use crate::errors::ValidationError;
use crate::packet::fits_cell_limit;

/// Check a scene for everything that would prevent it from spawning.
///
/// Returns all errors found rather than stopping at the first.
pub fn validate_scene(scene: &SceneConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if let Err(duplicate_errors) = validate_unique_canvas_ids(scene) {
        errors.extend(duplicate_errors);
    }

    if let Err(reference_errors) = validate_host_references(scene) {
        errors.extend(reference_errors);
    }

    // Cycle detection assumes one record per id and resolvable hosts.
    if errors.is_empty() {
        if let Err(cycle_errors) = validate_acyclic_hosts(scene) {
            errors.extend(cycle_errors);
        }
    }

    if let Err(dimension_errors) = validate_dimensions(scene) {
        errors.extend(dimension_errors);
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn validate_unique_canvas_ids(scene: &SceneConfig) -> Result<(), Vec<ValidationError>> {
    let mut seen_ids = HashSet::new();
    let mut errors = Vec::new();

    for canvas in &scene.canvases {
        if !seen_ids.insert(&canvas.id) {
            errors.push(ValidationError::DuplicateCanvasId {
                canvas_id: canvas.id.clone(),
            });
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn validate_host_references(scene: &SceneConfig) -> Result<(), Vec<ValidationError>> {
    let canvas_ids: HashSet<&str> = scene.canvases.iter().map(|c| c.id.as_str()).collect();

    let errors: Vec<ValidationError> = scene
        .canvases
        .iter()
        .filter_map(|canvas| {
            let host = canvas.host.as_deref()?;
            (!canvas_ids.contains(host)).then(|| ValidationError::UnresolvedHost {
                canvas_id: canvas.id.clone(),
                missing_host: host.to_string(),
            })
        })
        .collect();

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn validate_dimensions(scene: &SceneConfig) -> Result<(), Vec<ValidationError>> {
    let errors: Vec<ValidationError> = scene
        .canvases
        .iter()
        .filter_map(|canvas| {
            let (canvas_id, height, width) = (canvas.id.clone(), canvas.height, canvas.width);
            if height == 0 || width == 0 {
                Some(ValidationError::EmptyCanvas { canvas_id, height, width })
            } else if !fits_cell_limit(height, width) {
                Some(ValidationError::OversizedCanvas { canvas_id, height, width })
            } else {
                None
            }
        })
        .collect();

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn validate_acyclic_hosts(scene: &SceneConfig) -> Result<(), Vec<ValidationError>> {
    let hosts: HashMap<&str, Option<&str>> = scene
        .canvases
        .iter()
        .map(|canvas| (canvas.id.as_str(), canvas.host.as_deref()))
        .collect();

    let mut visited = HashSet::new();
    let mut rec_stack = HashSet::new();
    let mut path = Vec::new();

    // Declaration order keeps the reported cycle stable across runs.
    for canvas in &scene.canvases {
        if !visited.contains(canvas.id.as_str()) {
            if let Some(cycle) = dfs_cycle_detection(
                &canvas.id,
                &hosts,
                &mut visited,
                &mut rec_stack,
                &mut path,
            ) {
                return Err(vec![ValidationError::CyclicHostChain { cycle }]);
            }
        }
    }

    Ok(())
}

/// Follow host pointers from `node`, returning the closed loop if one is found.
///
/// `rec_stack` holds the canvases on the current walk; reaching one of them again
/// means the walk has looped. `visited` canvases are already known to reach a
/// root and are not walked twice.
fn dfs_cycle_detection<'a>(
    node: &'a str,
    hosts: &HashMap<&'a str, Option<&'a str>>,
    visited: &mut HashSet<&'a str>,
    rec_stack: &mut HashSet<&'a str>,
    path: &mut Vec<&'a str>,
) -> Option<Vec<String>> {
    visited.insert(node);
    rec_stack.insert(node);
    path.push(node);

    if let Some(&Some(host)) = hosts.get(node) {
        if !visited.contains(host) {
            if let Some(cycle) = dfs_cycle_detection(host, hosts, visited, rec_stack, path) {
                return Some(cycle);
            }
        } else if rec_stack.contains(host) {
            let cycle_start = path.iter().position(|id| *id == host).unwrap_or(0);
            let mut cycle: Vec<String> = path[cycle_start..].iter().map(|id| id.to_string()).collect();
            cycle.push(host.to_string());
            return Some(cycle);
        }
    }

    rec_stack.remove(node);
    path.pop();
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::buffer::Coord;
    use crate::config::CanvasConfig;

    fn create_test_canvas(id: &str, host: Option<&str>) -> CanvasConfig {
        let canvas = CanvasConfig::new(id, "tester", 2, 2);
        match host {
            Some(host) => canvas.hosted_on(host, Coord::default()),
            None => canvas,
        }
    }

    fn scene(canvases: Vec<CanvasConfig>) -> SceneConfig {
        SceneConfig {
            canvases,
            ..Default::default()
        }
    }

    #[test]
    fn test_valid_empty_scene() {
        assert!(validate_scene(&scene(vec![])).is_ok());
    }

    #[test]
    fn test_valid_chain_and_siblings() {
        let scene = scene(vec![
            create_test_canvas("root", None),
            create_test_canvas("mid", Some("root")),
            create_test_canvas("leaf", Some("mid")),
            create_test_canvas("sibling", Some("root")),
            create_test_canvas("other_root", None),
        ]);

        assert!(validate_scene(&scene).is_ok());
    }

    #[test]
    fn test_duplicate_canvas_ids() {
        let scene = scene(vec![
            create_test_canvas("a", None),
            create_test_canvas("a", None),
        ]);

        let errors = validate_scene(&scene).unwrap_err();
        assert_eq!(
            errors,
            vec![ValidationError::DuplicateCanvasId { canvas_id: "a".into() }]
        );
    }

    #[test]
    fn test_unresolved_host() {
        let scene = scene(vec![create_test_canvas("b", Some("nonexistent"))]);

        let errors = validate_scene(&scene).unwrap_err();
        assert_eq!(
            errors,
            vec![ValidationError::UnresolvedHost {
                canvas_id: "b".into(),
                missing_host: "nonexistent".into(),
            }]
        );
    }

    #[test]
    fn test_cycles() {
        struct TestCase {
            name: &'static str,
            canvases: Vec<CanvasConfig>,
            expected_cycle: Vec<&'static str>,
        }

        let test_cases = vec![
            TestCase {
                name: "self host",
                canvases: vec![create_test_canvas("a", Some("a"))],
                expected_cycle: vec!["a", "a"],
            },
            TestCase {
                name: "two canvases",
                canvases: vec![
                    create_test_canvas("a", Some("b")),
                    create_test_canvas("b", Some("a")),
                ],
                expected_cycle: vec!["a", "b", "a"],
            },
            TestCase {
                name: "loop behind a tail",
                canvases: vec![
                    create_test_canvas("a", Some("b")),
                    create_test_canvas("b", Some("c")),
                    create_test_canvas("c", Some("d")),
                    create_test_canvas("d", Some("b")),
                ],
                expected_cycle: vec!["b", "c", "d", "b"],
            },
        ];

        for case in test_cases {
            let errors = validate_scene(&scene(case.canvases)).unwrap_err();
            let expected = ValidationError::CyclicHostChain {
                cycle: case.expected_cycle.iter().map(|s| s.to_string()).collect(),
            };
            assert_eq!(errors, vec![expected], "case: {}", case.name);
        }
    }

    #[test]
    fn test_empty_dimensions() {
        let mut flat = create_test_canvas("flat", None);
        flat.height = 0;

        let errors = validate_scene(&scene(vec![flat])).unwrap_err();
        assert!(matches!(
            errors[0],
            ValidationError::EmptyCanvas { height: 0, width: 2, .. }
        ));
    }

    #[test]
    fn test_oversized_dimensions() {
        let mut huge = create_test_canvas("huge", None);
        huge.height = usize::MAX;

        let errors = validate_scene(&scene(vec![huge])).unwrap_err();
        assert!(matches!(
            errors[0],
            ValidationError::OversizedCanvas { ref canvas_id, .. } if canvas_id == "huge"
        ));
    }

    #[test]
    fn test_multiple_errors() {
        let mut empty = create_test_canvas("b", None);
        empty.width = 0;
        let scene = scene(vec![
            create_test_canvas("a", Some("nonexistent")),
            create_test_canvas("a", None),
            empty,
        ]);

        let errors = validate_scene(&scene).unwrap_err();
        assert_eq!(errors.len(), 3);
    }
}
