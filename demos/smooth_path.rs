//! Smooth Path Example
//!
//! Plans a cursor path around canvas notes, then again with a painted
//! obstacle on the canvas, and plots both.

use nara_motion::motion::MotionPlanner;
use nara_motion::utils::quick_plot_paths;
use nara_motion::{Point2D, WorldSnapshot};

const NOTES: &str = r#"{
    "note_1": { "startX": 10, "startY": -2, "endX": 12, "endY": 14 },
    "note_2": "{\"startX\": 20, \"startY\": 6, \"endX\": 22, \"endY\": 25}",
    "canvas_title": "demo board"
}"#;

const PAINT: &str = r#"{
    "cells": ["30,10", "30,11", "30,12", "31,12", "32,12"],
    "bounds": { "minX": 30, "maxX": 32, "minY": 10, "maxY": 12 },
    "paintType": "obstacle"
}"#;

fn main() {
    env_logger::init();
    println!("Smooth path planning start!!");

    let start = Point2D::new(0.0, 8.0);
    let goal = Point2D::new(40.0, 12.0);
    let planner = MotionPlanner::default();

    let mut world = match WorldSnapshot::from_json_str(NOTES) {
        Ok(world) => world,
        Err(e) => {
            println!("Bad snapshot: {}", e);
            return;
        }
    };
    println!("Loaded {} regions", world.regions().count());

    let raw = planner.find_path(start, goal, &world);
    let smooth = planner.find_smooth_path(start, goal, &world);
    println!("Regions only: {} grid points, {} smoothed", raw.len(), smooth.len());

    let mut vis = quick_plot_paths(&world, &raw, &smooth, "Smooth path around notes");
    let _ = vis.save_png("img/smooth_path_regions.png", 800, 600);

    let paint = match serde_json::from_str(PAINT) {
        Ok(value) => value,
        Err(e) => {
            println!("Bad paint blob: {}", e);
            return;
        }
    };
    world.insert("paint_1", nara_motion::world::WorldEntry::from_value("paint_1", paint));

    let raw = planner.find_path(start, goal, &world);
    let refined = planner.find_smooth_path(start, goal, &world);
    println!(
        "With paint: {} grid points, refined path unchanged: {}",
        raw.len(),
        raw == refined
    );

    let mut vis = quick_plot_paths(&world, &raw, &refined, "Grid path with painted obstacle");
    let _ = vis.save_png("img/smooth_path_paint.png", 800, 600);
    let _ = vis.show();

    println!("Smooth path planning finish!!");
}
