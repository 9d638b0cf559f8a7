use std::time::{Duration, Instant};

use approx::assert_relative_eq;
use itertools::Itertools;

use nara_motion::path_planning::{simplify, smooth, AStarPlanner};
use nara_motion::{
    evaluate, evaluate_agent_movement, find_smooth_path, AgentExpressionState, ExpressionContext,
    MotionConfig, MotionPlanner, ObstacleIndex, ObstacleMap, Point2D, WorldSnapshot,
};

const BOARD: &str = r#"{
    "note_a": { "startX": 5, "startY": -3, "endX": 6, "endY": 3 },
    "note_b": "{\"startX\": 12, \"startY\": 0, \"endX\": 13, \"endY\": 6, \"isSelection\": true}",
    "title": "retro board",
    "broken": "{not json"
}"#;

fn board() -> WorldSnapshot {
    WorldSnapshot::from_json_str(BOARD).unwrap()
}

#[test]
fn same_point_is_a_single_point_path() {
    for p in [Point2D::new(0.0, 0.0), Point2D::new(-7.5, 3.25), Point2D::new(5.0, 0.0)] {
        assert_eq!(find_smooth_path(p, p, &board()).points, vec![p]);
    }
}

#[test]
fn board_path_avoids_regions() {
    let world = board();
    let index = ObstacleIndex::new(&world);
    let planner = MotionPlanner::default();
    let start = Point2D::new(0.0, 0.0);
    let goal = Point2D::new(18.0, 2.0);

    let raw = planner.find_path(start, goal, &world);
    assert!(raw.is_contiguous());
    assert_eq!(raw.first(), Some(&start));
    assert_eq!(raw.last(), Some(&goal));
    for p in &raw.points {
        assert!(!index.is_blocked(p.to_cell()), "{:?} is blocked", p);
    }
    for (a, b) in raw.points.iter().tuple_windows() {
        let (ca, cb) = (a.to_cell(), b.to_cell());
        if ca.x != cb.x && ca.y != cb.y {
            assert!(!index.is_blocked(ca.offset(cb.x - ca.x, 0)));
            assert!(!index.is_blocked(ca.offset(0, cb.y - ca.y)));
        }
    }

    let smooth = planner.find_smooth_path(start, goal, &world);
    assert_eq!(smooth.first(), Some(&start));
    assert_eq!(smooth.last(), Some(&goal));
}

#[test]
fn painted_obstacle_disables_refinement() {
    let json = r#"{
        "paint": {
            "cells": ["40,40", "40,41"],
            "bounds": { "minX": 40, "maxX": 40, "minY": 40, "maxY": 41 },
            "paintType": "obstacle"
        },
        "note": { "startX": 3, "startY": -2, "endX": 3, "endY": 2 }
    }"#;
    let world = WorldSnapshot::from_json_str(json).unwrap();
    let planner = MotionPlanner::default();
    let start = Point2D::new(0.0, 0.0);
    let goal = Point2D::new(8.0, 0.0);

    assert!(ObstacleIndex::new(&world).has_obstacles());
    assert_eq!(
        planner.find_smooth_path(start, goal, &world),
        planner.find_path(start, goal, &world)
    );
}

#[test]
fn collinear_paths_simplify_to_endpoints() {
    for n in 3..20 {
        let points: Vec<Point2D> = (0..n).map(|i| Point2D::new(i as f64 * 2.0, i as f64)).collect();
        let simplified = simplify(&points, 1.0);
        assert_eq!(simplified, vec![points[0], points[n - 1]]);

        let smoothed = smooth(&simplified, 3);
        assert_eq!(smoothed.first(), points.first());
        assert_eq!(smoothed.last(), points.last());
    }
}

#[test]
fn empty_grid_diagonal_scenario() {
    let outcome = AStarPlanner::default()
        .search(Point2D::new(0.0, 0.0), Point2D::new(5.0, 5.0), &WorldSnapshot::new())
        .unwrap();
    assert_eq!(outcome.path.len(), 6);
    assert_relative_eq!(outcome.cost, 5.0 * 2f64.sqrt(), epsilon = 1e-9);
}

#[test]
fn expression_examples() {
    assert_eq!(evaluate("x + 1", &ExpressionContext::new().with("x", 5.0)), 6.0);
    assert_eq!(evaluate("sin(0)", &ExpressionContext::new()), 0.0);
    assert_eq!(evaluate("1/0", &ExpressionContext::new().with("x", 3.0)), 3.0);
}

#[test]
fn expired_agent_stays_put() {
    let state = AgentExpressionState::new("walker", "x + 5", "y - 5")
        .with_duration(Duration::from_secs(1))
        .started_at(Instant::now() - Duration::from_secs(2));
    let pos = Point2D::new(11.0, -3.0);
    let next = evaluate_agent_movement(&state, pos, Point2D::new(1.0, 0.0), Point2D::origin(), None);
    assert_eq!(next, pos);
}

#[test]
fn config_from_toml_drives_planner() {
    let config = MotionConfig::from_toml_str("[search]\nmax_search_distance = 4\n").unwrap();
    let planner = MotionPlanner::new(&config);
    let start = Point2D::new(0.0, 0.0);
    let goal = Point2D::new(20.0, 0.0);
    assert_eq!(planner.find_smooth_path(start, goal, &WorldSnapshot::new()).points, vec![start, goal]);
}

#[test]
fn far_and_invalid_endpoints_degrade_to_direct_segment() {
    let world = WorldSnapshot::new();
    let cases = [
        (Point2D::new(-2e9, 0.0), Point2D::new(2e9, 0.0)),
        (Point2D::new(1e12, 0.0), Point2D::new(1e12 + 3.0, 0.0)),
        (Point2D::new(0.0, 0.0), Point2D::new(0.0, f64::INFINITY)),
    ];
    for (start, end) in cases {
        assert_eq!(find_smooth_path(start, end, &world).points, vec![start, end]);
    }
}
