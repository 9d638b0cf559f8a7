//! Entry points used by the canvas each tick
//!
//! - [`find_smooth_path`]: obstacle index, A* search, then refinement
//! - [`evaluate_agent_movement`]: next position of a formula-driven agent
//!
//! Both are infallible. Search failures degrade to the direct segment and
//! formula failures to the agent's current coordinates; the cause is logged.

pub mod agent;
pub mod heading;
pub mod swarm;

pub use agent::{build_context, evaluate_agent_movement_at, AgentExpressionState};
pub use heading::{headings, Heading};
pub use swarm::SwarmContext;

use std::time::Instant;

use log::debug;

use crate::common::{Path2D, Point2D};
use crate::config::MotionConfig;
use crate::expression::ExpressionEngine;
use crate::path_planning::{AStarPlanner, PathRefiner};
use crate::world::{ObstacleIndex, WorldSnapshot};

/// Planner, refiner and formula engine sharing one configuration
pub struct MotionPlanner {
    planner: AStarPlanner,
    refiner: PathRefiner,
    engine: ExpressionEngine,
}

impl MotionPlanner {
    pub fn new(config: &MotionConfig) -> Self {
        Self {
            planner: AStarPlanner::new(config.search.clone()),
            refiner: PathRefiner::new(config.refine.clone()),
            engine: ExpressionEngine::new(config.expression.clone()),
        }
    }

    /// Raw grid path between two points.
    pub fn find_path(&self, start: Point2D, end: Point2D, world: &WorldSnapshot) -> Path2D {
        self.planner.find_path(start, end, &ObstacleIndex::new(world))
    }

    /// Grid path, simplified and smoothed when the world has no obstacle blobs.
    pub fn find_smooth_path(&self, start: Point2D, end: Point2D, world: &WorldSnapshot) -> Path2D {
        let index = ObstacleIndex::new(world);
        let raw = self.planner.find_path(start, end, &index);
        let refined = self.refiner.refine(&raw, &index);
        debug!(
            "smooth path {:?} -> {:?}: {} raw points, {} refined",
            start,
            end,
            raw.len(),
            refined.len()
        );
        refined
    }

    pub fn evaluate_agent_movement(
        &self,
        state: &AgentExpressionState,
        current_pos: Point2D,
        velocity: Point2D,
        start_pos: Point2D,
        swarm: Option<&SwarmContext>,
    ) -> Point2D {
        evaluate_agent_movement_at(
            &self.engine,
            state,
            current_pos,
            velocity,
            start_pos,
            swarm,
            Instant::now(),
            &mut rand::thread_rng(),
        )
    }

    pub fn engine(&self) -> &ExpressionEngine {
        &self.engine
    }
}

impl Default for MotionPlanner {
    fn default() -> Self {
        Self::new(&MotionConfig::default())
    }
}

/// [`MotionPlanner::find_smooth_path`] with default configuration.
pub fn find_smooth_path(start: Point2D, end: Point2D, world: &WorldSnapshot) -> Path2D {
    MotionPlanner::default().find_smooth_path(start, end, world)
}

/// [`MotionPlanner::evaluate_agent_movement`] with default configuration.
pub fn evaluate_agent_movement(
    state: &AgentExpressionState,
    current_pos: Point2D,
    velocity: Point2D,
    start_pos: Point2D,
    swarm: Option<&SwarmContext>,
) -> Point2D {
    MotionPlanner::default().evaluate_agent_movement(state, current_pos, velocity, start_pos, swarm)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::GridNode;
    use crate::config::RefineConfig;
    use crate::world::{ObstacleBlob, RegionDescriptor};
    use std::time::Duration;

    #[test]
    fn test_smooth_path_keeps_endpoints() {
        let world = WorldSnapshot::new();
        let start = Point2D::new(0.0, 0.0);
        let end = Point2D::new(9.0, 4.0);
        let path = find_smooth_path(start, end, &world);
        assert_eq!(path.first(), Some(&start));
        assert_eq!(path.last(), Some(&end));
    }

    #[test]
    fn test_obstacle_blob_returns_raw_path() {
        let mut world = WorldSnapshot::new();
        world.insert_blob("paint_1", ObstacleBlob::obstacle([GridNode::new(3, 0), GridNode::new(3, 1)]));
        let planner = MotionPlanner::default();
        let start = Point2D::new(0.0, 0.0);
        let end = Point2D::new(6.0, 0.0);

        let raw = planner.find_path(start, end, &world);
        let smooth = planner.find_smooth_path(start, end, &world);
        assert_eq!(smooth, raw);
        assert!(smooth.is_contiguous());
    }

    #[test]
    fn test_regions_alone_do_not_disable_smoothing() {
        let mut world = WorldSnapshot::new();
        world.insert_region("note_1", RegionDescriptor::new(50.0, 50.0, 60.0, 60.0));
        let planner = MotionPlanner::new(&MotionConfig {
            refine: RefineConfig {
                epsilon: 1.0,
                segments_per_point: 4,
            },
            ..Default::default()
        });
        let path = planner.find_smooth_path(Point2D::new(0.0, 0.0), Point2D::new(8.0, 0.0), &world);
        // straight run collapses to one segment, sampled 4 times plus the end
        assert_eq!(path.len(), 5);
    }

    #[test]
    fn test_degenerate_and_fallback_paths_pass_through() {
        let world = WorldSnapshot::new();
        let p = Point2D::new(2.0, 2.0);
        assert_eq!(find_smooth_path(p, p, &world).points, vec![p]);

        let far = Point2D::new(1000.0, 0.0);
        assert_eq!(find_smooth_path(p, far, &world).points, vec![p, far]);
    }

    #[test]
    fn test_agent_movement_facade_freezes_expired() {
        let state = AgentExpressionState::new("bot", "x + 1", "y")
            .with_duration(Duration::from_millis(10))
            .started_at(Instant::now() - Duration::from_secs(1));
        let pos = Point2D::new(4.0, 4.0);
        assert_eq!(
            evaluate_agent_movement(&state, pos, Point2D::origin(), Point2D::origin(), None),
            pos
        );
    }

    #[test]
    fn test_agent_movement_facade_follows_swarm() {
        let state = AgentExpressionState::new("bot", "x + (swarmAvgX - x) / 2", "y + (swarmAvgY - y) / 2");
        let swarm = SwarmContext::from_neighbors(Point2D::origin(), &[Point2D::new(4.0, 8.0)]);
        let next = evaluate_agent_movement(
            &state,
            Point2D::origin(),
            Point2D::origin(),
            Point2D::origin(),
            Some(&swarm),
        );
        assert_eq!(next, Point2D::new(2.0, 4.0));
    }
}
