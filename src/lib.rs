//! nara_motion - motion planning for agents and cursors on an infinite canvas
//!
//! Obstacle-aware grid pathfinding with path refinement, plus a sandboxed
//! formula engine that drives autonomous agents tick by tick.

// Core modules
pub mod common;
pub mod config;
pub mod utils;

// World model and algorithms
pub mod world;
pub mod path_planning;
pub mod expression;
pub mod motion;

// Re-export common types for convenience
pub use common::{GridNode, Path2D, Point2D};
pub use common::{ObstacleMap, PathPlanner, PathPostProcessor};
pub use common::{ExpressionError, MotionError, MotionResult};
pub use config::MotionConfig;
pub use expression::{evaluate, ExpressionContext, ExpressionEngine};
pub use motion::{
    evaluate_agent_movement, find_smooth_path, AgentExpressionState, MotionPlanner, SwarmContext,
};
pub use world::{is_blocked, ObstacleIndex, WorldSnapshot};
