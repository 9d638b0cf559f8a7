//! A* grid path planning
//!
//! 8-connected search over the sparse world grid. Key properties:
//!
//! - orthogonal steps cost 1, diagonal steps cost sqrt(2)
//! - Manhattan heuristic (inadmissible for this cost model; it trades
//!   optimality for fewer expansions)
//! - no corner cutting: a diagonal step needs both shared orthogonal cells free
//! - the goal cell is always enterable, even when it is blocked
//! - bounded by an iteration cap and a per-axis search radius, and falls
//!   back to the direct `[start, end]` segment when either is hit
//!
//! Nodes live in a per-call arena and refer to their parent by index.

use std::cmp::Reverse;
use std::collections::{BinaryHeap, HashMap, HashSet};

use log::{debug, trace};
use ordered_float::OrderedFloat;

use crate::common::{
    GridNode, MotionError, MotionResult, ObstacleMap, Path2D, PathPlanner, Point2D, SearchFailure,
};
use crate::config::SearchConfig;
use crate::world::{ObstacleIndex, WorldSnapshot};

/// Search node stored in the arena; its arena index doubles as insertion order
#[derive(Debug, Clone)]
struct PathNode {
    cell: GridNode,
    g: f64,
    h: f64,
    f: f64,
    parent: Option<usize>,
}

/// Result of a successful search
#[derive(Debug, Clone)]
pub struct SearchOutcome {
    pub path: Path2D,
    /// Accumulated step cost along `path`
    pub cost: f64,
    /// Nodes taken off the open set
    pub expanded: usize,
    /// Distinct cells ever placed in the arena
    pub generated: usize,
    /// Times an open node got a cheaper parent
    pub relaxed: usize,
}

/// Grid pathfinder
pub struct AStarPlanner {
    config: SearchConfig,
    motion: [(i32, i32, f64); 8],
}

impl AStarPlanner {
    pub fn new(config: SearchConfig) -> Self {
        AStarPlanner {
            config,
            motion: Self::get_motion_model(),
        }
    }

    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    /// Plan a path, falling back to `[start, end]` when the search fails.
    pub fn find_path<M: ObstacleMap>(&self, start: Point2D, end: Point2D, map: &M) -> Path2D {
        match self.search(start, end, map) {
            Ok(outcome) => outcome.path,
            Err(MotionError::DegenerateInput) => Path2D::single(start),
            Err(e) => {
                debug!("{}; using direct path", e);
                Path2D::direct(start, end)
            }
        }
    }

    /// Run the search and report why it stopped.
    ///
    /// Returns `DegenerateInput` when `start == end` and `SearchExhausted`
    /// when the goal was not reached.
    pub fn search<M: ObstacleMap>(
        &self,
        start: Point2D,
        end: Point2D,
        map: &M,
    ) -> MotionResult<SearchOutcome> {
        if start == end {
            return Err(MotionError::DegenerateInput);
        }

        let (start_cell, goal_cell) = match (start.try_to_cell(), end.try_to_cell()) {
            (Some(start_cell), Some(goal_cell)) => (start_cell, goal_cell),
            _ => return Err(MotionError::UnplaceableEndpoint { start, end }),
        };

        let mut arena: Vec<PathNode> = Vec::new();
        let mut index_of: HashMap<GridNode, usize> = HashMap::new();
        let mut closed: HashSet<GridNode> = HashSet::new();
        let mut open: BinaryHeap<Reverse<(OrderedFloat<f64>, usize)>> = BinaryHeap::new();

        let h = Self::calc_heuristic(start_cell, goal_cell);
        arena.push(PathNode {
            cell: start_cell,
            g: 0.0,
            h,
            f: h,
            parent: None,
        });
        index_of.insert(start_cell, 0);
        open.push(Reverse((OrderedFloat(h), 0)));

        let mut iterations = 0;
        let mut pruned_by_distance = false;
        let mut relaxed = 0;

        while let Some(Reverse((priority, current_index))) = open.pop() {
            let current = &arena[current_index];
            // Entries left behind by an in-place relaxation
            if closed.contains(&current.cell) || priority.0 != current.f {
                continue;
            }
            if iterations >= self.config.max_iterations {
                return Err(self.exhausted(start_cell, goal_cell, SearchFailure::IterationCap, iterations));
            }
            iterations += 1;

            let cell = current.cell;
            let g = current.g;

            if (cell.x - goal_cell.x).abs() < 1 && (cell.y - goal_cell.y).abs() < 1 {
                debug!(
                    "path {:?} -> {:?} found after {} iterations",
                    start_cell, goal_cell, iterations
                );
                return Ok(SearchOutcome {
                    path: Self::build_path(current_index, &arena),
                    cost: g,
                    expanded: iterations,
                    generated: arena.len(),
                    relaxed,
                });
            }

            closed.insert(cell);

            for &(dx, dy, step_cost) in &self.motion {
                let next = cell.offset(dx, dy);
                if closed.contains(&next) {
                    continue;
                }
                let (dx_start, dy_start) = next.axis_deltas(&start_cell);
                let radius = self.config.max_search_distance as i64;
                if dx_start > radius || dy_start > radius {
                    pruned_by_distance = true;
                    continue;
                }
                if next != goal_cell && map.is_blocked(next) {
                    continue;
                }
                if dx != 0
                    && dy != 0
                    && (map.is_blocked(cell.offset(dx, 0)) || map.is_blocked(cell.offset(0, dy)))
                {
                    trace!("corner cut {:?} -> {:?} rejected", cell, next);
                    continue;
                }

                let tentative_g = g + step_cost;
                match index_of.get(&next) {
                    Some(&i) => {
                        let node = &mut arena[i];
                        if tentative_g < node.g {
                            relaxed += 1;
                            node.g = tentative_g;
                            node.f = tentative_g + node.h;
                            node.parent = Some(current_index);
                            open.push(Reverse((OrderedFloat(node.f), i)));
                        }
                    }
                    None => {
                        let h = Self::calc_heuristic(next, goal_cell);
                        let i = arena.len();
                        arena.push(PathNode {
                            cell: next,
                            g: tentative_g,
                            h,
                            f: tentative_g + h,
                            parent: Some(current_index),
                        });
                        index_of.insert(next, i);
                        open.push(Reverse((OrderedFloat(tentative_g + h), i)));
                    }
                }
            }
        }

        let reason = if pruned_by_distance {
            SearchFailure::DistanceBound
        } else {
            SearchFailure::OpenSetExhausted
        };
        Err(self.exhausted(start_cell, goal_cell, reason, iterations))
    }

    fn exhausted(
        &self,
        start: GridNode,
        goal: GridNode,
        reason: SearchFailure,
        iterations: usize,
    ) -> MotionError {
        MotionError::SearchExhausted {
            start,
            goal,
            reason,
            iterations,
        }
    }

    fn build_path(goal_index: usize, arena: &[PathNode]) -> Path2D {
        let mut points = Vec::new();
        let mut current_index = Some(goal_index);

        while let Some(index) = current_index {
            let node = &arena[index];
            points.push(Point2D::from(node.cell));
            current_index = node.parent;
        }

        points.reverse();
        Path2D::from_points(points)
    }

    fn calc_heuristic(a: GridNode, b: GridNode) -> f64 {
        a.manhattan(&b) as f64
    }

    fn get_motion_model() -> [(i32, i32, f64); 8] {
        // dx, dy, cost
        [
            (1, 0, 1.0),
            (0, 1, 1.0),
            (-1, 0, 1.0),
            (0, -1, 1.0),
            (-1, -1, std::f64::consts::SQRT_2),
            (-1, 1, std::f64::consts::SQRT_2),
            (1, -1, std::f64::consts::SQRT_2),
            (1, 1, std::f64::consts::SQRT_2),
        ]
    }
}

impl Default for AStarPlanner {
    fn default() -> Self {
        Self::new(SearchConfig::default())
    }
}

impl PathPlanner for AStarPlanner {
    fn plan<M: ObstacleMap>(
        &self,
        start: Point2D,
        goal: Point2D,
        map: &M,
    ) -> Result<Path2D, MotionError> {
        match self.search(start, goal, map) {
            Ok(outcome) => Ok(outcome.path),
            Err(MotionError::DegenerateInput) => Ok(Path2D::single(start)),
            Err(e) => Err(e),
        }
    }
}

/// Plan over a snapshot with the default iteration cap.
pub fn find_path(
    start: Point2D,
    end: Point2D,
    world: &WorldSnapshot,
    max_search_distance: i32,
) -> Path2D {
    let planner = AStarPlanner::new(SearchConfig {
        max_search_distance,
        ..Default::default()
    });
    planner.find_path(start, end, &ObstacleIndex::new(world))
}
