//! Common traits defining the seams between planners and the world

use crate::common::error::MotionError;
use crate::common::types::*;

/// Anything that can answer "is this cell blocked"
pub trait ObstacleMap {
    fn is_blocked(&self, cell: GridNode) -> bool;

    /// Whether any obstacle-tagged content exists at all.
    ///
    /// Region descriptors do not count; only painted obstacle blobs do.
    fn has_obstacles(&self) -> bool;
}

impl<T: ObstacleMap + ?Sized> ObstacleMap for &T {
    fn is_blocked(&self, cell: GridNode) -> bool {
        (**self).is_blocked(cell)
    }

    fn has_obstacles(&self) -> bool {
        (**self).has_obstacles()
    }
}

/// Trait for path planning algorithms
pub trait PathPlanner {
    /// Plan a path from start to goal over the given obstacle map
    fn plan<M: ObstacleMap>(
        &self,
        start: Point2D,
        goal: Point2D,
        map: &M,
    ) -> Result<Path2D, MotionError>;
}

/// Trait for post-processing a raw planner path
pub trait PathPostProcessor {
    fn process<M: ObstacleMap>(&self, path: &Path2D, map: &M) -> Path2D;
}

#[cfg(test)]
mod tests {
    use super::*;

    struct OpenField;

    impl ObstacleMap for OpenField {
        fn is_blocked(&self, _cell: GridNode) -> bool {
            false
        }

        fn has_obstacles(&self) -> bool {
            false
        }
    }

    struct DummyPlanner;

    impl PathPlanner for DummyPlanner {
        fn plan<M: ObstacleMap>(
            &self,
            start: Point2D,
            goal: Point2D,
            _map: &M,
        ) -> Result<Path2D, MotionError> {
            Ok(Path2D::direct(start, goal))
        }
    }

    #[test]
    fn test_path_planner_trait() {
        let planner = DummyPlanner;
        let result = planner.plan(Point2D::origin(), Point2D::new(1.0, 1.0), &OpenField);
        assert_eq!(result.unwrap().len(), 2);
    }

    #[test]
    fn test_obstacle_map_by_reference() {
        let field = OpenField;
        let by_ref = &field;
        assert!(!ObstacleMap::is_blocked(&by_ref, GridNode::new(0, 0)));
    }
}
