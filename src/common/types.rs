//! Common types used throughout nara_motion

use itertools::Itertools;
use nalgebra::Vector2;
use serde::{Deserialize, Serialize};

/// 2D point in grid coordinates. Cells may be addressed fractionally.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point2D {
    pub x: f64,
    pub y: f64,
}

impl Point2D {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn origin() -> Self {
        Self { x: 0.0, y: 0.0 }
    }

    pub fn distance(&self, other: &Point2D) -> f64 {
        ((self.x - other.x).powi(2) + (self.y - other.y).powi(2)).sqrt()
    }

    pub fn to_vector(&self) -> Vector2<f64> {
        Vector2::new(self.x, self.y)
    }

    /// Cell containing this point (round half away from zero).
    ///
    /// Saturates outside the `i32` range and maps NaN to 0; use
    /// [`try_to_cell`](Self::try_to_cell) for untrusted input.
    pub fn to_cell(&self) -> GridNode {
        GridNode::new(self.x.round() as i32, self.y.round() as i32)
    }

    /// Like [`to_cell`](Self::to_cell), but `None` for non-finite points and
    /// points more than [`MAX_CELL_COORD`] cells from the origin.
    pub fn try_to_cell(&self) -> Option<GridNode> {
        let limit = MAX_CELL_COORD as f64;
        let (x, y) = (self.x.round(), self.y.round());
        if x.is_finite() && y.is_finite() && x.abs() <= limit && y.abs() <= limit {
            Some(GridNode::new(x as i32, y as i32))
        } else {
            None
        }
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

impl From<(f64, f64)> for Point2D {
    fn from(tuple: (f64, f64)) -> Self {
        Self { x: tuple.0, y: tuple.1 }
    }
}

impl From<Vector2<f64>> for Point2D {
    fn from(v: Vector2<f64>) -> Self {
        Self { x: v[0], y: v[1] }
    }
}

impl From<GridNode> for Point2D {
    fn from(cell: GridNode) -> Self {
        Self { x: cell.x as f64, y: cell.y as f64 }
    }
}

/// Largest cell coordinate magnitude the planner accepts
pub const MAX_CELL_COORD: i32 = 1 << 29;

/// Integer cell address on the sparse world grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GridNode {
    pub x: i32,
    pub y: i32,
}

impl GridNode {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    pub fn offset(&self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x.saturating_add(dx),
            y: self.y.saturating_add(dy),
        }
    }

    /// Per-axis distance, widened so it cannot overflow.
    pub fn axis_deltas(&self, other: &GridNode) -> (i64, i64) {
        (
            (self.x as i64 - other.x as i64).abs(),
            (self.y as i64 - other.y as i64).abs(),
        )
    }

    pub fn manhattan(&self, other: &GridNode) -> i64 {
        let (dx, dy) = self.axis_deltas(other);
        dx + dy
    }

    pub fn chebyshev(&self, other: &GridNode) -> i64 {
        let (dx, dy) = self.axis_deltas(other);
        dx.max(dy)
    }

    /// True for the eight cells surrounding this one.
    pub fn is_adjacent(&self, other: &GridNode) -> bool {
        self.chebyshev(other) == 1
    }

    /// Parses the `"x,y"` key used by obstacle blobs.
    pub fn parse_key(key: &str) -> Option<Self> {
        let (x, y) = key.split_once(',')?;
        Some(Self::new(x.trim().parse().ok()?, y.trim().parse().ok()?))
    }

    pub fn key(&self) -> String {
        format!("{},{}", self.x, self.y)
    }
}

/// Path represented as a sequence of 2D points
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Path2D {
    pub points: Vec<Point2D>,
}

impl Path2D {
    pub fn new() -> Self {
        Self { points: Vec::new() }
    }

    pub fn from_points(points: Vec<Point2D>) -> Self {
        Self { points }
    }

    /// The degenerate path for `start == end`.
    pub fn single(point: Point2D) -> Self {
        Self { points: vec![point] }
    }

    /// The direct-line fallback used when search gives up.
    pub fn direct(start: Point2D, end: Point2D) -> Self {
        Self { points: vec![start, end] }
    }

    pub fn push(&mut self, point: Point2D) {
        self.points.push(point);
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn first(&self) -> Option<&Point2D> {
        self.points.first()
    }

    pub fn last(&self) -> Option<&Point2D> {
        self.points.last()
    }

    pub fn x_coords(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.x).collect()
    }

    pub fn y_coords(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.y).collect()
    }

    pub fn total_length(&self) -> f64 {
        self.points
            .iter()
            .tuple_windows()
            .map(|(a, b)| a.distance(b))
            .sum()
    }

    /// Whether every consecutive pair is grid-adjacent (diagonals included).
    pub fn is_contiguous(&self) -> bool {
        self.points
            .iter()
            .tuple_windows()
            .all(|(a, b)| a.to_cell().is_adjacent(&b.to_cell()))
    }
}

impl From<Vec<Point2D>> for Path2D {
    fn from(points: Vec<Point2D>) -> Self {
        Self { points }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_point2d_distance() {
        let p1 = Point2D::new(0.0, 0.0);
        let p2 = Point2D::new(3.0, 4.0);
        assert!((p1.distance(&p2) - 5.0).abs() < 1e-10);
    }

    #[test]
    fn test_point_to_cell_rounds() {
        assert_eq!(Point2D::new(1.4, -2.6).to_cell(), GridNode::new(1, -3));
        assert_eq!(Point2D::new(2.5, -0.5).to_cell(), GridNode::new(3, -1));
    }

    #[test]
    fn test_try_to_cell_rejects_unplaceable_points() {
        assert_eq!(Point2D::new(2.6, -1.2).try_to_cell(), Some(GridNode::new(3, -1)));
        assert_eq!(Point2D::new(f64::NAN, 0.0).try_to_cell(), None);
        assert_eq!(Point2D::new(0.0, f64::INFINITY).try_to_cell(), None);
        assert_eq!(Point2D::new(1e12, 0.0).try_to_cell(), None);
        let edge = MAX_CELL_COORD as f64;
        assert_eq!(
            Point2D::new(-edge, edge).try_to_cell(),
            Some(GridNode::new(-MAX_CELL_COORD, MAX_CELL_COORD))
        );
    }

    #[test]
    fn test_grid_distances_do_not_overflow() {
        let a = GridNode::new(i32::MIN, i32::MAX);
        let b = GridNode::new(i32::MAX, i32::MIN);
        assert_eq!(a.chebyshev(&b), u32::MAX as i64);
        assert_eq!(a.manhattan(&b), 2 * u32::MAX as i64);
        assert_eq!(a.offset(-1, 1), a);
    }

    #[test]
    fn test_grid_node_key_round_trip() {
        let node = GridNode::new(-4, 17);
        assert_eq!(GridNode::parse_key(&node.key()), Some(node));
        assert_eq!(GridNode::parse_key(" 3 , 5"), Some(GridNode::new(3, 5)));
        assert_eq!(GridNode::parse_key("3;5"), None);
        assert_eq!(GridNode::parse_key("a,5"), None);
    }

    #[test]
    fn test_path2d_total_length() {
        let path = Path2D::from_points(vec![
            Point2D::new(0.0, 0.0),
            Point2D::new(1.0, 0.0),
            Point2D::new(1.0, 1.0),
        ]);
        assert!((path.total_length() - 2.0).abs() < 1e-10);
        assert!(path.is_contiguous());
    }

    #[test]
    fn test_path2d_direct_is_not_contiguous_over_gap() {
        let path = Path2D::direct(Point2D::new(0.0, 0.0), Point2D::new(5.0, 0.0));
        assert_eq!(path.len(), 2);
        assert!(!path.is_contiguous());
    }
}
