//! Path refinement: Ramer-Douglas-Peucker simplification followed by
//! Catmull-Rom smoothing.
//!
//! Smoothing is skipped outright when the world holds any obstacle blob. A
//! spline through grid waypoints can bulge across a straight obstacle edge
//! the raw path was hugging, so obstacle-aware callers get the raw path.

use nalgebra::Vector2;

use crate::common::{ObstacleMap, Path2D, PathPostProcessor, Point2D};
use crate::config::RefineConfig;

pub struct PathRefiner {
    config: RefineConfig,
}

impl PathRefiner {
    pub fn new(config: RefineConfig) -> Self {
        PathRefiner { config }
    }

    pub fn config(&self) -> &RefineConfig {
        &self.config
    }

    /// Simplify then smooth `path`, unless it is too short or `map` has obstacles.
    pub fn refine<M: ObstacleMap>(&self, path: &Path2D, map: &M) -> Path2D {
        if path.len() < 3 || map.has_obstacles() {
            return path.clone();
        }
        let simplified = simplify(&path.points, self.config.epsilon);
        Path2D::from_points(smooth(&simplified, self.config.segments_per_point))
    }
}

impl Default for PathRefiner {
    fn default() -> Self {
        Self::new(RefineConfig::default())
    }
}

impl PathPostProcessor for PathRefiner {
    fn process<M: ObstacleMap>(&self, path: &Path2D, map: &M) -> Path2D {
        self.refine(path, map)
    }
}

/// Ramer-Douglas-Peucker polyline simplification.
///
/// Keeps the endpoints; every dropped point lies within `epsilon` of the
/// chord that replaced it.
pub fn simplify(points: &[Point2D], epsilon: f64) -> Vec<Point2D> {
    if points.len() < 3 {
        return points.to_vec();
    }

    let first = points[0];
    let last = points[points.len() - 1];

    let (max_index, max_distance) = points[1..points.len() - 1]
        .iter()
        .enumerate()
        .map(|(i, p)| (i + 1, perpendicular_distance(p, &first, &last)))
        .fold((0, 0.0), |best, cur| if cur.1 > best.1 { cur } else { best });

    if max_distance > epsilon {
        let mut left = simplify(&points[..=max_index], epsilon);
        let right = simplify(&points[max_index..], epsilon);
        left.pop();
        left.extend(right);
        left
    } else {
        vec![first, last]
    }
}

/// Distance from `point` to the infinite line through `start` and `end`.
fn perpendicular_distance(point: &Point2D, start: &Point2D, end: &Point2D) -> f64 {
    let chord = end.to_vector() - start.to_vector();
    let offset = point.to_vector() - start.to_vector();
    let length = chord.norm();
    if length < f64::EPSILON {
        return offset.norm();
    }
    (chord.x * offset.y - chord.y * offset.x).abs() / length
}

/// Uniform Catmull-Rom interpolation through `points`.
///
/// Emits `segments_per_point` samples per source segment (the first being
/// the segment's start point) and finishes with the last source point.
/// Boundary windows duplicate the end points.
pub fn smooth(points: &[Point2D], segments_per_point: usize) -> Vec<Point2D> {
    if points.len() < 2 || segments_per_point == 0 {
        return points.to_vec();
    }

    let n = points.len();
    let mut out = Vec::with_capacity((n - 1) * segments_per_point + 1);

    for i in 0..n - 1 {
        let p0 = points[i.saturating_sub(1)].to_vector();
        let p1 = points[i].to_vector();
        let p2 = points[i + 1].to_vector();
        let p3 = points[(i + 2).min(n - 1)].to_vector();

        out.push(points[i]);
        for j in 1..segments_per_point {
            let t = j as f64 / segments_per_point as f64;
            out.push(Point2D::from(catmull_rom(p0, p1, p2, p3, t)));
        }
    }
    out.push(points[n - 1]);
    out
}

fn catmull_rom(
    p0: Vector2<f64>,
    p1: Vector2<f64>,
    p2: Vector2<f64>,
    p3: Vector2<f64>,
    t: f64,
) -> Vector2<f64> {
    let t2 = t * t;
    let t3 = t2 * t;
    0.5 * (2.0 * p1
        + (p2 - p0) * t
        + (2.0 * p0 - 5.0 * p1 + 4.0 * p2 - p3) * t2
        + (3.0 * p1 - p0 - 3.0 * p2 + p3) * t3)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::GridNode;
    use crate::world::{ObstacleBlob, ObstacleIndex, WorldSnapshot};
    use approx::assert_relative_eq;
    use itertools::Itertools;

    fn pts(coords: &[(f64, f64)]) -> Vec<Point2D> {
        coords.iter().map(|&p| Point2D::from(p)).collect()
    }

    #[test]
    fn test_simplify_collinear_keeps_endpoints() {
        for len in [3usize, 4, 10, 57] {
            let line: Vec<Point2D> = (0..len).map(|i| Point2D::new(i as f64, 2.0 * i as f64)).collect();
            let simplified = simplify(&line, 1.0);
            assert_eq!(simplified, vec![line[0], line[len - 1]]);
        }
    }

    #[test]
    fn test_simplify_keeps_corner() {
        let path = pts(&[(0.0, 0.0), (1.0, 0.0), (2.0, 0.0), (3.0, 0.0), (3.0, 1.0), (3.0, 2.0), (3.0, 3.0)]);
        let simplified = simplify(&path, 1.0);
        assert_eq!(simplified, pts(&[(0.0, 0.0), (3.0, 0.0), (3.0, 3.0)]));
    }

    #[test]
    fn test_simplify_short_paths_untouched() {
        let two = pts(&[(0.0, 0.0), (4.0, 4.0)]);
        assert_eq!(simplify(&two, 1.0), two);
        assert!(simplify(&[], 1.0).is_empty());
    }

    #[test]
    fn test_simplify_stays_within_epsilon() {
        let zigzag: Vec<Point2D> = (0..40)
            .map(|i| Point2D::new(i as f64, (i % 2) as f64 * 0.8 + (i / 10) as f64 * 3.0))
            .collect();
        let epsilon = 1.0;
        let simplified = simplify(&zigzag, epsilon);
        assert!(simplified.len() < zigzag.len());

        for p in &zigzag {
            let (a, b) = simplified
                .iter()
                .tuple_windows()
                .find(|(a, b)| a.x <= p.x && p.x <= b.x)
                .unwrap();
            let d = perpendicular_distance(p, a, b);
            assert!(d <= epsilon + 1e-9, "{:?} is {} away", p, d);
        }
    }

    #[test]
    fn test_perpendicular_distance() {
        let d = perpendicular_distance(&Point2D::new(1.0, 1.0), &Point2D::new(0.0, 0.0), &Point2D::new(2.0, 0.0));
        assert_relative_eq!(d, 1.0);
        let d = perpendicular_distance(&Point2D::new(3.0, 4.0), &Point2D::new(0.0, 0.0), &Point2D::new(0.0, 0.0));
        assert_relative_eq!(d, 5.0);
    }

    #[test]
    fn test_smooth_endpoints_and_sample_count() {
        let control = pts(&[(0.0, 0.0), (4.0, 0.0), (4.0, 4.0), (8.0, 6.0)]);
        let smoothed = smooth(&control, 3);
        assert_eq!(smoothed.len(), 3 * 3 + 1);
        assert_eq!(smoothed.first(), control.first());
        assert_eq!(smoothed.last(), control.last());
        // Catmull-Rom passes through every control point
        assert_eq!(smoothed[3], control[1]);
        assert_eq!(smoothed[6], control[2]);
    }

    #[test]
    fn test_smooth_two_points_is_straight() {
        let control = pts(&[(0.0, 0.0), (3.0, 3.0)]);
        let smoothed = smooth(&control, 3);
        assert_eq!(smoothed.len(), 4);
        for p in &smoothed {
            assert_relative_eq!(p.x, p.y, epsilon = 1e-12);
        }
        assert!(smoothed.iter().tuple_windows().all(|(a, b)| a.x < b.x));
    }

    #[test]
    fn test_smooth_simplify_preserves_endpoints() {
        let paths = [
            pts(&[(0.0, 0.0), (1.0, 1.0)]),
            pts(&[(0.0, 0.0), (1.0, 1.0), (2.0, 1.0), (3.0, 1.0), (4.0, 2.0), (4.0, 3.0)]),
            pts(&[(-5.0, 2.0), (-4.0, 3.0), (-3.0, 3.0), (-2.0, 4.0), (-2.0, 5.0), (-1.0, 6.0), (0.0, 6.0)]),
        ];
        for path in paths {
            let refined = smooth(&simplify(&path, 1.0), 3);
            assert_eq!(refined.first(), path.first());
            assert_eq!(refined.last(), path.last());
        }
    }

    #[test]
    fn test_refine_without_obstacles() {
        let world = WorldSnapshot::new();
        let index = ObstacleIndex::new(&world);
        let raw = Path2D::from_points((0..6).map(|i| Point2D::new(i as f64, 0.0)).collect());

        let refined = PathRefiner::default().refine(&raw, &index);
        assert_eq!(refined.len(), 4);
        assert_eq!(refined.first(), raw.first());
        assert_eq!(refined.last(), raw.last());
        assert!(refined.points.iter().all(|p| p.y == 0.0));
    }

    #[test]
    fn test_refine_disabled_by_any_obstacle() {
        let mut world = WorldSnapshot::new();
        world.insert_blob("paint_far", ObstacleBlob::obstacle([GridNode::new(500, 500)]));
        let index = ObstacleIndex::new(&world);
        let raw = Path2D::from_points(pts(&[(0.0, 0.0), (1.0, 1.0), (2.0, 1.0), (3.0, 1.0)]));

        assert_eq!(PathRefiner::default().refine(&raw, &index), raw);
    }

    #[test]
    fn test_refine_short_path_unchanged() {
        let world = WorldSnapshot::new();
        let raw = Path2D::from_points(pts(&[(0.0, 0.0), (1.0, 1.0)]));
        assert_eq!(PathRefiner::default().process(&raw, &world), raw);
    }
}
