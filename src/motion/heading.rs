//! Eight-way facing for a marker stepping along a path
//!
//! Screen coordinates: `y` grows downward, so a step with positive `dy`
//! faces south. The discriminants are the rows of the walk/idle sprite
//! sheets.

use itertools::Itertools;

use crate::common::Path2D;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Heading {
    South = 0,
    SouthWest = 1,
    West = 2,
    NorthWest = 3,
    North = 4,
    NorthEast = 5,
    East = 6,
    SouthEast = 7,
}

impl Heading {
    /// Nearest of the eight directions to `(dx, dy)`; `None` for no movement.
    pub fn from_step(dx: f64, dy: f64) -> Option<Heading> {
        if !(dx.is_finite() && dy.is_finite()) || (dx == 0.0 && dy == 0.0) {
            return None;
        }
        // 0 = east, counting clockwise on screen in 45 degree sectors
        let sector = (dy.atan2(dx) / std::f64::consts::FRAC_PI_4).round() as i32;
        Some(match sector.rem_euclid(8) {
            0 => Heading::East,
            1 => Heading::SouthEast,
            2 => Heading::South,
            3 => Heading::SouthWest,
            4 => Heading::West,
            5 => Heading::NorthWest,
            6 => Heading::North,
            _ => Heading::NorthEast,
        })
    }

    pub fn sprite_row(self) -> usize {
        self as usize
    }
}

/// Facing for every step of `path`. Zero-length steps keep the previous
/// facing; the first defaults to south.
pub fn headings(path: &Path2D) -> Vec<Heading> {
    let mut current = Heading::South;
    path.points
        .iter()
        .tuple_windows()
        .map(|(a, b)| {
            if let Some(h) = Heading::from_step(b.x - a.x, b.y - a.y) {
                current = h;
            }
            current
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::Point2D;

    #[test]
    fn test_unit_steps_map_to_sprite_rows() {
        let cases = [
            ((0.0, 1.0), 0),
            ((-1.0, 1.0), 1),
            ((-1.0, 0.0), 2),
            ((-1.0, -1.0), 3),
            ((0.0, -1.0), 4),
            ((1.0, -1.0), 5),
            ((1.0, 0.0), 6),
            ((1.0, 1.0), 7),
        ];
        for ((dx, dy), row) in cases {
            assert_eq!(Heading::from_step(dx, dy).unwrap().sprite_row(), row, "({}, {})", dx, dy);
        }
    }

    #[test]
    fn test_off_axis_steps_snap() {
        assert_eq!(Heading::from_step(0.3, 0.05), Some(Heading::East));
        assert_eq!(Heading::from_step(-0.1, -2.0), Some(Heading::North));
        assert_eq!(Heading::from_step(0.0, 0.0), None);
        assert_eq!(Heading::from_step(f64::NAN, 1.0), None);
    }

    #[test]
    fn test_path_headings() {
        let path = Path2D::from_points(vec![
            Point2D::new(0.0, 0.0),
            Point2D::new(0.0, 0.0),
            Point2D::new(1.0, 0.0),
            Point2D::new(1.0, 0.0),
            Point2D::new(0.0, -1.0),
        ]);
        assert_eq!(
            headings(&path),
            vec![Heading::South, Heading::East, Heading::East, Heading::NorthWest]
        );
        assert!(headings(&Path2D::single(Point2D::origin())).is_empty());
    }
}
