//! Aggregates over other agents, exposed to formulas as variables

use std::collections::BTreeMap;

use crate::common::Point2D;

#[derive(Debug, Clone, PartialEq)]
pub struct SwarmContext {
    pub count: usize,
    pub avg_x: f64,
    pub avg_y: f64,
    pub nearest_dist: f64,
    pub nearest_x: f64,
    pub nearest_y: f64,
    /// Caller-defined aggregates, passed through by name
    pub extra: BTreeMap<String, f64>,
}

impl SwarmContext {
    /// Aggregate `others` as seen from `self_pos`.
    ///
    /// With no neighbours the averages and the nearest neighbour collapse
    /// onto `self_pos` and `nearestDist` is 0, so formulas stay finite.
    pub fn from_neighbors(self_pos: Point2D, others: &[Point2D]) -> Self {
        if others.is_empty() {
            return Self {
                count: 0,
                avg_x: self_pos.x,
                avg_y: self_pos.y,
                nearest_dist: 0.0,
                nearest_x: self_pos.x,
                nearest_y: self_pos.y,
                extra: BTreeMap::new(),
            };
        }

        let n = others.len() as f64;
        let avg_x = others.iter().map(|p| p.x).sum::<f64>() / n;
        let avg_y = others.iter().map(|p| p.y).sum::<f64>() / n;

        let (nearest, nearest_dist) = others
            .iter()
            .map(|p| (*p, self_pos.distance(p)))
            .fold((others[0], f64::INFINITY), |best, cur| {
                if cur.1 < best.1 {
                    cur
                } else {
                    best
                }
            });

        Self {
            count: others.len(),
            avg_x,
            avg_y,
            nearest_dist,
            nearest_x: nearest.x,
            nearest_y: nearest.y,
            extra: BTreeMap::new(),
        }
    }

    pub fn with_extra(mut self, name: impl Into<String>, value: f64) -> Self {
        self.extra.insert(name.into(), value);
        self
    }

    /// Variable bindings in the order they are layered into a context.
    pub fn variables(&self) -> Vec<(String, f64)> {
        let mut vars = vec![
            ("swarmCount".to_string(), self.count as f64),
            ("swarmAvgX".to_string(), self.avg_x),
            ("swarmAvgY".to_string(), self.avg_y),
            ("nearestDist".to_string(), self.nearest_dist),
            ("nearestX".to_string(), self.nearest_x),
            ("nearestY".to_string(), self.nearest_y),
        ];
        vars.extend(self.extra.iter().map(|(k, v)| (k.clone(), *v)));
        vars
    }
}
