//! Tunables for the planner, the refiner and the expression engine
//!
//! Every section has a `Default` matching the values the canvas uses, so a
//! TOML file only needs to list what it overrides:
//!
//! ```toml
//! [search]
//! max_search_distance = 60
//!
//! [refine]
//! segments_per_point = 5
//! ```

use std::path::Path;

use serde::Deserialize;

use crate::common::{MotionError, MotionResult};

/// Configuration for the grid A* search
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Cells a frontier node may stray from the start on either axis
    pub max_search_distance: i32,
    /// Node extractions before the search gives up
    pub max_iterations: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            max_search_distance: 100,
            max_iterations: 1000,
        }
    }
}

/// Configuration for path simplification and smoothing
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct RefineConfig {
    /// Ramer-Douglas-Peucker tolerance in cells
    pub epsilon: f64,
    /// Catmull-Rom samples emitted per source segment
    pub segments_per_point: usize,
}

impl Default for RefineConfig {
    fn default() -> Self {
        Self {
            epsilon: 1.0,
            segments_per_point: 3,
        }
    }
}

/// Limits applied before an expression is parsed
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ExpressionConfig {
    pub max_len: usize,
    pub max_depth: usize,
}

impl Default for ExpressionConfig {
    fn default() -> Self {
        Self {
            max_len: 512,
            max_depth: 64,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(default)]
pub struct MotionConfig {
    pub search: SearchConfig,
    pub refine: RefineConfig,
    pub expression: ExpressionConfig,
}

impl MotionConfig {
    pub fn from_toml_str(text: &str) -> MotionResult<Self> {
        let config: MotionConfig = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: impl AsRef<Path>) -> MotionResult<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    pub fn validate(&self) -> MotionResult<()> {
        if self.search.max_search_distance < 1 {
            return Err(MotionError::InvalidConfig(
                "search.max_search_distance must be >= 1".to_string(),
            ));
        }
        if self.search.max_iterations == 0 {
            return Err(MotionError::InvalidConfig(
                "search.max_iterations must be > 0".to_string(),
            ));
        }
        if !self.refine.epsilon.is_finite() || self.refine.epsilon < 0.0 {
            return Err(MotionError::InvalidConfig(
                "refine.epsilon must be a non-negative number".to_string(),
            ));
        }
        if self.refine.segments_per_point == 0 {
            return Err(MotionError::InvalidConfig(
                "refine.segments_per_point must be >= 1".to_string(),
            ));
        }
        if self.expression.max_len == 0 || self.expression.max_depth == 0 {
            return Err(MotionError::InvalidConfig(
                "expression limits must be > 0".to_string(),
            ));
        }
        Ok(())
    }
}
