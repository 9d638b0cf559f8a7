//! Error types for nara_motion
//!
//! None of these reach the caller of the facade functions in
//! [`crate::motion`]; they exist so the lower layers can report *why* they
//! degraded and the facade can log it.

use thiserror::Error;

use crate::common::types::{GridNode, Point2D};

/// Why a grid search gave up before reaching the goal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SearchFailure {
    /// Every reachable cell was expanded without finding the goal
    #[error("open set exhausted")]
    OpenSetExhausted,
    /// The iteration cap was hit
    #[error("iteration cap reached")]
    IterationCap,
    /// The frontier only had cells outside the search radius
    #[error("search radius exceeded")]
    DistanceBound,
}

/// Failures of the expression engine
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ExpressionError {
    #[error("unexpected character {ch:?} at {pos}")]
    UnexpectedChar { ch: char, pos: usize },

    #[error("unexpected token {found} at {pos}")]
    UnexpectedToken { found: String, pos: usize },

    #[error("unexpected end of expression")]
    UnexpectedEnd,

    #[error("unknown identifier `{0}`")]
    UnknownIdentifier(String),

    #[error("unknown function `{0}`")]
    UnknownFunction(String),

    #[error("`{name}` expects {expected} argument(s), got {got}")]
    Arity { name: String, expected: &'static str, got: usize },

    #[error("expression is {len} characters long (limit {max})")]
    TooLong { len: usize, max: usize },

    #[error("expression nesting exceeds {0} levels")]
    TooDeep(usize),

    #[error("expression evaluated to a non-finite value ({0})")]
    NonFinite(f64),
}

/// Main error type for motion planning
#[derive(Debug, Error)]
pub enum MotionError {
    /// Grid search stopped without reaching the goal
    #[error("search from {start:?} to {goal:?} failed after {iterations} iterations: {reason}")]
    SearchExhausted {
        start: GridNode,
        goal: GridNode,
        reason: SearchFailure,
        iterations: usize,
    },

    /// A snapshot entry could not be interpreted
    #[error("malformed region data under `{key}`: {message}")]
    MalformedRegionData { key: String, message: String },

    #[error("expression error: {0}")]
    Expression(#[from] ExpressionError),

    /// An endpoint is non-finite or too far out to map onto a cell
    #[error("endpoint {start:?} -> {end:?} cannot be placed on the grid")]
    UnplaceableEndpoint { start: Point2D, end: Point2D },

    /// `start == end`
    #[error("start and end are the same point")]
    DegenerateInput,

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("snapshot parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("config parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for motion planning operations
pub type MotionResult<T> = Result<T, MotionError>;
