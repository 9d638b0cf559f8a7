//! Formula-driven agent motion

use std::collections::BTreeMap;
use std::time::{Duration, Instant};

use log::{trace, warn};
use rand::Rng;

use crate::common::Point2D;
use crate::expression::{ExpressionContext, ExpressionEngine};
use crate::motion::swarm::SwarmContext;

/// Autonomous motion scheduled by a caller.
///
/// The evaluator only reads this; changing course means assigning a new
/// state.
#[derive(Debug, Clone)]
pub struct AgentExpressionState {
    pub id: String,
    pub x_expr: String,
    pub y_expr: String,
    /// Custom variables, layered over everything else in the context
    pub vars: BTreeMap<String, f64>,
    pub start_time: Instant,
    pub active: bool,
    /// Motion freezes once this much time has passed
    pub duration: Option<Duration>,
}

impl AgentExpressionState {
    pub fn new(id: impl Into<String>, x_expr: impl Into<String>, y_expr: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            x_expr: x_expr.into(),
            y_expr: y_expr.into(),
            vars: BTreeMap::new(),
            start_time: Instant::now(),
            active: true,
            duration: None,
        }
    }

    pub fn with_var(mut self, name: impl Into<String>, value: f64) -> Self {
        self.vars.insert(name.into(), value);
        self
    }

    pub fn with_duration(mut self, duration: Duration) -> Self {
        self.duration = Some(duration);
        self
    }

    pub fn started_at(mut self, start_time: Instant) -> Self {
        self.start_time = start_time;
        self
    }

    /// Seconds since `start_time`; zero if `now` is earlier.
    pub fn elapsed(&self, now: Instant) -> f64 {
        now.saturating_duration_since(self.start_time).as_secs_f64()
    }

    pub fn is_expired(&self, now: Instant) -> bool {
        match self.duration {
            Some(duration) => now.saturating_duration_since(self.start_time) > duration,
            None => false,
        }
    }
}

/// Build the variable bag for one tick: built-ins, then swarm aggregates,
/// then the agent's own variables.
pub fn build_context(
    state: &AgentExpressionState,
    current_pos: Point2D,
    velocity: Point2D,
    start_pos: Point2D,
    swarm: Option<&SwarmContext>,
    t: f64,
) -> ExpressionContext {
    let mut ctx = ExpressionContext::new()
        .with("x", current_pos.x)
        .with("y", current_pos.y)
        .with("t", t)
        .with("vx", velocity.x)
        .with("vy", velocity.y)
        .with("startX", start_pos.x)
        .with("startY", start_pos.y);
    if let Some(swarm) = swarm {
        ctx.extend(swarm.variables());
    }
    ctx.extend(state.vars.iter().map(|(k, v)| (k.clone(), *v)));
    ctx
}

/// Next position of an agent at `now`.
///
/// Frozen at `current_pos` when the state is inactive or its duration has
/// run out. Each axis falls back to its current coordinate when its formula
/// fails.
#[allow(clippy::too_many_arguments)]
pub fn evaluate_agent_movement_at<R: Rng + ?Sized>(
    engine: &ExpressionEngine,
    state: &AgentExpressionState,
    current_pos: Point2D,
    velocity: Point2D,
    start_pos: Point2D,
    swarm: Option<&SwarmContext>,
    now: Instant,
    rng: &mut R,
) -> Point2D {
    if !state.active || state.is_expired(now) {
        trace!("agent {} frozen at {:?}", state.id, current_pos);
        return current_pos;
    }

    let t = state.elapsed(now);
    let ctx = build_context(state, current_pos, velocity, start_pos, swarm, t);

    let x = axis(engine, &state.id, &state.x_expr, &ctx, current_pos.x, rng);
    let y = axis(engine, &state.id, &state.y_expr, &ctx, current_pos.y, rng);
    Point2D::new(x, y)
}

fn axis<R: Rng + ?Sized>(
    engine: &ExpressionEngine,
    id: &str,
    source: &str,
    ctx: &ExpressionContext,
    fallback: f64,
    rng: &mut R,
) -> f64 {
    match engine.try_evaluate(source, ctx, rng) {
        Ok(value) => value,
        Err(e) => {
            warn!("agent {}: expression `{}` failed: {}", id, source, e);
            fallback
        }
    }
}
