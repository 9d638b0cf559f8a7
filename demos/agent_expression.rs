//! Agent Expression Example
//!
//! Three agents orbit their start points while drifting toward the swarm
//! centre. Ticks are simulated at 20 Hz and the trails plotted.

use std::time::{Duration, Instant};

use rand::rngs::StdRng;
use rand::SeedableRng;

use nara_motion::motion::{evaluate_agent_movement_at, AgentExpressionState, SwarmContext};
use nara_motion::utils::{colors, PathStyle, Visualizer};
use nara_motion::{ExpressionEngine, Path2D, Point2D};

fn main() {
    env_logger::init();
    println!("Agent expression start!!");

    let engine = ExpressionEngine::default();
    let mut rng = StdRng::seed_from_u64(42);
    let start_time = Instant::now();

    let starts = [Point2D::new(0.0, 0.0), Point2D::new(30.0, 5.0), Point2D::new(10.0, 25.0)];
    let agents: Vec<AgentExpressionState> = starts
        .iter()
        .enumerate()
        .map(|(i, _)| {
            AgentExpressionState::new(
                format!("agent_{}", i),
                "startX + r * cos(t * speed) + (swarmAvgX - startX) * min(t / 10, 1) / 2",
                "startY + r * sin(t * speed) + (swarmAvgY - startY) * min(t / 10, 1) / 2",
            )
            .with_var("r", 4.0 + i as f64 * 2.0)
            .with_var("speed", 1.0 + i as f64 * 0.5)
            .with_duration(Duration::from_secs(12))
            .started_at(start_time)
        })
        .collect();

    let mut positions = starts.to_vec();
    let mut velocities = vec![Point2D::origin(); starts.len()];
    let mut trails: Vec<Path2D> = starts.iter().map(|p| Path2D::single(*p)).collect();

    let tick = Duration::from_millis(50);
    for step in 1..=300u32 {
        let now = start_time + tick * step;
        let snapshot = positions.clone();
        for (i, agent) in agents.iter().enumerate() {
            let others: Vec<Point2D> = snapshot
                .iter()
                .enumerate()
                .filter(|(j, _)| *j != i)
                .map(|(_, p)| *p)
                .collect();
            let swarm = SwarmContext::from_neighbors(snapshot[i], &others);
            let prev = snapshot[i];
            let next = evaluate_agent_movement_at(
                &engine,
                agent,
                prev,
                velocities[i],
                starts[i],
                Some(&swarm),
                now,
                &mut rng,
            );
            let dt = tick.as_secs_f64();
            velocities[i] = Point2D::new((next.x - prev.x) / dt, (next.y - prev.y) / dt);
            positions[i] = next;
            trails[i].push(next);
        }
    }

    for (agent, pos) in agents.iter().zip(&positions) {
        println!("{} stopped at ({:.2}, {:.2})", agent.id, pos.x, pos.y);
    }

    let palette = [colors::RED, colors::BLUE, colors::PURPLE];
    let mut vis = Visualizer::new();
    vis.set_title("Formula-driven agents");
    for ((agent, trail), color) in agents.iter().zip(&trails).zip(palette) {
        vis.plot_path(trail, &PathStyle::new(color, &agent.id).with_line_width(1.5));
    }
    for start in starts {
        vis.plot_start(start);
    }
    let _ = vis.save_png("img/agent_expression.png", 800, 600);
    let _ = vis.show();

    println!("Agent expression finish!!");
}
