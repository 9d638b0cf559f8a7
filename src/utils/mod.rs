//! Utility modules for nara_motion

pub mod visualization;

pub use visualization::{colors, quick_plot_paths, PathStyle, PointStyle, Visualizer};
