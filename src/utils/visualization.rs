//! Plotting for planned paths over a world snapshot
//!
//! Layers are collected first and drawn onto a single gnuplot axes when the
//! figure is shown or saved.

use gnuplot::{AutoOption, AxesCommon, Caption, Color, Figure, LineWidth, PointSize, PointSymbol};

use crate::common::{Path2D, Point2D};
use crate::world::{RegionDescriptor, WorldSnapshot};

/// Color palette for consistent styling
pub mod colors {
    pub const BLACK: &str = "#000000";
    pub const RED: &str = "#FF0000";
    pub const GREEN: &str = "#00FF00";
    pub const BLUE: &str = "#0000FF";
    pub const ORANGE: &str = "#FFA500";
    pub const PURPLE: &str = "#800080";
    pub const GRAY: &str = "#808080";

    // Semantic colors
    pub const OBSTACLE: &str = BLACK;
    pub const REGION: &str = GRAY;
    pub const START: &str = GREEN;
    pub const GOAL: &str = BLUE;
    pub const RAW_PATH: &str = ORANGE;
    pub const PATH: &str = RED;
    pub const AGENT: &str = PURPLE;
}

/// Style for path rendering
#[derive(Debug, Clone)]
pub struct PathStyle {
    pub color: String,
    pub line_width: f64,
    pub caption: String,
}

impl PathStyle {
    pub fn new(color: &str, caption: &str) -> Self {
        Self {
            color: color.to_string(),
            line_width: 2.0,
            caption: caption.to_string(),
        }
    }

    pub fn with_line_width(mut self, width: f64) -> Self {
        self.line_width = width;
        self
    }
}

impl Default for PathStyle {
    fn default() -> Self {
        Self::new(colors::PATH, "Path")
    }
}

/// Style for point rendering
#[derive(Debug, Clone)]
pub struct PointStyle {
    pub color: String,
    pub size: f64,
    pub symbol: char,
    pub caption: String,
}

impl PointStyle {
    pub fn new(color: &str, caption: &str) -> Self {
        Self {
            color: color.to_string(),
            size: 1.0,
            symbol: 'O',
            caption: caption.to_string(),
        }
    }

    pub fn with_size(mut self, size: f64) -> Self {
        self.size = size;
        self
    }

    pub fn with_symbol(mut self, symbol: char) -> Self {
        self.symbol = symbol;
        self
    }
}

#[derive(Debug, Clone)]
enum Layer {
    Lines {
        x: Vec<f64>,
        y: Vec<f64>,
        style: PathStyle,
    },
    Points {
        x: Vec<f64>,
        y: Vec<f64>,
        style: PointStyle,
    },
}

pub struct Visualizer {
    layers: Vec<Layer>,
    title: String,
    x_label: String,
    y_label: String,
    x_range: Option<(f64, f64)>,
    y_range: Option<(f64, f64)>,
    aspect_ratio: Option<f64>,
    /// Screen coordinates grow downward
    invert_y: bool,
}

impl Visualizer {
    pub fn new() -> Self {
        Self {
            layers: Vec::new(),
            title: String::new(),
            x_label: "X [cell]".to_string(),
            y_label: "Y [cell]".to_string(),
            x_range: None,
            y_range: None,
            aspect_ratio: Some(1.0),
            invert_y: true,
        }
    }

    pub fn set_title(&mut self, title: &str) -> &mut Self {
        self.title = title.to_string();
        self
    }

    pub fn set_x_range(&mut self, min: f64, max: f64) -> &mut Self {
        self.x_range = Some((min, max));
        self
    }

    pub fn set_y_range(&mut self, min: f64, max: f64) -> &mut Self {
        self.y_range = Some((min, max));
        self
    }

    /// Set aspect ratio (None for auto)
    pub fn set_aspect_ratio(&mut self, ratio: Option<f64>) -> &mut Self {
        self.aspect_ratio = ratio;
        self
    }

    pub fn set_invert_y(&mut self, invert: bool) -> &mut Self {
        self.invert_y = invert;
        self
    }

    pub fn layer_count(&self) -> usize {
        self.layers.len()
    }

    pub fn plot_path(&mut self, path: &Path2D, style: &PathStyle) -> &mut Self {
        if path.is_empty() {
            return self;
        }
        self.layers.push(Layer::Lines {
            x: path.x_coords(),
            y: path.y_coords(),
            style: style.clone(),
        });
        self
    }

    pub fn plot_points(&mut self, points: &[Point2D], style: &PointStyle) -> &mut Self {
        if points.is_empty() {
            return self;
        }
        self.layers.push(Layer::Points {
            x: points.iter().map(|p| p.x).collect(),
            y: points.iter().map(|p| p.y).collect(),
            style: style.clone(),
        });
        self
    }

    pub fn plot_point(&mut self, point: Point2D, style: &PointStyle) -> &mut Self {
        self.plot_points(&[point], style)
    }

    pub fn plot_start(&mut self, point: Point2D) -> &mut Self {
        self.plot_point(point, &PointStyle::new(colors::START, "Start").with_size(1.5))
    }

    pub fn plot_goal(&mut self, point: Point2D) -> &mut Self {
        self.plot_point(point, &PointStyle::new(colors::GOAL, "Goal").with_size(1.5))
    }

    /// Outline of a rectangular region, corners in either order.
    pub fn plot_region(&mut self, region: &RegionDescriptor, caption: &str) -> &mut Self {
        let (min_x, min_y, max_x, max_y) = region.normalized();
        self.layers.push(Layer::Lines {
            x: vec![min_x, max_x, max_x, min_x, min_x],
            y: vec![min_y, min_y, max_y, max_y, min_y],
            style: PathStyle::new(colors::REGION, caption).with_line_width(1.0),
        });
        self
    }

    /// Every region outline and every obstacle cell in `world`.
    pub fn plot_world(&mut self, world: &WorldSnapshot) -> &mut Self {
        for (i, region) in world.regions().enumerate() {
            let caption = if i == 0 { "Regions" } else { "" };
            self.plot_region(region, caption);
        }

        let mut cells: Vec<Point2D> = world
            .obstacle_blobs()
            .flat_map(|blob| blob.cells.iter().map(|c| Point2D::from(*c)))
            .collect();
        cells.sort_by(|a, b| a.x.total_cmp(&b.x).then(a.y.total_cmp(&b.y)));
        self.plot_points(
            &cells,
            &PointStyle::new(colors::OBSTACLE, "Obstacles")
                .with_symbol('S')
                .with_size(0.5),
        )
    }

    pub fn show(&mut self) -> Result<(), String> {
        let mut figure = self.render();
        figure.show().map_err(|e| e.to_string()).map(|_| ())
    }

    pub fn save_png(&mut self, path: &str, width: u32, height: u32) -> Result<(), String> {
        let mut figure = self.render();
        figure.save_to_png(path, width, height).map_err(|e| e.to_string())
    }

    pub fn save_svg(&mut self, path: &str) -> Result<(), String> {
        let mut figure = self.render();
        figure.save_to_svg(path, 800, 600).map_err(|e| e.to_string())
    }

    fn render(&self) -> Figure {
        let mut figure = Figure::new();
        let axes = figure.axes2d();

        if !self.title.is_empty() {
            axes.set_title(&self.title, &[]);
        }
        axes.set_x_label(&self.x_label, &[]);
        axes.set_y_label(&self.y_label, &[]);

        if let Some((min, max)) = self.x_range {
            axes.set_x_range(AutoOption::Fix(min), AutoOption::Fix(max));
        }
        match (self.y_range, self.invert_y) {
            (Some((min, max)), true) => {
                axes.set_y_range(AutoOption::Fix(max), AutoOption::Fix(min));
            }
            (Some((min, max)), false) => {
                axes.set_y_range(AutoOption::Fix(min), AutoOption::Fix(max));
            }
            (None, true) => {
                axes.set_y_reverse(true);
            }
            (None, false) => {}
        }
        if let Some(ratio) = self.aspect_ratio {
            axes.set_aspect_ratio(AutoOption::Fix(ratio));
        }

        for layer in &self.layers {
            match layer {
                Layer::Lines { x, y, style } => {
                    axes.lines(
                        x,
                        y,
                        &[
                            Caption(&style.caption),
                            Color(&style.color),
                            LineWidth(style.line_width),
                        ],
                    );
                }
                Layer::Points { x, y, style } => {
                    axes.points(
                        x,
                        y,
                        &[
                            Caption(&style.caption),
                            Color(&style.color),
                            PointSymbol(style.symbol),
                            PointSize(style.size),
                        ],
                    );
                }
            }
        }
        figure
    }
}

impl Default for Visualizer {
    fn default() -> Self {
        Self::new()
    }
}

/// World, raw path and refined path on one plot.
pub fn quick_plot_paths(
    world: &WorldSnapshot,
    raw: &Path2D,
    refined: &Path2D,
    title: &str,
) -> Visualizer {
    let mut vis = Visualizer::new();
    vis.set_title(title);
    vis.plot_world(world);
    vis.plot_path(raw, &PathStyle::new(colors::RAW_PATH, "Grid path").with_line_width(1.0));
    vis.plot_path(refined, &PathStyle::default());
    if let Some(start) = raw.first() {
        vis.plot_start(*start);
    }
    if let Some(goal) = raw.last() {
        vis.plot_goal(*goal);
    }
    vis
}
