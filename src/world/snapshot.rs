//! Read-only world snapshot
//!
//! The canvas stores its content as a sparse `key -> value` map. Values are
//! either JSON objects or JSON encoded as a string. Only two shapes matter
//! for motion planning:
//!
//! - region descriptors (notes, images, selections) with
//!   `startX/startY/endX/endY`, which block every cell they cover
//! - paint blobs with `cells/bounds/paintType`, which block their member
//!   cells when `paintType == "obstacle"`
//!
//! Everything else, including payloads that fail to parse, is kept as
//! [`WorldEntry::Opaque`] and never blocks.

use std::collections::{HashMap, HashSet};

use log::{debug, warn};
use serde::Deserialize;
use serde_json::Value;

use crate::common::{GridNode, MotionError, MotionResult};

/// Rectangular blocking area, inclusive on all edges
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegionDescriptor {
    pub start_x: f64,
    pub start_y: f64,
    pub end_x: f64,
    pub end_y: f64,
    #[serde(default)]
    pub is_selection: bool,
    #[serde(default)]
    pub content_type: Option<String>,
}

impl RegionDescriptor {
    pub fn new(start_x: f64, start_y: f64, end_x: f64, end_y: f64) -> Self {
        Self {
            start_x,
            start_y,
            end_x,
            end_y,
            is_selection: false,
            content_type: None,
        }
    }

    /// Corners ordered as `(min_x, min_y, max_x, max_y)`.
    pub fn normalized(&self) -> (f64, f64, f64, f64) {
        (
            self.start_x.min(self.end_x),
            self.start_y.min(self.end_y),
            self.start_x.max(self.end_x),
            self.start_y.max(self.end_y),
        )
    }

    pub fn contains(&self, cell: GridNode) -> bool {
        let (min_x, min_y, max_x, max_y) = self.normalized();
        let (x, y) = (cell.x as f64, cell.y as f64);
        x >= min_x && x <= max_x && y >= min_y && y <= max_y
    }
}

/// Axis-aligned bounds precomputed by the blob provider
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlobBounds {
    pub min_x: f64,
    pub max_x: f64,
    pub min_y: f64,
    pub max_y: f64,
}

impl BlobBounds {
    pub fn contains(&self, cell: GridNode) -> bool {
        let (x, y) = (cell.x as f64, cell.y as f64);
        x >= self.min_x && x <= self.max_x && y >= self.min_y && y <= self.max_y
    }

    /// Tight bounds of a cell set; `None` for an empty set.
    pub fn enclosing<'a>(cells: impl IntoIterator<Item = &'a GridNode>) -> Option<Self> {
        cells.into_iter().fold(None, |acc: Option<BlobBounds>, c| {
            let (x, y) = (c.x as f64, c.y as f64);
            Some(match acc {
                None => BlobBounds { min_x: x, max_x: x, min_y: y, max_y: y },
                Some(b) => BlobBounds {
                    min_x: b.min_x.min(x),
                    max_x: b.max_x.max(x),
                    min_y: b.min_y.min(y),
                    max_y: b.max_y.max(y),
                },
            })
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaintType {
    Obstacle,
    #[serde(other)]
    Other,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawObstacleBlob {
    cells: Vec<String>,
    bounds: BlobBounds,
    paint_type: PaintType,
}

/// Connected set of painted cells
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(from = "RawObstacleBlob")]
pub struct ObstacleBlob {
    pub cells: HashSet<GridNode>,
    pub bounds: BlobBounds,
    pub paint_type: PaintType,
}

impl From<RawObstacleBlob> for ObstacleBlob {
    fn from(raw: RawObstacleBlob) -> Self {
        let mut cells = HashSet::with_capacity(raw.cells.len());
        for key in &raw.cells {
            match GridNode::parse_key(key) {
                Some(cell) => {
                    cells.insert(cell);
                }
                None => warn!("skipping unparsable blob cell {:?}", key),
            }
        }
        ObstacleBlob {
            cells,
            bounds: raw.bounds,
            paint_type: raw.paint_type,
        }
    }
}

impl ObstacleBlob {
    /// Obstacle blob over the given cells with tight bounds.
    pub fn obstacle(cells: impl IntoIterator<Item = GridNode>) -> Self {
        let cells: HashSet<GridNode> = cells.into_iter().collect();
        let bounds = BlobBounds::enclosing(&cells).unwrap_or(BlobBounds {
            min_x: 0.0,
            max_x: -1.0,
            min_y: 0.0,
            max_y: -1.0,
        });
        Self {
            cells,
            bounds,
            paint_type: PaintType::Obstacle,
        }
    }

    pub fn is_obstacle(&self) -> bool {
        self.paint_type == PaintType::Obstacle
    }

    /// Bounds test first, then exact membership.
    pub fn contains(&self, cell: GridNode) -> bool {
        self.bounds.contains(cell) && self.cells.contains(&cell)
    }
}

/// One value of the snapshot map
#[derive(Debug, Clone, PartialEq)]
pub enum WorldEntry {
    Region(RegionDescriptor),
    Blob(ObstacleBlob),
    /// Text, unknown shapes and malformed payloads
    Opaque(Value),
}

impl WorldEntry {
    /// Classify a raw value. Never fails; bad data becomes `Opaque`.
    pub fn from_value(key: &str, value: Value) -> Self {
        let value = match value {
            Value::String(text) => match serde_json::from_str::<Value>(&text) {
                Ok(inner @ Value::Object(_)) => inner,
                _ => return WorldEntry::Opaque(Value::String(text)),
            },
            other => other,
        };

        match Self::classify(key, &value) {
            Ok(Some(entry)) => entry,
            Ok(None) => WorldEntry::Opaque(value),
            Err(e) => {
                debug!("{}", e);
                WorldEntry::Opaque(value)
            }
        }
    }

    fn classify(key: &str, value: &Value) -> MotionResult<Option<Self>> {
        let Some(object) = value.as_object() else {
            return Ok(None);
        };
        let malformed = |e: serde_json::Error| MotionError::MalformedRegionData {
            key: key.to_string(),
            message: e.to_string(),
        };

        if object.contains_key("cells") && object.contains_key("paintType") {
            let blob = ObstacleBlob::deserialize(value).map_err(malformed)?;
            return Ok(Some(WorldEntry::Blob(blob)));
        }
        if object.contains_key("startX") || object.contains_key("endX") {
            let region = RegionDescriptor::deserialize(value).map_err(malformed)?;
            return Ok(Some(WorldEntry::Region(region)));
        }
        Ok(None)
    }
}

/// Sparse key -> entry map describing the canvas
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WorldSnapshot {
    entries: HashMap<String, WorldEntry>,
}

impl WorldSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a snapshot from a JSON object.
    pub fn from_json_str(json: &str) -> MotionResult<Self> {
        let value: Value = serde_json::from_str(json)?;
        Self::from_json_value(value)
    }

    pub fn from_json_value(value: Value) -> MotionResult<Self> {
        let Value::Object(map) = value else {
            return Err(MotionError::MalformedRegionData {
                key: String::new(),
                message: "snapshot root must be an object".to_string(),
            });
        };
        let entries = map
            .into_iter()
            .map(|(key, value)| {
                let entry = WorldEntry::from_value(&key, value);
                (key, entry)
            })
            .collect();
        Ok(Self { entries })
    }

    pub fn insert(&mut self, key: impl Into<String>, entry: WorldEntry) -> &mut Self {
        self.entries.insert(key.into(), entry);
        self
    }

    pub fn insert_region(&mut self, key: impl Into<String>, region: RegionDescriptor) -> &mut Self {
        self.insert(key, WorldEntry::Region(region))
    }

    pub fn insert_blob(&mut self, key: impl Into<String>, blob: ObstacleBlob) -> &mut Self {
        self.insert(key, WorldEntry::Blob(blob))
    }

    pub fn get(&self, key: &str) -> Option<&WorldEntry> {
        self.entries.get(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn regions(&self) -> impl Iterator<Item = &RegionDescriptor> {
        self.entries.values().filter_map(|e| match e {
            WorldEntry::Region(r) => Some(r),
            _ => None,
        })
    }

    pub fn blobs(&self) -> impl Iterator<Item = &ObstacleBlob> {
        self.entries.values().filter_map(|e| match e {
            WorldEntry::Blob(b) => Some(b),
            _ => None,
        })
    }

    pub fn obstacle_blobs(&self) -> impl Iterator<Item = &ObstacleBlob> {
        self.blobs().filter(|b| b.is_obstacle())
    }
}
