//! Cell blocking queries against a world snapshot

use crate::common::{GridNode, ObstacleMap};
use crate::world::snapshot::{ObstacleBlob, RegionDescriptor, WorldSnapshot};

/// Borrowed view over a snapshot answering "is this cell blocked".
///
/// Built once per planning call; collects the blocking regions and the
/// obstacle-tagged blobs so a query does not walk opaque entries.
#[derive(Debug, Clone)]
pub struct ObstacleIndex<'a> {
    regions: Vec<&'a RegionDescriptor>,
    blobs: Vec<&'a ObstacleBlob>,
}

impl<'a> ObstacleIndex<'a> {
    pub fn new(world: &'a WorldSnapshot) -> Self {
        Self {
            regions: world.regions().collect(),
            blobs: world.obstacle_blobs().collect(),
        }
    }

    pub fn is_blocked(&self, cell: GridNode) -> bool {
        self.regions.iter().any(|r| r.contains(cell))
            || self.blobs.iter().any(|b| b.contains(cell))
    }

    pub fn has_obstacle_blobs(&self) -> bool {
        !self.blobs.is_empty()
    }

    pub fn region_count(&self) -> usize {
        self.regions.len()
    }
}

impl ObstacleMap for ObstacleIndex<'_> {
    fn is_blocked(&self, cell: GridNode) -> bool {
        ObstacleIndex::is_blocked(self, cell)
    }

    fn has_obstacles(&self) -> bool {
        self.has_obstacle_blobs()
    }
}

impl ObstacleMap for WorldSnapshot {
    fn is_blocked(&self, cell: GridNode) -> bool {
        is_blocked(cell.x, cell.y, self)
    }

    fn has_obstacles(&self) -> bool {
        self.obstacle_blobs().next().is_some()
    }
}

/// One-off blocking query straight against a snapshot.
pub fn is_blocked(x: i32, y: i32, world: &WorldSnapshot) -> bool {
    let cell = GridNode::new(x, y);
    world.regions().any(|r| r.contains(cell)) || world.obstacle_blobs().any(|b| b.contains(cell))
}
