use serde::{Deserialize, Serialize};

use crate::grid::GridCoord;
use crate::registry::{ClusterId, PieceRegistry};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Cluster {
    pub id: ClusterId,
    /// Group translate shared by every member.
    pub translate: (f32, f32),
    pub members: Vec<GridCoord>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct MergeOutcome {
    pub target: ClusterId,
    pub source: ClusterId,
    pub moved: Vec<GridCoord>,
    pub source_translate: (f32, f32),
}

impl PieceRegistry {
    pub fn current_cluster(&self, coord: GridCoord) -> Option<ClusterId> {
        let index = self.index(coord)?;
        self.cluster_of[index]
    }

    pub fn cluster(&self, id: ClusterId) -> Option<&Cluster> {
        self.clusters.get(id.0 as usize).and_then(|entry| entry.as_ref())
    }

    pub fn clusters(&self) -> impl Iterator<Item = &Cluster> {
        self.clusters.iter().filter_map(|entry| entry.as_ref())
    }

    pub fn cluster_count(&self) -> usize {
        self.live_clusters
    }

    pub fn cluster_of_piece(&self, coord: GridCoord) -> Option<&Cluster> {
        self.cluster(self.current_cluster(coord)?)
    }

    pub fn same_cluster(&self, a: GridCoord, b: GridCoord) -> bool {
        match (self.current_cluster(a), self.current_cluster(b)) {
            (Some(x), Some(y)) => x == y,
            _ => false,
        }
    }

    pub fn set_translate(&mut self, id: ClusterId, translate: (f32, f32)) {
        if let Some(cluster) = self
            .clusters
            .get_mut(id.0 as usize)
            .and_then(|entry| entry.as_mut())
        {
            cluster.translate = translate;
        }
    }

    /// Move every piece of `moving`'s cluster into `target`. Members keep
    /// their grid offsets and take on the target's translate, so the joined
    /// pieces line up exactly. Returns `None` when nothing changes.
    pub fn merge(&mut self, target: ClusterId, moving: GridCoord) -> Option<MergeOutcome> {
        let source = self.current_cluster(moving)?;
        if source == target || self.cluster(target).is_none() {
            return None;
        }
        let taken = self.clusters.get_mut(source.0 as usize)?.take()?;
        for coord in &taken.members {
            if let Some(index) = self.index(*coord) {
                self.cluster_of[index] = Some(target);
            }
        }
        if let Some(cluster) = self
            .clusters
            .get_mut(target.0 as usize)
            .and_then(|entry| entry.as_mut())
        {
            cluster.members.extend_from_slice(&taken.members);
        }
        self.order.retain(|id| *id != source);
        self.live_clusters -= 1;
        debug_assert!(self.check_partition());
        log::debug!(
            "merged {} ({} pieces) into {}",
            source,
            taken.members.len(),
            target
        );
        Some(MergeOutcome {
            target,
            source,
            moved: taken.members,
            source_translate: taken.translate,
        })
    }

    pub fn is_solved(&self) -> bool {
        let total = self.config.piece_count();
        if self.live_clusters != 1 || self.registered != total {
            return false;
        }
        self.clusters()
            .next()
            .map(|cluster| cluster.members.len() == total)
            .unwrap_or(false)
    }

    /// Every registered piece sits in exactly one live cluster, and each
    /// cluster lists exactly the pieces pointing back at it.
    pub fn check_partition(&self) -> bool {
        let mut seen = vec![false; self.slots.len()];
        let mut live = 0;
        for cluster in self.clusters() {
            live += 1;
            if cluster.members.is_empty() {
                return false;
            }
            for coord in &cluster.members {
                let Some(index) = self.index(*coord) else {
                    return false;
                };
                if seen[index] || self.cluster_of[index] != Some(cluster.id) {
                    return false;
                }
                seen[index] = true;
            }
        }
        let covered = self
            .slots
            .iter()
            .zip(&seen)
            .all(|(slot, seen)| slot.is_some() == *seen);
        covered && live == self.live_clusters && self.order.len() == live
    }

    /// Top-left of the piece's base rectangle without its nub inset, in model
    /// space. Equals the home offset when the piece sits in its solved spot.
    pub fn piece_position(&self, coord: GridCoord) -> Option<(f32, f32)> {
        let cluster = self.cluster_of_piece(coord)?;
        let (hx, hy) = self.config.home_offset(coord.row, coord.column);
        Some((hx + cluster.translate.0, hy + cluster.translate.1))
    }

    /// Move the piece's whole cluster so the piece lands at `position`.
    pub fn place_piece(&mut self, coord: GridCoord, position: (f32, f32)) {
        let Some(id) = self.current_cluster(coord) else {
            return;
        };
        let (hx, hy) = self.config.home_offset(coord.row, coord.column);
        self.set_translate(id, (position.0 - hx, position.1 - hy));
    }

    /// Live clusters from bottom to top.
    pub fn order(&self) -> &[ClusterId] {
        &self.order
    }

    pub fn raise(&mut self, id: ClusterId) -> bool {
        if self.order.last() == Some(&id) || !self.order.contains(&id) {
            return false;
        }
        self.order.retain(|item| *item != id);
        self.order.push(id);
        true
    }

    pub fn send_to_back(&mut self, id: ClusterId) -> bool {
        if self.order.first() == Some(&id) || !self.order.contains(&id) {
            return false;
        }
        self.order.retain(|item| *item != id);
        self.order.insert(0, id);
        true
    }

    /// Topmost piece whose base rectangle contains the model-space point.
    pub fn piece_at(&self, x: f32, y: f32) -> Option<GridCoord> {
        let pw = self.config.piece_width;
        let ph = self.config.piece_height;
        for id in self.order.iter().rev() {
            let Some(cluster) = self.cluster(*id) else {
                continue;
            };
            for coord in &cluster.members {
                let (hx, hy) = self.config.home_offset(coord.row, coord.column);
                let left = hx + cluster.translate.0 + self.config.nub_width;
                let top = hy + cluster.translate.1 + self.config.nub_height;
                if x >= left && x < left + pw && y >= top && y < top + ph {
                    return Some(*coord);
                }
            }
        }
        None
    }
}
