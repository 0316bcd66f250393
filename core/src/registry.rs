use serde::{Deserialize, Serialize};

use crate::cluster::Cluster;
use crate::grid::{GridConfig, GridCoord};
use crate::nubs::{nubs_at, Nubs};
use crate::outline::Outline;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ClusterId(pub u32);

impl std::fmt::Display for ClusterId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "G{}", self.0)
    }
}

/// 2D affine matrix in SVG order `(a, b, c, d, e, f)`:
/// scale-x, skew-y, skew-x, scale-y, translate-x, translate-y.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Affine(pub [f32; 6]);

impl Affine {
    pub fn translate(x: f32, y: f32) -> Self {
        Affine([1.0, 0.0, 0.0, 1.0, x, y])
    }

    pub fn translation(&self) -> (f32, f32) {
        (self.0[4], self.0[5])
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Piece {
    pub coord: GridCoord,
    pub nubs: Nubs,
    pub outline: Outline,
    /// Fixed offset inside the cluster group; members never move relative to
    /// each other once joined.
    pub local: Affine,
}

impl Piece {
    pub fn new(config: &GridConfig, coord: GridCoord) -> Self {
        let (x, y) = config.home_offset(coord.row, coord.column);
        Self {
            coord,
            nubs: nubs_at(coord, config),
            outline: Outline::for_piece(config, coord),
            local: Affine::translate(x, y),
        }
    }
}

/// Arena of pieces keyed by grid cell, with an index-based cluster map.
pub struct PieceRegistry {
    pub(crate) config: GridConfig,
    pub(crate) slots: Vec<Option<Piece>>,
    pub(crate) cluster_of: Vec<Option<ClusterId>>,
    pub(crate) clusters: Vec<Option<Cluster>>,
    /// Live clusters, bottom of the stack first.
    pub(crate) order: Vec<ClusterId>,
    pub(crate) registered: usize,
    pub(crate) live_clusters: usize,
}

impl PieceRegistry {
    pub fn new(config: GridConfig) -> Self {
        let total = config.piece_count();
        Self {
            config,
            slots: vec![None; total],
            cluster_of: vec![None; total],
            clusters: vec![None; total],
            order: Vec::with_capacity(total),
            registered: 0,
            live_clusters: 0,
        }
    }

    /// Registry holding every piece of `config`, each in its own cluster.
    pub fn populate(config: GridConfig) -> Self {
        let mut registry = Self::new(config);
        for row in 0..config.rows {
            for column in 0..config.columns {
                registry.register(Piece::new(&config, GridCoord::new(row, column)));
            }
        }
        registry
    }

    pub fn config(&self) -> &GridConfig {
        &self.config
    }

    pub(crate) fn index(&self, coord: GridCoord) -> Option<usize> {
        if coord.row < self.config.rows && coord.column < self.config.columns {
            Some(coord.row as usize * self.config.columns as usize + coord.column as usize)
        } else {
            None
        }
    }

    pub fn get(&self, row: u32, column: u32) -> Option<&Piece> {
        self.piece(GridCoord::new(row, column))
    }

    pub fn piece(&self, coord: GridCoord) -> Option<&Piece> {
        let index = self.index(coord)?;
        self.slots.get(index).and_then(|slot| slot.as_ref())
    }

    /// Add a piece in its own singleton cluster. Cells outside the grid are
    /// rejected; registering a cell twice keeps the first piece.
    pub fn register(&mut self, piece: Piece) -> Option<ClusterId> {
        let Some(index) = self.index(piece.coord) else {
            log::warn!("piece {} lies outside the grid", piece.coord);
            return None;
        };
        if self.slots[index].is_some() {
            return self.cluster_of[index];
        }
        let id = ClusterId(index as u32);
        self.clusters[index] = Some(Cluster {
            id,
            translate: (0.0, 0.0),
            members: vec![piece.coord],
        });
        self.cluster_of[index] = Some(id);
        self.slots[index] = Some(piece);
        self.order.push(id);
        self.registered += 1;
        self.live_clusters += 1;
        Some(id)
    }

    pub fn len(&self) -> usize {
        self.registered
    }

    pub fn is_empty(&self) -> bool {
        self.registered == 0
    }

    pub fn pieces(&self) -> impl Iterator<Item = &Piece> {
        self.slots.iter().filter_map(|slot| slot.as_ref())
    }
}
