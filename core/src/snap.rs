use crate::cluster::MergeOutcome;
use crate::grid::{GridConfig, GridCoord};
use crate::nubs::{dir_step, opposite_dir, rotate_step_clockwise, DIR_UP};
use crate::registry::{ClusterId, PieceRegistry};

/// A piece's base rectangle in model space, connectors ignored.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BaseBox {
    pub x1: f32,
    pub y1: f32,
    pub x2: f32,
    pub y2: f32,
}

impl BaseBox {
    pub fn new(config: &GridConfig, coord: GridCoord, translate: (f32, f32)) -> Self {
        let (hx, hy) = config.home_offset(coord.row, coord.column);
        let x1 = hx + translate.0 + config.nub_width;
        let y1 = hy + translate.1 + config.nub_height;
        Self {
            x1,
            y1,
            x2: x1 + config.piece_width,
            y2: y1 + config.piece_height,
        }
    }

    pub fn midpoint(&self, side: usize) -> (f32, f32) {
        let mid_x = (self.x1 + self.x2) * 0.5;
        let mid_y = (self.y1 + self.y2) * 0.5;
        match side % 4 {
            0 => (mid_x, self.y1),
            1 => (self.x2, mid_y),
            2 => (mid_x, self.y2),
            _ => (self.x1, mid_y),
        }
    }
}

pub fn distance(a: (f32, f32), b: (f32, f32)) -> f32 {
    let dx = a.0 - b.0;
    let dy = a.1 - b.1;
    (dx * dx + dy * dy).sqrt()
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct SnapReport {
    pub merges: Vec<MergeOutcome>,
    pub solved: bool,
}

impl SnapReport {
    pub fn merged(&self) -> bool {
        !self.merges.is_empty()
    }

    /// Cluster the dropped pieces ended up in.
    pub fn final_cluster(&self) -> Option<ClusterId> {
        self.merges.last().map(|merge| merge.target)
    }
}

fn base_box_of(registry: &PieceRegistry, coord: GridCoord) -> Option<BaseBox> {
    let cluster = registry.cluster_of_piece(coord)?;
    Some(BaseBox::new(registry.config(), coord, cluster.translate))
}

/// Test every piece of the dropped cluster against its four grid neighbors
/// and merge wherever facing edges line up within the snap threshold.
///
/// `is_held` reports clusters still under another pointer; those are not
/// stationary and are never snapped onto.
pub fn snap_dropped<F>(registry: &mut PieceRegistry, dropped: ClusterId, is_held: F) -> SnapReport
where
    F: Fn(ClusterId) -> bool,
{
    let mut report = SnapReport::default();
    let Some(cluster) = registry.cluster(dropped) else {
        return report;
    };
    // Merges rewrite membership, so walk a copy.
    let members = cluster.members.clone();
    let config = *registry.config();
    let threshold = config.snap_threshold;

    for piece in members {
        let mut step = dir_step(DIR_UP);
        for side in 0..4 {
            let current = step;
            step = rotate_step_clockwise(step);
            let Some(other) = piece.offset(current.0, current.1, &config) else {
                continue;
            };
            if registry.same_cluster(piece, other) {
                continue;
            }
            let Some(target) = registry.current_cluster(other) else {
                continue;
            };
            if is_held(target) {
                continue;
            }
            let (Some(piece_box), Some(other_box)) =
                (base_box_of(registry, piece), base_box_of(registry, other))
            else {
                continue;
            };
            let gap = distance(
                piece_box.midpoint(side),
                other_box.midpoint(opposite_dir(side)),
            );
            if gap < threshold {
                if let Some(outcome) = registry.merge(target, piece) {
                    report.solved = registry.is_solved();
                    report.merges.push(outcome);
                }
            }
        }
    }
    if report.merged() {
        log::debug!(
            "drop of {} produced {} merge(s), {} clusters left",
            dropped,
            report.merges.len(),
            registry.cluster_count()
        );
    }
    report
}
