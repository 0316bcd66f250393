use serde::{Deserialize, Serialize};

pub const DEFAULT_DIFFICULTY: f32 = 2.0;
pub const DEFAULT_MIN_PIECE_WIDTH: f32 = 50.0;
pub const DEFAULT_MIN_PIECE_HEIGHT: f32 = 50.0;
pub const DEFAULT_SNAP_THRESHOLD: f32 = 20.0;
pub const NUB_FRACTION: f32 = 1.0 / 3.0;
pub const OUTLINE_UNITS: f32 = 12.0;

/// How rows and columns are derived from the image size.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum GridPolicy {
    /// `columns = floor(aspect * difficulty)`, `rows = floor(difficulty)`.
    FixedMultiplier { difficulty: f32 },
    /// Pick a piece size whose area makes roughly `pieces` pieces.
    AreaTarget { pieces: u32 },
}

impl Default for GridPolicy {
    fn default() -> Self {
        GridPolicy::FixedMultiplier {
            difficulty: DEFAULT_DIFFICULTY,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridLimits {
    pub min_piece_width: f32,
    pub min_piece_height: f32,
    pub snap_threshold: f32,
}

impl Default for GridLimits {
    fn default() -> Self {
        Self {
            min_piece_width: DEFAULT_MIN_PIECE_WIDTH,
            min_piece_height: DEFAULT_MIN_PIECE_HEIGHT,
            snap_threshold: DEFAULT_SNAP_THRESHOLD,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct GridConfig {
    pub image_width: u32,
    pub image_height: u32,
    pub policy: GridPolicy,
    pub rows: u32,
    pub columns: u32,
    pub piece_width: f32,
    pub piece_height: f32,
    pub nub_width: f32,
    pub nub_height: f32,
    pub min_piece_width: f32,
    pub min_piece_height: f32,
    pub snap_threshold: f32,
}

impl GridConfig {
    /// Placeholder before any image is known. Holds no cells.
    pub fn unplanned(policy: GridPolicy, limits: GridLimits) -> Self {
        Self {
            image_width: 0,
            image_height: 0,
            policy,
            rows: 0,
            columns: 0,
            piece_width: 0.0,
            piece_height: 0.0,
            nub_width: 0.0,
            nub_height: 0.0,
            min_piece_width: limits.min_piece_width,
            min_piece_height: limits.min_piece_height,
            snap_threshold: limits.snap_threshold.max(0.0),
        }
    }

    pub fn piece_count(&self) -> usize {
        self.rows as usize * self.columns as usize
    }

    pub fn contains(&self, row: i64, column: i64) -> bool {
        row >= 0 && column >= 0 && row < self.rows as i64 && column < self.columns as i64
    }

    /// Outline unit sizes: a piece edge is twelve units long.
    pub fn units(&self) -> (f32, f32) {
        (
            self.piece_width / OUTLINE_UNITS,
            self.piece_height / OUTLINE_UNITS,
        )
    }

    /// Offset of a piece inside its cluster group when the puzzle is solved.
    pub fn home_offset(&self, row: u32, column: u32) -> (f32, f32) {
        (
            column as f32 * self.piece_width,
            row as f32 * self.piece_height,
        )
    }

    pub fn board_size(&self) -> (f32, f32) {
        (
            self.columns as f32 * self.piece_width,
            self.rows as f32 * self.piece_height,
        )
    }

    /// Piece sizes are whole pixels, so a fractional minimum is met by its
    /// floor.
    pub fn is_degenerate(&self) -> bool {
        self.piece_width < self.min_piece_width.floor()
            || self.piece_height < self.min_piece_height.floor()
    }

    pub fn label(&self) -> String {
        format!(
            "{} pieces ({}x{})",
            self.piece_count(),
            self.columns,
            self.rows
        )
    }
}

/// Derive the grid for an image. Never fails: input that cannot hold a single
/// minimum-sized piece collapses to a 1x1 grid.
pub fn plan_grid(width: u32, height: u32, policy: GridPolicy, limits: GridLimits) -> GridConfig {
    let w = width as f32;
    let h = height as f32;
    let (raw_columns, raw_rows) = if width == 0 || height == 0 {
        (1.0, 1.0)
    } else {
        match policy {
            GridPolicy::FixedMultiplier { difficulty } => {
                let k = if difficulty.is_finite() && difficulty > 0.0 {
                    difficulty
                } else {
                    1.0
                };
                (((w / h) * k).floor(), k.floor())
            }
            GridPolicy::AreaTarget { pieces } => {
                let target = pieces.max(1) as f32;
                let aspect = w / h;
                let piece_area = w * h / target;
                let piece_height = (piece_area / aspect).sqrt();
                let piece_width = piece_area / piece_height;
                ((w / piece_width).floor(), (h / piece_height).floor())
            }
        }
    };

    let max_across = floor_div(w, limits.min_piece_width);
    let max_down = floor_div(h, limits.min_piece_height);
    let columns = (raw_columns.max(0.0) as u32).min(max_across).max(1);
    let rows = (raw_rows.max(0.0) as u32).min(max_down).max(1);

    let piece_width = (w / columns as f32).floor();
    let piece_height = (h / rows as f32).floor();
    let config = GridConfig {
        image_width: width,
        image_height: height,
        policy,
        rows,
        columns,
        piece_width,
        piece_height,
        nub_width: piece_width * NUB_FRACTION,
        nub_height: piece_height * NUB_FRACTION,
        min_piece_width: limits.min_piece_width,
        min_piece_height: limits.min_piece_height,
        snap_threshold: limits.snap_threshold.max(0.0),
    };
    if config.is_degenerate() {
        log::warn!(
            "image {}x{} is smaller than one {}x{} piece, using a 1x1 grid",
            width,
            height,
            limits.min_piece_width,
            limits.min_piece_height
        );
    }
    config
}

fn floor_div(length: f32, min_piece: f32) -> u32 {
    if min_piece > 0.0 && min_piece.is_finite() {
        (length / min_piece).floor().max(0.0) as u32
    } else {
        u32::MAX
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct GridCoord {
    pub row: u32,
    pub column: u32,
}

impl GridCoord {
    pub const fn new(row: u32, column: u32) -> Self {
        Self { row, column }
    }

    /// The cell `(d_column, d_row)` away, if it lies inside `config`.
    pub fn offset(self, d_column: i32, d_row: i32, config: &GridConfig) -> Option<GridCoord> {
        let row = self.row as i64 + d_row as i64;
        let column = self.column as i64 + d_column as i64;
        if config.contains(row, column) {
            Some(GridCoord::new(row as u32, column as u32))
        } else {
            None
        }
    }
}

impl std::fmt::Display for GridCoord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "R{}C{}", self.row, self.column)
    }
}
