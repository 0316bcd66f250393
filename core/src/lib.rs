pub mod cluster;
pub mod gesture;
pub mod grid;
pub mod nubs;
pub mod outline;
pub mod registry;
pub mod scatter;
pub mod snap;
pub mod victory;
pub mod viewport;

pub use cluster::{Cluster, MergeOutcome};
pub use gesture::{Activity, GestureController, GestureEffect, PointerId};
pub use grid::{
    plan_grid, GridConfig, GridCoord, GridLimits, GridPolicy, DEFAULT_DIFFICULTY,
    DEFAULT_MIN_PIECE_HEIGHT, DEFAULT_MIN_PIECE_WIDTH, DEFAULT_SNAP_THRESHOLD,
};
pub use nubs::{nubs_for, Nubs, DIR_DOWN, DIR_LEFT, DIR_RIGHT, DIR_UP};
pub use outline::{
    fmt_f32, full_image_window, texture_window, Outline, PathCommand, TextureWindow,
};
pub use registry::{Affine, ClusterId, Piece, PieceRegistry};
pub use scatter::{pickup_tilt_deg, SCATTER_SEED};
pub use snap::{snap_dropped, BaseBox, SnapReport};
pub use victory::VictoryDetector;
pub use viewport::{ViewRect, Viewport, ZoomLimits, VIEW_ZOOM_MAX, VIEW_ZOOM_MIN};
