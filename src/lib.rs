pub mod app_core;
pub mod config;
pub mod input;
pub mod surface;
pub mod svg_surface;

pub use app_core::{Session, VictorySubscriber, VictorySubscription};
pub use config::{PuzzleSettings, SettingsError};
pub use input::{InputEvent, InputEventKind, InputModifiers, PointerId, PointerKind, WheelEvent};
pub use surface::{NullSurface, PieceSurface};
pub use svg_surface::{SvgGroup, SvgShape, SvgSurface};
