use serde::{Deserialize, Serialize};

pub const VIEW_ZOOM_MIN: f32 = 0.1;
pub const VIEW_ZOOM_MAX: f32 = 4.0;
pub const VIEW_ZOOM_DEFAULT: f32 = 1.0;
pub const WHEEL_ZOOM_RATE: f32 = 0.001;

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ZoomLimits {
    pub min: f32,
    pub max: f32,
    /// Exponent per wheel delta unit.
    pub wheel_rate: f32,
}

impl Default for ZoomLimits {
    fn default() -> Self {
        Self {
            min: VIEW_ZOOM_MIN,
            max: VIEW_ZOOM_MAX,
            wheel_rate: WHEEL_ZOOM_RATE,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ViewRect {
    pub min_x: f32,
    pub min_y: f32,
    pub width: f32,
    pub height: f32,
}

/// Pan and zoom of the canvas. `zoom` is model units per screen pixel, so
/// larger values show more of the board.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
    zoom: f32,
    pan: (f32, f32),
    size: (f32, f32),
    limits: ZoomLimits,
}

impl Viewport {
    pub fn new(width: f32, height: f32, limits: ZoomLimits) -> Self {
        let limits = ZoomLimits {
            min: limits.min.min(limits.max),
            max: limits.max.max(limits.min),
            wheel_rate: limits.wheel_rate,
        };
        Self {
            zoom: VIEW_ZOOM_DEFAULT.clamp(limits.min, limits.max),
            pan: (0.0, 0.0),
            size: (width.max(0.0), height.max(0.0)),
            limits,
        }
    }

    pub fn zoom(&self) -> f32 {
        self.zoom
    }

    pub fn pan(&self) -> (f32, f32) {
        self.pan
    }

    pub fn limits(&self) -> ZoomLimits {
        self.limits
    }

    pub fn set_size(&mut self, width: f32, height: f32) {
        self.size = (width.max(0.0), height.max(0.0));
    }

    pub fn pan_to(&mut self, dx: f32, dy: f32) {
        self.pan = (dx, dy);
    }

    /// Change zoom around the viewport centre. Refused while a piece is being
    /// dragged; returns whether the zoom changed.
    pub fn set_zoom(&mut self, level: f32, drag_active: bool) -> bool {
        if drag_active || !level.is_finite() {
            return false;
        }
        let new_zoom = level.clamp(self.limits.min, self.limits.max);
        let old_zoom = self.zoom;
        if (new_zoom - old_zoom).abs() <= f32::EPSILON {
            return false;
        }
        self.pan.0 += self.size.0 * 0.5 * (old_zoom - new_zoom);
        self.pan.1 += self.size.1 * 0.5 * (old_zoom - new_zoom);
        self.zoom = new_zoom;
        true
    }

    pub fn zoom_by_wheel(&mut self, delta: f32, drag_active: bool) -> bool {
        let factor = (delta * self.limits.wheel_rate).exp();
        self.set_zoom(self.zoom * factor, drag_active)
    }

    pub fn screen_to_model(&self, x: f32, y: f32) -> (f32, f32) {
        (x * self.zoom + self.pan.0, y * self.zoom + self.pan.1)
    }

    pub fn visible_rect(&self) -> ViewRect {
        ViewRect {
            min_x: self.pan.0,
            min_y: self.pan.1,
            width: self.size.0 * self.zoom,
            height: self.size.1 * self.zoom,
        }
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(0.0, 0.0, ZoomLimits::default())
    }
}
