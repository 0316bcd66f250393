pub use squzzle_core::gesture::PointerId;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PointerKind {
    Mouse,
    Touch,
    Pen,
    Unknown,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InputEventKind {
    Down,
    Move,
    Up,
    Cancel,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct InputModifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
    pub meta: bool,
}

/// One normalized pointer sample in viewport (screen) coordinates.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct InputEvent {
    pub kind: InputEventKind,
    pub pointer: PointerId,
    pub pointer_kind: PointerKind,
    pub view_x: f32,
    pub view_y: f32,
    pub modifiers: InputModifiers,
}

impl InputEvent {
    pub fn mouse(kind: InputEventKind, view_x: f32, view_y: f32) -> Self {
        Self {
            kind,
            pointer: PointerId::MOUSE,
            pointer_kind: PointerKind::Mouse,
            view_x,
            view_y,
            modifiers: InputModifiers::default(),
        }
    }

    pub fn touch(kind: InputEventKind, id: i32, view_x: f32, view_y: f32) -> Self {
        Self {
            kind,
            pointer: PointerId(id),
            pointer_kind: PointerKind::Touch,
            view_x,
            view_y,
            modifiers: InputModifiers::default(),
        }
    }

    pub fn with_shift(mut self) -> Self {
        self.modifiers.shift = true;
        self
    }
}

/// Mouse wheel or trackpad scroll. Positive `delta_y` zooms out.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WheelEvent {
    pub delta_y: f32,
}

impl WheelEvent {
    pub fn new(delta_y: f32) -> Self {
        Self { delta_y }
    }
}
