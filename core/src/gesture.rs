//! Pointer gesture state machine: turns pointer presses, moves and releases
//! into cluster drags, canvas pans and pinch zooms.
//!
//! [`GestureController`] keeps one entry per active pointer and never touches
//! the registry or viewport itself. Each handler returns the
//! [`GestureEffect`]s the caller applies, in order.
//!
//! # State Machine
//!
//! Per pointer:
//!
//! - `Idle -> Panning` on a background press.
//! - `Idle -> Dragging(C)` on a piece press.
//! - `Panning | Dragging -> Idle` only on release of that same pointer.
//!
//! While exactly two pointers are panning they form a pinch: their distance
//! ratio drives the zoom and neither of them pans on its own.
//!
//! # Invariants
//!
//! 1. A pointer maps to at most one activity.
//! 2. A cluster is dragged by at most one pointer.
//! 3. Releasing one pointer never changes another pointer's activity.
//! 4. A drag never changes the offset between the pointer and the cluster it
//!    holds.
//!
//! # Refused input
//!
//! - A background press on a pointer that is dragging returns no effects.
//! - A piece press on a cluster held by a different pointer returns no effects.
//! - Moves and releases of unknown pointers return no effects.

use std::collections::HashMap;

use crate::registry::ClusterId;
use crate::snap::distance;
use crate::viewport::Viewport;

/// Stable handle for one contact. Touches carry the platform's id; the mouse
/// uses [`PointerId::MOUSE`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PointerId(pub i32);

impl PointerId {
    pub const MOUSE: PointerId = PointerId(-1);
}

impl std::fmt::Display for PointerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if *self == Self::MOUSE {
            write!(f, "mouse")
        } else {
            write!(f, "touch#{}", self.0)
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Activity {
    Panning {
        start_screen: (f32, f32),
        start_pan: (f32, f32),
        last_screen: (f32, f32),
    },
    Dragging {
        cluster: ClusterId,
        /// Pointer model position minus cluster translate at pickup.
        offset: (f32, f32),
    },
}

#[derive(Clone, Copy, Debug, PartialEq)]
struct Pinch {
    a: PointerId,
    b: PointerId,
    start_distance: f32,
    start_zoom: f32,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum GestureEffect {
    PickedUp {
        pointer: PointerId,
        cluster: ClusterId,
    },
    Moved {
        cluster: ClusterId,
        translate: (f32, f32),
    },
    Dropped {
        pointer: PointerId,
        cluster: ClusterId,
    },
    Panned {
        pan: (f32, f32),
    },
    Zoomed {
        level: f32,
    },
}

#[derive(Debug, Default)]
pub struct GestureController {
    active: HashMap<PointerId, Activity>,
    pinch: Option<Pinch>,
}

impl GestureController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn activity(&self, pointer: PointerId) -> Option<&Activity> {
        self.active.get(&pointer)
    }

    pub fn active_pointers(&self) -> usize {
        self.active.len()
    }

    pub fn holder(&self, cluster: ClusterId) -> Option<PointerId> {
        self.active.iter().find_map(|(pointer, activity)| match activity {
            Activity::Dragging { cluster: held, .. } if *held == cluster => Some(*pointer),
            _ => None,
        })
    }

    pub fn is_held(&self, cluster: ClusterId) -> bool {
        self.holder(cluster).is_some()
    }

    pub fn any_drag_active(&self) -> bool {
        self.active
            .values()
            .any(|activity| matches!(activity, Activity::Dragging { .. }))
    }

    pub fn is_pinching(&self) -> bool {
        self.pinch.is_some()
    }

    /// Press on a piece of `cluster`, whose translate is currently `translate`.
    ///
    /// A drag already running on `pointer` is dropped first. That drop may
    /// merge clusters once applied, so callers that snap on drop release the
    /// pointer and resolve `cluster` afterwards.
    pub fn press_piece(
        &mut self,
        pointer: PointerId,
        screen: (f32, f32),
        cluster: ClusterId,
        translate: (f32, f32),
        view: &Viewport,
    ) -> Vec<GestureEffect> {
        if let Some(holder) = self.holder(cluster) {
            if holder != pointer {
                log::debug!("{} ignored: {} already held by {}", pointer, cluster, holder);
                return Vec::new();
            }
        }
        let mut effects = self.release(pointer, view);
        let model = view.screen_to_model(screen.0, screen.1);
        self.active.insert(
            pointer,
            Activity::Dragging {
                cluster,
                offset: (model.0 - translate.0, model.1 - translate.1),
            },
        );
        effects.push(GestureEffect::PickedUp { pointer, cluster });
        effects
    }

    pub fn press_background(
        &mut self,
        pointer: PointerId,
        screen: (f32, f32),
        view: &Viewport,
    ) -> Vec<GestureEffect> {
        if let Some(Activity::Dragging { .. }) = self.active.get(&pointer) {
            return Vec::new();
        }
        self.active.insert(
            pointer,
            Activity::Panning {
                start_screen: screen,
                start_pan: view.pan(),
                last_screen: screen,
            },
        );
        if self.pinch.is_none() {
            self.try_start_pinch(view);
        }
        Vec::new()
    }

    pub fn pointer_move(
        &mut self,
        pointer: PointerId,
        screen: (f32, f32),
        view: &Viewport,
    ) -> Vec<GestureEffect> {
        let Some(activity) = self.active.get_mut(&pointer) else {
            return Vec::new();
        };
        match activity {
            Activity::Dragging { cluster, offset } => {
                let model = view.screen_to_model(screen.0, screen.1);
                vec![GestureEffect::Moved {
                    cluster: *cluster,
                    translate: (model.0 - offset.0, model.1 - offset.1),
                }]
            }
            Activity::Panning {
                start_screen,
                start_pan,
                last_screen,
            } => {
                *last_screen = screen;
                let (start_screen, start_pan) = (*start_screen, *start_pan);
                if let Some(pinch) = self.pinch {
                    if pinch.a == pointer || pinch.b == pointer {
                        return self.pinch_zoom(pinch);
                    }
                    return Vec::new();
                }
                let zoom = view.zoom();
                vec![GestureEffect::Panned {
                    pan: (
                        start_pan.0 - (screen.0 - start_screen.0) * zoom,
                        start_pan.1 - (screen.1 - start_screen.1) * zoom,
                    ),
                }]
            }
        }
    }

    /// Release (or cancel) `pointer`. Only that pointer's activity ends.
    pub fn release(&mut self, pointer: PointerId, view: &Viewport) -> Vec<GestureEffect> {
        let Some(activity) = self.active.remove(&pointer) else {
            return Vec::new();
        };
        match activity {
            Activity::Dragging { cluster, .. } => vec![GestureEffect::Dropped { pointer, cluster }],
            Activity::Panning { .. } => {
                if let Some(pinch) = self.pinch {
                    if pinch.a == pointer || pinch.b == pointer {
                        self.pinch = None;
                        self.rebase_pans(view);
                        self.try_start_pinch(view);
                    }
                }
                Vec::new()
            }
        }
    }

    /// Forget every pointer without emitting drops.
    pub fn reset(&mut self) {
        self.active.clear();
        self.pinch = None;
    }

    fn panning_pointers(&self) -> Vec<(PointerId, (f32, f32))> {
        let mut pointers: Vec<_> = self
            .active
            .iter()
            .filter_map(|(pointer, activity)| match activity {
                Activity::Panning { last_screen, .. } => Some((*pointer, *last_screen)),
                Activity::Dragging { .. } => None,
            })
            .collect();
        pointers.sort_by_key(|(pointer, _)| *pointer);
        pointers
    }

    fn try_start_pinch(&mut self, view: &Viewport) {
        let panning = self.panning_pointers();
        let [(a, pa), (b, pb)] = match panning.as_slice() {
            [first, second] => [*first, *second],
            _ => return,
        };
        let start_distance = distance(pa, pb);
        if start_distance <= f32::EPSILON {
            return;
        }
        self.pinch = Some(Pinch {
            a,
            b,
            start_distance,
            start_zoom: view.zoom(),
        });
    }

    fn pinch_zoom(&self, pinch: Pinch) -> Vec<GestureEffect> {
        let screen_of = |pointer: PointerId| match self.active.get(&pointer) {
            Some(Activity::Panning { last_screen, .. }) => Some(*last_screen),
            _ => None,
        };
        let (Some(pa), Some(pb)) = (screen_of(pinch.a), screen_of(pinch.b)) else {
            return Vec::new();
        };
        let current = distance(pa, pb);
        if current <= f32::EPSILON {
            return Vec::new();
        }
        vec![GestureEffect::Zoomed {
            level: pinch.start_zoom * pinch.start_distance / current,
        }]
    }

    /// Restart every pan from where its pointer is now. Call after the view
    /// changes under a running pan (a zoom, or a pinch finger lifting).
    pub fn rebase_pans(&mut self, view: &Viewport) {
        let pan = view.pan();
        for activity in self.active.values_mut() {
            if let Activity::Panning {
                start_screen,
                start_pan,
                last_screen,
            } = activity
            {
                *start_screen = *last_screen;
                *start_pan = pan;
            }
        }
    }
}
