use std::cell::RefCell;
use std::rc::Rc;

use squzzle_core::gesture::{Activity, GestureController, GestureEffect, PointerId};
use squzzle_core::grid::{plan_grid, GridConfig, GridCoord, GridPolicy};
use squzzle_core::registry::{ClusterId, PieceRegistry};
use squzzle_core::scatter::pickup_tilt_deg;
use squzzle_core::snap::{snap_dropped, SnapReport};
use squzzle_core::victory::VictoryDetector;
use squzzle_core::viewport::Viewport;

use crate::config::PuzzleSettings;
use crate::input::{InputEvent, InputEventKind, WheelEvent};
use crate::surface::{NullSurface, PieceSurface};

pub type VictorySubscriber = Rc<dyn Fn()>;

/// One puzzle on one canvas. Owns the engine state and the surface that
/// mirrors it; every handler leaves both consistent before returning.
pub struct Session<S: PieceSurface = NullSurface> {
    settings: PuzzleSettings,
    registry: PieceRegistry,
    viewport: Viewport,
    gestures: GestureController,
    victory: VictoryDetector,
    surface: S,
    subscribers: Rc<RefCell<Vec<VictorySubscriber>>>,
    pickups: u32,
    merges: usize,
    last_snap: Option<SnapReport>,
}

impl Session<NullSurface> {
    pub fn headless(settings: PuzzleSettings, viewport_width: f32, viewport_height: f32) -> Self {
        Self::new(settings, viewport_width, viewport_height, NullSurface)
    }
}

impl<S: PieceSurface> Session<S> {
    pub fn new(settings: PuzzleSettings, viewport_width: f32, viewport_height: f32, surface: S) -> Self {
        let viewport = Viewport::new(viewport_width, viewport_height, settings.zoom_limits());
        let config = GridConfig::unplanned(settings.policy, settings.grid_limits());
        Self {
            settings,
            registry: PieceRegistry::new(config),
            viewport,
            gestures: GestureController::new(),
            victory: VictoryDetector::new(),
            surface,
            subscribers: Rc::new(RefCell::new(Vec::new())),
            pickups: 0,
            merges: 0,
            last_snap: None,
        }
    }

    pub fn settings(&self) -> &PuzzleSettings {
        &self.settings
    }

    pub fn config(&self) -> &GridConfig {
        self.registry.config()
    }

    pub fn registry(&self) -> &PieceRegistry {
        &self.registry
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn gestures(&self) -> &GestureController {
        &self.gestures
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    pub fn merge_count(&self) -> usize {
        self.merges
    }

    pub fn last_snap(&self) -> Option<&SnapReport> {
        self.last_snap.as_ref()
    }

    pub fn is_solved(&self) -> bool {
        self.registry.is_solved()
    }

    pub fn subscribe_victory(&self, subscriber: VictorySubscriber) -> VictorySubscription {
        self.subscribers.borrow_mut().push(subscriber.clone());
        VictorySubscription {
            subscriber,
            subscribers: Rc::clone(&self.subscribers),
        }
    }

    /// Plan the grid, build every piece in its own cluster and scatter them.
    pub fn setup_puzzle(&mut self, image_width: u32, image_height: u32, policy: GridPolicy) -> GridConfig {
        let config = plan_grid(image_width, image_height, policy, self.settings.grid_limits());
        self.registry = PieceRegistry::populate(config);
        self.registry.scatter(self.settings.seed);
        self.gestures.reset();
        self.victory.reset();
        self.pickups = 0;
        self.merges = 0;
        self.last_snap = None;

        self.surface.reset(&config);
        for id in self.registry.order().to_vec() {
            let Some(cluster) = self.registry.cluster(id) else {
                continue;
            };
            let translate = cluster.translate;
            let members = cluster.members.clone();
            self.surface.create_group(id);
            for coord in members {
                if let Some(piece) = self.registry.piece(coord) {
                    self.surface.create_shape(id, coord, &piece.outline, piece.local);
                }
            }
            self.surface.set_group_transform(id, translate);
        }
        log::info!(
            "puzzle ready: {} for a {}x{} image",
            config.label(),
            image_width,
            image_height
        );
        self.check_victory();
        config
    }

    pub fn set_viewport_size(&mut self, width: f32, height: f32) {
        self.viewport.set_size(width, height);
    }

    pub fn pan_to(&mut self, dx: f32, dy: f32) {
        self.viewport.pan_to(dx, dy);
    }

    pub fn set_zoom(&mut self, level: f32) -> bool {
        let changed = self.viewport.set_zoom(level, self.gestures.any_drag_active());
        self.zoomed(changed)
    }

    /// Press at a screen point. Hits the topmost piece under it, otherwise the
    /// background. With `shift` held a hit cluster goes to the back instead of
    /// being picked up.
    pub fn on_pointer_down(&mut self, pointer: PointerId, x: f32, y: f32, shift: bool) {
        let (mx, my) = self.viewport.screen_to_model(x, y);
        match self.registry.piece_at(mx, my) {
            Some(piece) if shift => self.send_to_back(piece),
            Some(piece) => self.on_pointer_down_on(pointer, x, y, piece),
            None => {
                let effects = self.gestures.press_background(pointer, (x, y), &self.viewport);
                self.apply(effects);
            }
        }
    }

    /// Press when the caller already knows which piece was hit.
    pub fn on_pointer_down_on(&mut self, pointer: PointerId, x: f32, y: f32, piece: GridCoord) {
        // Finish the pointer's current drag first; its drop may merge clusters.
        let dragging = matches!(
            self.gestures.activity(pointer),
            Some(Activity::Dragging { .. })
        );
        if dragging {
            self.on_pointer_up(pointer);
        }
        let Some(cluster) = self.registry.cluster_of_piece(piece) else {
            return;
        };
        let (id, translate) = (cluster.id, cluster.translate);
        let effects = self
            .gestures
            .press_piece(pointer, (x, y), id, translate, &self.viewport);
        self.apply(effects);
    }

    pub fn on_pointer_move(&mut self, pointer: PointerId, x: f32, y: f32) {
        let effects = self.gestures.pointer_move(pointer, (x, y), &self.viewport);
        self.apply(effects);
    }

    pub fn on_pointer_up(&mut self, pointer: PointerId) {
        let effects = self.gestures.release(pointer, &self.viewport);
        self.apply(effects);
    }

    pub fn on_wheel(&mut self, wheel: WheelEvent) -> bool {
        let changed = self
            .viewport
            .zoom_by_wheel(wheel.delta_y, self.gestures.any_drag_active());
        self.zoomed(changed)
    }

    /// Single entry point for normalized pointer input.
    pub fn dispatch(&mut self, event: InputEvent) {
        match event.kind {
            InputEventKind::Down => {
                self.on_pointer_down(event.pointer, event.view_x, event.view_y, event.modifiers.shift)
            }
            InputEventKind::Move => self.on_pointer_move(event.pointer, event.view_x, event.view_y),
            InputEventKind::Up | InputEventKind::Cancel => self.on_pointer_up(event.pointer),
        }
    }

    fn send_to_back(&mut self, piece: GridCoord) {
        let Some(id) = self.registry.current_cluster(piece) else {
            return;
        };
        if self.gestures.is_held(id) {
            return;
        }
        if self.registry.send_to_back(id) {
            self.surface.lower_group(id);
        }
    }

    fn apply(&mut self, effects: Vec<GestureEffect>) {
        for effect in effects {
            match effect {
                GestureEffect::PickedUp { pointer, cluster } => self.pick_up(pointer, cluster),
                GestureEffect::Moved { cluster, translate } => {
                    self.registry.set_translate(cluster, translate);
                    self.surface.set_group_transform(cluster, translate);
                }
                GestureEffect::Dropped { pointer, cluster } => self.drop_cluster(pointer, cluster),
                GestureEffect::Panned { pan } => self.viewport.pan_to(pan.0, pan.1),
                GestureEffect::Zoomed { level } => {
                    let changed = self.viewport.set_zoom(level, self.gestures.any_drag_active());
                    self.zoomed(changed);
                }
            }
        }
    }

    // Running pans hold a pan snapshot from before the zoom; move them onto
    // the new one.
    fn zoomed(&mut self, changed: bool) -> bool {
        if changed {
            self.gestures.rebase_pans(&self.viewport);
        }
        changed
    }

    fn pick_up(&mut self, pointer: PointerId, cluster: ClusterId) {
        log::debug!("{} picked up {}", pointer, cluster);
        if self.registry.raise(cluster) {
            self.surface.raise_group(cluster);
        }
        if self.settings.wobble {
            self.pickups = self.pickups.wrapping_add(1);
            let tilt = pickup_tilt_deg(self.settings.seed, cluster, self.pickups);
            self.surface.set_group_tilt(cluster, tilt);
        }
    }

    fn drop_cluster(&mut self, pointer: PointerId, cluster: ClusterId) {
        log::debug!("{} dropped {}", pointer, cluster);
        if self.settings.wobble {
            self.surface.set_group_tilt(cluster, 0.0);
        }
        let gestures = &self.gestures;
        let report = snap_dropped(&mut self.registry, cluster, |id| gestures.is_held(id));
        for merge in &report.merges {
            let Some(target) = self.registry.cluster(merge.target) else {
                continue;
            };
            let translate = target.translate;
            for coord in &merge.moved {
                self.surface.reparent(*coord, merge.source, merge.target);
            }
            self.surface.remove_group(merge.source);
            self.surface.set_group_transform(merge.target, translate);
        }
        self.merges += report.merges.len();
        self.last_snap = Some(report);
        self.check_victory();
    }

    fn check_victory(&mut self) {
        if !self.victory.check(&self.registry) {
            return;
        }
        self.surface.show_solved();
        let subscribers = self.subscribers.borrow().clone();
        for subscriber in subscribers {
            (subscriber)();
        }
    }
}

/// Keeps a victory callback registered; dropping it unsubscribes.
pub struct VictorySubscription {
    subscriber: VictorySubscriber,
    subscribers: Rc<RefCell<Vec<VictorySubscriber>>>,
}

impl Drop for VictorySubscription {
    fn drop(&mut self) {
        let mut subscribers = self.subscribers.borrow_mut();
        subscribers.retain(|item| !Rc::ptr_eq(item, &self.subscriber));
    }
}
