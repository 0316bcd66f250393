use crate::registry::PieceRegistry;

/// Fires once per puzzle, the first time the registry is solved.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct VictoryDetector {
    fired: bool,
}

impl VictoryDetector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true exactly on the check that first sees a solved registry.
    pub fn check(&mut self, registry: &PieceRegistry) -> bool {
        if self.fired || !registry.is_solved() {
            return false;
        }
        self.fired = true;
        log::info!(
            "puzzle solved: {} pieces in one cluster",
            registry.config().piece_count()
        );
        true
    }

    pub fn has_fired(&self) -> bool {
        self.fired
    }

    pub fn reset(&mut self) {
        self.fired = false;
    }
}
