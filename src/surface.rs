use squzzle_core::grid::{GridConfig, GridCoord};
use squzzle_core::outline::Outline;
use squzzle_core::registry::{Affine, ClusterId};

/// Where pieces get drawn. The session updates the registry first and then
/// tells the surface, so a surface never has to answer questions about state.
pub trait PieceSurface {
    /// Drop everything drawn so far and prepare for a new board.
    fn reset(&mut self, config: &GridConfig);
    fn create_group(&mut self, group: ClusterId);
    fn create_shape(&mut self, group: ClusterId, piece: GridCoord, outline: &Outline, local: Affine);
    fn set_group_transform(&mut self, group: ClusterId, translate: (f32, f32));
    fn reparent(&mut self, piece: GridCoord, from: ClusterId, to: ClusterId);
    fn remove_group(&mut self, group: ClusterId);
    fn raise_group(&mut self, group: ClusterId);
    fn lower_group(&mut self, group: ClusterId);
    /// Cosmetic rotation about the group's centre, in degrees. Zero
    /// straightens it again.
    fn set_group_tilt(&mut self, group: ClusterId, degrees: f32);
    fn show_solved(&mut self);
}

/// Surface that draws nothing.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullSurface;

impl PieceSurface for NullSurface {
    fn reset(&mut self, _config: &GridConfig) {}
    fn create_group(&mut self, _group: ClusterId) {}
    fn create_shape(&mut self, _group: ClusterId, _piece: GridCoord, _outline: &Outline, _local: Affine) {}
    fn set_group_transform(&mut self, _group: ClusterId, _translate: (f32, f32)) {}
    fn reparent(&mut self, _piece: GridCoord, _from: ClusterId, _to: ClusterId) {}
    fn remove_group(&mut self, _group: ClusterId) {}
    fn raise_group(&mut self, _group: ClusterId) {}
    fn lower_group(&mut self, _group: ClusterId) {}
    fn set_group_tilt(&mut self, _group: ClusterId, _degrees: f32) {}
    fn show_solved(&mut self) {}
}
