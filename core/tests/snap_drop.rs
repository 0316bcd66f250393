use squzzle_core::grid::{plan_grid, GridCoord, GridLimits, GridPolicy};
use squzzle_core::registry::{ClusterId, PieceRegistry};
use squzzle_core::snap::{snap_dropped, BaseBox};

// 2x2 board with 100px pieces and a 20px snap threshold.
fn board() -> PieceRegistry {
    let config = plan_grid(200, 200, GridPolicy::default(), GridLimits::default());
    assert_eq!(config.piece_width, 100.0);
    assert_eq!(config.snap_threshold, 20.0);
    let mut registry = PieceRegistry::populate(config);
    registry.place_piece(GridCoord::new(0, 0), (0.0, 0.0));
    registry.place_piece(GridCoord::new(0, 1), (1000.0, 0.0));
    registry.place_piece(GridCoord::new(1, 0), (0.0, 1000.0));
    registry.place_piece(GridCoord::new(1, 1), (1000.0, 1000.0));
    registry
}

fn nobody_holds(_: ClusterId) -> bool {
    false
}

#[test]
fn near_drop_snaps_onto_the_left_neighbor() {
    let mut registry = board();
    let piece = GridCoord::new(0, 1);
    registry.place_piece(piece, (98.0, 2.0));
    let dropped = registry.current_cluster(piece).unwrap();

    let report = snap_dropped(&mut registry, dropped, nobody_holds);
    assert!(report.merged());
    assert_eq!(report.merges.len(), 1);
    assert!(!report.solved);
    let joined = registry.cluster_of_piece(piece).unwrap();
    assert_eq!(joined.members.len(), 2);
    assert_eq!(Some(joined.id), registry.current_cluster(GridCoord::new(0, 0)));
    assert_eq!(report.final_cluster(), Some(joined.id));
    // Pieces line up exactly once joined.
    assert_eq!(registry.piece_position(piece), Some((100.0, 0.0)));
    assert_eq!(registry.cluster_count(), 3);
}

#[test]
fn far_drop_leaves_everything_alone() {
    let mut registry = board();
    let piece = GridCoord::new(0, 1);
    registry.place_piece(piece, (150.0, 2.0));
    let dropped = registry.current_cluster(piece).unwrap();

    let report = snap_dropped(&mut registry, dropped, nobody_holds);
    assert!(!report.merged());
    assert_eq!(report.final_cluster(), None);
    assert_eq!(registry.cluster_count(), 4);
    assert_eq!(registry.piece_position(piece), Some((150.0, 2.0)));
}

#[test]
fn held_neighbors_are_not_snapped_onto() {
    let mut registry = board();
    let piece = GridCoord::new(0, 1);
    registry.place_piece(piece, (98.0, 2.0));
    let dropped = registry.current_cluster(piece).unwrap();
    let held = registry.current_cluster(GridCoord::new(0, 0)).unwrap();

    let report = snap_dropped(&mut registry, dropped, |id| id == held);
    assert!(!report.merged());
    assert_eq!(registry.cluster_count(), 4);
}

#[test]
fn one_drop_can_join_several_neighbors_and_solve() {
    let mut registry = board();
    // Build the left column and the bottom-right piece in place, then drop
    // the top-right piece into the gap.
    registry.place_piece(GridCoord::new(1, 0), (0.0, 100.0));
    registry.place_piece(GridCoord::new(1, 1), (100.0, 100.0));
    let left = registry.current_cluster(GridCoord::new(0, 0)).unwrap();
    registry.merge(left, GridCoord::new(1, 0)).unwrap();

    let piece = GridCoord::new(0, 1);
    registry.place_piece(piece, (103.0, -4.0));
    let dropped = registry.current_cluster(piece).unwrap();
    let report = snap_dropped(&mut registry, dropped, nobody_holds);

    // Down first (bottom-right), then left.
    assert_eq!(report.merges.len(), 2);
    assert_eq!(report.merges[0].source, dropped);
    assert!(report.solved);
    assert!(registry.is_solved());
    assert!(registry.check_partition());
}

#[test]
fn dropping_a_merged_cluster_never_splits_it() {
    let mut registry = board();
    let top_left = GridCoord::new(0, 0);
    let top_right = GridCoord::new(0, 1);
    registry.place_piece(top_right, (100.0, 0.0));
    let id = registry.current_cluster(top_left).unwrap();
    registry.merge(id, top_right).unwrap();

    registry.place_piece(top_left, (600.0, 600.0));
    let report = snap_dropped(&mut registry, id, nobody_holds);
    assert!(!report.merged());
    assert!(registry.same_cluster(top_left, top_right));
    assert_eq!(registry.piece_position(top_right), Some((700.0, 600.0)));
}

#[test]
fn base_box_ignores_connectors() {
    let registry = board();
    let config = *registry.config();
    let base = BaseBox::new(&config, GridCoord::new(1, 1), (-100.0, -100.0));
    assert!((base.x1 - config.nub_width).abs() < 1e-4);
    assert!((base.x2 - base.x1 - 100.0).abs() < 1e-4);
    assert_eq!(base.midpoint(1), (base.x2, (base.y1 + base.y2) * 0.5));
}
