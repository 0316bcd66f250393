use proptest::prelude::*;
use squzzle_core::grid::{plan_grid, GridCoord, GridLimits, GridPolicy};

fn fixed(difficulty: f32) -> GridPolicy {
    GridPolicy::FixedMultiplier { difficulty }
}

#[test]
fn default_policy_follows_the_aspect_ratio() {
    let config = plan_grid(800, 400, GridPolicy::default(), GridLimits::default());
    assert_eq!((config.columns, config.rows), (4, 2));
    assert_eq!((config.piece_width, config.piece_height), (200.0, 200.0));
    assert_eq!(config.label(), "8 pieces (4x2)");
    assert!((config.nub_width - 200.0 / 3.0).abs() < 1e-4);
    assert_eq!(config.snap_threshold, 20.0);
}

#[test]
fn fractional_columns_round_down() {
    let config = plan_grid(800, 600, fixed(2.0), GridLimits::default());
    assert_eq!((config.columns, config.rows), (2, 2));
    assert_eq!((config.piece_width, config.piece_height), (400.0, 300.0));
}

#[test]
fn minimum_piece_size_caps_the_grid() {
    let config = plan_grid(120, 100, fixed(10.0), GridLimits::default());
    assert_eq!((config.columns, config.rows), (2, 2));
    assert_eq!((config.piece_width, config.piece_height), (60.0, 50.0));
    assert!(!config.is_degenerate());
}

#[test]
fn tiny_image_collapses_to_one_piece() {
    let config = plan_grid(30, 20, fixed(2.0), GridLimits::default());
    assert_eq!((config.columns, config.rows), (1, 1));
    assert_eq!((config.piece_width, config.piece_height), (30.0, 20.0));
    assert!(config.is_degenerate());

    let empty = plan_grid(0, 0, fixed(2.0), GridLimits::default());
    assert_eq!(empty.piece_count(), 1);
}

#[test]
fn fractional_minimum_is_met_by_whole_pixel_pieces() {
    let limits = GridLimits {
        min_piece_width: 50.5,
        ..GridLimits::default()
    };
    let config = plan_grid(101, 101, fixed(2.0), limits);
    assert_eq!((config.columns, config.rows), (2, 2));
    assert_eq!(config.piece_width, 50.0);
    assert!(!config.is_degenerate());
}

#[test]
fn area_target_picks_a_piece_size() {
    let config = plan_grid(
        600,
        400,
        GridPolicy::AreaTarget { pieces: 24 },
        GridLimits::default(),
    );
    assert_eq!((config.columns, config.rows), (4, 4));
    assert_eq!((config.piece_width, config.piece_height), (150.0, 100.0));
}

#[test]
fn custom_limits_are_carried_into_the_config() {
    let limits = GridLimits {
        min_piece_width: 10.0,
        min_piece_height: 10.0,
        snap_threshold: 5.0,
    };
    let config = plan_grid(100, 100, fixed(4.0), limits);
    assert_eq!((config.columns, config.rows), (4, 4));
    assert_eq!(config.piece_width, 25.0);
    assert_eq!(config.snap_threshold, 5.0);
}

#[test]
fn coord_offsets_stay_inside_the_grid() {
    let config = plan_grid(800, 400, GridPolicy::default(), GridLimits::default());
    let corner = GridCoord::new(0, 3);
    assert_eq!(corner.offset(0, 1, &config), Some(GridCoord::new(1, 3)));
    assert_eq!(corner.offset(1, 0, &config), None);
    assert_eq!(corner.offset(0, -1, &config), None);
    assert_eq!(corner.to_string(), "R0C3");
}

proptest! {
    #[test]
    fn planned_grids_respect_the_minimum(
        width in 1u32..4000,
        height in 1u32..4000,
        difficulty in 1.0f32..12.0,
    ) {
        let limits = GridLimits::default();
        let config = plan_grid(width, height, fixed(difficulty), limits);
        prop_assert!(config.rows >= 1);
        prop_assert!(config.columns >= 1);
        prop_assert!(config.rows <= difficulty.floor() as u32);
        if width >= 50 && height >= 50 {
            prop_assert!(!config.is_degenerate());
            prop_assert!(config.piece_width >= limits.min_piece_width);
            prop_assert!(config.piece_height >= limits.min_piece_height);
        }
        prop_assert!(config.board_size().0 <= width as f32);
        prop_assert!(config.board_size().1 <= height as f32);
    }
}
