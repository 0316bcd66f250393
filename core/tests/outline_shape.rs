use proptest::prelude::*;
use squzzle_core::grid::{plan_grid, GridCoord, GridLimits, GridPolicy};
use squzzle_core::nubs::{nubs_for, DIR_DOWN, DIR_LEFT, DIR_RIGHT, DIR_UP};
use squzzle_core::outline::{texture_window, Outline, PathCommand};

fn close(a: f32, b: f32) -> bool {
    (a - b).abs() < 1e-3
}

#[test]
fn outline_starts_at_the_nub_inset() {
    let config = plan_grid(300, 300, GridPolicy::FixedMultiplier { difficulty: 3.0 }, GridLimits::default());
    let outline = Outline::for_piece(&config, GridCoord::new(1, 1));
    assert_eq!(outline.start(), (config.nub_width, config.nub_height));
    assert_eq!(outline.commands.last(), Some(&PathCommand::Close));
    assert!(outline.to_svg_path().starts_with("M 33.333,33.333 l "));
    assert!(outline.to_svg_path().ends_with(" z"));
}

#[test]
fn connector_sides_use_the_full_template() {
    let outline = Outline::build(10.0, 10.0, [-1, 1, 0, 0], (40.0, 40.0));
    // move + 8 + 8 + 1 + 1 + close
    assert_eq!(outline.commands.len(), 20);
    let curves = outline
        .commands
        .iter()
        .filter(|command| matches!(command, PathCommand::CurveBy { .. }))
        .count();
    assert_eq!(curves, 12);
    assert!(outline.is_closed());
}

#[test]
fn large_pieces_still_close() {
    let (pw, ph) = (5000.0f32, 3700.0f32);
    let outline = Outline::build(pw / 12.0, ph / 12.0, [-1, 1, -1, 1], (pw / 3.0, ph / 3.0));
    assert!(outline.is_closed());
}

#[test]
fn a_top_tab_reaches_the_edge_of_the_inset() {
    let (pw, ph) = (120.0, 90.0);
    let outline = Outline::build(pw / 12.0, ph / 12.0, [-1, 0, 0, 0], (pw / 3.0, ph / 3.0));
    let (min_x, min_y, max_x, max_y) = outline.bounds();
    assert!(close(min_y, 0.0), "min_y {min_y}");
    assert!(close(min_x, pw / 3.0));
    assert!(close(max_x, pw / 3.0 + pw));
    assert!(close(max_y, ph / 3.0 + ph));
}

#[test]
fn a_right_socket_bends_into_the_piece() {
    let outline = Outline::build(10.0, 10.0, [0, 1, 0, 0], (0.0, 0.0));
    let (_, _, max_x, _) = outline.bounds();
    assert!(close(max_x, 120.0));
    let deepest = outline
        .vertices()
        .into_iter()
        .filter(|(_, y)| *y > 0.0 && *y < 120.0)
        .map(|(x, _)| x)
        .fold(f32::INFINITY, f32::min);
    assert!(close(deepest, 80.0), "deepest {deepest}");
}

#[test]
fn texture_window_covers_protruding_tabs() {
    let config = plan_grid(300, 300, GridPolicy::FixedMultiplier { difficulty: 3.0 }, GridLimits::default());
    let coord = GridCoord::new(1, 1);
    let nubs = nubs_for(1, 1, 3, 3);
    let window = texture_window(&config, coord);
    let tabs = nubs.iter().filter(|nub| **nub < 0).count() as f32;
    let extra = window.width + window.height - config.piece_width - config.piece_height;
    assert!(close(extra, tabs * config.nub_width));
    assert_eq!(window.image_width, 300.0);
}

proptest! {
    #[test]
    fn every_connector_combination_closes(
        top in -1i8..=1,
        right in -1i8..=1,
        bottom in -1i8..=1,
        left in -1i8..=1,
        pw in 20.0f32..6000.0,
        ph in 20.0f32..6000.0,
    ) {
        let outline = Outline::build(pw / 12.0, ph / 12.0, [top, right, bottom, left], (pw / 3.0, ph / 3.0));
        prop_assert!(outline.is_closed());
        let (sx, sy) = outline.start();
        let (ex, ey) = outline.end_point();
        prop_assert!((sx - ex).abs() < 1e-3 * pw);
        prop_assert!((sy - ey).abs() < 1e-3 * ph);
    }

    #[test]
    fn neighbors_always_interlock(rows in 1u32..12, columns in 1u32..12) {
        for row in 0..rows {
            for column in 0..columns {
                let nubs = nubs_for(row, column, rows, columns);
                prop_assert_eq!(nubs[DIR_UP] == 0, row == 0);
                prop_assert_eq!(nubs[DIR_LEFT] == 0, column == 0);
                prop_assert_eq!(nubs[DIR_DOWN] == 0, row + 1 == rows);
                prop_assert_eq!(nubs[DIR_RIGHT] == 0, column + 1 == columns);
                if row + 1 < rows {
                    let below = nubs_for(row + 1, column, rows, columns);
                    prop_assert_eq!(nubs[DIR_DOWN], -below[DIR_UP]);
                }
                if column + 1 < columns {
                    let beside = nubs_for(row, column + 1, rows, columns);
                    prop_assert_eq!(nubs[DIR_RIGHT], -beside[DIR_LEFT]);
                }
            }
        }
    }
}
