use crate::grid::{GridConfig, GridCoord};

pub const DIR_UP: usize = 0;
pub const DIR_RIGHT: usize = 1;
pub const DIR_DOWN: usize = 2;
pub const DIR_LEFT: usize = 3;
pub const DIRS: [usize; 4] = [DIR_UP, DIR_RIGHT, DIR_DOWN, DIR_LEFT];

/// Connector states ordered top, right, bottom, left.
///
/// `1` is a socket the neighbor's tab slides into, `-1` is a tab protruding
/// out of the piece and `0` is a flat outer edge.
pub type Nubs = [i8; 4];

pub const SOCKET: i8 = 1;
pub const TAB: i8 = -1;
pub const FLAT: i8 = 0;

pub fn opposite_dir(dir: usize) -> usize {
    (dir + 2) % 4
}

/// Grid step `(d_column, d_row)` for a side.
pub fn dir_step(dir: usize) -> (i32, i32) {
    match dir % 4 {
        DIR_UP => (0, -1),
        DIR_RIGHT => (1, 0),
        DIR_DOWN => (0, 1),
        _ => (-1, 0),
    }
}

/// Turn a grid step a quarter clockwise (screen y points down).
pub fn rotate_step_clockwise(step: (i32, i32)) -> (i32, i32) {
    (-step.1, step.0)
}

fn alternate(parity: u32) -> i8 {
    ((parity % 2) as i8) * 2 - 1
}

pub fn nubs_for(row: u32, column: u32, rows: u32, columns: u32) -> Nubs {
    let mut nubs = [FLAT; 4];
    let vertical = alternate(row + column);
    let horizontal = alternate(row + column + 1);
    if row > 0 {
        nubs[DIR_UP] = vertical;
    }
    if column + 1 < columns {
        nubs[DIR_RIGHT] = horizontal;
    }
    if row + 1 < rows {
        nubs[DIR_DOWN] = vertical;
    }
    if column > 0 {
        nubs[DIR_LEFT] = horizontal;
    }
    nubs
}

pub fn nubs_at(coord: GridCoord, config: &GridConfig) -> Nubs {
    nubs_for(coord.row, coord.column, config.rows, config.columns)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn corner_pieces_are_flat_on_the_outside() {
        assert_eq!(nubs_for(0, 0, 3, 3), [FLAT, SOCKET, TAB, FLAT]);
        assert_eq!(nubs_for(2, 2, 3, 3), [TAB, FLAT, FLAT, SOCKET]);
    }

    #[test]
    fn single_piece_has_no_connectors() {
        assert_eq!(nubs_for(0, 0, 1, 1), [FLAT; 4]);
    }

    #[test]
    fn clockwise_rotation_visits_every_side() {
        let mut step = dir_step(DIR_UP);
        for dir in DIRS {
            assert_eq!(step, dir_step(dir));
            step = rotate_step_clockwise(step);
        }
        assert_eq!(step, dir_step(DIR_UP));
    }
}
