use crate::grid::GridCoord;
use crate::registry::{ClusterId, PieceRegistry};

pub const SCATTER_SEED: u32 = 0x5EED_2520;
pub const PICKUP_TILT_MAX_RAD: f32 = 0.1;

pub fn splitmix32(mut value: u32) -> u32 {
    value = value.wrapping_add(0x9E37_79B9);
    let mut z = value;
    z = (z ^ (z >> 16)).wrapping_mul(0x85EB_CA6B);
    z = (z ^ (z >> 13)).wrapping_mul(0xC2B2_AE35);
    z ^ (z >> 16)
}

pub fn rand_unit(seed: u32, salt: u32) -> f32 {
    let mixed = splitmix32(seed ^ splitmix32(salt));
    let top = mixed >> 8;
    top as f32 / ((1u32 << 24) as f32)
}

pub fn rand_range(seed: u32, salt: u32, min: f32, max: f32) -> f32 {
    min + (max - min) * rand_unit(seed, salt)
}

impl PieceRegistry {
    /// Drop every singleton cluster at a random spot over the image area.
    /// The same seed always produces the same board.
    pub fn scatter(&mut self, seed: u32) {
        let width = self.config.image_width as f32;
        let height = self.config.image_height as f32;
        let columns = self.config.columns;
        let rows = self.config.rows;
        for row in 0..rows {
            for column in 0..columns {
                let coord = GridCoord::new(row, column);
                let salt = (row * columns + column) << 1;
                let x = rand_range(seed, salt, 0.0, width);
                let y = rand_range(seed, salt + 1, 0.0, height);
                self.place_piece(coord, (x, y));
            }
        }
        log::debug!("scattered {} pieces with seed {:#x}", self.len(), seed);
    }
}

/// Cosmetic tilt for a picked-up cluster, in degrees.
pub fn pickup_tilt_deg(seed: u32, cluster: ClusterId, pickup: u32) -> f32 {
    let salt = 0x7117_0000 ^ cluster.0.wrapping_mul(0x9E37_79B9) ^ pickup;
    rand_range(seed, salt, -PICKUP_TILT_MAX_RAD, PICKUP_TILT_MAX_RAD).to_degrees()
}
