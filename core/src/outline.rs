use std::fmt::Write;

use serde::{Deserialize, Serialize};

use crate::grid::{GridConfig, GridCoord};
use crate::nubs::{nubs_at, Nubs, DIRS};

/// Closing tolerance per unit of outline extent.
pub const CLOSE_EPSILON: f32 = 1.0e-3;

/// One drawing step. Everything after the initial `MoveTo` is relative to the
/// current pen position, like lowercase SVG path commands.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum PathCommand {
    MoveTo {
        x: f32,
        y: f32,
    },
    LineBy {
        dx: f32,
        dy: f32,
    },
    CurveBy {
        c1: (f32, f32),
        c2: (f32, f32),
        end: (f32, f32),
    },
    Close,
}

#[derive(Clone, Copy)]
enum Primitive {
    Line([f32; 2]),
    Curve([f32; 6]),
}

// Top side in outline units, walking left to right. Positive y points into
// the piece, so a socket (+1) dents inward and a tab (-1) bulges out.
const SIDE_TEMPLATE: [Primitive; 8] = [
    Primitive::Line([4.0, 0.0]),
    Primitive::Curve([0.0, 0.0, 1.0, 0.0, 1.0, 1.0]),
    Primitive::Curve([0.0, 1.0, -1.0, 1.0, -1.0, 2.0]),
    Primitive::Curve([0.0, 1.0, 2.0, 1.0, 2.0, 1.0]),
    Primitive::Curve([0.0, 0.0, 2.0, 0.0, 2.0, -1.0]),
    Primitive::Curve([0.0, -1.0, -1.0, -1.0, -1.0, -2.0]),
    Primitive::Curve([0.0, -1.0, 1.0, -1.0, 1.0, -1.0]),
    Primitive::Line([4.0, 0.0]),
];

const SIDE_SPAN: [f32; 2] = [12.0, 0.0];

fn rotate_quarter(x: f32, y: f32) -> (f32, f32) {
    (-y, x)
}

fn rotate_times(x: f32, y: f32, turns: usize) -> (f32, f32) {
    let mut point = (x, y);
    for _ in 0..turns {
        point = rotate_quarter(point.0, point.1);
    }
    point
}

#[derive(Clone, Copy)]
struct SideScale {
    side: usize,
    ux: f32,
    uy: f32,
    nub: f32,
}

impl SideScale {
    fn apply(&self, x: f32, y: f32) -> (f32, f32) {
        let (rx, ry) = rotate_times(x, y, self.side);
        if self.side % 2 == 1 {
            (rx * self.ux * self.nub, ry * self.uy)
        } else {
            (rx * self.ux, ry * self.uy * self.nub)
        }
    }

    // Flat sides keep their full length, only the bulge axis collapses.
    fn span(&self) -> (f32, f32) {
        let (rx, ry) = rotate_times(SIDE_SPAN[0], SIDE_SPAN[1], self.side);
        (rx * self.ux, ry * self.uy)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Outline {
    pub commands: Vec<PathCommand>,
}

impl Outline {
    /// Build a piece outline starting at `origin`, the nub-inset top-left
    /// corner of the piece's base rectangle.
    pub fn build(ux: f32, uy: f32, nubs: Nubs, origin: (f32, f32)) -> Self {
        let mut commands = Vec::with_capacity(2 + SIDE_TEMPLATE.len() * 4);
        commands.push(PathCommand::MoveTo {
            x: origin.0,
            y: origin.1,
        });
        for side in DIRS {
            let scale = SideScale {
                side,
                ux,
                uy,
                nub: nubs[side] as f32,
            };
            if nubs[side] == 0 {
                let (dx, dy) = scale.span();
                commands.push(PathCommand::LineBy { dx, dy });
                continue;
            }
            for primitive in SIDE_TEMPLATE {
                let command = match primitive {
                    Primitive::Line([x, y]) => {
                        let (dx, dy) = scale.apply(x, y);
                        PathCommand::LineBy { dx, dy }
                    }
                    Primitive::Curve([x1, y1, x2, y2, x, y]) => PathCommand::CurveBy {
                        c1: scale.apply(x1, y1),
                        c2: scale.apply(x2, y2),
                        end: scale.apply(x, y),
                    },
                };
                commands.push(command);
            }
        }
        commands.push(PathCommand::Close);
        Self { commands }
    }

    pub fn for_piece(config: &GridConfig, coord: GridCoord) -> Self {
        let (ux, uy) = config.units();
        Self::build(
            ux,
            uy,
            nubs_at(coord, config),
            (config.nub_width, config.nub_height),
        )
    }

    pub fn start(&self) -> (f32, f32) {
        match self.commands.first() {
            Some(PathCommand::MoveTo { x, y }) => (*x, *y),
            _ => (0.0, 0.0),
        }
    }

    /// Absolute pen positions after each command, starting point included.
    pub fn vertices(&self) -> Vec<(f32, f32)> {
        let mut points = Vec::with_capacity(self.commands.len());
        let mut pen = (0.0, 0.0);
        for command in &self.commands {
            match *command {
                PathCommand::MoveTo { x, y } => pen = (x, y),
                PathCommand::LineBy { dx, dy } => pen = (pen.0 + dx, pen.1 + dy),
                PathCommand::CurveBy { end, .. } => pen = (pen.0 + end.0, pen.1 + end.1),
                PathCommand::Close => continue,
            }
            points.push(pen);
        }
        points
    }

    pub fn end_point(&self) -> (f32, f32) {
        self.vertices().last().copied().unwrap_or((0.0, 0.0))
    }

    pub fn is_closed(&self) -> bool {
        let (sx, sy) = self.start();
        let (ex, ey) = self.end_point();
        let (min_x, min_y, max_x, max_y) = self.bounds();
        let tolerance = CLOSE_EPSILON * (max_x - min_x).max(max_y - min_y).max(1.0);
        (sx - ex).abs() <= tolerance && (sy - ey).abs() <= tolerance
    }

    /// Conservative extent including connector bulges; bezier curves stay
    /// inside the hull of their control points.
    pub fn bounds(&self) -> (f32, f32, f32, f32) {
        let mut min_x = f32::INFINITY;
        let mut min_y = f32::INFINITY;
        let mut max_x = f32::NEG_INFINITY;
        let mut max_y = f32::NEG_INFINITY;
        let mut include = |x: f32, y: f32| {
            min_x = min_x.min(x);
            min_y = min_y.min(y);
            max_x = max_x.max(x);
            max_y = max_y.max(y);
        };
        let mut pen = (0.0, 0.0);
        for command in &self.commands {
            match *command {
                PathCommand::MoveTo { x, y } => pen = (x, y),
                PathCommand::LineBy { dx, dy } => pen = (pen.0 + dx, pen.1 + dy),
                PathCommand::CurveBy { c1, c2, end } => {
                    include(pen.0 + c1.0, pen.1 + c1.1);
                    include(pen.0 + c2.0, pen.1 + c2.1);
                    pen = (pen.0 + end.0, pen.1 + end.1);
                }
                PathCommand::Close => continue,
            }
            include(pen.0, pen.1);
        }
        (min_x, min_y, max_x, max_y)
    }

    pub fn to_svg_path(&self) -> String {
        let mut path = String::new();
        for command in &self.commands {
            if !path.is_empty() {
                path.push(' ');
            }
            let _ = match *command {
                PathCommand::MoveTo { x, y } => {
                    write!(path, "M {},{}", fmt_f32(x), fmt_f32(y))
                }
                PathCommand::LineBy { dx, dy } => {
                    write!(path, "l {},{}", fmt_f32(dx), fmt_f32(dy))
                }
                PathCommand::CurveBy { c1, c2, end } => write!(
                    path,
                    "c {},{} {},{} {},{}",
                    fmt_f32(c1.0),
                    fmt_f32(c1.1),
                    fmt_f32(c2.0),
                    fmt_f32(c2.1),
                    fmt_f32(end.0),
                    fmt_f32(end.1)
                ),
                PathCommand::Close => write!(path, "z"),
            };
        }
        path
    }
}

pub fn fmt_f32(value: f32) -> String {
    let text = format!("{:.3}", value);
    let text = text.trim_end_matches('0').trim_end_matches('.');
    if text == "-0" || text.is_empty() {
        "0".to_string()
    } else {
        text.to_string()
    }
}

/// Where a piece samples the puzzle image, in the piece's local frame.
///
/// The window grows by one nub on every side where a tab protrudes so the
/// bulge gets painted with the neighboring strip of the picture.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct TextureWindow {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub image_x: f32,
    pub image_y: f32,
    pub image_width: f32,
    pub image_height: f32,
}

pub fn texture_window(config: &GridConfig, coord: GridCoord) -> TextureWindow {
    let nubs = nubs_at(coord, config);
    let mut window = TextureWindow {
        x: 0.0,
        y: 0.0,
        width: config.piece_width,
        height: config.piece_height,
        image_x: -(coord.column as f32) * config.piece_width,
        image_y: -(coord.row as f32) * config.piece_height,
        image_width: config.image_width as f32,
        image_height: config.image_height as f32,
    };
    if nubs[0] < 0 {
        window.height += config.nub_height;
        window.image_y += config.nub_height;
    } else {
        window.y += config.nub_height;
    }
    if nubs[1] < 0 {
        window.width += config.nub_width;
    }
    if nubs[2] < 0 {
        window.height += config.nub_height;
    }
    if nubs[3] < 0 {
        window.width += config.nub_width;
        window.image_x += config.nub_width;
    } else {
        window.x += config.nub_width;
    }
    window
}

/// Window showing the whole image, in the frame of a cluster holding every
/// piece. Replaces the per-piece windows once the puzzle is solved so no
/// seams remain.
pub fn full_image_window(config: &GridConfig) -> TextureWindow {
    TextureWindow {
        x: config.nub_width,
        y: config.nub_height,
        width: config.image_width as f32,
        height: config.image_height as f32,
        image_x: 0.0,
        image_y: 0.0,
        image_width: config.image_width as f32,
        image_height: config.image_height as f32,
    }
}
