use std::fmt::Write;

use squzzle_core::grid::{GridConfig, GridCoord};
use squzzle_core::outline::{fmt_f32, full_image_window, texture_window, Outline, TextureWindow};
use squzzle_core::registry::{Affine, ClusterId};
use squzzle_core::viewport::ViewRect;

use crate::surface::PieceSurface;

#[derive(Clone, Debug, PartialEq)]
pub struct SvgShape {
    pub piece: GridCoord,
    pub path_d: String,
    pub local: Affine,
}

#[derive(Clone, Debug, PartialEq)]
pub struct SvgGroup {
    pub id: ClusterId,
    pub translate: (f32, f32),
    pub tilt_deg: f32,
    pub shapes: Vec<SvgShape>,
}

/// Retained scene that mirrors what a DOM renderer would hold: one group per
/// cluster, stacked bottom to top, each holding its pieces' paths.
#[derive(Clone, Debug, Default)]
pub struct SvgSurface {
    config: Option<GridConfig>,
    image_href: String,
    groups: Vec<SvgGroup>,
    view: Option<ViewRect>,
    solved: bool,
}

impl SvgSurface {
    pub fn new(image_href: impl Into<String>) -> Self {
        Self {
            image_href: image_href.into(),
            ..Self::default()
        }
    }

    pub fn groups(&self) -> &[SvgGroup] {
        &self.groups
    }

    pub fn group(&self, id: ClusterId) -> Option<&SvgGroup> {
        self.groups.iter().find(|group| group.id == id)
    }

    pub fn is_solved(&self) -> bool {
        self.solved
    }

    /// Region of the board the document shows, usually the viewport's
    /// visible rect. Defaults to the image area plus one piece of margin on
    /// the right and bottom.
    pub fn set_view(&mut self, view: ViewRect) {
        self.view = Some(view);
    }

    fn group_mut(&mut self, id: ClusterId) -> Option<&mut SvgGroup> {
        self.groups.iter_mut().find(|group| group.id == id)
    }

    fn view_box(&self) -> ViewRect {
        if let Some(view) = self.view {
            return view;
        }
        match self.config {
            Some(config) => ViewRect {
                min_x: 0.0,
                min_y: 0.0,
                width: config.image_width as f32 + config.piece_width + 2.0 * config.nub_width,
                height: config.image_height as f32
                    + config.piece_height
                    + 2.0 * config.nub_height,
            },
            None => ViewRect {
                min_x: 0.0,
                min_y: 0.0,
                width: 0.0,
                height: 0.0,
            },
        }
    }

    // Rotation pivot: centre of the members' base rectangles in group space.
    fn group_pivot(config: &GridConfig, group: &SvgGroup) -> (f32, f32) {
        if group.shapes.is_empty() {
            return (0.0, 0.0);
        }
        let mut sum = (0.0, 0.0);
        for shape in &group.shapes {
            let (x, y) = shape.local.translation();
            sum.0 += x + config.nub_width + config.piece_width * 0.5;
            sum.1 += y + config.nub_height + config.piece_height * 0.5;
        }
        let count = group.shapes.len() as f32;
        (sum.0 / count, sum.1 / count)
    }

    pub fn to_svg_document(&self) -> String {
        let view = self.view_box();
        let mut out = String::new();
        let _ = writeln!(
            out,
            r#"<svg xmlns="http://www.w3.org/2000/svg" xmlns:xlink="http://www.w3.org/1999/xlink" viewBox="{} {} {} {}">"#,
            fmt_f32(view.min_x),
            fmt_f32(view.min_y),
            fmt_f32(view.width),
            fmt_f32(view.height)
        );
        let Some(config) = self.config else {
            out.push_str("</svg>\n");
            return out;
        };

        // A solved board is one picture: the background takes the whole image
        // and the piece paths with their seams are left out.
        if self.solved {
            let mut window = full_image_window(&config);
            if let Some(group) = self.groups.first() {
                window.x += group.translate.0;
                window.y += group.translate.1;
            }
            out.push_str("<defs>\n");
            self.write_pattern(&mut out, "full", &window);
            out.push_str("</defs>\n");
            Self::write_background(&mut out, &view, "url(#tex-full)");
            let _ = writeln!(
                out,
                r#"<text class="victory" x="{}" y="{}" text-anchor="middle" font-size="{}">Solved!</text>"#,
                fmt_f32(view.min_x + view.width * 0.5),
                fmt_f32(view.min_y + view.height * 0.5),
                fmt_f32((view.height * 0.1).max(12.0))
            );
            out.push_str("</svg>\n");
            return out;
        }

        out.push_str("<defs>\n");
        for group in &self.groups {
            for shape in &group.shapes {
                let window = texture_window(&config, shape.piece);
                self.write_pattern(&mut out, &shape.piece.to_string(), &window);
            }
        }
        out.push_str("</defs>\n");
        Self::write_background(&mut out, &view, "#222");

        for group in &self.groups {
            let mut transform = format!(
                "translate({} {})",
                fmt_f32(group.translate.0),
                fmt_f32(group.translate.1)
            );
            if group.tilt_deg != 0.0 {
                let (cx, cy) = Self::group_pivot(&config, group);
                let _ = write!(
                    transform,
                    " rotate({} {} {})",
                    fmt_f32(group.tilt_deg),
                    fmt_f32(cx),
                    fmt_f32(cy)
                );
            }
            let _ = writeln!(
                out,
                r#"<g id="{}" class="cluster" transform="{}">"#,
                group.id, transform
            );
            for shape in &group.shapes {
                let [a, b, c, d, e, f] = shape.local.0;
                let _ = writeln!(
                    out,
                    r#"<path id="{}" class="piece" transform="matrix({} {} {} {} {} {})" d="{}" fill="url(#tex-{})" stroke="black" stroke-width="1"/>"#,
                    shape.piece,
                    fmt_f32(a),
                    fmt_f32(b),
                    fmt_f32(c),
                    fmt_f32(d),
                    fmt_f32(e),
                    fmt_f32(f),
                    shape.path_d,
                    shape.piece
                );
            }
            out.push_str("</g>\n");
        }
        out.push_str("</svg>\n");
        out
    }

    fn write_pattern(&self, out: &mut String, name: &str, window: &TextureWindow) {
        let _ = writeln!(
            out,
            r#"<pattern id="tex-{}" patternUnits="userSpaceOnUse" x="{}" y="{}" width="{}" height="{}"><image href="{}" x="{}" y="{}" width="{}" height="{}"/></pattern>"#,
            name,
            fmt_f32(window.x),
            fmt_f32(window.y),
            fmt_f32(window.width),
            fmt_f32(window.height),
            escape_attr(&self.image_href),
            fmt_f32(window.image_x),
            fmt_f32(window.image_y),
            fmt_f32(window.image_width),
            fmt_f32(window.image_height)
        );
    }

    fn write_background(out: &mut String, view: &ViewRect, fill: &str) {
        let _ = writeln!(
            out,
            r#"<rect id="background" x="{}" y="{}" width="{}" height="{}" fill="{}"/>"#,
            fmt_f32(view.min_x),
            fmt_f32(view.min_y),
            fmt_f32(view.width),
            fmt_f32(view.height),
            fill
        );
    }
}

fn escape_attr(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '"' => escaped.push_str("&quot;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}

impl PieceSurface for SvgSurface {
    fn reset(&mut self, config: &GridConfig) {
        self.config = Some(*config);
        self.groups.clear();
        self.solved = false;
    }

    fn create_group(&mut self, group: ClusterId) {
        if self.group(group).is_some() {
            return;
        }
        self.groups.push(SvgGroup {
            id: group,
            translate: (0.0, 0.0),
            tilt_deg: 0.0,
            shapes: Vec::new(),
        });
    }

    fn create_shape(&mut self, group: ClusterId, piece: GridCoord, outline: &Outline, local: Affine) {
        let path_d = outline.to_svg_path();
        if let Some(target) = self.group_mut(group) {
            target.shapes.push(SvgShape {
                piece,
                path_d,
                local,
            });
        }
    }

    fn set_group_transform(&mut self, group: ClusterId, translate: (f32, f32)) {
        if let Some(target) = self.group_mut(group) {
            target.translate = translate;
        }
    }

    fn reparent(&mut self, piece: GridCoord, from: ClusterId, to: ClusterId) {
        let Some(source) = self.group_mut(from) else {
            return;
        };
        let Some(position) = source.shapes.iter().position(|shape| shape.piece == piece) else {
            return;
        };
        let shape = source.shapes.remove(position);
        if let Some(target) = self.group_mut(to) {
            target.shapes.push(shape);
        }
    }

    fn remove_group(&mut self, group: ClusterId) {
        self.groups.retain(|item| item.id != group);
    }

    fn raise_group(&mut self, group: ClusterId) {
        if let Some(position) = self.groups.iter().position(|item| item.id == group) {
            let item = self.groups.remove(position);
            self.groups.push(item);
        }
    }

    fn lower_group(&mut self, group: ClusterId) {
        if let Some(position) = self.groups.iter().position(|item| item.id == group) {
            let item = self.groups.remove(position);
            self.groups.insert(0, item);
        }
    }

    fn set_group_tilt(&mut self, group: ClusterId, degrees: f32) {
        if let Some(target) = self.group_mut(group) {
            target.tilt_deg = degrees;
        }
    }

    fn show_solved(&mut self) {
        self.solved = true;
    }
}
