use crate::{
    math::{vec2, Point, Rect},
    palette::Rgba,
    stroke::Stroke,
};

/// Diameter of the brush, in logical pixels.
pub const DEFAULT_BRUSH_WIDTH: f32 = 40.0;

/// An instruction for the drawing surface.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCmd<'a> {
    /// Strokes the polyline through `points` with round caps and joins.
    StrokePath {
        points: &'a [Point],
        color: Rgba,
        width: f32,
    },
    FillEllipse {
        bounds: Rect,
        color: Rgba,
    },
    /// Outline of an ellipse, centered on the ellipse's edge.
    StrokeEllipse {
        bounds: Rect,
        color: Rgba,
        width: f32,
    },
    FillRoundedRect {
        bounds: Rect,
        corner_radius: f32,
        color: Rgba,
        /// Width of the soft edge, `0.0` for a crisp rectangle.
        blur: f32,
    },
}

/// How strokes are painted.
#[derive(Debug, Clone, Copy)]
pub struct Brush {
    /// Width of stroke paths and diameter of single-point dots.
    pub width: f32,
    /// Also emit filled circles at both ends of every path, for surfaces that can't draw round
    /// caps.
    pub explicit_caps: bool,
}

impl Default for Brush {
    fn default() -> Self {
        Self {
            width: DEFAULT_BRUSH_WIDTH,
            explicit_caps: false,
        }
    }
}

impl Brush {
    fn dot(&self, center: Point, color: Rgba) -> DrawCmd<'static> {
        DrawCmd::FillEllipse {
            bounds: Rect::from_center_size(center, vec2(self.width, self.width)),
            color,
        }
    }
}

/// Turns `strokes` into draw commands, in the same order.
///
/// A stroke with a single point becomes a dot so that a tap still leaves a mark.
pub fn render<'a>(strokes: impl IntoIterator<Item = &'a Stroke>, brush: &Brush) -> Vec<DrawCmd<'a>> {
    let mut cmds = Vec::new();
    for stroke in strokes {
        let color = stroke.color().rgba();
        match stroke.points() {
            [] => {}
            [point] => cmds.push(brush.dot(*point, color)),
            points => {
                cmds.push(DrawCmd::StrokePath {
                    points,
                    color,
                    width: brush.width,
                });
                if brush.explicit_caps {
                    cmds.push(brush.dot(points[0], color));
                    cmds.push(brush.dot(points[points.len() - 1], color));
                }
            }
        }
    }
    cmds
}
