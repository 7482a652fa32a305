//! The color picker overlay: where its swatches are, what a tap hits, and how it is drawn.

use crate::{
    config::{Layout, PickerConfig},
    math::{circular_position, vec2, Point, Rect, Vec2f},
    palette::{Palette, PaletteColor, Rgba},
    render::DrawCmd,
};

/// Distance between a linear picker and the top of the window.
const TOP_MARGIN: f32 = 16.0;
const CORNER_RADIUS: f32 = 10.0;
const SHADOW_BLUR: f32 = 10.0;
const SHADOW_ALPHA: f32 = 0.33;
const BACKGROUND_ALPHA: f32 = 0.8;
/// Width of the ring around the selected swatch.
const RING_WIDTH: f32 = 4.0;

pub struct Picker {
    layout: Layout,
    palette: Palette,
    radius: f32,
    size: f32,
    swatch: f32,
    draggable: bool,
    viewport: Vec2f,
    /// Committed displacement from the home position.
    offset: Vec2f,
    /// Translation of the drag in progress, on top of `offset`.
    drag: Option<Vec2f>,
}

impl Picker {
    pub fn new(config: &PickerConfig) -> Self {
        Self {
            layout: config.layout,
            palette: Palette::new(config.default_color),
            radius: config.radius,
            size: config.size,
            swatch: config.swatch,
            draggable: config.draggable,
            viewport: vec2(0.0, 0.0),
            offset: vec2(0.0, 0.0),
            drag: None,
        }
    }

    pub fn selected(&self) -> PaletteColor {
        self.palette.selected()
    }

    /// Selects `color`, returning whether the selection changed.
    pub fn select(&mut self, color: PaletteColor) -> bool {
        self.palette.select(color)
    }

    /// Only the circular picker floats over the canvas and can be moved around.
    pub fn is_draggable(&self) -> bool {
        self.draggable && self.layout == Layout::Circular
    }

    pub fn set_viewport(&mut self, size: Vec2f) {
        self.viewport = size;
        if size.x() > 0.0 && size.y() > 0.0 {
            self.offset = self.clamp_offset(self.offset);
        }
    }

    fn padding(&self) -> f32 {
        self.swatch * 0.4
    }

    fn spacing(&self) -> f32 {
        self.swatch * 0.25
    }

    /// Where the picker sits before it was dragged anywhere: centered along the top edge.
    fn home(&self) -> Rect {
        let size = match self.layout {
            Layout::Circular => vec2(self.size, self.size),
            Layout::Linear => {
                let n = PaletteColor::ALL.len() as f32;
                vec2(
                    n * self.swatch + (n - 1.0) * self.spacing() + 2.0 * self.padding(),
                    self.swatch + 2.0 * self.padding(),
                )
            }
        };
        let top = match self.layout {
            Layout::Circular => 0.0,
            Layout::Linear => TOP_MARGIN,
        };
        Rect::from_min_size(vec2((self.viewport.x() - size.x()) / 2.0, top), size)
    }

    /// Keeps the picker's box inside the window.
    fn clamp_offset(&self, offset: Vec2f) -> Vec2f {
        let home = self.home();
        let lo = vec2(0.0, 0.0) - home.min;
        let hi = self.viewport - home.max;
        vec2(
            offset.x().min(hi.x()).max(lo.x()),
            offset.y().min(hi.y()).max(lo.y()),
        )
    }

    /// The area covered by the picker, including an in-progress drag.
    pub fn bounds(&self) -> Rect {
        let drag = self.drag.unwrap_or(vec2(0.0, 0.0));
        self.home().translate(self.offset + drag)
    }

    pub fn contains(&self, p: Point) -> bool {
        self.bounds().contains(p)
    }

    pub fn swatch_center(&self, color: PaletteColor) -> Point {
        let bounds = self.bounds();
        let index = color.index();
        match self.layout {
            Layout::Circular => circular_position(
                index,
                PaletteColor::ALL.len(),
                bounds.center(),
                self.radius,
            ),
            Layout::Linear => {
                let first = self.padding() + self.swatch / 2.0;
                bounds.min
                    + vec2(
                        first + index as f32 * (self.swatch + self.spacing()),
                        first,
                    )
            }
        }
    }

    /// Returns the swatch under `p`, if any.
    pub fn swatch_at(&self, p: Point) -> Option<PaletteColor> {
        PaletteColor::ALL
            .into_iter()
            .find(|&color| self.swatch_center(color).dist(p) <= self.swatch / 2.0)
    }

    /// Moves the picker by `translation` relative to where the current drag started.
    pub fn drag(&mut self, translation: Vec2f) {
        if self.is_draggable() {
            self.drag = Some(translation);
        }
    }

    /// Leaves the picker where the drag moved it.
    pub fn end_drag(&mut self) {
        if let Some(drag) = self.drag.take() {
            self.offset = self.clamp_offset(self.offset + drag);
            log::debug!("moved color picker to {:?}", self.bounds().min);
        }
    }

    /// Puts the picker back where it was before the drag started.
    pub fn cancel_drag(&mut self) {
        self.drag = None;
    }

    pub fn draw<'a>(&self, cmds: &mut Vec<DrawCmd<'a>>) {
        let bounds = self.bounds();
        cmds.push(DrawCmd::FillRoundedRect {
            bounds,
            corner_radius: CORNER_RADIUS,
            color: Rgba::BLACK.with_alpha(SHADOW_ALPHA),
            blur: SHADOW_BLUR,
        });
        cmds.push(DrawCmd::FillRoundedRect {
            bounds,
            corner_radius: CORNER_RADIUS,
            color: Rgba::WHITE.with_alpha(BACKGROUND_ALPHA),
            blur: 0.0,
        });

        for color in PaletteColor::ALL {
            let swatch = Rect::from_center_size(
                self.swatch_center(color),
                vec2(self.swatch, self.swatch),
            );
            cmds.push(DrawCmd::FillEllipse {
                bounds: swatch,
                color: color.rgba(),
            });
            if self.palette.is_selected(color) {
                cmds.push(DrawCmd::StrokeEllipse {
                    bounds: swatch,
                    color: Rgba::BLACK,
                    width: RING_WIDTH,
                });
            }
        }
    }
}
