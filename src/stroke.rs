use std::iter;

use crate::{math::Point, palette::PaletteColor};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StrokeId(u64);

/// One continuous drag gesture: the pointer positions it passed through and its color.
#[derive(Debug, Clone)]
pub struct Stroke {
    id: StrokeId,
    color: PaletteColor,
    points: Vec<Point>,
}

impl Stroke {
    fn new(id: StrokeId, color: PaletteColor) -> Self {
        Self {
            id,
            color,
            points: Vec::new(),
        }
    }

    #[cfg(test)]
    pub fn id(&self) -> StrokeId {
        self.id
    }

    pub fn color(&self) -> PaletteColor {
        self.color
    }

    /// Points in the order they were drawn.
    pub fn points(&self) -> &[Point] {
        &self.points
    }
}

/// All strokes painted during this session.
///
/// Committed strokes are never modified again. Exactly one in-progress stroke exists at any time;
/// it only accepts points between [`Canvas::begin_stroke`] and [`Canvas::commit_stroke`].
#[derive(Debug)]
pub struct Canvas {
    committed: Vec<Stroke>,
    current: Stroke,
    drawing: bool,
    next_id: u64,
}

impl Canvas {
    pub fn new(color: PaletteColor) -> Self {
        Self {
            committed: Vec::new(),
            current: Stroke::new(StrokeId(0), color),
            drawing: false,
            next_id: 1,
        }
    }

    fn allocate_id(&mut self) -> StrokeId {
        let id = StrokeId(self.next_id);
        self.next_id += 1;
        id
    }

    #[cfg(test)]
    pub fn is_drawing(&self) -> bool {
        self.drawing
    }

    #[cfg(test)]
    pub fn committed(&self) -> &[Stroke] {
        &self.committed
    }

    /// Starts a new stroke painted with `color`.
    ///
    /// Returns `false` and leaves the stroke alone if one is already in progress.
    pub fn begin_stroke(&mut self, color: PaletteColor) -> bool {
        if self.drawing {
            log::debug!("ignoring stroke start while {:?} is in progress", self.current.id);
            return false;
        }
        self.current = Stroke::new(self.allocate_id(), color);
        self.drawing = true;
        true
    }

    /// Appends a point to the in-progress stroke. Does nothing when no stroke is in progress.
    pub fn append_point(&mut self, point: Point) {
        if self.drawing {
            self.current.points.push(point);
        }
    }

    /// Finishes the in-progress stroke and starts an empty one with `next_color`.
    ///
    /// Strokes without any points are not committed.
    pub fn commit_stroke(&mut self, next_color: PaletteColor) -> Option<StrokeId> {
        if !self.drawing {
            return None;
        }
        self.drawing = false;
        if self.current.points.is_empty() {
            self.current.color = next_color;
            return None;
        }

        let fresh = Stroke::new(self.allocate_id(), next_color);
        let stroke = std::mem::replace(&mut self.current, fresh);
        let id = stroke.id;
        log::debug!(
            "committed {id:?}: {} points in {}",
            stroke.points.len(),
            stroke.color
        );
        self.committed.push(stroke);
        Some(id)
    }

    /// Throws away the points of the in-progress stroke.
    pub fn cancel_stroke(&mut self) {
        if self.drawing {
            log::debug!("discarding {:?}", self.current.id);
            self.current.points.clear();
            self.drawing = false;
        }
    }

    /// Every stroke in paint order: committed strokes oldest first, then the in-progress stroke.
    pub fn strokes(&self) -> impl Iterator<Item = &Stroke> + Clone + '_ {
        self.committed.iter().chain(iter::once(&self.current))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::vec2;

    fn points(stroke: &Stroke) -> Vec<[f32; 2]> {
        stroke.points().iter().map(|&p| p.into()).collect()
    }

    #[test]
    fn commits_points_in_order() {
        let mut canvas = Canvas::new(PaletteColor::Blue);
        assert!(canvas.begin_stroke(PaletteColor::Red));
        canvas.append_point(vec2(10.0, 10.0));
        canvas.append_point(vec2(20.0, 10.0));
        canvas.append_point(vec2(20.0, 20.0));
        let id = canvas.commit_stroke(PaletteColor::Green).unwrap();

        let [stroke] = canvas.committed() else {
            panic!("expected one stroke");
        };
        assert_eq!(stroke.id(), id);
        assert_eq!(stroke.color(), PaletteColor::Red);
        assert_eq!(
            points(stroke),
            [[10.0, 10.0], [20.0, 10.0], [20.0, 20.0]]
        );
        assert!(!canvas.is_drawing());
    }

    #[test]
    fn fresh_stroke_takes_next_color() {
        let mut canvas = Canvas::new(PaletteColor::Blue);
        canvas.begin_stroke(PaletteColor::Red);
        canvas.append_point(vec2(1.0, 1.0));
        canvas.commit_stroke(PaletteColor::Purple);

        let current = canvas.strokes().last().unwrap();
        assert_eq!(current.color(), PaletteColor::Purple);
        assert!(current.points().is_empty());
    }

    #[test]
    fn operations_without_stroke_are_no_ops() {
        let mut canvas = Canvas::new(PaletteColor::Blue);
        canvas.append_point(vec2(1.0, 1.0));
        assert_eq!(canvas.commit_stroke(PaletteColor::Red), None);
        canvas.cancel_stroke();
        assert!(canvas.committed().is_empty());
        assert_eq!(canvas.strokes().count(), 1);
        assert!(canvas.strokes().all(|s| s.points().is_empty()));
    }

    #[test]
    fn empty_stroke_is_not_committed() {
        let mut canvas = Canvas::new(PaletteColor::Blue);
        canvas.begin_stroke(PaletteColor::Red);
        assert_eq!(canvas.commit_stroke(PaletteColor::Green), None);
        assert!(canvas.committed().is_empty());
        assert!(!canvas.is_drawing());
    }

    #[test]
    fn second_begin_keeps_current_stroke() {
        let mut canvas = Canvas::new(PaletteColor::Blue);
        canvas.begin_stroke(PaletteColor::Red);
        canvas.append_point(vec2(1.0, 2.0));
        assert!(!canvas.begin_stroke(PaletteColor::Yellow));
        canvas.append_point(vec2(3.0, 4.0));
        canvas.commit_stroke(PaletteColor::Blue);

        let stroke = &canvas.committed()[0];
        assert_eq!(stroke.color(), PaletteColor::Red);
        assert_eq!(points(stroke), [[1.0, 2.0], [3.0, 4.0]]);
    }

    #[test]
    fn cancel_discards_points() {
        let mut canvas = Canvas::new(PaletteColor::Blue);
        canvas.begin_stroke(PaletteColor::Red);
        canvas.append_point(vec2(1.0, 2.0));
        canvas.cancel_stroke();
        canvas.append_point(vec2(3.0, 4.0));
        assert_eq!(canvas.commit_stroke(PaletteColor::Blue), None);
        assert!(canvas.strokes().all(|s| s.points().is_empty()));
    }

    #[test]
    fn strokes_lists_in_progress_last_with_unique_ids() {
        let mut canvas = Canvas::new(PaletteColor::Blue);
        for i in 0..3 {
            canvas.begin_stroke(PaletteColor::ALL[i]);
            canvas.append_point(vec2(i as f32, 0.0));
            canvas.commit_stroke(PaletteColor::Blue);
        }
        canvas.begin_stroke(PaletteColor::Indigo);
        canvas.append_point(vec2(9.0, 9.0));

        let strokes = canvas.strokes();
        let colors = strokes.clone().map(|s| s.color()).collect::<Vec<_>>();
        assert_eq!(
            colors,
            [
                PaletteColor::Red,
                PaletteColor::Orange,
                PaletteColor::Yellow,
                PaletteColor::Indigo
            ]
        );
        let ids = strokes.map(|s| s.id()).collect::<Vec<_>>();
        assert!(ids.windows(2).all(|w| w[0] < w[1]), "{ids:?}");
    }
}
