use crate::{
    cmd::Cmd,
    config::Config,
    math::{Point, Vec2f},
    palette::PaletteColor,
    picker::Picker,
    render::{self, Brush, DrawCmd},
    sound::SoundEffect,
    stroke::Canvas,
};

/// How far the pointer has to travel before a press on the picker becomes a drag instead of a
/// tap.
const DRAG_SLOP: f32 = 10.0;

/// What the pointer has been doing since it went down.
#[derive(Debug)]
enum Gesture {
    Paint,
    Picker {
        start: Point,
        last: Point,
        dragging: bool,
    },
}

/// Everything on screen: the painted strokes and the color picker floating above them.
pub struct Scene {
    canvas: Canvas,
    picker: Picker,
    brush: Brush,
    sound: Box<dyn SoundEffect>,
    gesture: Option<Gesture>,
}

impl Scene {
    pub fn new(config: &Config, sound: Box<dyn SoundEffect>) -> Self {
        let picker = Picker::new(&config.picker);
        Self {
            canvas: Canvas::new(picker.selected()),
            picker,
            brush: config.brush.brush(),
            sound,
            gesture: None,
        }
    }

    #[cfg(test)]
    pub fn canvas(&self) -> &Canvas {
        &self.canvas
    }

    #[cfg(test)]
    pub fn picker(&self) -> &Picker {
        &self.picker
    }

    pub fn set_viewport(&mut self, size: Vec2f) {
        self.picker.set_viewport(size);
    }

    /// Applies a pointer command. Returns whether anything visible changed.
    pub fn handle(&mut self, cmd: Cmd) -> bool {
        match cmd {
            Cmd::PointerDown { position } => {
                if self.gesture.is_some() {
                    return false;
                }
                if self.picker.contains(position) {
                    self.gesture = Some(Gesture::Picker {
                        start: position,
                        last: position,
                        dragging: false,
                    });
                    return false;
                }
                self.gesture = Some(Gesture::Paint);
                self.canvas.begin_stroke(self.picker.selected());
                self.canvas.append_point(position);
                true
            }
            Cmd::PointerMove { position } => match &mut self.gesture {
                Some(Gesture::Paint) => {
                    self.canvas.append_point(position);
                    true
                }
                Some(Gesture::Picker {
                    start,
                    last,
                    dragging,
                }) => {
                    *last = position;
                    let translation = position - *start;
                    if !*dragging
                        && self.picker.is_draggable()
                        && translation.length() > DRAG_SLOP
                    {
                        log::debug!("dragging color picker");
                        *dragging = true;
                    }
                    if *dragging {
                        self.picker.drag(translation);
                    }
                    *dragging
                }
                None => false,
            },
            Cmd::PointerUp => match self.gesture.take() {
                Some(Gesture::Paint) => {
                    self.canvas.commit_stroke(self.picker.selected());
                    true
                }
                Some(Gesture::Picker { dragging: true, .. }) => {
                    self.picker.end_drag();
                    true
                }
                Some(Gesture::Picker { last, .. }) => match self.picker.swatch_at(last) {
                    Some(color) => {
                        self.select_color(color);
                        true
                    }
                    None => false,
                },
                None => false,
            },
            Cmd::PointerCancel => match self.gesture.take() {
                Some(Gesture::Paint) => {
                    self.canvas.cancel_stroke();
                    true
                }
                Some(Gesture::Picker { dragging, .. }) => {
                    self.picker.cancel_drag();
                    dragging
                }
                None => false,
            },
        }
    }

    /// Makes `color` the color of the next stroke and plays the selection sound, even if the
    /// color was already selected.
    pub fn select_color(&mut self, color: PaletteColor) {
        if self.picker.select(color) {
            log::info!("color changed to {color}");
        } else {
            log::debug!("{color} was already selected");
        }
        self.sound.play_selection();
    }

    /// Everything to draw for the current frame, back to front.
    pub fn draw_commands(&self) -> Vec<DrawCmd<'_>> {
        let mut cmds = render::render(self.canvas.strokes(), &self.brush);
        self.picker.draw(&mut cmds);
        cmds
    }
}

#[cfg(test)]
mod tests {
    use std::{cell::Cell, f32::consts::TAU, rc::Rc};

    use super::*;
    use crate::{math::vec2, sound::tests::CountingSound};

    fn scene() -> (Scene, Rc<Cell<usize>>) {
        let sound = CountingSound::default();
        let plays = sound.0.clone();
        let mut scene = Scene::new(&Config::default(), Box::new(sound));
        scene.set_viewport(vec2(1000.0, 800.0));
        (scene, plays)
    }

    fn down(x: f32, y: f32) -> Cmd {
        Cmd::PointerDown {
            position: vec2(x, y),
        }
    }

    fn mv(x: f32, y: f32) -> Cmd {
        Cmd::PointerMove {
            position: vec2(x, y),
        }
    }

    fn tap(scene: &mut Scene, p: Point) {
        scene.handle(Cmd::PointerDown { position: p });
        scene.handle(Cmd::PointerUp);
    }

    fn points(scene: &Scene, i: usize) -> Vec<[f32; 2]> {
        scene.canvas().committed()[i]
            .points()
            .iter()
            .map(|&p| p.into())
            .collect()
    }

    #[test]
    fn drag_paints_one_stroke() {
        let (mut scene, _) = scene();
        assert!(scene.handle(down(10.0, 300.0)));
        assert!(scene.handle(mv(20.0, 300.0)));
        assert!(scene.handle(mv(20.0, 310.0)));
        assert!(scene.handle(Cmd::PointerUp));

        assert_eq!(scene.canvas().committed().len(), 1);
        assert_eq!(
            points(&scene, 0),
            [[10.0, 300.0], [20.0, 300.0], [20.0, 310.0]]
        );
        assert_eq!(
            scene.canvas().committed()[0].color(),
            PaletteColor::Blue
        );
    }

    #[test]
    fn color_is_captured_when_stroke_begins() {
        let (mut scene, _) = scene();
        scene.handle(down(10.0, 300.0));
        scene.select_color(PaletteColor::Red);
        scene.handle(mv(20.0, 300.0));
        scene.handle(Cmd::PointerUp);
        assert_eq!(scene.canvas().committed()[0].color(), PaletteColor::Blue);

        scene.handle(down(10.0, 400.0));
        scene.handle(Cmd::PointerUp);
        assert_eq!(scene.canvas().committed()[1].color(), PaletteColor::Red);
    }

    #[test]
    fn tap_on_canvas_paints_a_dot() {
        let (mut scene, _) = scene();
        scene.handle(down(50.0, 500.0));
        scene.handle(Cmd::PointerUp);
        assert_eq!(points(&scene, 0), [[50.0, 500.0]]);

        let dots = scene
            .draw_commands()
            .into_iter()
            .filter(|cmd| matches!(cmd, DrawCmd::FillEllipse { bounds, .. } if bounds.center() == vec2(50.0, 500.0)))
            .count();
        assert_eq!(dots, 1);
    }

    #[test]
    fn tap_on_swatch_selects_and_plays_sound() {
        let (mut scene, plays) = scene();
        for (i, color) in PaletteColor::ALL.into_iter().enumerate() {
            let center = scene.picker().swatch_center(color);
            tap(&mut scene, center);
            assert_eq!(scene.picker().selected(), color);
            assert_eq!(plays.get(), i + 1);
        }
        assert!(scene.canvas().committed().is_empty());
    }

    #[test]
    fn reselecting_still_plays_sound() {
        let (mut scene, plays) = scene();
        let blue = scene.picker().swatch_center(PaletteColor::Blue);
        tap(&mut scene, blue);
        tap(&mut scene, blue);
        assert_eq!(scene.picker().selected(), PaletteColor::Blue);
        assert_eq!(plays.get(), 2);
    }

    #[test]
    fn tap_between_swatches_does_nothing() {
        let (mut scene, plays) = scene();
        let center = scene.picker().bounds().center();
        tap(&mut scene, center);
        assert_eq!(scene.picker().selected(), PaletteColor::Blue);
        assert_eq!(plays.get(), 0);
        assert!(scene.canvas().committed().is_empty());
    }

    #[test]
    fn dragging_picker_moves_it_without_selecting() {
        let (mut scene, plays) = scene();
        let start = scene.picker().bounds();
        let red = scene.picker().swatch_center(PaletteColor::Red);

        scene.handle(Cmd::PointerDown { position: red });
        assert!(!scene.handle(Cmd::PointerMove {
            position: red + vec2(3.0, 0.0)
        }));
        assert!(scene.handle(Cmd::PointerMove {
            position: red + vec2(50.0, 100.0)
        }));
        assert!(scene.handle(Cmd::PointerUp));

        assert_eq!(scene.picker().bounds(), start.translate(vec2(50.0, 100.0)));
        assert_eq!(plays.get(), 0);
        assert!(scene.canvas().committed().is_empty());
    }

    #[test]
    fn small_wiggle_on_swatch_is_still_a_tap() {
        let (mut scene, plays) = scene();
        let green = scene.picker().swatch_center(PaletteColor::Green);
        scene.handle(Cmd::PointerDown { position: green });
        scene.handle(Cmd::PointerMove {
            position: green + vec2(4.0, 4.0),
        });
        scene.handle(Cmd::PointerUp);
        assert_eq!(scene.picker().selected(), PaletteColor::Green);
        assert_eq!(plays.get(), 1);
    }

    #[test]
    fn cancelled_stroke_is_dropped() {
        let (mut scene, _) = scene();
        scene.handle(down(10.0, 300.0));
        scene.handle(mv(20.0, 300.0));
        assert!(scene.handle(Cmd::PointerCancel));
        assert!(scene.canvas().committed().is_empty());
        assert!(!scene.handle(Cmd::PointerUp));
    }

    #[test]
    fn stroke_may_cross_picker() {
        let (mut scene, plays) = scene();
        let red = scene.picker().swatch_center(PaletteColor::Red);
        scene.handle(down(10.0, 300.0));
        scene.handle(Cmd::PointerMove { position: red });
        scene.handle(Cmd::PointerUp);
        assert_eq!(scene.canvas().committed().len(), 1);
        assert_eq!(plays.get(), 0);
    }

    #[test]
    fn in_progress_stroke_is_drawn_below_picker() {
        let (mut scene, _) = scene();
        scene.handle(down(10.0, 300.0));
        scene.handle(mv(20.0, 300.0));
        let cmds = scene.draw_commands();
        assert!(matches!(cmds[0], DrawCmd::StrokePath { points, .. } if points.len() == 2));
        assert!(matches!(cmds[1], DrawCmd::FillRoundedRect { .. }));
    }

    #[test]
    fn circular_swatch_positions() {
        let sound = CountingSound::default();
        let mut scene = Scene::new(&Config::default(), Box::new(sound));
        // Places the default 200x200 picker at the origin.
        scene.set_viewport(vec2(200.0, 800.0));
        let angle = 3.0 * TAU / 7.0;
        let expected = vec2(100.0 + 60.0 * angle.cos(), 100.0 + 60.0 * angle.sin());
        let actual = scene.picker().swatch_center(PaletteColor::ALL[3]);
        assert!(actual.dist(expected) < 1e-3, "{actual:?}");

        tap(&mut scene, expected);
        assert_eq!(scene.picker().selected(), PaletteColor::ALL[3]);
    }
}
