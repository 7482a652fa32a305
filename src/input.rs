use winit::{
    dpi::PhysicalPosition,
    event::{ElementState, MouseButton, TouchPhase, WindowEvent},
};

use crate::{
    cmd::Cmd,
    math::{vec2, Point},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Owner {
    Mouse,
    Touch(u64),
}

/// Turns mouse and touch events into a single stream of pointer [`Cmd`]s.
///
/// Whichever device presses first owns the pointer until it is released. Presses by other
/// fingers or the mouse in the meantime are ignored.
#[derive(Debug, Default)]
pub struct PointerTracker {
    cursor: Option<Point>,
    owner: Option<Owner>,
}

impl PointerTracker {
    pub fn handle_window_event(&mut self, event: &WindowEvent, scale_factor: f64) -> Option<Cmd> {
        match event {
            WindowEvent::CursorMoved { position, .. } => {
                self.cursor_moved(logical(*position, scale_factor))
            }
            WindowEvent::CursorLeft { .. } => {
                self.cursor = None;
                None
            }
            WindowEvent::MouseInput {
                state,
                button: MouseButton::Left,
                ..
            } => self.mouse_button(*state == ElementState::Pressed),
            WindowEvent::Touch(touch) => self.touch(
                touch.id,
                touch.phase,
                logical(touch.location, scale_factor),
            ),
            // The button release might never arrive while unfocused.
            WindowEvent::Focused(false) if self.owner == Some(Owner::Mouse) => {
                self.owner = None;
                Some(Cmd::PointerUp)
            }
            _ => None,
        }
    }

    pub fn cursor_moved(&mut self, position: Point) -> Option<Cmd> {
        self.cursor = Some(position);
        (self.owner == Some(Owner::Mouse)).then_some(Cmd::PointerMove { position })
    }

    pub fn mouse_button(&mut self, pressed: bool) -> Option<Cmd> {
        if pressed {
            if self.owner.is_some() {
                return None;
            }
            let position = self.cursor?;
            self.owner = Some(Owner::Mouse);
            Some(Cmd::PointerDown { position })
        } else if self.owner == Some(Owner::Mouse) {
            self.owner = None;
            Some(Cmd::PointerUp)
        } else {
            None
        }
    }

    pub fn touch(&mut self, id: u64, phase: TouchPhase, position: Point) -> Option<Cmd> {
        let owns = self.owner == Some(Owner::Touch(id));
        match phase {
            TouchPhase::Started if self.owner.is_none() => {
                self.owner = Some(Owner::Touch(id));
                Some(Cmd::PointerDown { position })
            }
            TouchPhase::Moved if owns => Some(Cmd::PointerMove { position }),
            TouchPhase::Ended if owns => {
                self.owner = None;
                Some(Cmd::PointerUp)
            }
            TouchPhase::Cancelled if owns => {
                self.owner = None;
                Some(Cmd::PointerCancel)
            }
            _ => None,
        }
    }
}

fn logical(position: PhysicalPosition<f64>, scale_factor: f64) -> Point {
    let position = position.to_logical::<f32>(scale_factor);
    vec2(position.x, position.y)
}
