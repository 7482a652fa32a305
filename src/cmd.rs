use crate::math::Point;

/// Input from the single pointer that paints on the canvas (or moves the picker).
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Cmd {
    /// The pointer touched the surface.
    PointerDown {
        /// Position in logical window pixels.
        position: Point,
    },

    /// The pointer moved while touching the surface.
    PointerMove {
        /// Position in logical window pixels.
        position: Point,
    },

    /// The pointer was lifted off the surface.
    PointerUp,

    /// The platform took the pointer away mid-gesture, e.g. an interrupted touch.
    PointerCancel,
}
