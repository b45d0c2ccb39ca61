use crate::geometry::Size;
use crate::reading::TouchPoint;

/// Reader keys, already decoded from the terminal's key codes.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum ReaderKey {
    Left,
    Right,
    Up,
    Down,
    PageUp,
    PageDown,
    ToggleAutoScroll,
    TogglePause,
    Menu,
}

/// Application events. Coordinates are viewport pixels.
#[derive(Debug, PartialEq, Clone)]
pub enum AppEvent {
    PointerDown { x: f64, y: f64 },
    PointerMove { x: f64, y: f64 },
    PointerUp { x: f64, y: f64 },
    TouchStart(Vec<TouchPoint>),
    TouchMove(Vec<TouchPoint>),
    TouchEnd,
    Wheel { dx: f64, dy: f64 },
    Key(ReaderKey),
    Tap { x: f64, y: f64 },
    Resize(Size),
    Quit,
}
