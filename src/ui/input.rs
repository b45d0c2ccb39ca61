//! Terminal input translation.
//!
//! Crossterm reports mouse positions in cells; the reader core works in
//! pixels. Each cell maps to a fixed pixel box and events are reported at
//! the centre of the cell. A left-button press that is released without
//! dragging also produces a tap.

use crossterm::event::{Event, KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEventKind};

use crate::app::{AppEvent, ReaderKey};
use crate::geometry::Size;

pub const CELL_WIDTH_PX: f64 = 8.0;
pub const CELL_HEIGHT_PX: f64 = 16.0;

/// Rows below the page area (progress bar and status line).
pub const STATUS_ROWS: u16 = 2;

/// Pixels per wheel notch.
pub const WHEEL_STEP_PX: f64 = 3.0 * CELL_HEIGHT_PX;

pub fn cell_to_px(column: u16, row: u16) -> (f64, f64) {
    (
        (column as f64 + 0.5) * CELL_WIDTH_PX,
        (row as f64 + 0.5) * CELL_HEIGHT_PX,
    )
}

pub fn viewport_for(columns: u16, rows: u16) -> Size {
    Size::new(columns as f64 * CELL_WIDTH_PX, rows as f64 * CELL_HEIGHT_PX)
}

pub fn key_to_app_event(key: KeyEvent) -> Option<AppEvent> {
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        return Some(AppEvent::Quit);
    }
    let key = match key.code {
        KeyCode::Char('q') | KeyCode::Esc => return Some(AppEvent::Quit),
        KeyCode::Left | KeyCode::Char('h') => ReaderKey::Left,
        KeyCode::Right | KeyCode::Char('l') => ReaderKey::Right,
        KeyCode::Up | KeyCode::Char('k') => ReaderKey::Up,
        KeyCode::Down | KeyCode::Char('j') => ReaderKey::Down,
        KeyCode::PageUp => ReaderKey::PageUp,
        KeyCode::PageDown => ReaderKey::PageDown,
        KeyCode::Char('a') => ReaderKey::ToggleAutoScroll,
        KeyCode::Char(' ') => ReaderKey::TogglePause,
        KeyCode::Char('m') | KeyCode::Enter => ReaderKey::Menu,
        _ => return None,
    };
    Some(AppEvent::Key(key))
}

/// Turns terminal events into reader events, remembering the state of the
/// left button between calls.
#[derive(Debug, Default)]
pub struct InputTranslator {
    pressed_at: Option<(u16, u16)>,
    dragged: bool,
}

impl InputTranslator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn translate(&mut self, event: Event) -> Vec<AppEvent> {
        match event {
            Event::Key(key) => key_to_app_event(key).into_iter().collect(),
            Event::Resize(columns, rows) => vec![AppEvent::Resize(viewport_for(
                columns,
                rows.saturating_sub(STATUS_ROWS),
            ))],
            Event::Mouse(mouse) => {
                let (x, y) = cell_to_px(mouse.column, mouse.row);
                match mouse.kind {
                    MouseEventKind::Down(MouseButton::Left) => {
                        self.pressed_at = Some((mouse.column, mouse.row));
                        self.dragged = false;
                        vec![AppEvent::PointerDown { x, y }]
                    }
                    MouseEventKind::Drag(MouseButton::Left) => {
                        if self.pressed_at != Some((mouse.column, mouse.row)) {
                            self.dragged = true;
                        }
                        vec![AppEvent::PointerMove { x, y }]
                    }
                    MouseEventKind::Up(MouseButton::Left) => {
                        let tapped = self.pressed_at.take().is_some() && !self.dragged;
                        let mut events = vec![AppEvent::PointerUp { x, y }];
                        if tapped {
                            events.push(AppEvent::Tap { x, y });
                        }
                        events
                    }
                    MouseEventKind::ScrollDown => vec![AppEvent::Wheel {
                        dx: 0.0,
                        dy: WHEEL_STEP_PX,
                    }],
                    MouseEventKind::ScrollUp => vec![AppEvent::Wheel {
                        dx: 0.0,
                        dy: -WHEEL_STEP_PX,
                    }],
                    MouseEventKind::ScrollRight => vec![AppEvent::Wheel {
                        dx: WHEEL_STEP_PX,
                        dy: 0.0,
                    }],
                    MouseEventKind::ScrollLeft => vec![AppEvent::Wheel {
                        dx: -WHEEL_STEP_PX,
                        dy: 0.0,
                    }],
                    _ => Vec::new(),
                }
            }
            _ => Vec::new(),
        }
    }
}
