use crate::app::{AppMode, ReaderApp};
use crate::geometry::{Rect as PxRect, Size};
use crate::ui::input::{viewport_for, InputTranslator, STATUS_ROWS};
use crate::ui::reader::view::{
    px_rect_to_cells, render_page, render_preview, render_progress_bar, render_status_line,
    render_tap_region,
};
use crate::ui::terminal_guard::TerminalGuard;
use crossterm::event;
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout},
    Terminal,
};
use std::io::{self, Stdout};
use std::time::{Duration, Instant};

/// Longest the loop sleeps when no timer is pending.
const IDLE_POLL_MS: u64 = 250;

pub struct TuiManager {
    terminal: Terminal<CrosstermBackend<Stdout>>,
    _guard: TerminalGuard,
}

impl TuiManager {
    pub fn new() -> Result<Self, io::Error> {
        let guard = TerminalGuard::new()?;
        let backend = CrosstermBackend::new(io::stdout());
        let terminal = Terminal::new(backend)?;

        Ok(TuiManager {
            terminal,
            _guard: guard,
        })
    }

    /// Pixel size of the page area: the whole terminal minus the status rows.
    pub fn viewport(&self) -> io::Result<Size> {
        let size = self.terminal.size()?;
        Ok(viewport_for(size.width, size.height.saturating_sub(STATUS_ROWS)))
    }

    pub fn run_event_loop(&mut self, app: &mut ReaderApp) -> io::Result<()> {
        let started = Instant::now();
        let now = || started.elapsed().as_millis() as u64;
        let mut input = InputTranslator::new();

        loop {
            if app.mode() == AppMode::Quit {
                return Ok(());
            }

            app.tick(now());
            self.render_frame(app)?;

            // Sleep until the next timer is due, or until input arrives.
            let current = now();
            let timeout_ms = app
                .next_deadline()
                .map_or(IDLE_POLL_MS, |deadline| deadline.saturating_sub(current))
                .min(IDLE_POLL_MS);

            if event::poll(Duration::from_millis(timeout_ms))? {
                let event = event::read()?;
                let at = now();
                for app_event in input.translate(event) {
                    app.handle_event(app_event, at);
                }
            }
        }
    }

    pub fn render_frame(&mut self, app: &mut ReaderApp) -> io::Result<()> {
        let state = app.get_render_state();

        self.terminal.draw(|frame| {
            let chunks = Layout::default()
                .direction(Direction::Vertical)
                .constraints([
                    Constraint::Min(1),
                    Constraint::Length(1),
                    Constraint::Length(STATUS_ROWS - 1),
                ])
                .split(frame.area());
            let page_area = chunks[0];

            // Pages follow the finger during a swipe
            let shift = state.swipe_offset;
            for page in &state.visible_pages {
                let bounds = page.bounds.translated(shift, 0.0);
                if let Some(cells) = px_rect_to_cells(bounds, page_area) {
                    frame.render_widget(render_page(page, page.index == state.current_page), cells);
                }
            }
            if let Some(index) = state.preview_page {
                let width = state.viewport.width;
                let revealed = if shift < 0.0 {
                    PxRect::new(width + shift, 0.0, -shift, state.viewport.height)
                } else {
                    PxRect::new(0.0, 0.0, shift, state.viewport.height)
                };
                if let Some(cells) = px_rect_to_cells(revealed, page_area) {
                    frame.render_widget(render_preview(index), cells);
                }
            }

            for region in &state.tap_regions {
                if let Some(cells) = px_rect_to_cells(region.bounds, page_area) {
                    frame.render_widget(render_tap_region(region), cells);
                }
            }

            frame.render_widget(render_progress_bar(state.progress()), chunks[1]);
            frame.render_widget(render_status_line(&state), chunks[2]);
        })?;

        Ok(())
    }
}
