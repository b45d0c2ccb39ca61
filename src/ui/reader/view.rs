use crate::app::{AppMode, RenderState};
use crate::engine::config::ReadingMode;
use crate::geometry::Rect as PxRect;
use crate::overlay::{TapAction, TapRegion};
use crate::reading::{AutoScrollState, Page};
use crate::ui::input::{CELL_HEIGHT_PX, CELL_WIDTH_PX};
use crate::ui::theme::colors;
use ratatui::{
    layout::{Alignment, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};

/// Cell rectangle covering the visible part of `bounds`, or `None` when
/// less than one cell of it falls inside `area`.
pub fn px_rect_to_cells(bounds: PxRect, area: Rect) -> Option<Rect> {
    let left = (bounds.left / CELL_WIDTH_PX).round().max(0.0);
    let top = (bounds.top / CELL_HEIGHT_PX).round().max(0.0);
    let right = (bounds.right() / CELL_WIDTH_PX)
        .round()
        .min(area.width as f64);
    let bottom = (bounds.bottom() / CELL_HEIGHT_PX)
        .round()
        .min(area.height as f64);
    if right - left < 1.0 || bottom - top < 1.0 {
        return None;
    }
    Some(Rect::new(
        area.x + left as u16,
        area.y + top as u16,
        (right - left) as u16,
        (bottom - top) as u16,
    ))
}

pub fn render_page(page: &Page, is_current: bool) -> Paragraph<'static> {
    let border = if is_current {
        Style::default().fg(colors::accent())
    } else {
        Style::default().fg(colors::dimmed())
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(border)
        .title(format!(" {} ", page.index + 1));

    Paragraph::new(page.source.as_str().to_string())
        .block(block)
        .alignment(Alignment::Center)
        .style(Style::default().fg(colors::text()).bg(colors::background()))
}

/// Placeholder for the page a swipe is about to reveal.
pub fn render_preview(index: usize) -> Paragraph<'static> {
    Paragraph::new(format!("{}", index + 1))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(colors::dimmed())),
        )
        .alignment(Alignment::Center)
        .style(Style::default().fg(colors::dimmed()).bg(colors::background()))
}

pub fn render_tap_region(region: &TapRegion) -> Paragraph<'static> {
    let color = match region.action {
        TapAction::Previous | TapAction::Next => colors::accent(),
        TapAction::Menu => colors::dimmed(),
    };
    Paragraph::new(region.label)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(color)),
        )
        .alignment(Alignment::Center)
        .style(
            Style::default()
                .fg(colors::text())
                .bg(colors::surface())
                .add_modifier(Modifier::BOLD),
        )
}

pub fn render_progress_bar(progress: (usize, usize)) -> Line<'static> {
    let (current, total) = progress;
    let ratio = if total == 0 {
        0.0
    } else {
        current as f64 / total as f64
    };

    let filled_len = (ratio * 20.0) as usize;
    let empty_len = 20 - filled_len.min(20);

    let mut spans = Vec::new();
    for _ in 0..filled_len.min(20) {
        spans.push(Span::styled("─", Style::default().fg(colors::accent())));
    }
    for _ in 0..empty_len {
        spans.push(Span::styled("─", Style::default().fg(colors::dimmed())));
    }

    Line::from(spans).alignment(Alignment::Center)
}

fn mode_label(mode: ReadingMode) -> &'static str {
    match mode {
        ReadingMode::SinglePage => "single",
        ReadingMode::DoublePage => "double",
        ReadingMode::ContinuousVertical => "vertical",
        ReadingMode::ContinuousHorizontal => "horizontal",
        ReadingMode::Webtoon => "webtoon",
    }
}

pub fn status_text(state: &RenderState) -> String {
    let (page, pages) = state.progress();
    let auto = match state.auto_scroll {
        AutoScrollState::Idle => "",
        AutoScrollState::Active => " · auto",
        AutoScrollState::Paused => " · auto (paused)",
    };
    let menu = if state.mode == AppMode::Menu {
        " · menu"
    } else {
        ""
    };
    format!(
        " {} ({}/{}) · {page}/{pages} · {}{auto}{menu} ",
        state.chapter_title,
        state.chapter.0 + 1,
        state.chapter.1,
        mode_label(state.reading_mode),
    )
}

pub fn render_status_line(state: &RenderState) -> Paragraph<'static> {
    Paragraph::new(status_text(state))
        .alignment(Alignment::Left)
        .style(Style::default().fg(colors::text()).bg(colors::surface()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Size;
    use crate::reading::PageSource;

    fn state() -> RenderState {
        RenderState {
            mode: AppMode::Reading,
            reading_mode: ReadingMode::Webtoon,
            chapter_title: "Prologue".to_string(),
            chapter: (0, 3),
            current_page: 4,
            page_count: 10,
            auto_scroll: AutoScrollState::Paused,
            viewport: Size::new(800.0, 640.0),
            visible_pages: Vec::new(),
            swipe_offset: 0.0,
            preview_page: None,
            tap_regions: Vec::new(),
        }
    }

    #[test]
    fn test_px_rect_to_cells_clips_to_area() {
        let area = Rect::new(0, 0, 100, 40);
        let cells = px_rect_to_cells(PxRect::new(-80.0, 160.0, 400.0, 1600.0), area).unwrap();
        assert_eq!(cells, Rect::new(0, 10, 40, 30));
    }

    #[test]
    fn test_px_rect_outside_area() {
        let area = Rect::new(0, 0, 100, 40);
        assert_eq!(px_rect_to_cells(PxRect::new(0.0, -900.0, 800.0, 800.0), area), None);
        assert_eq!(px_rect_to_cells(PxRect::new(900.0, 0.0, 800.0, 800.0), area), None);
    }

    #[test]
    fn test_status_text() {
        let text = status_text(&state());
        assert!(text.contains("Prologue (1/3)"));
        assert!(text.contains("5/10"));
        assert!(text.contains("webtoon"));
        assert!(text.contains("auto (paused)"));
    }

    #[test]
    fn test_render_page_creates_paragraph() {
        let page = Page {
            index: 0,
            source: PageSource::new("001.png"),
            bounds: PxRect::new(0.0, 0.0, 800.0, 1200.0),
        };
        let _ = render_page(&page, true);
    }

    #[test]
    fn test_render_progress_bar_zero_total() {
        let bar = render_progress_bar((0, 0));
        assert_eq!(bar.spans.len(), 20);
    }

    #[test]
    fn test_render_progress_bar_complete() {
        let bar = render_progress_bar((10, 10));
        assert_eq!(bar.spans.len(), 20);
    }
}
