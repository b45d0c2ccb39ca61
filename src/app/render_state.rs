use crate::app::mode::AppMode;
use crate::engine::config::ReadingMode;
use crate::geometry::Size;
use crate::overlay::TapRegion;
use crate::reading::{AutoScrollState, Page};

/// Render state for UI components
#[derive(Debug, Clone, PartialEq)]
pub struct RenderState {
    pub mode: AppMode,
    pub reading_mode: ReadingMode,
    pub chapter_title: String,
    pub chapter: (usize, usize),
    pub current_page: usize,
    pub page_count: usize,
    pub auto_scroll: AutoScrollState,
    pub viewport: Size,
    /// Pages intersecting the viewport, bounds relative to it
    pub visible_pages: Vec<Page>,
    /// Horizontal offset of the page under a swipe
    pub swipe_offset: f64,
    /// Page revealed behind a swipe, if any
    pub preview_page: Option<usize>,
    /// Only populated while the menu overlay is open
    pub tap_regions: Vec<TapRegion>,
}

impl RenderState {
    /// 1-based page position for display.
    pub fn progress(&self) -> (usize, usize) {
        if self.page_count == 0 {
            (0, 0)
        } else {
            (self.current_page + 1, self.page_count)
        }
    }
}
