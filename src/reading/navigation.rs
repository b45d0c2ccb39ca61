//! Turns page-locator results and navigation requests into page changes and
//! chapter transitions.

use crate::engine::config::ReadingMode;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PageDirection {
    Next,
    Previous,
}

/// The chapter/page collaborator the controller drives.
pub trait ChapterNavigator {
    /// Show page `index` of the open chapter.
    fn go_to_page(&mut self, index: usize);

    /// Load the adjacent chapter. Returns false if there is none.
    fn open_chapter(&mut self, direction: PageDirection) -> bool;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavigationOutcome {
    PageChanged(usize),
    ChapterRequested(PageDirection),
    Unchanged,
}

pub struct NavigationController {
    mode: ReadingMode,
    auto_advance: bool,
    page_count: usize,
    current_page: usize,
    /// Set while the auto-advance boundary condition holds at either end.
    at_start_latched: bool,
    at_end_latched: bool,
    /// A chapter transition is in flight; cleared by `on_chapter_loaded`.
    transition_pending: Option<PageDirection>,
}

impl NavigationController {
    pub fn new(mode: ReadingMode, auto_advance: bool) -> Self {
        Self {
            mode,
            auto_advance,
            page_count: 0,
            current_page: 0,
            at_start_latched: false,
            at_end_latched: false,
            transition_pending: None,
        }
    }

    pub fn reconfigure(&mut self, mode: ReadingMode, auto_advance: bool) {
        self.mode = mode;
        self.auto_advance = auto_advance;
    }

    pub fn current_page(&self) -> usize {
        self.current_page
    }

    pub fn page_count(&self) -> usize {
        self.page_count
    }

    pub fn transition_pending(&self) -> Option<PageDirection> {
        self.transition_pending
    }

    /// A new chapter is on screen.
    ///
    /// Starting on the first or last page does not count as entering that
    /// boundary, so a freshly opened chapter is not left immediately.
    pub fn on_chapter_loaded(&mut self, page_count: usize, initial_page: usize) {
        self.page_count = page_count;
        self.current_page = initial_page.min(page_count.saturating_sub(1));
        self.transition_pending = None;
        self.at_start_latched = self.current_page == 0;
        self.at_end_latched = self.is_last(self.current_page);
    }

    /// Feeds a page-locator result. `None` keeps the last known page.
    pub fn on_page_located(
        &mut self,
        located: Option<usize>,
        navigator: &mut dyn ChapterNavigator,
    ) -> NavigationOutcome {
        let Some(index) = located.filter(|&index| index < self.page_count) else {
            return NavigationOutcome::Unchanged;
        };

        let changed = index != self.current_page;
        self.current_page = index;

        let advance = self.auto_advance && self.mode.is_continuous();

        if !self.is_last(index) {
            self.at_end_latched = false;
        } else if !self.at_end_latched && advance {
            self.at_end_latched = true;
            log::debug!("last page reached, advancing to next chapter");
            if let Some(outcome) = self.request_chapter(PageDirection::Next, navigator) {
                return outcome;
            }
        }

        if index != 0 {
            self.at_start_latched = false;
        } else if !self.at_start_latched && advance {
            self.at_start_latched = true;
            log::debug!("first page reached, going back to previous chapter");
            if let Some(outcome) = self.request_chapter(PageDirection::Previous, navigator) {
                return outcome;
            }
        }

        if changed {
            NavigationOutcome::PageChanged(index)
        } else {
            NavigationOutcome::Unchanged
        }
    }

    /// Next/previous page, crossing into the adjacent chapter at the ends.
    pub fn open_page(
        &mut self,
        direction: PageDirection,
        navigator: &mut dyn ChapterNavigator,
    ) -> NavigationOutcome {
        let step = self.mode.pages_per_view();
        let target = match direction {
            PageDirection::Next => Some(self.current_page + step).filter(|&i| i < self.page_count),
            PageDirection::Previous if self.current_page == 0 => None,
            PageDirection::Previous => Some(self.current_page.saturating_sub(step)),
        };

        match target {
            Some(index) => {
                self.current_page = index;
                self.at_start_latched = index == 0;
                self.at_end_latched = self.is_last(index);
                navigator.go_to_page(index);
                NavigationOutcome::PageChanged(index)
            }
            None => self
                .request_chapter(direction, navigator)
                .unwrap_or(NavigationOutcome::Unchanged),
        }
    }

    fn request_chapter(
        &mut self,
        direction: PageDirection,
        navigator: &mut dyn ChapterNavigator,
    ) -> Option<NavigationOutcome> {
        if self.transition_pending.is_some() {
            return None;
        }
        if navigator.open_chapter(direction) {
            self.transition_pending = Some(direction);
            Some(NavigationOutcome::ChapterRequested(direction))
        } else {
            log::debug!("no chapter in direction {direction:?}");
            None
        }
    }

    fn is_last(&self, index: usize) -> bool {
        self.page_count > 0 && index + 1 == self.page_count
    }
}
