use std::cell::Cell;
use std::rc::Rc;

use super::event::{AppEvent, ReaderKey};
use super::mode::AppMode;
use super::render_state::RenderState;
use crate::engine::config::{ReaderSettings, ReadingDirection};
use crate::engine::inertia::{AxisConfig, DragSample, DragSamples, InertiaStep, InertialScroller};
use crate::engine::timing::Scheduler;
use crate::geometry::{
    Axis, GeometryEvent, GeometryObserver, ScrollContainer, ScrollOffset, ScrollSurface, Size,
};
use crate::overlay::{TapAction, TapZoneCache, TapZoneKey};
use crate::reading::{
    locate_current_page, preview_page_index, scroll_intent, swipe_direction, AutoScrollState,
    AutoScrollStep, AutoScroller, ChapterLoad, Library, NavigationController, NavigationOutcome,
    PageDirection, PageLayout, ScrollDirection, SwipeClassifier, SwipeEvent, TouchPoint,
};

/// Font the terminal host draws tap-zone labels with.
pub const DEFAULT_FONT: &str = "monospace";

/// Owns one instance of every reader component and routes host events and
/// timer ticks between them.
///
/// The scroll container is the only shared mutable state. User drags, the
/// inertial engine and auto-scroll all write to it, and user input always
/// cancels the automatic writers first.
pub struct ReaderApp {
    settings: ReaderSettings,
    mode: AppMode,
    scheduler: Scheduler,
    container: ScrollContainer,
    observer: GeometryObserver,
    layout: PageLayout,
    library: Library,
    navigation: NavigationController,
    swipe: SwipeClassifier,
    inertia: InertialScroller,
    auto_scroll: AutoScroller,
    /// Page turns requested by callback-mode auto-scroll, drained on tick.
    page_turns: Rc<Cell<usize>>,
    tap_zones: TapZoneCache,
    drag: Option<DragSamples>,
    font: String,
}

impl ReaderApp {
    pub fn new(settings: ReaderSettings, library: Library, viewport: Size) -> Self {
        let observer = GeometryObserver::new();
        let page_turns = Rc::new(Cell::new(0));
        let auto_scroll = build_auto_scroller(&settings, viewport, &observer, &page_turns);
        let layout = PageLayout::new(
            &library.current_chapter().pages,
            settings.reading_mode,
            settings.reading_direction,
            viewport,
        );
        let container = ScrollContainer::new(viewport, layout.content_size(), layout.is_rtl());
        let mut navigation =
            NavigationController::new(settings.reading_mode, settings.auto_advance_chapter);
        navigation.on_chapter_loaded(layout.page_count(), 0);

        Self {
            swipe: SwipeClassifier::new(
                settings.swipe.clone(),
                settings.swipe_navigation_enabled(),
                settings.reading_direction,
            ),
            inertia: InertialScroller::new(settings.inertia.clone()),
            settings,
            mode: AppMode::Reading,
            scheduler: Scheduler::new(),
            container,
            observer,
            layout,
            library,
            navigation,
            auto_scroll,
            page_turns,
            tap_zones: TapZoneCache::new(),
            drag: None,
            font: DEFAULT_FONT.to_string(),
        }
    }

    pub fn mode(&self) -> AppMode {
        self.mode
    }

    pub fn settings(&self) -> &ReaderSettings {
        &self.settings
    }

    pub fn current_page(&self) -> usize {
        self.navigation.current_page()
    }

    pub fn page_count(&self) -> usize {
        self.navigation.page_count()
    }

    pub fn chapter_index(&self) -> usize {
        self.library.current_index()
    }

    pub fn scroll_offset(&self) -> ScrollOffset {
        self.container.offset()
    }

    pub fn auto_scroll_state(&self) -> AutoScrollState {
        self.auto_scroll.state()
    }

    pub fn is_flying(&self) -> bool {
        self.inertia.is_flying()
    }

    pub fn swipe_offset(&self) -> f64 {
        self.swipe.preview_offset()
    }

    pub fn live_timers(&self) -> usize {
        self.scheduler.live_count()
    }

    /// Earliest timer deadline; the host sleeps no longer than this.
    pub fn next_deadline(&self) -> Option<u64> {
        self.scheduler.next_deadline()
    }

    pub fn tap_zone_rebuilds(&self) -> usize {
        self.tap_zones.rebuild_count()
    }

    pub fn observer(&self) -> &GeometryObserver {
        &self.observer
    }

    pub fn set_font(&mut self, font: impl Into<String>) {
        self.font = font.into();
    }

    pub fn handle_event(&mut self, event: AppEvent, now_ms: u64) {
        match event {
            AppEvent::Quit => {
                self.cancel_loops();
                self.mode = AppMode::Quit;
            }
            AppEvent::PointerDown { x, y } => {
                self.preempt();
                self.gesture_start(&[TouchPoint::new(x, y)], now_ms);
            }
            AppEvent::PointerMove { x, y } => self.gesture_move(&[TouchPoint::new(x, y)], now_ms),
            AppEvent::PointerUp { x, y } => {
                self.gesture_move(&[TouchPoint::new(x, y)], now_ms);
                self.gesture_end(now_ms);
            }
            AppEvent::TouchStart(touches) => {
                self.preempt();
                self.gesture_start(&touches, now_ms);
            }
            AppEvent::TouchMove(touches) => self.gesture_move(&touches, now_ms),
            AppEvent::TouchEnd => self.gesture_end(now_ms),
            AppEvent::Wheel { dx, dy } => {
                self.preempt();
                self.wheel(dx, dy);
            }
            AppEvent::Key(key) => self.handle_key(key, now_ms),
            AppEvent::Tap { x, y } => self.handle_tap(x, y),
            AppEvent::Resize(size) => self.resize(size),
        }
        self.apply_library_requests();
    }

    /// Runs every timer due at `now_ms`, then re-locates the current page.
    pub fn tick(&mut self, now_ms: u64) {
        let mut scrolled = false;
        for tick in self.scheduler.poll(now_ms) {
            if self.inertia.timer() == Some(tick.id) {
                let step = self
                    .inertia
                    .on_tick(&tick, &mut self.container, &mut self.scheduler);
                scrolled |= !matches!(step, InertiaStep::Ignored);
            } else if self.auto_scroll.timer() == Some(tick.id) {
                let step = self
                    .auto_scroll
                    .on_tick(&tick, &mut self.container, &mut self.scheduler);
                scrolled |= matches!(step, AutoScrollStep::Scrolled { .. });
            } else if let Some(SwipeEvent::Finished {
                direction,
                committed: true,
            }) = self.swipe.on_tick(&tick, &mut self.scheduler)
            {
                self.turn_page(direction);
            }
        }

        for _ in 0..self.page_turns.replace(0) {
            if self.turn_page(PageDirection::Next) == NavigationOutcome::Unchanged {
                self.auto_scroll.cancel(&mut self.scheduler);
                break;
            }
        }

        if scrolled {
            self.after_scroll();
        }
        self.apply_library_requests();
    }

    /// Applies new settings. Every running loop is torn down; auto-scroll
    /// resumes in its previous state.
    pub fn update_settings(&mut self, settings: ReaderSettings, now_ms: u64) {
        let previous = self.auto_scroll.state();
        let same_driver = settings.reading_mode.is_paged() == self.settings.reading_mode.is_paged();
        self.inertia.cancel(&mut self.scheduler);
        self.swipe.reset(&mut self.scheduler);
        self.drag = None;

        if same_driver && !settings.reading_mode.is_paged() {
            self.auto_scroll.update_settings(
                settings.auto_scroll.clone(),
                settings.scroll_amount_percentage,
                settings.reading_mode.axis(),
                settings.reading_direction,
                &mut self.scheduler,
                now_ms,
            );
        } else {
            self.auto_scroll.cancel(&mut self.scheduler);
            self.auto_scroll = build_auto_scroller(
                &settings,
                self.container.client(),
                &self.observer,
                &self.page_turns,
            );
            if previous != AutoScrollState::Idle {
                self.auto_scroll.start(&mut self.scheduler, now_ms);
                if previous == AutoScrollState::Paused {
                    self.auto_scroll.pause(&mut self.scheduler);
                }
            }
        }

        self.swipe.reconfigure(
            settings.swipe.clone(),
            settings.swipe_navigation_enabled(),
            settings.reading_direction,
        );
        self.inertia.set_config(settings.inertia.clone());
        self.navigation
            .reconfigure(settings.reading_mode, settings.auto_advance_chapter);
        self.settings = settings;
        self.relayout(self.container.client(), false);
    }

    pub fn get_render_state(&mut self) -> RenderState {
        let offset = self.container.offset();
        let viewport = self.container.client();
        let visible_pages = self
            .layout
            .snapshot(offset)
            .iter()
            .filter(|page| {
                let b = page.bounds;
                b.right() > 0.0
                    && b.left < viewport.width
                    && b.bottom() > 0.0
                    && b.top < viewport.height
            })
            .cloned()
            .collect();

        let swipe_offset = self.swipe.preview_offset();
        let preview_page = (swipe_offset != 0.0)
            .then(|| {
                let direction = swipe_direction(swipe_offset < 0.0, self.settings.reading_direction);
                preview_page_index(
                    self.navigation.current_page(),
                    direction,
                    self.navigation.page_count(),
                    self.settings.reading_mode,
                )
            })
            .flatten();

        let tap_regions = if self.mode == AppMode::Menu {
            let key = self.tap_zone_key();
            self.tap_zones.get(&key).regions().to_vec()
        } else {
            Vec::new()
        };

        let chapter = self.library.current_chapter();
        RenderState {
            mode: self.mode,
            reading_mode: self.settings.reading_mode,
            chapter_title: chapter.title.clone(),
            chapter: (self.library.current_index(), self.library.chapter_count()),
            current_page: self.navigation.current_page(),
            page_count: self.navigation.page_count(),
            auto_scroll: self.auto_scroll.state(),
            viewport,
            visible_pages,
            swipe_offset,
            preview_page,
            tap_regions,
        }
    }

    /// User input takes the scroll container away from the automatic writers.
    fn preempt(&mut self) {
        self.inertia.cancel(&mut self.scheduler);
        self.auto_scroll.cancel(&mut self.scheduler);
    }

    fn cancel_loops(&mut self) {
        self.preempt();
        self.swipe.reset(&mut self.scheduler);
        self.drag = None;
    }

    fn gesture_start(&mut self, touches: &[TouchPoint], now_ms: u64) {
        if self.settings.reading_mode.is_paged() {
            self.swipe.on_touch_start(touches, &mut self.scheduler);
            return;
        }
        self.drag = match touches {
            [point] => Some(DragSamples::start(DragSample::new(point.x, point.y, now_ms))),
            _ => None,
        };
    }

    fn gesture_move(&mut self, touches: &[TouchPoint], now_ms: u64) {
        if self.settings.reading_mode.is_paged() {
            self.swipe.on_touch_move(touches);
            return;
        }
        let (Some(samples), [point]) = (self.drag.as_mut(), touches) else {
            self.drag = None;
            return;
        };
        let last = samples.latest();
        samples.push(DragSample::new(point.x, point.y, now_ms));

        // Content follows the finger, so the offset moves the other way.
        let (dx, dy) = match self.layout.axis() {
            Axis::Horizontal => (last.x - point.x, 0.0),
            Axis::Vertical => (0.0, last.y - point.y),
        };
        if dx != 0.0 || dy != 0.0 {
            self.container.scroll_by(dx, dy);
            self.after_scroll();
        }
    }

    fn gesture_end(&mut self, now_ms: u64) {
        if self.settings.reading_mode.is_paged() {
            let width = self.container.client().width;
            self.swipe.on_touch_end(width, &mut self.scheduler, now_ms);
            return;
        }
        if let Some(samples) = self.drag.take() {
            let axes = match self.layout.axis() {
                Axis::Horizontal => AxisConfig::HORIZONTAL,
                Axis::Vertical => AxisConfig::VERTICAL,
            };
            self.inertia
                .on_drag_end(&samples, &self.container, axes, &mut self.scheduler, now_ms);
        }
    }

    fn wheel(&mut self, dx: f64, dy: f64) {
        let amount = if dx != 0.0 { dx } else { dy };
        if amount == 0.0 {
            return;
        }
        if self.settings.reading_mode.is_paged() {
            let direction = if amount > 0.0 {
                PageDirection::Next
            } else {
                PageDirection::Previous
            };
            self.turn_page(direction);
            return;
        }
        let amount = if self.layout.is_rtl() { -amount } else { amount };
        match self.layout.axis() {
            Axis::Horizontal => self.container.scroll_by(amount, 0.0),
            Axis::Vertical => self.container.scroll_by(0.0, amount),
        }
        self.after_scroll();
    }

    fn handle_key(&mut self, key: ReaderKey, now_ms: u64) {
        // Arrow keys follow the page order on screen.
        let (left, right) = match self.settings.reading_direction {
            ReadingDirection::LeftToRight => (PageDirection::Previous, PageDirection::Next),
            ReadingDirection::RightToLeft => (PageDirection::Next, PageDirection::Previous),
        };
        match key {
            ReaderKey::Left => {
                self.turn_page(left);
            }
            ReaderKey::Right => {
                self.turn_page(right);
            }
            ReaderKey::Up | ReaderKey::PageUp => {
                self.step(ScrollDirection::Backward, PageDirection::Previous)
            }
            ReaderKey::Down | ReaderKey::PageDown => {
                self.step(ScrollDirection::Forward, PageDirection::Next)
            }
            ReaderKey::ToggleAutoScroll => {
                self.inertia.cancel(&mut self.scheduler);
                self.auto_scroll.toggle_active(&mut self.scheduler, now_ms);
            }
            ReaderKey::TogglePause => {
                if self.auto_scroll.is_paused() {
                    self.auto_scroll.resume(&mut self.scheduler, now_ms);
                } else {
                    self.auto_scroll.pause(&mut self.scheduler);
                }
            }
            ReaderKey::Menu => self.toggle_menu(),
        }
    }

    /// Scrolls one intent in continuous modes, turns a page in paged modes.
    fn step(&mut self, scroll: ScrollDirection, page: PageDirection) {
        if self.settings.reading_mode.is_paged() {
            self.turn_page(page);
            return;
        }
        let axis = self.layout.axis();
        let intent = scroll_intent(scroll, &self.container.geometry(), &self.settings, axis);
        intent.apply(&mut self.container, axis, self.layout.is_rtl());
        self.after_scroll();
    }

    fn handle_tap(&mut self, x: f64, y: f64) {
        if self.mode == AppMode::Menu {
            self.mode = AppMode::Reading;
            return;
        }
        let key = self.tap_zone_key();
        match self.tap_zones.get(&key).action_at(x, y) {
            Some(TapAction::Previous) => {
                self.turn_page(PageDirection::Previous);
            }
            Some(TapAction::Next) => {
                self.turn_page(PageDirection::Next);
            }
            Some(TapAction::Menu) => self.toggle_menu(),
            None => {}
        }
    }

    fn toggle_menu(&mut self) {
        self.mode = match self.mode {
            AppMode::Reading => AppMode::Menu,
            AppMode::Menu => AppMode::Reading,
            AppMode::Quit => AppMode::Quit,
        };
    }

    fn tap_zone_key(&self) -> TapZoneKey {
        let client = self.container.client();
        TapZoneKey {
            layout: self.settings.tap_zones.layout,
            width: client.width.round() as u32,
            height: client.height.round() as u32,
            font: self.font.clone(),
            invert: self.settings.tap_zones.invert,
            language: self.settings.language.clone(),
        }
    }

    fn turn_page(&mut self, direction: PageDirection) -> NavigationOutcome {
        self.navigation.open_page(direction, &mut self.library)
    }

    fn resize(&mut self, size: Size) {
        self.container.resize(size);
        self.relayout(size, true);
        self.observer.notify(GeometryEvent::Resize(size));
    }

    /// Rebuilds the page layout for the current settings and viewport.
    ///
    /// Continuous modes keep their relative scroll position when asked to;
    /// otherwise the current page is brought back into view.
    fn relayout(&mut self, viewport: Size, keep_position: bool) {
        let before = self.container.geometry();
        self.layout = PageLayout::new(
            &self.library.current_chapter().pages,
            self.settings.reading_mode,
            self.settings.reading_direction,
            viewport,
        );
        self.container.set_rtl(self.layout.is_rtl());
        self.container.set_content_size(self.layout.content_size());

        if keep_position && self.settings.reading_mode.is_continuous() {
            let axis = self.layout.axis();
            let old_extent = before.scroll_size.along(axis);
            let ratio = if old_extent > 0.0 {
                self.layout.content_size().along(axis) / old_extent
            } else {
                1.0
            };
            self.container.scroll_to(ScrollOffset::new(
                before.offset.left * ratio,
                before.offset.top * ratio,
            ));
            self.after_scroll();
        } else {
            self.show_page(self.navigation.current_page());
        }
    }

    fn show_page(&mut self, index: usize) {
        if let Some(offset) = self.layout.offset_for_page(index) {
            self.container.scroll_to(offset);
        }
        self.after_scroll();
    }

    /// Publishes the new offset and, in continuous modes, re-locates the
    /// current page. Paged modes change pages only through navigation.
    fn after_scroll(&mut self) {
        let offset = self.container.offset();
        self.observer.notify(GeometryEvent::Scroll(offset));
        if !self.settings.reading_mode.is_continuous() {
            return;
        }
        let pages = self.layout.snapshot(offset);
        let located = locate_current_page(
            &self.container.geometry(),
            &pages,
            self.layout.axis(),
            self.layout.is_rtl(),
        );
        self.navigation.on_page_located(located, &mut self.library);
    }

    fn apply_library_requests(&mut self) {
        loop {
            if let Some(load) = self.library.take_chapter_load() {
                self.load_chapter(load);
            } else if let Some(page) = self.library.take_page_request() {
                self.show_page(page);
            } else {
                break;
            }
        }
    }

    fn load_chapter(&mut self, load: ChapterLoad) {
        self.cancel_loops();
        self.page_turns.set(0);
        self.layout = PageLayout::new(
            &self.library.current_chapter().pages,
            self.settings.reading_mode,
            self.settings.reading_direction,
            self.container.client(),
        );
        self.container.set_content_size(self.layout.content_size());
        let offset = self
            .layout
            .offset_for_page(load.initial_page)
            .unwrap_or_default();
        self.container.scroll_to(offset);
        self.navigation
            .on_chapter_loaded(self.layout.page_count(), load.initial_page);
        self.observer
            .notify(GeometryEvent::Scroll(self.container.offset()));
    }
}

fn build_auto_scroller(
    settings: &ReaderSettings,
    viewport: Size,
    observer: &GeometryObserver,
    page_turns: &Rc<Cell<usize>>,
) -> AutoScroller {
    let mut scroller = if settings.reading_mode.is_paged() {
        let turns = Rc::clone(page_turns);
        AutoScroller::with_callback(settings.auto_scroll.page_turning(), move || {
            turns.set(turns.get() + 1)
        })
    } else {
        AutoScroller::new(
            settings.auto_scroll.clone(),
            settings.scroll_amount_percentage,
            settings.reading_mode.axis(),
            settings.reading_direction,
            viewport,
        )
    };
    scroller.observe_resizes(observer);
    scroller
}
