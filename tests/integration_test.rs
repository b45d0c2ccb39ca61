use pageturn::app::{AppEvent, ReaderApp, ReaderKey};
use pageturn::engine::config::{ReaderSettings, ReadingMode};
use pageturn::geometry::{GeometryEvent, Size};
use pageturn::reading::{AutoScrollState, Chapter, Library, PageSpec, TouchPoint};
use std::cell::RefCell;
use std::fs::{self, File};
use std::io::Write;
use std::path::Path;
use std::rc::Rc;

const VIEWPORT: Size = Size {
    width: 400.0,
    height: 800.0,
};

/// Chapters of 800x1200 pages; 600px tall once fitted to the viewport width.
fn library(page_counts: &[usize]) -> Library {
    let chapters = page_counts
        .iter()
        .enumerate()
        .map(|(c, &count)| {
            let pages = (0..count)
                .map(|p| PageSpec::new(format!("{c}/{p}.png"), 800.0, 1200.0))
                .collect();
            Chapter::new(format!("Chapter {}", c + 1), pages).unwrap()
        })
        .collect();
    Library::new(chapters).unwrap()
}

fn reader(settings: ReaderSettings, page_counts: &[usize]) -> ReaderApp {
    ReaderApp::new(settings, library(page_counts), VIEWPORT)
}

fn settings(mode: ReadingMode) -> ReaderSettings {
    ReaderSettings {
        reading_mode: mode,
        ..ReaderSettings::default()
    }
}

#[test]
fn settings_file_drives_reader() {
    let path = "test_reader_settings.toml";
    let mut file = File::create(path).unwrap();
    file.write_all(
        br#"
reading_mode = "webtoon"
scroll_amount_percentage = 50.0

[auto_scroll]
smooth = false
scroll_per_second = 10.0
"#,
    )
    .unwrap();

    let loaded = ReaderSettings::load(Path::new(path));
    fs::remove_file(path).unwrap();
    let settings = loaded.expect("settings should load");

    let mut app = reader(settings, &[5]);
    app.handle_event(AppEvent::Key(ReaderKey::Down), 0);
    assert_eq!(app.scroll_offset().top, 400.0);

    // 800px * 50% per 100ms interval
    app.handle_event(AppEvent::Key(ReaderKey::ToggleAutoScroll), 0);
    app.tick(100);
    assert_eq!(app.scroll_offset().top, 404.0);
    app.tick(200);
    assert_eq!(app.scroll_offset().top, 408.0);
}

#[test]
fn webtoon_end_requests_next_chapter_once() {
    let mut app = reader(settings(ReadingMode::Webtoon), &[5, 3]);

    app.handle_event(AppEvent::Wheel { dx: 0.0, dy: 10_000.0 }, 0);

    assert_eq!(app.chapter_index(), 1);
    assert_eq!(app.current_page(), 0);
    assert_eq!(app.page_count(), 3);
    assert_eq!(app.scroll_offset().top, 0.0);
}

#[test]
fn webtoon_without_auto_advance_stays_on_last_page() {
    let mut settings = settings(ReadingMode::Webtoon);
    settings.auto_advance_chapter = false;
    let mut app = reader(settings, &[5, 3]);

    app.handle_event(AppEvent::Wheel { dx: 0.0, dy: 10_000.0 }, 0);
    app.handle_event(AppEvent::Wheel { dx: 0.0, dy: 10.0 }, 10);

    assert_eq!(app.chapter_index(), 0);
    assert_eq!(app.current_page(), 4);
}

#[test]
fn drag_release_flies_and_settles() {
    let mut app = reader(settings(ReadingMode::Webtoon), &[8]);

    app.handle_event(AppEvent::PointerDown { x: 200.0, y: 600.0 }, 0);
    app.handle_event(AppEvent::PointerMove { x: 200.0, y: 500.0 }, 16);
    app.handle_event(AppEvent::PointerMove { x: 200.0, y: 400.0 }, 32);
    app.handle_event(AppEvent::PointerUp { x: 200.0, y: 300.0 }, 48);
    assert_eq!(app.scroll_offset().top, 300.0);
    assert!(app.is_flying());

    let mut last = app.scroll_offset().top;
    let mut now = 48;
    while app.is_flying() && now < 2000 {
        now += 16;
        app.tick(now);
        let top = app.scroll_offset().top;
        assert!(top >= last, "flight reversed at {now}ms: {last} -> {top}");
        last = top;
    }

    assert!(!app.is_flying());
    assert!(now <= 48 + 16 * 50, "flight should stop within a few hundred ms");
    assert!(last > 300.0);
    assert_eq!(app.live_timers(), 0);
    assert!(app.current_page() >= 1);
}

#[test]
fn click_without_movement_does_not_fly() {
    let mut app = reader(settings(ReadingMode::Webtoon), &[5]);
    app.handle_event(AppEvent::PointerDown { x: 200.0, y: 600.0 }, 0);
    app.handle_event(AppEvent::PointerUp { x: 200.0, y: 600.0 }, 0);
    app.tick(16);

    assert!(!app.is_flying());
    assert_eq!(app.scroll_offset().top, 0.0);
}

#[test]
fn wheel_cancels_flight() {
    let mut app = reader(settings(ReadingMode::Webtoon), &[8]);
    app.handle_event(AppEvent::PointerDown { x: 200.0, y: 600.0 }, 0);
    app.handle_event(AppEvent::PointerMove { x: 200.0, y: 400.0 }, 16);
    app.handle_event(AppEvent::PointerUp { x: 200.0, y: 200.0 }, 32);
    assert!(app.is_flying());

    app.handle_event(AppEvent::Wheel { dx: 0.0, dy: 10.0 }, 40);
    assert!(!app.is_flying());
    assert_eq!(app.live_timers(), 0);
}

#[test]
fn committed_swipe_turns_page_once() {
    let mut app = reader(settings(ReadingMode::SinglePage), &[5]);

    app.handle_event(AppEvent::TouchStart(vec![TouchPoint::new(300.0, 400.0)]), 0);
    app.handle_event(AppEvent::TouchMove(vec![TouchPoint::new(200.0, 405.0)]), 16);
    app.handle_event(AppEvent::TouchMove(vec![TouchPoint::new(100.0, 410.0)]), 32);
    app.handle_event(AppEvent::TouchEnd, 48);
    assert_eq!(app.current_page(), 0);

    app.tick(100);
    assert_eq!(app.current_page(), 0);
    app.tick(260);
    assert_eq!(app.current_page(), 1);
    assert_eq!(app.scroll_offset().left, 400.0);
    assert_eq!(app.swipe_offset(), 0.0);

    app.tick(400);
    assert_eq!(app.current_page(), 1);
    assert_eq!(app.live_timers(), 0);
}

#[test]
fn short_swipe_snaps_back() {
    let mut app = reader(settings(ReadingMode::SinglePage), &[5]);

    app.handle_event(AppEvent::TouchStart(vec![TouchPoint::new(300.0, 400.0)]), 0);
    // 50px is past the start threshold but under 20% of 400px
    app.handle_event(AppEvent::TouchMove(vec![TouchPoint::new(250.0, 400.0)]), 16);
    app.handle_event(AppEvent::TouchEnd, 32);
    app.tick(300);

    assert_eq!(app.current_page(), 0);
    assert_eq!(app.swipe_offset(), 0.0);
}

#[test]
fn paged_auto_scroll_turns_pages() {
    let mut settings = settings(ReadingMode::SinglePage);
    settings.auto_scroll.page_interval_ms = 1000;
    let mut app = reader(settings, &[3, 2]);

    app.handle_event(AppEvent::Key(ReaderKey::ToggleAutoScroll), 0);
    app.tick(1000);
    assert_eq!(app.current_page(), 1);
    app.tick(2000);
    assert_eq!(app.current_page(), 2);
    assert_eq!(app.auto_scroll_state(), AutoScrollState::Active);

    // Crossing into the next chapter tears the loop down
    app.tick(3000);
    assert_eq!(app.chapter_index(), 1);
    assert_eq!(app.auto_scroll_state(), AutoScrollState::Idle);
    assert_eq!(app.live_timers(), 0);
}

#[test]
fn previous_chapter_opens_on_last_page() {
    let mut app = reader(settings(ReadingMode::SinglePage), &[3, 4]);
    for _ in 0..3 {
        app.handle_event(AppEvent::Key(ReaderKey::Right), 0);
    }
    assert_eq!(app.chapter_index(), 1);
    assert_eq!(app.current_page(), 0);

    app.handle_event(AppEvent::Key(ReaderKey::Left), 0);
    assert_eq!(app.chapter_index(), 0);
    assert_eq!(app.current_page(), 2);
    assert_eq!(app.scroll_offset().left, 800.0);
}

#[test]
fn webtoon_previous_chapter_does_not_bounce_forward() {
    let mut app = reader(settings(ReadingMode::Webtoon), &[5, 3]);
    app.handle_event(AppEvent::Wheel { dx: 0.0, dy: 10_000.0 }, 0);
    assert_eq!(app.chapter_index(), 1);

    app.handle_event(AppEvent::Key(ReaderKey::Left), 10);
    assert_eq!(app.chapter_index(), 0);
    assert_eq!(app.current_page(), 4);

    // Still at the end of chapter 1; the boundary was not re-entered
    app.handle_event(AppEvent::Wheel { dx: 0.0, dy: 10.0 }, 20);
    assert_eq!(app.chapter_index(), 0);
}

#[test]
fn webtoon_scrolling_back_to_top_opens_previous_chapter() {
    let mut app = reader(settings(ReadingMode::Webtoon), &[3, 5]);
    app.handle_event(AppEvent::Wheel { dx: 0.0, dy: 10_000.0 }, 0);
    assert_eq!(app.chapter_index(), 1);

    // Opening on page 0 does not bounce straight back
    app.handle_event(AppEvent::Wheel { dx: 0.0, dy: -10.0 }, 10);
    assert_eq!(app.chapter_index(), 1);

    app.handle_event(AppEvent::Wheel { dx: 0.0, dy: 1_200.0 }, 20);
    assert_eq!(app.current_page(), 2);
    app.handle_event(AppEvent::Wheel { dx: 0.0, dy: -10_000.0 }, 30);
    assert_eq!(app.chapter_index(), 0);
    assert_eq!(app.current_page(), 2);

    // Landing on the end of chapter 1 is latched too
    app.handle_event(AppEvent::Wheel { dx: 0.0, dy: 10.0 }, 40);
    assert_eq!(app.chapter_index(), 0);
}

#[test]
fn resize_reaches_observers_and_auto_scroll() {
    let mut s = settings(ReadingMode::Webtoon);
    s.auto_scroll.smooth = false;
    s.auto_scroll.scroll_per_second = 10.0;
    s.scroll_amount_percentage = 50.0;
    let mut app = reader(s, &[10]);

    let seen = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&seen);
    let subscription = app.observer().subscribe(move |event| {
        if let GeometryEvent::Resize(size) = event {
            sink.borrow_mut().push(*size);
        }
    });

    app.handle_event(AppEvent::Key(ReaderKey::ToggleAutoScroll), 0);
    app.tick(100);
    assert_eq!(app.scroll_offset().top, 4.0);

    app.handle_event(AppEvent::Resize(Size::new(400.0, 1600.0)), 150);
    assert_eq!(*seen.borrow(), vec![Size::new(400.0, 1600.0)]);
    assert_eq!(app.auto_scroll_state(), AutoScrollState::Active);
    assert_eq!(app.live_timers(), 1);

    let before = app.scroll_offset().top;
    app.tick(200);
    assert_eq!(app.scroll_offset().top, before + 8.0);

    subscription.unsubscribe();
    app.handle_event(AppEvent::Resize(VIEWPORT), 250);
    assert_eq!(seen.borrow().len(), 1);
}
