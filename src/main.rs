use std::path::Path;

use pageturn::app::ReaderApp;
use pageturn::engine::config::ReaderSettings;
use pageturn::engine::error::ReaderError;
use pageturn::reading::{Chapter, Library, PageSpec};
use pageturn::ui::TuiManager;

/// A small built-in title so the reader runs without any image files.
fn sample_library() -> Result<Library, ReaderError> {
    let chapter = |number: usize, heights: &[f64]| {
        let pages = heights
            .iter()
            .enumerate()
            .map(|(i, height)| PageSpec::new(format!("ch{number:02}/{:03}.png", i + 1), 800.0, *height))
            .collect();
        Chapter::new(format!("Chapter {number}"), pages)
    };

    Library::new(vec![
        chapter(1, &[1200.0, 1200.0, 1200.0, 2400.0, 1200.0, 600.0])?,
        chapter(2, &[1200.0, 1600.0, 1200.0, 1200.0, 300.0])?,
        chapter(3, &[1200.0; 8])?,
    ])
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let settings = match std::env::args().nth(1) {
        Some(path) => ReaderSettings::load(Path::new(&path))?,
        None => ReaderSettings::default(),
    };
    log::debug!("reading mode {:?}", settings.reading_mode);

    let mut tui = TuiManager::new()?;
    let mut app = ReaderApp::new(settings, sample_library()?, tui.viewport()?);

    tui.run_event_loop(&mut app)?;

    Ok(())
}
