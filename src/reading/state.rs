use crate::engine::error::ReaderError;
use crate::reading::navigation::{ChapterNavigator, PageDirection};
use crate::reading::page::PageSpec;

pub struct Chapter {
    pub title: String,
    pub pages: Vec<PageSpec>,
}

impl Chapter {
    pub fn new(title: impl Into<String>, pages: Vec<PageSpec>) -> Result<Self, ReaderError> {
        let title = title.into();
        if pages.is_empty() {
            return Err(ReaderError::EmptyChapter(title));
        }
        Ok(Self { title, pages })
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }
}

/// A chapter switch accepted by the library, waiting for the host to lay it out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChapterLoad {
    pub chapter: usize,
    pub initial_page: usize,
}

/// The ordered chapters of one title and the reader's position in them.
///
/// Navigation requests are queued rather than applied, because the host has
/// to rebuild the page layout and move the scroll container first.
pub struct Library {
    chapters: Vec<Chapter>,
    current: usize,
    page_request: Option<usize>,
    chapter_load: Option<ChapterLoad>,
}

impl Library {
    pub fn new(chapters: Vec<Chapter>) -> Result<Self, ReaderError> {
        if chapters.is_empty() {
            return Err(ReaderError::EmptyChapter("library has no chapters".to_string()));
        }
        Ok(Self {
            chapters,
            current: 0,
            page_request: None,
            chapter_load: None,
        })
    }

    pub fn current_index(&self) -> usize {
        self.current
    }

    pub fn chapter_count(&self) -> usize {
        self.chapters.len()
    }

    pub fn current_chapter(&self) -> &Chapter {
        &self.chapters[self.current]
    }

    pub fn has_adjacent(&self, direction: PageDirection) -> bool {
        match direction {
            PageDirection::Next => self.current + 1 < self.chapters.len(),
            PageDirection::Previous => self.current > 0,
        }
    }

    pub fn take_page_request(&mut self) -> Option<usize> {
        self.page_request.take()
    }

    pub fn take_chapter_load(&mut self) -> Option<ChapterLoad> {
        self.chapter_load.take()
    }
}

impl ChapterNavigator for Library {
    fn go_to_page(&mut self, index: usize) {
        self.page_request = Some(index);
    }

    fn open_chapter(&mut self, direction: PageDirection) -> bool {
        if !self.has_adjacent(direction) {
            return false;
        }
        self.current = match direction {
            PageDirection::Next => self.current + 1,
            PageDirection::Previous => self.current - 1,
        };
        // Going back lands on the end of the previous chapter
        let initial_page = match direction {
            PageDirection::Next => 0,
            PageDirection::Previous => self.chapters[self.current].page_count() - 1,
        };
        log::debug!(
            "opening chapter {} ({}) at page {initial_page}",
            self.current,
            self.chapters[self.current].title
        );
        self.page_request = None;
        self.chapter_load = Some(ChapterLoad {
            chapter: self.current,
            initial_page,
        });
        true
    }
}
