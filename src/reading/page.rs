//! Pages of the open chapter and their placement in the scroll container.

use crate::engine::config::{ReadingDirection, ReadingMode};
use crate::geometry::{Axis, Rect, ScrollOffset, Size};

/// Opaque reference to a page image; the core never looks inside.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PageSource(String);

impl PageSource {
    pub fn new(source: impl Into<String>) -> Self {
        Self(source.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Page {
    pub index: usize,
    pub source: PageSource,
    /// Bounds relative to the viewport's top-left corner.
    pub bounds: Rect,
}

/// Ordered, immutable snapshot of the chapter's pages in reading order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Pages {
    pages: Vec<Page>,
}

impl Pages {
    pub fn new(pages: Vec<Page>) -> Self {
        debug_assert!(pages.iter().enumerate().all(|(i, page)| page.index == i));
        Self { pages }
    }

    pub fn len(&self) -> usize {
        self.pages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Page> {
        self.pages.get(index)
    }

    pub fn last_index(&self) -> Option<usize> {
        self.pages.len().checked_sub(1)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Page> {
        self.pages.iter()
    }

    pub fn as_slice(&self) -> &[Page] {
        &self.pages
    }
}

/// Natural pixel size of a page image.
#[derive(Debug, Clone, PartialEq)]
pub struct PageSpec {
    pub source: PageSource,
    pub width: f64,
    pub height: f64,
}

impl PageSpec {
    pub fn new(source: impl Into<String>, width: f64, height: f64) -> Self {
        Self {
            source: PageSource::new(source),
            width,
            height,
        }
    }
}

/// Places a chapter's pages in document space for one reading mode.
///
/// Continuous modes stack pages along the reading axis, scaled to fill the
/// viewport's cross extent. Paged modes give every spread (one or two pages)
/// a full viewport. Right-to-left horizontal layouts start at the right edge.
#[derive(Debug, Clone, PartialEq)]
pub struct PageLayout {
    mode: ReadingMode,
    rtl: bool,
    viewport: Size,
    /// Document-space rectangles, with x measured from the start edge.
    rects: Vec<Rect>,
    sources: Vec<PageSource>,
    content: Size,
}

impl PageLayout {
    pub fn new(
        specs: &[PageSpec],
        mode: ReadingMode,
        direction: ReadingDirection,
        viewport: Size,
    ) -> Self {
        let rtl = direction.is_rtl() && mode.axis() == Axis::Horizontal;
        let (rects, content) = if mode.is_paged() {
            layout_spreads(specs, mode.pages_per_view(), viewport)
        } else {
            layout_strip(specs, mode.axis(), viewport)
        };
        Self {
            mode,
            rtl,
            viewport,
            rects,
            sources: specs.iter().map(|spec| spec.source.clone()).collect(),
            content,
        }
    }

    pub fn mode(&self) -> ReadingMode {
        self.mode
    }

    pub fn axis(&self) -> Axis {
        self.mode.axis()
    }

    pub fn is_rtl(&self) -> bool {
        self.rtl
    }

    pub fn content_size(&self) -> Size {
        self.content
    }

    pub fn page_count(&self) -> usize {
        self.rects.len()
    }

    /// Viewport-space snapshot for the given scroll offset.
    pub fn snapshot(&self, offset: ScrollOffset) -> Pages {
        let pages = self
            .rects
            .iter()
            .zip(&self.sources)
            .enumerate()
            .map(|(index, (rect, source))| Page {
                index,
                source: source.clone(),
                bounds: self.to_viewport(rect).translated(-offset.left, -offset.top),
            })
            .collect();
        Pages::new(pages)
    }

    /// Offset that brings the start of page `index` to the viewport's start edge.
    pub fn offset_for_page(&self, index: usize) -> Option<ScrollOffset> {
        let rect = self.rects.get(index)?;
        Some(match self.axis() {
            Axis::Vertical => ScrollOffset::new(0.0, rect.top),
            Axis::Horizontal => {
                let start = if self.mode.is_paged() {
                    (rect.left / self.viewport.width).floor() * self.viewport.width
                } else {
                    rect.left
                };
                let left = if self.rtl { -start } else { start };
                ScrollOffset::new(left, 0.0)
            }
        })
    }

    fn to_viewport(&self, rect: &Rect) -> Rect {
        if self.rtl {
            // Start edge is the right side of the viewport at scroll 0.
            Rect::new(
                self.viewport.width - rect.right(),
                rect.top,
                rect.width,
                rect.height,
            )
        } else {
            *rect
        }
    }
}

fn layout_strip(specs: &[PageSpec], axis: Axis, viewport: Size) -> (Vec<Rect>, Size) {
    let mut cursor = 0.0;
    let rects: Vec<Rect> = specs
        .iter()
        .map(|spec| {
            let rect = match axis {
                Axis::Vertical => {
                    let height = scaled(spec.height, spec.width, viewport.width);
                    Rect::new(0.0, cursor, viewport.width, height)
                }
                Axis::Horizontal => {
                    let width = scaled(spec.width, spec.height, viewport.height);
                    Rect::new(cursor, 0.0, width, viewport.height)
                }
            };
            cursor += match axis {
                Axis::Vertical => rect.height,
                Axis::Horizontal => rect.width,
            };
            rect
        })
        .collect();

    let content = match axis {
        Axis::Vertical => Size::new(viewport.width, cursor),
        Axis::Horizontal => Size::new(cursor, viewport.height),
    };
    (rects, content)
}

// Spreads are laid out in reading order; RTL mirroring happens in
// `to_viewport`, which also puts the first page of a spread on the right.
fn layout_spreads(specs: &[PageSpec], per_view: usize, viewport: Size) -> (Vec<Rect>, Size) {
    let slot_width = viewport.width / per_view as f64;
    let rects = (0..specs.len())
        .map(|index| {
            let spread = index / per_view;
            let slot = index % per_view;
            Rect::new(
                spread as f64 * viewport.width + slot as f64 * slot_width,
                0.0,
                slot_width,
                viewport.height,
            )
        })
        .collect();
    let spreads = specs.len().div_ceil(per_view).max(1);
    (rects, Size::new(spreads as f64 * viewport.width, viewport.height))
}

fn scaled(length: f64, cross: f64, target_cross: f64) -> f64 {
    if cross > 0.0 {
        length * target_cross / cross
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn specs(count: usize) -> Vec<PageSpec> {
        (0..count)
            .map(|i| PageSpec::new(format!("page-{i}.jpg"), 800.0, 1200.0))
            .collect()
    }

    #[test]
    fn test_vertical_strip_scales_to_width() {
        let layout = PageLayout::new(
            &specs(3),
            ReadingMode::Webtoon,
            ReadingDirection::LeftToRight,
            Size::new(400.0, 800.0),
        );
        assert_eq!(layout.content_size(), Size::new(400.0, 1800.0));

        let pages = layout.snapshot(ScrollOffset::new(0.0, 700.0));
        assert_eq!(pages.len(), 3);
        assert_eq!(pages.get(1).unwrap().bounds, Rect::new(0.0, -100.0, 400.0, 600.0));
    }

    #[test]
    fn test_rtl_horizontal_starts_at_right_edge() {
        let layout = PageLayout::new(
            &specs(2),
            ReadingMode::ContinuousHorizontal,
            ReadingDirection::RightToLeft,
            Size::new(500.0, 600.0),
        );
        let pages = layout.snapshot(ScrollOffset::default());
        // Pages are 400px wide at 600px height
        assert_eq!(pages.get(0).unwrap().bounds.left, 100.0);
        assert_eq!(pages.get(1).unwrap().bounds.left, -300.0);

        let scrolled = layout.snapshot(ScrollOffset::new(-400.0, 0.0));
        assert_eq!(scrolled.get(1).unwrap().bounds.left, 100.0);
    }

    #[test]
    fn test_double_page_spreads() {
        let layout = PageLayout::new(
            &specs(5),
            ReadingMode::DoublePage,
            ReadingDirection::LeftToRight,
            Size::new(1000.0, 700.0),
        );
        assert_eq!(layout.content_size().width, 3000.0);
        assert_eq!(
            layout.offset_for_page(3),
            Some(ScrollOffset::new(1000.0, 0.0))
        );
        assert_eq!(layout.offset_for_page(9), None);
    }

    #[test]
    fn test_rtl_offsets_are_negative() {
        let layout = PageLayout::new(
            &specs(3),
            ReadingMode::SinglePage,
            ReadingDirection::RightToLeft,
            Size::new(500.0, 700.0),
        );
        assert_eq!(
            layout.offset_for_page(2),
            Some(ScrollOffset::new(-1000.0, 0.0))
        );
    }
}
