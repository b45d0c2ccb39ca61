//! The scroll container: the single piece of mutable state shared by user
//! drags, inertial flight and auto-scroll.

use super::{ScrollOffset, Size, ViewportGeometry};

/// Anything whose scroll position the reader core may read and write.
pub trait ScrollSurface {
    fn geometry(&self) -> ViewportGeometry;

    /// Moves to `offset`, clamped to the scrollable range.
    fn scroll_to(&mut self, offset: ScrollOffset);

    fn scroll_by(&mut self, dx: f64, dy: f64) {
        let current = self.geometry().offset;
        self.scroll_to(ScrollOffset::new(current.left + dx, current.top + dy));
    }
}

/// In-memory scroll container with browser-like semantics.
///
/// Offsets are rounded to whole pixels, so requests smaller than half a pixel
/// do not move anything. Right-to-left containers scroll horizontally in
/// `[-max, 0]`.
#[derive(Debug, Clone, PartialEq)]
pub struct ScrollContainer {
    client: Size,
    content: Size,
    offset: ScrollOffset,
    rtl: bool,
}

impl ScrollContainer {
    pub fn new(client: Size, content: Size, rtl: bool) -> Self {
        Self {
            client,
            content,
            offset: ScrollOffset::default(),
            rtl,
        }
    }

    pub fn resize(&mut self, client: Size) {
        self.client = client;
        self.reclamp();
    }

    pub fn set_content_size(&mut self, content: Size) {
        self.content = content;
        self.reclamp();
    }

    pub fn set_rtl(&mut self, rtl: bool) {
        if self.rtl != rtl {
            self.rtl = rtl;
            self.offset.left = -self.offset.left;
            self.reclamp();
        }
    }

    pub fn is_rtl(&self) -> bool {
        self.rtl
    }

    pub fn offset(&self) -> ScrollOffset {
        self.offset
    }

    pub fn client(&self) -> Size {
        self.client
    }

    fn reclamp(&mut self) {
        let offset = self.offset;
        self.scroll_to(offset);
    }
}

impl ScrollSurface for ScrollContainer {
    fn geometry(&self) -> ViewportGeometry {
        ViewportGeometry {
            client: self.client,
            scroll_size: Size::new(
                self.content.width.max(self.client.width),
                self.content.height.max(self.client.height),
            ),
            offset: self.offset,
        }
    }

    fn scroll_to(&mut self, offset: ScrollOffset) {
        let max = self.geometry().max_scroll();
        let left = if self.rtl {
            offset.left.round().clamp(-max.width, 0.0)
        } else {
            offset.left.round().clamp(0.0, max.width)
        };
        let top = offset.top.round().clamp(0.0, max.height);
        // -0.0 would compare equal but reads oddly in logs
        self.offset = ScrollOffset::new(left + 0.0, top + 0.0);
    }
}
