//! Plain numeric geometry shared by the reader core.
//!
//! All values are in CSS-like pixels. Bounds handed to the core are relative
//! to the viewport's top-left corner.

pub mod observer;
pub mod viewport;

pub use observer::{GeometryEvent, GeometryObserver, Subscription};
pub use viewport::{ScrollContainer, ScrollSurface};

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Axis {
    Horizontal,
    Vertical,
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    pub fn along(&self, axis: Axis) -> f64 {
        match axis {
            Axis::Horizontal => self.width,
            Axis::Vertical => self.height,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    pub fn right(&self) -> f64 {
        self.left + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.top + self.height
    }

    pub fn contains(&self, x: f64, y: f64) -> bool {
        x >= self.left && x < self.right() && y >= self.top && y < self.bottom()
    }

    /// Leading and trailing edge along `axis`, in reading order.
    ///
    /// For right-to-left horizontal reading the leading edge is the right
    /// side, measured from the viewport's right edge.
    pub fn span(&self, axis: Axis, rtl: bool, viewport: Size) -> (f64, f64) {
        match axis {
            Axis::Vertical => (self.top, self.bottom()),
            Axis::Horizontal if rtl => (
                viewport.width - self.right(),
                viewport.width - self.left,
            ),
            Axis::Horizontal => (self.left, self.right()),
        }
    }

    pub fn translated(&self, dx: f64, dy: f64) -> Self {
        Self {
            left: self.left + dx,
            top: self.top + dy,
            ..*self
        }
    }
}

/// Scroll offset of a container. Right-to-left horizontal containers report
/// a non-positive `left`, like browsers do.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ScrollOffset {
    pub left: f64,
    pub top: f64,
}

impl ScrollOffset {
    pub fn new(left: f64, top: f64) -> Self {
        Self { left, top }
    }

    pub fn along(&self, axis: Axis) -> f64 {
        match axis {
            Axis::Horizontal => self.left,
            Axis::Vertical => self.top,
        }
    }
}

/// Snapshot of a scroll container's measurements.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ViewportGeometry {
    pub client: Size,
    pub scroll_size: Size,
    pub offset: ScrollOffset,
}

impl ViewportGeometry {
    pub fn max_scroll(&self) -> Size {
        Size::new(
            (self.scroll_size.width - self.client.width).max(0.0),
            (self.scroll_size.height - self.client.height).max(0.0),
        )
    }

    /// Distance left to scroll before reaching the end of the document.
    pub fn remaining(&self, axis: Axis) -> f64 {
        let travelled = self.offset.along(axis).abs();
        (self.max_scroll().along(axis) - travelled).max(0.0)
    }
}
