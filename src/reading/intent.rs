//! Keyboard and button scrolling.

use crate::engine::config::ReaderSettings;
use crate::geometry::{Axis, ScrollSurface, ViewportGeometry};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrollDirection {
    Forward,
    Backward,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrollBehavior {
    Smooth,
    Instant,
}

/// A single "scroll forward/backward" request handed to the viewport.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScrollIntent {
    pub direction: ScrollDirection,
    pub amount_px: f64,
    pub behavior: ScrollBehavior,
}

impl ScrollIntent {
    /// Signed pixel delta along `axis`. Forward is toward the end of the
    /// document, which is leftward for right-to-left horizontal reading.
    pub fn delta(&self, axis: Axis, rtl: bool) -> f64 {
        let mut delta = match self.direction {
            ScrollDirection::Forward => self.amount_px,
            ScrollDirection::Backward => -self.amount_px,
        };
        if rtl && axis == Axis::Horizontal {
            delta = -delta;
        }
        delta
    }

    /// Scrolls `surface` by this intent. The in-memory surface has no
    /// animation, so both behaviors land on the final position at once.
    pub fn apply(&self, surface: &mut dyn ScrollSurface, axis: Axis, rtl: bool) {
        let delta = self.delta(axis, rtl);
        match axis {
            Axis::Horizontal => surface.scroll_by(delta, 0.0),
            Axis::Vertical => surface.scroll_by(0.0, delta),
        }
    }
}

pub fn scroll_intent(
    direction: ScrollDirection,
    geometry: &ViewportGeometry,
    settings: &ReaderSettings,
    axis: Axis,
) -> ScrollIntent {
    let amount_px = geometry.client.along(axis) * settings.scroll_amount_percentage / 100.0;
    let behavior = if settings.auto_scroll.smooth {
        ScrollBehavior::Smooth
    } else {
        ScrollBehavior::Instant
    };
    ScrollIntent {
        direction,
        amount_px,
        behavior,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{ScrollContainer, ScrollOffset, Size};

    fn settings(percentage: f64, smooth: bool) -> ReaderSettings {
        let mut settings = ReaderSettings::default();
        settings.scroll_amount_percentage = percentage;
        settings.auto_scroll.smooth = smooth;
        settings
    }

    #[test]
    fn test_amount_follows_percentage() {
        let geometry = ViewportGeometry {
            client: Size::new(600.0, 1000.0),
            scroll_size: Size::new(600.0, 9000.0),
            offset: ScrollOffset::default(),
        };
        let intent = scroll_intent(
            ScrollDirection::Forward,
            &geometry,
            &settings(75.0, false),
            Axis::Vertical,
        );
        assert_eq!(intent.amount_px, 750.0);
        assert_eq!(intent.behavior, ScrollBehavior::Instant);

        let intent = scroll_intent(
            ScrollDirection::Backward,
            &geometry,
            &settings(50.0, true),
            Axis::Horizontal,
        );
        assert_eq!(intent.amount_px, 300.0);
        assert_eq!(intent.behavior, ScrollBehavior::Smooth);
    }

    #[test]
    fn test_apply_vertical() {
        let mut surface =
            ScrollContainer::new(Size::new(600.0, 1000.0), Size::new(600.0, 9000.0), false);
        let forward = ScrollIntent {
            direction: ScrollDirection::Forward,
            amount_px: 750.0,
            behavior: ScrollBehavior::Instant,
        };
        forward.apply(&mut surface, Axis::Vertical, false);
        forward.apply(&mut surface, Axis::Vertical, false);
        assert_eq!(surface.offset().top, 1500.0);

        let backward = ScrollIntent {
            direction: ScrollDirection::Backward,
            ..forward
        };
        backward.apply(&mut surface, Axis::Vertical, false);
        assert_eq!(surface.offset().top, 750.0);
    }

    #[test]
    fn test_forward_is_leftward_for_rtl() {
        let mut surface =
            ScrollContainer::new(Size::new(500.0, 800.0), Size::new(3000.0, 800.0), true);
        let intent = ScrollIntent {
            direction: ScrollDirection::Forward,
            amount_px: 400.0,
            behavior: ScrollBehavior::Instant,
        };
        intent.apply(&mut surface, Axis::Horizontal, true);
        assert_eq!(surface.offset().left, -400.0);
        // RTL has no effect on vertical scrolling
        assert_eq!(intent.delta(Axis::Vertical, true), 400.0);
    }
}
