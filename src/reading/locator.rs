//! Which page is "current" for a given scroll position.

use crate::geometry::{Axis, ViewportGeometry};
use crate::reading::page::Pages;

/// A page whose trailing edge is at or above this line counts as scrolled past.
pub const VISIBLE_EPSILON_PX: f64 = 1.0;

/// Within this distance of the document end the last page is current,
/// absorbing sub-pixel rounding of the final scroll offset.
pub const END_SAFE_ZONE_PX: f64 = 5.0;

/// Returns the first page, in reading order, that intersects the viewport.
///
/// `None` means the position could not be determined; callers keep their
/// previous value. Page bounds are relative to the viewport and their
/// trailing edges must be non-decreasing along `axis` in reading order, as
/// `PageLayout` produces them. That makes the search a binary search that
/// never walks the pages already scrolled past.
pub fn locate_current_page(
    geometry: &ViewportGeometry,
    pages: &Pages,
    axis: Axis,
    rtl: bool,
) -> Option<usize> {
    let last = pages.last_index()?;

    let scrollable = geometry.max_scroll().along(axis) > 0.0;
    if scrollable && geometry.remaining(axis) <= END_SAFE_ZONE_PX {
        return Some(last);
    }

    let rtl = rtl && axis == Axis::Horizontal;
    let extent = geometry.client.along(axis);
    let slice = pages.as_slice();
    debug_assert!(
        slice.windows(2).all(|pair| {
            pair[0].bounds.span(axis, rtl, geometry.client).1
                <= pair[1].bounds.span(axis, rtl, geometry.client).1
        }),
        "pages are not ordered along {axis:?}"
    );
    let first_unread = slice.partition_point(|page| {
        let (_, trailing) = page.bounds.span(axis, rtl, geometry.client);
        trailing <= VISIBLE_EPSILON_PX
    });

    let page = slice.get(first_unread)?;
    let (leading, _) = page.bounds.span(axis, rtl, geometry.client);
    (leading <= extent).then_some(page.index)
}
