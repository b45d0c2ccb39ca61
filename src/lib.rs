//! Navigation core of a manga/comic reader: page location, swipe and
//! inertial gestures, auto-scroll and chapter navigation, with a terminal
//! host that drives them.

pub mod app;
pub mod engine;
pub mod geometry;
pub mod overlay;
pub mod reading;
pub mod ui;
