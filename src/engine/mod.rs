pub mod config;
pub mod curve;
pub mod error;
pub mod inertia;
pub mod timing;

pub use curve::{CubicEaseOut, CurveSample, DecelerationCurve};
pub use error::ReaderError;
pub use inertia::{AxisConfig, DragSample, DragSamples, FlightEnd, InertiaStep, InertialScroller};
pub use timing::{Scheduler, Tick, TimerId, TimingStrategy};
