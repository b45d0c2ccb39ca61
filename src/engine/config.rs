// Configuration for the reader core and the terminal host.
// Defaults follow the reader's documented behaviour; every field can be
// overridden from a TOML settings file.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::engine::error::{read_settings_file, ReaderError};
use crate::engine::timing::MAX_INTERVAL_MS;
use crate::geometry::Axis;
use crate::overlay::{TapZoneInvertMode, TapZoneLayout};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReadingMode {
    #[default]
    SinglePage,
    DoublePage,
    ContinuousVertical,
    ContinuousHorizontal,
    Webtoon,
}

impl ReadingMode {
    /// Axis along which pages follow each other.
    pub fn axis(self) -> Axis {
        match self {
            ReadingMode::ContinuousVertical | ReadingMode::Webtoon => Axis::Vertical,
            ReadingMode::SinglePage | ReadingMode::DoublePage | ReadingMode::ContinuousHorizontal => {
                Axis::Horizontal
            }
        }
    }

    pub fn is_continuous(self) -> bool {
        !self.is_paged()
    }

    pub fn is_paged(self) -> bool {
        matches!(self, ReadingMode::SinglePage | ReadingMode::DoublePage)
    }

    /// Number of pages shown at once.
    pub fn pages_per_view(self) -> usize {
        match self {
            ReadingMode::DoublePage => 2,
            _ => 1,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ReadingDirection {
    #[default]
    #[serde(rename = "ltr")]
    LeftToRight,
    #[serde(rename = "rtl")]
    RightToLeft,
}

impl ReadingDirection {
    pub fn is_rtl(self) -> bool {
        self == ReadingDirection::RightToLeft
    }
}

/// Automatic scrolling (section "auto-scroll" of the reader settings).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AutoScrollConfig {
    /// Scroll steps per second; the step interval is `1000 / scroll_per_second` ms
    pub scroll_per_second: f64,

    /// Per-frame accumulation instead of a fixed-interval timer
    pub smooth: bool,

    /// Flip the scroll direction after reading-direction handling
    pub invert: bool,

    /// Time on each page when auto-scrolling a paged mode
    pub page_interval_ms: u64,
}

impl AutoScrollConfig {
    /// Settings for page-turning auto-scroll: one step per page interval.
    pub fn page_turning(&self) -> Self {
        Self {
            scroll_per_second: 1000.0 / self.page_interval_ms.max(1) as f64,
            ..self.clone()
        }
    }
}

impl Default for AutoScrollConfig {
    fn default() -> Self {
        Self {
            scroll_per_second: 20.0,
            smooth: true,
            invert: false,
            page_interval_ms: 5000,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SwipeConfig {
    /// Gesture navigation on/off; only honoured in paged reading modes
    pub enabled: bool,

    /// Horizontal travel before a movement counts as a swipe (default 30px)
    pub start_threshold_px: f64,

    /// Fraction of viewport width a release must exceed to turn the page (default 0.2)
    pub commit_ratio: f64,

    /// Vertical drift above which a release never commits (default 100px)
    pub max_vertical_drift_px: f64,

    /// Settle animation duration (default 200ms)
    pub animation_ms: u64,
}

impl Default for SwipeConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            start_threshold_px: 30.0,
            commit_ratio: 0.2,
            max_vertical_drift_px: 100.0,
            animation_ms: 200,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InertiaConfig {
    pub enabled: bool,

    /// Correction loop period (default 16ms)
    pub tick_ms: u64,

    /// Multiplier applied to the raw release speed (default 1.2)
    pub damping: f64,

    /// Upper bound for the coerced speed, in viewports per second (default 12)
    pub max_speed: f64,
}

impl Default for InertiaConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            tick_ms: 16,
            damping: 1.2,
            max_speed: 12.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TapZoneConfig {
    pub layout: TapZoneLayout,
    pub invert: TapZoneInvertMode,
}

/// Master settings object handed to the reader core.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReaderSettings {
    pub reading_mode: ReadingMode,
    pub reading_direction: ReadingDirection,

    /// Share of the viewport covered by one scroll step, 1..=100
    pub scroll_amount_percentage: f64,

    /// Request the next chapter once the last page becomes current
    pub auto_advance_chapter: bool,

    /// Language tag used for overlay labels
    pub language: String,

    pub auto_scroll: AutoScrollConfig,
    pub swipe: SwipeConfig,
    pub inertia: InertiaConfig,
    pub tap_zones: TapZoneConfig,
}

impl Default for ReaderSettings {
    fn default() -> Self {
        Self {
            reading_mode: ReadingMode::default(),
            reading_direction: ReadingDirection::default(),
            scroll_amount_percentage: 75.0,
            auto_advance_chapter: true,
            language: "en".to_string(),
            auto_scroll: AutoScrollConfig::default(),
            swipe: SwipeConfig::default(),
            inertia: InertiaConfig::default(),
            tap_zones: TapZoneConfig::default(),
        }
    }
}

impl ReaderSettings {
    pub fn load(path: &Path) -> Result<Self, ReaderError> {
        let content = read_settings_file(path)?;
        Self::from_toml_str(&content).map_err(|err| match err {
            ReaderError::Parse(msg) => ReaderError::Parse(format!("{}: {msg}", path.display())),
            other => other,
        })
    }

    pub fn from_toml_str(content: &str) -> Result<Self, ReaderError> {
        let settings: ReaderSettings =
            toml::from_str(content).map_err(|e| ReaderError::Parse(e.to_string()))?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<(), ReaderError> {
        if !(1.0..=100.0).contains(&self.scroll_amount_percentage) {
            return Err(ReaderError::InvalidSetting(format!(
                "scroll_amount_percentage must be within 1..=100, got {}",
                self.scroll_amount_percentage
            )));
        }
        let rate = self.auto_scroll.scroll_per_second;
        if !(rate > 0.0 && rate.is_finite()) {
            return Err(ReaderError::InvalidSetting(format!(
                "auto_scroll.scroll_per_second must be positive, got {rate}"
            )));
        }
        if 1000.0 / rate > MAX_INTERVAL_MS as f64 {
            return Err(ReaderError::InvalidSetting(format!(
                "auto_scroll.scroll_per_second is too slow, got {rate}"
            )));
        }
        if !(self.swipe.commit_ratio > 0.0 && self.swipe.commit_ratio <= 1.0) {
            return Err(ReaderError::InvalidSetting(format!(
                "swipe.commit_ratio must be within (0, 1], got {}",
                self.swipe.commit_ratio
            )));
        }
        if !(self.inertia.max_speed >= 0.0) {
            return Err(ReaderError::InvalidSetting(format!(
                "inertia.max_speed must not be negative, got {}",
                self.inertia.max_speed
            )));
        }
        if !(1..=MAX_INTERVAL_MS).contains(&self.auto_scroll.page_interval_ms) {
            return Err(ReaderError::InvalidSetting(format!(
                "auto_scroll.page_interval_ms must be within 1..={MAX_INTERVAL_MS}, got {}",
                self.auto_scroll.page_interval_ms
            )));
        }
        if self.inertia.tick_ms == 0 {
            return Err(ReaderError::InvalidSetting(
                "inertia.tick_ms must be non-zero".to_string(),
            ));
        }
        Ok(())
    }

    /// Swipe gestures only navigate in paged modes.
    pub fn swipe_navigation_enabled(&self) -> bool {
        self.swipe.enabled && self.reading_mode.is_paged()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let settings = ReaderSettings::default();
        assert!(settings.validate().is_ok());
        assert_eq!(settings.swipe.start_threshold_px, 30.0);
        assert_eq!(settings.swipe.animation_ms, 200);
        assert_eq!(settings.inertia.tick_ms, 16);
        assert_eq!(settings.inertia.max_speed, 12.0);
    }

    #[test]
    fn test_partial_toml_falls_back_to_defaults() {
        let settings = ReaderSettings::from_toml_str(
            r#"
            reading_mode = "webtoon"
            reading_direction = "rtl"

            [auto_scroll]
            smooth = false
            "#,
        )
        .unwrap();

        assert_eq!(settings.reading_mode, ReadingMode::Webtoon);
        assert_eq!(settings.reading_direction, ReadingDirection::RightToLeft);
        assert!(!settings.auto_scroll.smooth);
        assert_eq!(settings.auto_scroll.scroll_per_second, 20.0);
        assert_eq!(settings.scroll_amount_percentage, 75.0);
    }

    #[test]
    fn test_rejects_out_of_range_percentage() {
        let result = ReaderSettings::from_toml_str("scroll_amount_percentage = 150.0");
        assert!(matches!(result, Err(ReaderError::InvalidSetting(_))));
    }

    #[test]
    fn test_rejects_zero_scroll_rate() {
        let result = ReaderSettings::from_toml_str("[auto_scroll]\nscroll_per_second = 0.0");
        assert!(matches!(result, Err(ReaderError::InvalidSetting(_))));
    }

    #[test]
    fn test_rejects_intervals_too_long_to_schedule() {
        let result = ReaderSettings::from_toml_str("[auto_scroll]\nscroll_per_second = 1e-300");
        assert!(matches!(result, Err(ReaderError::InvalidSetting(_))));

        let result = ReaderSettings::from_toml_str("[auto_scroll]\npage_interval_ms = 0");
        assert!(matches!(result, Err(ReaderError::InvalidSetting(_))));

        let toml = format!("[auto_scroll]\npage_interval_ms = {}", MAX_INTERVAL_MS + 1);
        assert!(matches!(
            ReaderSettings::from_toml_str(&toml),
            Err(ReaderError::InvalidSetting(_))
        ));
        assert!(ReaderSettings::from_toml_str("[auto_scroll]\nscroll_per_second = 0.01").is_ok());
    }

    #[test]
    fn test_page_turning_rate() {
        let mut config = AutoScrollConfig::default();
        config.page_interval_ms = 4000;
        assert_eq!(config.page_turning().scroll_per_second, 0.25);
        assert_eq!(config.page_turning().smooth, config.smooth);
    }

    #[test]
    fn test_rejects_malformed_toml() {
        let result = ReaderSettings::from_toml_str("reading_mode = ");
        assert!(matches!(result, Err(ReaderError::Parse(_))));
    }

    #[test]
    fn test_swipe_only_in_paged_modes() {
        let mut settings = ReaderSettings::default();
        assert!(settings.swipe_navigation_enabled());
        settings.reading_mode = ReadingMode::Webtoon;
        assert!(!settings.swipe_navigation_enabled());
        settings.reading_mode = ReadingMode::DoublePage;
        settings.swipe.enabled = false;
        assert!(!settings.swipe_navigation_enabled());
    }

    #[test]
    fn test_reading_mode_axis() {
        assert_eq!(ReadingMode::Webtoon.axis(), Axis::Vertical);
        assert_eq!(ReadingMode::ContinuousHorizontal.axis(), Axis::Horizontal);
        assert_eq!(ReadingMode::DoublePage.pages_per_view(), 2);
    }
}
