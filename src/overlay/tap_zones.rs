//! Tap-zone overlay: which third of the screen turns the page.

use serde::{Deserialize, Serialize};

use crate::geometry::Rect;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TapZoneLayout {
    Disabled,
    #[default]
    LShape,
    Kindle,
    Edge,
    RightAndLeft,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TapZoneInvertMode {
    #[default]
    None,
    Horizontal,
    Vertical,
    Both,
}

impl TapZoneInvertMode {
    fn flips_columns(self) -> bool {
        matches!(self, Self::Horizontal | Self::Both)
    }

    fn flips_rows(self) -> bool {
        matches!(self, Self::Vertical | Self::Both)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TapAction {
    Previous,
    Next,
    Menu,
}

impl TapAction {
    pub fn label(self, language: &str) -> &'static str {
        let lang = language.split(['-', '_']).next().unwrap_or_default();
        match (lang, self) {
            ("ja", Self::Previous) => "前へ",
            ("ja", Self::Next) => "次へ",
            ("ja", Self::Menu) => "メニュー",
            ("es", Self::Previous) => "Anterior",
            ("es", Self::Next) => "Siguiente",
            ("es", Self::Menu) => "Menú",
            ("fr", Self::Previous) => "Précédent",
            ("fr", Self::Next) => "Suivant",
            ("fr", Self::Menu) => "Menu",
            (_, Self::Previous) => "Previous",
            (_, Self::Next) => "Next",
            (_, Self::Menu) => "Menu",
        }
    }
}

type Grid = [[TapAction; 3]; 3];

impl TapZoneLayout {
    /// Row-major 3x3 grid, top row first.
    fn grid(self) -> Grid {
        use TapAction::{Menu as M, Next as N, Previous as P};
        match self {
            Self::Disabled => [[M; 3]; 3],
            Self::LShape => [[P, P, P], [P, M, N], [N, N, N]],
            Self::Kindle => [[M, M, M], [P, N, N], [P, N, N]],
            Self::Edge => [[N, M, N], [N, M, N], [N, P, N]],
            Self::RightAndLeft => [[P, M, N], [P, M, N], [P, M, N]],
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TapRegion {
    pub bounds: Rect,
    pub action: TapAction,
    pub label: &'static str,
}

/// Resolved tap regions for one viewport size.
#[derive(Debug, Clone, PartialEq)]
pub struct TapZoneMap {
    regions: Vec<TapRegion>,
}

impl TapZoneMap {
    pub fn build(key: &TapZoneKey) -> Self {
        let mut grid = key.layout.grid();
        if key.invert.flips_rows() {
            grid.reverse();
        }
        if key.invert.flips_columns() {
            for row in &mut grid {
                row.reverse();
            }
        }

        let cell_w = key.width as f64 / 3.0;
        let cell_h = key.height as f64 / 3.0;
        let regions = grid
            .iter()
            .enumerate()
            .flat_map(|(row, actions)| {
                actions.iter().enumerate().map(move |(col, &action)| TapRegion {
                    bounds: Rect::new(col as f64 * cell_w, row as f64 * cell_h, cell_w, cell_h),
                    action,
                    label: action.label(&key.language),
                })
            })
            .collect();
        Self { regions }
    }

    pub fn regions(&self) -> &[TapRegion] {
        &self.regions
    }

    /// Action for a tap at viewport pixel `(x, y)`; `None` outside the viewport.
    pub fn action_at(&self, x: f64, y: f64) -> Option<TapAction> {
        self.regions
            .iter()
            .find(|region| region.bounds.contains(x, y))
            .map(|region| region.action)
    }
}

/// Everything a tap map depends on. Any change forces a rebuild.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TapZoneKey {
    pub layout: TapZoneLayout,
    pub width: u32,
    pub height: u32,
    pub font: String,
    pub invert: TapZoneInvertMode,
    pub language: String,
}

/// Single-entry cache of the current tap map, owned by the reader.
#[derive(Debug, Default)]
pub struct TapZoneCache {
    entry: Option<(TapZoneKey, TapZoneMap)>,
    rebuilds: usize,
}

impl TapZoneCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the map for `key`, rebuilding only when the key changed.
    pub fn get(&mut self, key: &TapZoneKey) -> &TapZoneMap {
        if self
            .entry
            .as_ref()
            .is_some_and(|(cached, _)| cached != key)
        {
            self.entry = None;
        }
        let rebuilds = &mut self.rebuilds;
        let (_, map) = self.entry.get_or_insert_with(|| {
            *rebuilds += 1;
            log::trace!("tap zones rebuilt for {key:?}");
            (key.clone(), TapZoneMap::build(key))
        });
        map
    }

    pub fn rebuild_count(&self) -> usize {
        self.rebuilds
    }

    pub fn clear(&mut self) {
        self.entry = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(layout: TapZoneLayout, invert: TapZoneInvertMode) -> TapZoneKey {
        TapZoneKey {
            layout,
            width: 900,
            height: 900,
            font: "monospace".to_string(),
            invert,
            language: "en".to_string(),
        }
    }

    #[test]
    fn test_l_shape_regions() {
        let map = TapZoneMap::build(&key(TapZoneLayout::LShape, TapZoneInvertMode::None));
        assert_eq!(map.regions().len(), 9);
        assert_eq!(map.action_at(450.0, 100.0), Some(TapAction::Previous));
        assert_eq!(map.action_at(100.0, 450.0), Some(TapAction::Previous));
        assert_eq!(map.action_at(450.0, 450.0), Some(TapAction::Menu));
        assert_eq!(map.action_at(800.0, 450.0), Some(TapAction::Next));
        assert_eq!(map.action_at(450.0, 800.0), Some(TapAction::Next));
        assert_eq!(map.action_at(950.0, 450.0), None);
    }

    #[test]
    fn test_invert_modes() {
        let horizontal =
            TapZoneMap::build(&key(TapZoneLayout::RightAndLeft, TapZoneInvertMode::Horizontal));
        assert_eq!(horizontal.action_at(100.0, 450.0), Some(TapAction::Next));
        assert_eq!(horizontal.action_at(800.0, 450.0), Some(TapAction::Previous));

        let vertical = TapZoneMap::build(&key(TapZoneLayout::Kindle, TapZoneInvertMode::Vertical));
        assert_eq!(vertical.action_at(450.0, 800.0), Some(TapAction::Menu));

        let both = TapZoneMap::build(&key(TapZoneLayout::LShape, TapZoneInvertMode::Both));
        assert_eq!(both.action_at(450.0, 100.0), Some(TapAction::Next));
        assert_eq!(both.action_at(100.0, 450.0), Some(TapAction::Next));
    }

    #[test]
    fn test_disabled_is_all_menu() {
        let map = TapZoneMap::build(&key(TapZoneLayout::Disabled, TapZoneInvertMode::None));
        assert!(map.regions().iter().all(|r| r.action == TapAction::Menu));
    }

    #[test]
    fn test_labels_follow_language() {
        let mut k = key(TapZoneLayout::RightAndLeft, TapZoneInvertMode::None);
        k.language = "ja-JP".to_string();
        let map = TapZoneMap::build(&k);
        assert_eq!(map.regions()[0].label, "前へ");
        assert_eq!(TapAction::Next.label("de"), "Next");
    }

    #[test]
    fn test_cache_rebuilds_only_on_key_change() {
        let mut cache = TapZoneCache::new();
        let mut k = key(TapZoneLayout::LShape, TapZoneInvertMode::None);

        cache.get(&k);
        cache.get(&k);
        assert_eq!(cache.rebuild_count(), 1);

        k.width = 1200;
        assert_eq!(cache.get(&k).action_at(1100.0, 450.0), Some(TapAction::Next));
        assert_eq!(cache.rebuild_count(), 2);

        k.font = "serif".to_string();
        cache.get(&k);
        k.language = "fr".to_string();
        cache.get(&k);
        k.invert = TapZoneInvertMode::Both;
        cache.get(&k);
        assert_eq!(cache.rebuild_count(), 5);

        cache.clear();
        cache.get(&k);
        assert_eq!(cache.rebuild_count(), 6);
    }
}
