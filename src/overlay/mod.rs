pub mod tap_zones;

pub use tap_zones::{
    TapAction, TapRegion, TapZoneCache, TapZoneInvertMode, TapZoneKey, TapZoneLayout, TapZoneMap,
};
