pub mod autoscroll;
pub mod intent;
pub mod locator;
pub mod navigation;
pub mod page;
pub mod state;
pub mod swipe;

pub use autoscroll::{AutoScrollSession, AutoScrollState, AutoScrollStep, AutoScroller};
pub use intent::{scroll_intent, ScrollBehavior, ScrollDirection, ScrollIntent};
pub use locator::locate_current_page;
pub use navigation::{ChapterNavigator, NavigationController, NavigationOutcome, PageDirection};
pub use page::{Page, PageLayout, PageSource, PageSpec, Pages};
pub use state::{Chapter, ChapterLoad, Library};
pub use swipe::{preview_page_index, swipe_direction, SwipeClassifier, SwipeEvent, SwipeOutcome, TouchPoint};
