#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppMode {
    Reading,
    /// Tap-zone overlay shown; the next tap dismisses it.
    Menu,
    Quit,
}
