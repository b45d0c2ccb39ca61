pub mod input;
pub mod reader;
pub mod terminal;
pub mod terminal_guard;
pub mod theme;

pub use input::InputTranslator;
pub use terminal::TuiManager;
pub use terminal_guard::TerminalGuard;
