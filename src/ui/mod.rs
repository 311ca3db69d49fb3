//! UI module - door prompts, the order clue, and the ending screen.

mod hud;
mod plugin;

pub use hud::clue_line;
pub use plugin::UiPlugin;
