// App module for moongate-tui
// Handles application state and business logic

pub mod actions;
pub mod input;
pub mod refresh;
pub mod state;
pub mod tooltip;

pub use input::{handle_input, handle_mouse};
pub use state::{App, AppScreen, RenderState};
