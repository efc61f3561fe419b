mod browser_panel;
mod color_panel;
mod preview_panel;

pub use browser_panel::browser_panel;
pub use color_panel::color_panel;
pub use preview_panel::preview_panel;
