pub mod context;
mod group_colors;

pub use context::{EditorContext, UiEffect};
pub use group_colors::{CommitStatus, GroupColorEntry, GroupColorStore, reapply};
