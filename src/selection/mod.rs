mod scope;
mod set;

pub use scope::{ScopeKey, ScopeTracker};
pub use set::{SelectionSet, Selections};
