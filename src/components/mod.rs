mod swatch;

pub use swatch::Swatch;
