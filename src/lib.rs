#![warn(clippy::all, rust_2018_idioms)]

pub mod app;
pub mod assets;
pub mod backend;
pub mod bulk;
pub mod catalog;
pub mod components;
pub mod config;
pub mod error;
pub mod export;
pub mod model;
pub mod notify;
pub mod panels;
pub mod pipeline;
pub mod render;
pub mod selection;
pub mod state;
pub mod util;

pub use app::IconManagerApp;
pub use error::{AppError, BackendError};
pub use state::{EditorContext, UiEffect};
