use thiserror::Error;

/// Errors talking to the recoloring backend
#[derive(Debug, Error)]
pub enum BackendError {
    #[error("Request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Backend rejected the request: {0}")]
    Rejected(String),

    #[error("Unexpected status {actual:?}, expected {expected:?}")]
    UnexpectedStatus { expected: String, actual: String },

    #[error("Unexpected reply, expected {0}")]
    UnexpectedReply(&'static str),
}

/// Errors turning fetched bytes into a preview image
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("Failed to decode image: {0}")]
    Image(#[from] image::ImageError),

    #[error("Failed to parse SVG: {0}")]
    Svg(#[from] resvg::usvg::Error),

    #[error("SVG has an empty canvas")]
    EmptyCanvas,
}

/// Errors delivering an exported artifact
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("Failed to write export: {0}")]
    Io(#[from] std::io::Error),

    #[cfg(not(target_arch = "wasm32"))]
    #[error("Clipboard unavailable: {0}")]
    Clipboard(#[from] arboard::Error),

    #[error(transparent)]
    Decode(#[from] DecodeError),

    #[error("Not supported on this platform: {0}")]
    Unsupported(&'static str),
}

/// Errors starting the application
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Failed to start the task runtime: {0}")]
    Runtime(#[from] std::io::Error),
}
