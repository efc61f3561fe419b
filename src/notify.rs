//! User notifications.
//!
//! The core only records what should be announced; [`Toasts`] collects those
//! records until the UI drains them into an `egui_notify::Toasts` overlay,
//! which owns the lifetime, stacking and styling on screen.

use std::time::Duration;

/// How long a toast stays on screen
pub const TOAST_LIFETIME: Duration = Duration::from_secs(3);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastLevel {
    Success,
    Info,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toast {
    pub level: ToastLevel,
    pub message: String,
}

/// Notifications raised since the UI last drained them.
#[derive(Debug, Clone, Default)]
pub struct Toasts {
    pending: Vec<Toast>,
}

impl Toasts {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, level: ToastLevel, message: impl Into<String>) {
        let message = message.into();
        match level {
            ToastLevel::Error => log::warn!("Toast: {message}"),
            _ => log::info!("Toast: {message}"),
        }
        self.pending.push(Toast { level, message });
    }

    pub fn success(&mut self, message: impl Into<String>) {
        self.push(ToastLevel::Success, message);
    }

    pub fn info(&mut self, message: impl Into<String>) {
        self.push(ToastLevel::Info, message);
    }

    pub fn error(&mut self, message: impl Into<String>) {
        self.push(ToastLevel::Error, message);
    }

    pub fn iter(&self) -> impl Iterator<Item = &Toast> {
        self.pending.iter()
    }

    pub fn last(&self) -> Option<&Toast> {
        self.pending.last()
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Takes every record in the order it was raised.
    pub fn drain(&mut self) -> Vec<Toast> {
        std::mem::take(&mut self.pending)
    }
}

/// Overlay the UI shows toasts on.
pub fn overlay() -> egui_notify::Toasts {
    egui_notify::Toasts::default()
        .with_anchor(egui_notify::Anchor::BottomRight)
        .with_margin(egui::vec2(12.0, 12.0))
}

/// Hands one record to the overlay.
pub fn deliver(overlay: &mut egui_notify::Toasts, toast: Toast) {
    let shown = match toast.level {
        ToastLevel::Success => overlay.success(toast.message),
        ToastLevel::Info => overlay.info(toast.message),
        ToastLevel::Error => overlay.error(toast.message),
    };
    shown.duration(Some(TOAST_LIFETIME));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_drain_returns_records_in_order() {
        let mut toasts = Toasts::new();
        toasts.success("Saved");
        toasts.error("Failed");

        let drained = toasts.drain();
        assert_eq!(drained.len(), 2);
        assert_eq!(drained[0].level, ToastLevel::Success);
        assert_eq!(drained[1].message, "Failed");
        assert!(toasts.is_empty());
    }
}
