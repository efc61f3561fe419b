use std::path::PathBuf;
use std::time::Duration;

use crate::model::ThemeMode;

pub const DEFAULT_BACKEND_URL: &str = "http://localhost:8000";

/// Overrides the persisted backend URL on native builds
pub const BACKEND_URL_ENV: &str = "ICON_MANAGER_BACKEND_URL";

/// User settings, persisted with the rest of the app state on shutdown.
#[derive(serde::Deserialize, serde::Serialize, Debug, Clone, PartialEq)]
#[serde(default)] // new fields get default values when deserializing old state
pub struct Settings {
    pub backend_url: String,
    pub dark_mode: bool,
    /// Quiet time before a dragged or typed color is committed
    pub debounce_ms: u64,
    /// Where saved exports land. Defaults to the download directory.
    pub export_dir: Option<PathBuf>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            backend_url: DEFAULT_BACKEND_URL.to_owned(),
            dark_mode: false,
            debounce_ms: 500,
            export_dir: None,
        }
    }
}

impl Settings {
    /// Restores the persisted settings, then applies environment overrides.
    pub fn load(storage: Option<&dyn eframe::Storage>) -> Self {
        let mut settings: Settings = storage
            .and_then(|storage| eframe::get_value(storage, eframe::APP_KEY))
            .unwrap_or_default();

        #[cfg(not(target_arch = "wasm32"))]
        if let Ok(url) = std::env::var(BACKEND_URL_ENV) {
            if !url.trim().is_empty() {
                log::info!("Backend URL overridden by {BACKEND_URL_ENV}: {url}");
                settings.backend_url = url;
            }
        }

        if settings.backend_url.trim().is_empty() {
            settings.backend_url = DEFAULT_BACKEND_URL.to_owned();
        }
        settings
    }

    pub fn save(&self, storage: &mut dyn eframe::Storage) {
        eframe::set_value(storage, eframe::APP_KEY, self);
    }

    pub fn mode(&self) -> ThemeMode {
        ThemeMode::from_dark(self.dark_mode)
    }

    pub fn debounce_window(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }

    /// Directory exports are saved into, if one can be determined
    pub fn export_dir(&self) -> Option<PathBuf> {
        #[cfg(not(target_arch = "wasm32"))]
        {
            self.export_dir.clone().or_else(dirs::download_dir)
        }
        #[cfg(target_arch = "wasm32")]
        {
            self.export_dir.clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_fields_take_defaults() {
        let settings: Settings = serde_json::from_str(r#"{"dark_mode":true}"#).unwrap();
        assert!(settings.dark_mode);
        assert_eq!(settings.backend_url, DEFAULT_BACKEND_URL);
        assert_eq!(settings.debounce_window(), Duration::from_millis(500));
        assert_eq!(settings.mode(), ThemeMode::Dark);
    }
}
