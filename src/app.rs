use crate::assets::AssetPaths;
use crate::backend::{HttpTransport, TaskExecutor};
use crate::config::Settings;
use crate::error::AppError;
use crate::export;
use crate::model::{GroupName, ThemeMode};
use crate::notify;
use crate::panels::{browser_panel, color_panel, preview_panel};
use crate::render::{self, PreviewTexture};
use crate::state::{EditorContext, UiEffect};
use crate::util::time::current_time_secs;

/// Widget state that lives only as long as the window.
#[derive(Debug, Clone)]
pub struct UiState {
    pub search: String,
    /// Text of the hex input, kept separately so partial input can be typed
    pub hex_input: String,
    /// Group recolored by bulk icon operations
    pub bulk_group: GroupName,
}

impl Default for UiState {
    fn default() -> Self {
        Self {
            search: String::new(),
            hex_input: String::new(),
            bulk_group: GroupName::new("Color"),
        }
    }
}

pub struct IconManagerApp {
    pub(crate) settings: Settings,
    pub(crate) context: EditorContext,
    pub(crate) preview: PreviewTexture,
    pub(crate) ui: UiState,
    overlay: egui_notify::Toasts,
    executor: TaskExecutor,
}

impl IconManagerApp {
    /// Called once before the first frame.
    pub fn new(cc: &eframe::CreationContext<'_>) -> Result<Self, AppError> {
        let settings = Settings::load(cc.storage);
        log::info!("Using backend at {}", settings.backend_url);
        apply_theme(&cc.egui_ctx, settings.mode());

        let transport = HttpTransport::new(AssetPaths::new(settings.backend_url.as_str()));
        let executor = TaskExecutor::new(transport, cc.egui_ctx.clone())?;

        let mut context = EditorContext::new(&settings);
        context.load_catalog();
        executor.dispatch_all(context.take_work());

        Ok(Self {
            settings,
            context,
            preview: PreviewTexture::new(),
            ui: UiState::default(),
            overlay: notify::overlay(),
            executor,
        })
    }

    pub fn context(&self) -> &EditorContext {
        &self.context
    }

    pub fn set_mode(&mut self, ctx: &egui::Context, mode: ThemeMode) {
        self.settings.dark_mode = mode.is_dark();
        self.context.set_mode(mode);
        apply_theme(ctx, mode);
    }

    fn handle_effect(&mut self, ctx: &egui::Context, effect: UiEffect) {
        match effect {
            UiEffect::ShowAsset { url, bytes } => match render::decode_asset(&bytes) {
                Ok(image) => self.preview.show(ctx, &url, image),
                Err(err) => {
                    log::error!("Failed to decode {url}: {err}");
                    self.preview.clear();
                }
            },
            UiEffect::AssetFailed { url } => {
                log::debug!("Hiding preview for {url}");
                self.preview.clear();
            }
            UiEffect::SaveFile {
                file_name,
                bytes,
                announce,
            } => {
                let Some(dir) = self.settings.export_dir() else {
                    log::error!("No export directory for {file_name}");
                    self.context
                        .toasts_mut()
                        .error(export::download_message(&file_name, false));
                    return;
                };
                match export::save_artifact(&dir, &file_name, &bytes) {
                    Ok(_) if announce => self
                        .context
                        .toasts_mut()
                        .success(export::download_message(&file_name, true)),
                    Ok(_) => {}
                    Err(err) => {
                        log::error!("Failed to save {file_name}: {err}");
                        self.context
                            .toasts_mut()
                            .error(export::download_message(&file_name, false));
                    }
                }
            }
            UiEffect::CopyText(markup) => ctx.copy_text(markup),
            UiEffect::CopyImage(markup) => match export::copy_image(&markup) {
                Ok(()) => self.context.toasts_mut().success("Image copied to clipboard!"),
                Err(err) => {
                    log::error!("Failed to copy image: {err}");
                    self.context.toasts_mut().error("Failed to copy image");
                }
            },
        }
    }
}

fn apply_theme(ctx: &egui::Context, mode: ThemeMode) {
    let visuals = if mode.is_dark() {
        egui::Visuals::dark()
    } else {
        egui::Visuals::light()
    };
    ctx.set_visuals(visuals);
}

impl eframe::App for IconManagerApp {
    /// Called by the frame work to save state before shutdown.
    fn save(&mut self, storage: &mut dyn eframe::Storage) {
        self.settings.save(storage);
    }

    /// Called each time the UI needs repainting, which may be many times per second.
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let now = current_time_secs();

        self.context.apply_all(self.executor.drain(), now);
        for effect in self.context.take_effects() {
            self.handle_effect(ctx, effect);
        }
        if self.context.scope().preview_url().is_none() {
            self.preview.clear();
        }

        browser_panel(self, ctx);
        color_panel(self, ctx);
        preview_panel(self, ctx);

        // Debounce deadlines need a frame even without input
        if let Some(wait) = self.context.tick(now) {
            ctx.request_repaint_after(wait);
        }
        for toast in self.context.take_toasts() {
            notify::deliver(&mut self.overlay, toast);
        }
        self.overlay.show(ctx);

        self.executor.dispatch_all(self.context.take_work());
    }
}
