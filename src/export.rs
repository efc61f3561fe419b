//! Export requests and delivery of the resulting artifacts.

use std::path::{Path, PathBuf};

use crate::assets::AssetPaths;
use crate::backend::BackendRequest;
use crate::backend::wire::{ExportBody, ZipBody};
use crate::error::ExportError;
use crate::model::{AssetKind, FlagShape, ItemRef, ThemeMode};
use crate::selection::SelectionSet;

/// Longest side of images copied to the clipboard
pub const CLIPBOARD_IMAGE_SIDE: f32 = 512.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Svg,
    Png,
}

impl ExportFormat {
    pub fn extension(self) -> &'static str {
        match self {
            ExportFormat::Svg => "svg",
            ExportFormat::Png => "png",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ExportFormat::Svg => "SVG",
            ExportFormat::Png => "PNG",
        }
    }
}

/// Body shared by the single-item export routes
pub fn export_body(item: &ItemRef, mode: ThemeMode, shape: FlagShape) -> ExportBody {
    ExportBody {
        icon_name: AssetPaths::file_name(item, shape),
        kind: item.kind.export_type().to_owned(),
        mode: mode.as_str().to_owned(),
        folder: item.kind.has_folders().then(|| item.folder.as_str().to_owned()),
    }
}

/// Request for one item's file and the name to save it under.
pub fn single_request(
    item: &ItemRef,
    format: ExportFormat,
    mode: ThemeMode,
    shape: FlagShape,
) -> (String, BackendRequest) {
    let body = export_body(item, mode, shape);
    match format {
        ExportFormat::Svg => (body.icon_name.clone(), BackendRequest::DownloadSvg(body)),
        ExportFormat::Png => {
            let stem = body.icon_name.trim_end_matches(".svg").to_owned();
            (format!("{stem}.png"), BackendRequest::ExportPng(body))
        }
    }
}

/// Request for an archive of the whole selection.
///
/// `folder` is the folder being browsed; `folders` carries the folder
/// recorded for each item, in the same order as `items`.
pub fn zip_request(
    kind: AssetKind,
    selection: &SelectionSet,
    browsing: &str,
    format: ExportFormat,
    mode: ThemeMode,
) -> Option<(String, BackendRequest)> {
    if selection.is_empty() {
        return None;
    }
    let items: Vec<String> = selection.names().map(str::to_owned).collect();
    let folders = items
        .iter()
        .map(|name| selection.folder_of(name).as_str().to_owned())
        .collect();
    let file_name = format!(
        "{}_{}_{}_icons.zip",
        kind.wire_type(),
        format.extension(),
        items.len()
    );
    let body = ZipBody {
        items,
        folders,
        kind: kind.export_type().to_owned(),
        folder: browsing.to_owned(),
        format: format.extension().to_owned(),
        mode: mode.as_str().to_owned(),
    };
    Some((file_name, BackendRequest::ExportZip(body)))
}

/// Notification for a finished or failed download, named after the file type
pub fn download_message(file_name: &str, ok: bool) -> String {
    let what = match file_name.rsplit('.').next() {
        Some("zip") => "ZIP file",
        Some("png") => "PNG",
        Some("svg") => "SVG",
        _ => "file",
    };
    if ok {
        format!("{what} downloaded successfully!")
    } else {
        format!("Failed to download {what}")
    }
}

/// Writes an exported artifact into `dir` and returns where it landed.
#[cfg(not(target_arch = "wasm32"))]
pub fn save_artifact(dir: &Path, file_name: &str, bytes: &[u8]) -> Result<PathBuf, ExportError> {
    std::fs::create_dir_all(dir)?;
    // Only the final component; the file always lands directly in `dir`
    let name = Path::new(file_name)
        .file_name()
        .map(|name| name.to_os_string())
        .unwrap_or_else(|| "export".into());
    let path = dir.join(name);
    std::fs::write(&path, bytes)?;
    log::info!("Saved {} ({} bytes)", path.display(), bytes.len());
    Ok(path)
}

#[cfg(target_arch = "wasm32")]
pub fn save_artifact(_dir: &Path, file_name: &str, _bytes: &[u8]) -> Result<PathBuf, ExportError> {
    log::warn!("Saving {file_name} is not available in the browser build");
    Err(ExportError::Unsupported("saving files"))
}

/// Rasterizes SVG markup and puts it on the OS clipboard.
#[cfg(not(target_arch = "wasm32"))]
pub fn copy_image(markup: &str) -> Result<(), ExportError> {
    let image = crate::render::rasterize_svg(markup.as_bytes(), CLIPBOARD_IMAGE_SIDE)?;
    let (width, height) = image.dimensions();
    let mut clipboard = arboard::Clipboard::new()?;
    clipboard.set_image(arboard::ImageData {
        width: width as usize,
        height: height as usize,
        bytes: image.into_raw().into(),
    })?;
    Ok(())
}

#[cfg(target_arch = "wasm32")]
pub fn copy_image(_markup: &str) -> Result<(), ExportError> {
    Err(ExportError::Unsupported("copying images"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Folder;

    #[test]
    fn test_png_export_renames_file() {
        let item = ItemRef::new("gear", AssetKind::Icon, Folder::new("System"));
        let (name, request) = single_request(&item, ExportFormat::Png, ThemeMode::Dark, FlagShape::Rectangle);
        assert_eq!(name, "gear.png");
        match request {
            BackendRequest::ExportPng(body) => {
                assert_eq!(body.icon_name, "gear.svg");
                assert_eq!(body.kind, "icon");
                assert_eq!(body.folder.as_deref(), Some("System"));
            }
            other => panic!("unexpected request: {other:?}"),
        }
    }

    #[test]
    fn test_flag_export_has_no_folder() {
        let item = ItemRef::new("Chile", AssetKind::Flag, Folder::Root);
        let (name, request) = single_request(&item, ExportFormat::Svg, ThemeMode::Light, FlagShape::Circle);
        assert_eq!(name, "Chile_circle.svg");
        assert!(matches!(request, BackendRequest::DownloadSvg(ExportBody { folder: None, .. })));
    }

    #[test]
    fn test_zip_carries_per_item_folders() {
        let mut selection = SelectionSet::new();
        selection.toggle("gear", Folder::new("System"));
        selection.toggle("cloud", Folder::new("Weather"));

        let (name, request) =
            zip_request(AssetKind::Icon, &selection, "Root", ExportFormat::Svg, ThemeMode::Light).unwrap();
        assert_eq!(name, "icons_svg_2_icons.zip");
        match request {
            BackendRequest::ExportZip(body) => {
                assert_eq!(body.items, vec!["gear", "cloud"]);
                assert_eq!(body.folders, vec!["System", "Weather"]);
                assert_eq!(body.format, "svg");
            }
            other => panic!("unexpected request: {other:?}"),
        }
        assert!(zip_request(AssetKind::Icon, &SelectionSet::new(), "Root", ExportFormat::Svg, ThemeMode::Light).is_none());
    }

    #[cfg(not(target_arch = "wasm32"))]
    #[test]
    fn test_save_artifact_stays_in_dir() {
        let dir = std::env::temp_dir().join(format!("icon_manager_export_{}", uuid::Uuid::new_v4()));
        let path = save_artifact(&dir, "../escape.svg", b"<svg/>").unwrap();
        assert_eq!(path, dir.join("escape.svg"));
        assert_eq!(std::fs::read(&path).unwrap(), b"<svg/>");
        std::fs::remove_dir_all(&dir).unwrap();
    }
}
