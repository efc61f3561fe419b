//! The recoloring backend, seen purely as a request/response collaborator.
//!
//! Core components never talk to the network. They describe what they need as
//! a [`Job`] (one request plus a [`JobTag`] saying what the answer is for) or a
//! bulk plan, queue it as [`Work`], and later receive a [`Completion`]. The
//! [`TaskExecutor`] runs queued work against a [`Transport`].

mod executor;
mod http;
mod job;
pub mod wire;

pub use executor::{Inbox, TaskExecutor};
pub use http::HttpTransport;
pub use job::{Completion, ExportAction, ExportTag, Job, JobTag, Work};

use std::future::Future;

use crate::assets::encode_segment;
use crate::catalog::CatalogListing;
use crate::error::BackendError;
use crate::model::{AssetKind, Folder, GroupName};
use wire::{
    ColorfulBody, ExportBody, SingleColorBody, SingleColorRevertBody, UpdateColorBody, ZipBody,
};

pub type BackendResult<T> = Result<T, BackendError>;

/// Future returned by a [`Transport`]. Sendable natively so it can run on the
/// tokio runtime; the web build runs everything on the browser's event loop.
#[cfg(not(target_arch = "wasm32"))]
pub type TransportFuture<T> = futures::future::BoxFuture<'static, T>;
#[cfg(target_arch = "wasm32")]
pub type TransportFuture<T> = futures::future::LocalBoxFuture<'static, T>;

#[cfg(not(target_arch = "wasm32"))]
pub fn boxed<F>(future: F) -> TransportFuture<F::Output>
where
    F: Future + Send + 'static,
{
    Box::pin(future)
}

#[cfg(target_arch = "wasm32")]
pub fn boxed<F>(future: F) -> TransportFuture<F::Output>
where
    F: Future + 'static,
{
    Box::pin(future)
}

/// Every backend operation the application uses.
#[derive(Debug, Clone, PartialEq)]
pub enum BackendRequest {
    /// `GET /groups/icon/{folder}/{file}`
    ListGroups { folder: Folder, file_name: String },
    UpdateColor(UpdateColorBody),
    SingleColorUpdate(SingleColorBody),
    SingleColorRevert(SingleColorRevertBody),
    Greyscale(ColorfulBody),
    Revert(ColorfulBody),
    /// Binary SVG download
    DownloadSvg(ExportBody),
    ExportPng(ExportBody),
    /// SVG markup as JSON, for the clipboard
    ExportSvgMarkup(ExportBody),
    ExportZip(ZipBody),
    /// Rendered asset behind a preview URL
    FetchAsset { url: String },
    Catalog(AssetKind),
}

impl BackendRequest {
    /// Route relative to the backend base URL. `None` for absolute asset URLs.
    pub fn route(&self) -> Option<String> {
        let route = match self {
            BackendRequest::ListGroups { folder, file_name } => {
                format!(
                    "groups/icon/{}/{}",
                    encode_segment(folder.as_str()),
                    encode_segment(file_name)
                )
            }
            BackendRequest::UpdateColor(_) => "update_color".to_owned(),
            BackendRequest::SingleColorUpdate(_) => "single-color/update".to_owned(),
            BackendRequest::SingleColorRevert(_) => "single-color/revert".to_owned(),
            BackendRequest::Greyscale(_) => "greyscale".to_owned(),
            BackendRequest::Revert(_) => "revert".to_owned(),
            BackendRequest::DownloadSvg(_) => "download-svg".to_owned(),
            BackendRequest::ExportPng(_) => "export-png".to_owned(),
            BackendRequest::ExportSvgMarkup(_) => "export-svg".to_owned(),
            BackendRequest::ExportZip(_) => "export-zip".to_owned(),
            BackendRequest::FetchAsset { .. } => return None,
            BackendRequest::Catalog(kind) => match kind {
                AssetKind::Icon => "icons",
                AssetKind::ColorfulIcon => "colorful-icons",
                AssetKind::SingleColorIcon => "single-color",
                AssetKind::Flag => "flags",
            }
            .to_owned(),
        };
        Some(route)
    }

    /// Short description for logs
    pub fn describe(&self) -> String {
        match self {
            BackendRequest::UpdateColor(body) => format!(
                "update_color {} [{}] -> {} ({})",
                body.icon_name,
                body.group_id,
                body.color,
                body.folder.as_deref().unwrap_or("-")
            ),
            BackendRequest::SingleColorUpdate(body) => {
                format!("single-color/update {} -> {}", body.icon_name, body.color)
            }
            BackendRequest::SingleColorRevert(body) => {
                format!("single-color/revert {}", body.icon_name)
            }
            BackendRequest::Greyscale(body) => format!("greyscale {}/{}", body.folder, body.icon_name),
            BackendRequest::Revert(body) => format!("revert {}/{}", body.folder, body.icon_name),
            BackendRequest::FetchAsset { url } => format!("GET {url}"),
            other => other.route().unwrap_or_default(),
        }
    }
}

/// Decoded answer to a [`BackendRequest`].
#[derive(Debug, Clone, PartialEq)]
pub enum BackendReply {
    Groups(Vec<GroupName>),
    /// The `status` string of a mutation, empty when the backend sent none
    Status(String),
    Bytes(Vec<u8>),
    SvgMarkup(String),
    Catalog(CatalogListing),
}

/// Anything that can carry a [`BackendRequest`] to the backend.
pub trait Transport {
    fn send(&self, request: BackendRequest) -> TransportFuture<BackendResult<BackendReply>>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::AssetPaths;

    fn list_groups(folder: &str, file_name: &str) -> BackendRequest {
        BackendRequest::ListGroups {
            folder: Folder::new(folder),
            file_name: file_name.to_owned(),
        }
    }

    #[test]
    fn test_group_route_keeps_names_in_the_path() {
        let plain = list_groups("System", "gear.svg");
        assert_eq!(plain.route().as_deref(), Some("groups/icon/System/gear.svg"));

        let reserved = list_groups("Dev/Tools", "C# logo.svg");
        let route = reserved.route().unwrap_or_default();
        assert_eq!(route, "groups/icon/Dev%2FTools/C%23%20logo.svg");
        assert_eq!(
            AssetPaths::new("http://localhost:8000").endpoint(&route),
            "http://localhost:8000/groups/icon/Dev%2FTools/C%23%20logo.svg"
        );
    }
}
