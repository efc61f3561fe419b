use serde::Serialize;
use serde::de::DeserializeOwned;

use super::wire::{
    FlagListingReply, FolderListingReply, GroupsReply, SingleColorListingReply, StatusReply,
    SvgMarkupReply,
};
use super::{BackendReply, BackendRequest, BackendResult, Transport, TransportFuture, boxed};
use crate::assets::AssetPaths;
use crate::catalog::CatalogListing;
use crate::error::BackendError;
use crate::model::{AssetKind, GroupName};

/// [`Transport`] over HTTP. Cloning is cheap; clones share one connection pool.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
    paths: AssetPaths,
}

impl HttpTransport {
    pub fn new(paths: AssetPaths) -> Self {
        Self {
            client: reqwest::Client::new(),
            paths,
        }
    }

    pub fn paths(&self) -> &AssetPaths {
        &self.paths
    }

    pub async fn execute(&self, request: BackendRequest) -> BackendResult<BackendReply> {
        log::debug!("-> {}", request.describe());
        let route = request.route().unwrap_or_default();
        let url = self.paths.endpoint(&route);

        match request {
            BackendRequest::ListGroups { .. } => {
                let reply: GroupsReply = self.get_json(&url).await?;
                Ok(BackendReply::Groups(
                    reply.groups.into_iter().map(GroupName::new).collect(),
                ))
            }
            BackendRequest::UpdateColor(body) => self.post_status(&url, &body).await,
            BackendRequest::SingleColorUpdate(body) => self.post_status(&url, &body).await,
            BackendRequest::SingleColorRevert(body) => self.post_status(&url, &body).await,
            BackendRequest::Greyscale(body) | BackendRequest::Revert(body) => {
                self.post_status(&url, &body).await
            }
            BackendRequest::DownloadSvg(body) | BackendRequest::ExportPng(body) => {
                Ok(BackendReply::Bytes(self.post_bytes(&url, &body).await?))
            }
            BackendRequest::ExportZip(body) => Ok(BackendReply::Bytes(self.post_bytes(&url, &body).await?)),
            BackendRequest::ExportSvgMarkup(body) => {
                let reply: SvgMarkupReply = self.post_json(&url, &body).await?;
                reply
                    .svg_content
                    .map(BackendReply::SvgMarkup)
                    .ok_or(BackendError::UnexpectedReply("svg_content"))
            }
            BackendRequest::FetchAsset { url } => Ok(BackendReply::Bytes(self.get_bytes(&url).await?)),
            BackendRequest::Catalog(kind) => {
                let listing = match kind {
                    AssetKind::Icon | AssetKind::ColorfulIcon => {
                        let reply: FolderListingReply = self.get_json(&url).await?;
                        CatalogListing::Folders(reply.folders)
                    }
                    AssetKind::SingleColorIcon => {
                        let reply: SingleColorListingReply = self.get_json(&url).await?;
                        CatalogListing::Flat(reply.icons)
                    }
                    AssetKind::Flag => {
                        let reply: FlagListingReply = self.get_json(&url).await?;
                        CatalogListing::Flat(reply.flags)
                    }
                };
                Ok(BackendReply::Catalog(listing))
            }
        }
    }

    async fn get_json<T: DeserializeOwned>(&self, url: &str) -> BackendResult<T> {
        let response = self.client.get(url).send().await?;
        Ok(Self::check(response).await?.json().await?)
    }

    async fn get_bytes(&self, url: &str) -> BackendResult<Vec<u8>> {
        let response = self.client.get(url).send().await?;
        Ok(Self::check(response).await?.bytes().await?.to_vec())
    }

    async fn post_json<B: Serialize, T: DeserializeOwned>(&self, url: &str, body: &B) -> BackendResult<T> {
        let response = self.client.post(url).json(body).send().await?;
        Ok(Self::check(response).await?.json().await?)
    }

    async fn post_bytes<B: Serialize>(&self, url: &str, body: &B) -> BackendResult<Vec<u8>> {
        let response = self.client.post(url).json(body).send().await?;
        Ok(Self::check(response).await?.bytes().await?.to_vec())
    }

    async fn post_status<B: Serialize>(&self, url: &str, body: &B) -> BackendResult<BackendReply> {
        let reply: StatusReply = self.post_json(url, body).await?;
        Ok(BackendReply::Status(reply.status.unwrap_or_default()))
    }

    /// Turns a non-success HTTP status into [`BackendError::Rejected`],
    /// keeping the backend's `detail` message when it sent one.
    async fn check(response: reqwest::Response) -> BackendResult<reqwest::Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let text = response.text().await.unwrap_or_default();
        let detail = serde_json::from_str::<serde_json::Value>(&text)
            .ok()
            .and_then(|value| value.get("detail").and_then(|d| d.as_str()).map(str::to_owned))
            .unwrap_or(text);
        Err(BackendError::Rejected(format!("{status}: {detail}")))
    }
}

impl Transport for HttpTransport {
    fn send(&self, request: BackendRequest) -> TransportFuture<BackendResult<BackendReply>> {
        let transport = self.clone();
        boxed(async move { transport.execute(request).await })
    }
}
