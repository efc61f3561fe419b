//! Asset retrieval paths.
//!
//! Every preview URL in the application is built here from
//! `(kind, folder, name, mode, flag shape)`:
//!
//! ```text
//! {base}/{root}/{folder/}{file}
//!
//! Icon             root = static-icons-{mode}       folder-aware
//! ColorfulIcon     root = colorful-icons            folder-aware
//! SingleColorIcon  root = single-color-files-{mode} flat
//! Flag             root = flags                     flat, file = shape variant
//! ```
//!
//! Each segment is percent-encoded, so names like `C# logo` stay inside the
//! path. After any mutation the URL gets a `?t=<millis>` token from
//! [`CacheBuster`].

use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};

use crate::model::{AssetKind, FlagShape, Folder, ItemRef, ThemeMode};

// Everything but RFC 3986 unreserved characters
const SEGMENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

/// Percent-encodes one path segment.
pub fn encode_segment(segment: &str) -> String {
    utf8_percent_encode(segment, SEGMENT).to_string()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetPaths {
    base_url: String,
}

impl AssetPaths {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_owned(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Name of the file backing an item, including its extension
    pub fn file_name(item: &ItemRef, shape: FlagShape) -> String {
        match item.kind {
            AssetKind::Flag => shape.file_name(&item.name),
            _ => format!("{}.svg", item.name),
        }
    }

    fn root(kind: AssetKind, mode: ThemeMode) -> String {
        match kind {
            AssetKind::Icon => format!("static-icons-{}", mode.as_str()),
            AssetKind::ColorfulIcon => "colorful-icons".to_owned(),
            AssetKind::SingleColorIcon => format!("single-color-files-{}", mode.as_str()),
            AssetKind::Flag => "flags".to_owned(),
        }
    }

    /// Uncached URL of an item's rendered asset
    pub fn asset_url(&self, item: &ItemRef, mode: ThemeMode, shape: FlagShape) -> String {
        let root = encode_segment(&Self::root(item.kind, mode));
        let mut url = format!("{}/{root}/", self.base_url);
        if item.kind.has_folders() {
            if let Folder::Named(folder) = &item.folder {
                url.push_str(&encode_segment(folder));
                url.push('/');
            }
        }
        url.push_str(&encode_segment(&Self::file_name(item, shape)));
        url
    }

    /// Endpoint URL for a backend route such as `update_color`
    pub fn endpoint(&self, route: &str) -> String {
        format!("{}/{}", self.base_url, route.trim_start_matches('/'))
    }
}

/// Produces strictly increasing `?t=` tokens so two refreshes in the same
/// millisecond still yield distinct URLs.
#[derive(Debug, Default, Clone)]
pub struct CacheBuster {
    last: u64,
}

impl CacheBuster {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn bust(&mut self, url: &str, now_millis: u64) -> String {
        let token = now_millis.max(self.last + 1);
        self.last = token;
        format!("{}?t={}", strip_cache_token(url), token)
    }
}

/// URL without any cache-busting query
pub fn strip_cache_token(url: &str) -> &str {
    match url.find("?t=") {
        Some(index) => &url[..index],
        None => url,
    }
}
