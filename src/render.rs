//! Turns fetched asset bytes into something egui can draw.

use egui::{ColorImage, Context, TextureHandle, TextureOptions};
use resvg::{tiny_skia, usvg};

use crate::assets::strip_cache_token;
use crate::error::DecodeError;

/// Longest side, in pixels, SVG previews are rasterized at
pub const PREVIEW_SIDE: f32 = 512.0;

/// Whether `bytes` look like SVG markup rather than a raster format
pub fn is_svg(bytes: &[u8]) -> bool {
    let head = &bytes[..bytes.len().min(512)];
    let text = String::from_utf8_lossy(head);
    let trimmed = text.trim_start_matches('\u{feff}').trim_start();
    trimmed.starts_with("<svg") || (trimmed.starts_with('<') && text.contains("<svg"))
}

/// Decodes a fetched asset. SVG is rasterized with resvg, anything else goes
/// through the `image` crate.
pub fn decode_asset(bytes: &[u8]) -> Result<ColorImage, DecodeError> {
    if is_svg(bytes) {
        let pixmap = rasterize(bytes, PREVIEW_SIDE)?;
        let size = [pixmap.width() as usize, pixmap.height() as usize];
        Ok(ColorImage::from_rgba_premultiplied(size, pixmap.data()))
    } else {
        let image = image::load_from_memory(bytes)?.to_rgba8();
        let size = [image.width() as usize, image.height() as usize];
        Ok(ColorImage::from_rgba_unmultiplied(size, image.as_raw()))
    }
}

/// Rasterizes SVG markup into straight (non-premultiplied) RGBA, as clipboards
/// and image encoders expect.
pub fn rasterize_svg(markup: &[u8], max_side: f32) -> Result<image::RgbaImage, DecodeError> {
    let pixmap = rasterize(markup, max_side)?;
    let (width, height) = (pixmap.width(), pixmap.height());
    let data = pixmap
        .pixels()
        .iter()
        .flat_map(|pixel| {
            let color = pixel.demultiply();
            [color.red(), color.green(), color.blue(), color.alpha()]
        })
        .collect();
    image::RgbaImage::from_raw(width, height, data).ok_or(DecodeError::EmptyCanvas)
}

fn rasterize(markup: &[u8], max_side: f32) -> Result<tiny_skia::Pixmap, DecodeError> {
    let tree = usvg::Tree::from_data(markup, &usvg::Options::default())?;
    let size = tree.size();
    let longest = size.width().max(size.height());
    if longest <= 0.0 {
        return Err(DecodeError::EmptyCanvas);
    }
    let scale = max_side / longest;
    let width = (size.width() * scale).round().max(1.0) as u32;
    let height = (size.height() * scale).round().max(1.0) as u32;

    let mut pixmap = tiny_skia::Pixmap::new(width, height).ok_or(DecodeError::EmptyCanvas)?;
    resvg::render(&tree, tiny_skia::Transform::from_scale(scale, scale), &mut pixmap.as_mut());
    Ok(pixmap)
}

/// GPU texture of the asset currently previewed, keyed by its URL.
///
/// Only one preview is shown at a time, so a new URL replaces the texture
/// instead of growing a cache.
#[derive(Default)]
pub struct PreviewTexture {
    url: Option<String>,
    handle: Option<TextureHandle>,
}

impl PreviewTexture {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn url(&self) -> Option<&str> {
        self.url.as_deref()
    }

    pub fn texture(&self) -> Option<&TextureHandle> {
        self.handle.as_ref()
    }

    /// Uploads `image` as the preview for `url`.
    pub fn show(&mut self, ctx: &Context, url: &str, image: ColorImage) {
        let name = format!("preview:{}", strip_cache_token(url));
        match &mut self.handle {
            Some(handle) => handle.set(image, TextureOptions::LINEAR),
            None => self.handle = Some(ctx.load_texture(name, image, TextureOptions::LINEAR)),
        }
        self.url = Some(url.to_owned());
    }

    /// Whether the texture still belongs to `url`
    pub fn is_showing(&self, url: Option<&str>) -> bool {
        self.handle.is_some() && self.url.as_deref() == url
    }

    pub fn clear(&mut self) {
        self.url = None;
        self.handle = None;
    }
}
