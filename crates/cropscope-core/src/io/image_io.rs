use std::path::{Path, PathBuf};

use image::{ImageFormat, RgbaImage};

use crate::error::{CropscopeError, Result};
use crate::source::SourceRef;

/// Load any supported raster file as 8-bit RGBA.
pub fn load_raster(path: &Path) -> Result<RgbaImage> {
    let img = image::open(path)?;
    Ok(img.to_rgba8())
}

/// Read the pixel dimensions from the file header without decoding.
pub fn probe_dimensions(path: &Path) -> Result<(u32, u32)> {
    Ok(image::image_dimensions(path)?)
}

/// Save an RGBA surface as PNG.
pub fn save_rgba(image: &RgbaImage, path: &Path) -> Result<()> {
    image.save_with_format(path, ImageFormat::Png)?;
    Ok(())
}

/// Resolve a raster URL to a local path. Accepts `file://` URLs and plain
/// paths; any other scheme is rejected.
pub fn resolve_raster_path(raster_url: &str) -> Result<PathBuf> {
    if let Some(rest) = raster_url.strip_prefix("file://") {
        return Ok(PathBuf::from(rest));
    }
    if let Some((scheme, _)) = raster_url.split_once("://") {
        return Err(CropscopeError::ImageLoad(format!(
            "unsupported raster scheme '{scheme}' in {raster_url}"
        )));
    }
    Ok(PathBuf::from(raster_url))
}

/// Fetch and decode the raster behind a source reference.
pub fn fetch_raster(source: &SourceRef) -> Result<RgbaImage> {
    let path = resolve_raster_path(&source.raster_url)?;
    load_raster(&path).map_err(|e| {
        CropscopeError::ImageLoad(format!("{}: {e}", path.display()))
    })
}
