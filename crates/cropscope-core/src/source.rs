use image::RgbaImage;
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Caller-supplied reference to a source image.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceRef {
    pub id: u64,
    pub raster_url: String,
    pub width: u32,
    pub height: u32,
}

/// A decoded, read-only source image owned by one Selector.
#[derive(Clone, Debug)]
pub struct SourceImage {
    pub id: u64,
    pub width: u32,
    pub height: u32,
    pub raster: RgbaImage,
}

impl SourceImage {
    /// Bind a decoded raster to its reference. The decoded dimensions are
    /// authoritative when they disagree with the declared ones.
    pub fn from_decoded(source: &SourceRef, raster: RgbaImage) -> Self {
        let (width, height) = raster.dimensions();
        if (width, height) != (source.width, source.height) {
            warn!(
                id = source.id,
                declared = %format!("{}x{}", source.width, source.height),
                decoded = %format!("{width}x{height}"),
                "Declared source dimensions differ from decoded raster"
            );
        }
        Self {
            id: source.id,
            width,
            height,
            raster,
        }
    }
}
