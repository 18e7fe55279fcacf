use image::RgbaImage;
use rayon::prelude::*;

use crate::consts::PARALLEL_PIXEL_THRESHOLD;
use crate::error::{CropscopeError, Result};

/// A square crop in source pixel coordinates.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CropRect {
    pub x: u32,
    pub y: u32,
    pub size: u32,
}

impl CropRect {
    /// Validate the crop against the source dimensions.
    ///
    /// The origin must lie inside the image. A square that would run past the
    /// right or bottom edge is shifted back so it ends on that edge.
    pub fn fitted(&self, src_w: u32, src_h: u32) -> Result<CropRect> {
        if self.size == 0 {
            return Err(CropscopeError::InvalidCrop("Crop size must be > 0".into()));
        }

        if self.x >= src_w || self.y >= src_h {
            return Err(CropscopeError::InvalidCrop(format!(
                "Crop origin ({}, {}) lies outside the source ({src_w}x{src_h})",
                self.x, self.y
            )));
        }

        if self.size > src_w.min(src_h) {
            return Err(CropscopeError::InvalidCrop(format!(
                "Crop size {} exceeds source dimensions ({src_w}x{src_h})",
                self.size
            )));
        }

        let x = self.x.min(src_w - self.size);
        let y = self.y.min(src_h - self.size);

        Ok(CropRect {
            x,
            y,
            size: self.size,
        })
    }
}

/// Copy the fitted crop out of the raster at native resolution.
pub fn extract_crop(raster: &RgbaImage, crop: &CropRect) -> Result<RgbaImage> {
    let (w, h) = raster.dimensions();
    let fitted = crop.fitted(w, h)?;
    Ok(image::imageops::crop_imm(raster, fitted.x, fitted.y, fitted.size, fitted.size).to_image())
}

/// Fraction of pixels whose color channels are all zero (alpha ignored).
///
/// Grayscale conversion is a positive weighted sum of R, G and B, so a pixel
/// is zero after conversion exactly when all three channels are zero. This
/// counts the same pixels as thresholding the gray image at zero.
pub fn black_fraction(image: &RgbaImage) -> f64 {
    let total = image.width() as usize * image.height() as usize;
    if total == 0 {
        return 0.0;
    }

    let is_black = |p: &[u8]| p[0] == 0 && p[1] == 0 && p[2] == 0;
    let raw = image.as_raw();
    let black = if total >= PARALLEL_PIXEL_THRESHOLD {
        raw.par_chunks_exact(4).filter(|p| is_black(p)).count()
    } else {
        raw.chunks_exact(4).filter(|p| is_black(p)).count()
    };

    black as f64 / total as f64
}

/// True when more than `threshold` of the image is pure black.
pub fn is_mostly_black(image: &RgbaImage, threshold: f64) -> bool {
    black_fraction(image) > threshold
}
