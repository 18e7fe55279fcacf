use image::RgbaImage;

use crate::error::{CropscopeError, Result};
use crate::selection::Selection;

const BYTES_PER_PIXEL: usize = 4;

/// Holds the selected source pixels at native resolution.
///
/// The backing surface always matches the selection size; the host shows it
/// inside a fixed `display_size` box, so larger selections look zoomed out.
pub struct PreviewRenderer {
    surface: RgbaImage,
    display_size: u32,
}

impl PreviewRenderer {
    pub fn new(display_size: u32) -> Self {
        Self {
            surface: RgbaImage::new(0, 0),
            display_size,
        }
    }

    /// Resize the surface to `size x size`, then copy the selected rows.
    pub fn render(&mut self, raster: &RgbaImage, selection: &Selection) -> Result<()> {
        let (src_w, src_h) = raster.dimensions();
        let Selection { x, y, size } = *selection;

        if x as u64 + size as u64 > src_w as u64 || y as u64 + size as u64 > src_h as u64 {
            return Err(CropscopeError::InvalidCrop(format!(
                "Preview region ({x},{y} {size}x{size}) exceeds source ({src_w}x{src_h})"
            )));
        }

        if self.surface.dimensions() != (size, size) {
            self.surface = RgbaImage::new(size, size);
        }

        let src = raster.as_raw();
        let src_row_stride = src_w as usize * BYTES_PER_PIXEL;
        let col_byte_offset = x as usize * BYTES_PER_PIXEL;
        let row_bytes = size as usize * BYTES_PER_PIXEL;
        let dst: &mut [u8] = &mut self.surface;

        for row in 0..size as usize {
            let src_start = (y as usize + row) * src_row_stride + col_byte_offset;
            let dst_start = row * row_bytes;
            dst[dst_start..dst_start + row_bytes]
                .copy_from_slice(&src[src_start..src_start + row_bytes]);
        }

        Ok(())
    }

    pub fn clear(&mut self) {
        self.surface = RgbaImage::new(0, 0);
    }

    pub fn surface(&self) -> &RgbaImage {
        &self.surface
    }

    /// Edge of the fixed on-screen box the surface is shown in.
    pub fn display_size(&self) -> u32 {
        self.display_size
    }

    /// On-screen magnification of the current surface.
    pub fn display_zoom(&self) -> f64 {
        let side = self.surface.width();
        if side == 0 {
            0.0
        } else {
            self.display_size as f64 / side as f64
        }
    }
}
