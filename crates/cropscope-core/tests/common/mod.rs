#![allow(dead_code)]

use std::path::{Path, PathBuf};

use image::{Rgba, RgbaImage};

use cropscope_core::config::SelectorConfig;
use cropscope_core::io::image_io::save_rgba;
use cropscope_core::selector::Selector;
use cropscope_core::source::SourceRef;

/// Build a raster where every pixel encodes its own coordinates and is never
/// pure black.
pub fn coordinate_raster(width: u32, height: u32) -> RgbaImage {
    RgbaImage::from_fn(width, height, |x, y| {
        Rgba([(x % 251) as u8 + 1, (y % 251) as u8 + 1, ((x + y) % 7) as u8 + 1, 255])
    })
}

/// Uniform raster of a single color.
pub fn solid_raster(width: u32, height: u32, rgba: [u8; 4]) -> RgbaImage {
    RgbaImage::from_pixel(width, height, Rgba(rgba))
}

pub fn source_ref(id: u64, width: u32, height: u32) -> SourceRef {
    SourceRef {
        id,
        raster_url: format!("memory://{id}"),
        width,
        height,
    }
}

/// Selector with the default config and a loaded `width x height` raster.
pub fn ready_selector(width: u32, height: u32, viewport_height: u32) -> Selector {
    let mut selector = Selector::new(SelectorConfig::default(), viewport_height).unwrap();
    let ticket = selector.assign(source_ref(1, width, height));
    selector
        .complete_load(ticket, Ok(coordinate_raster(width, height)))
        .unwrap();
    selector
}

/// Write a raster as PNG into `dir` and return its path.
pub fn write_png(dir: &Path, name: &str, image: &RgbaImage) -> PathBuf {
    let path = dir.join(name);
    save_rgba(image, &path).expect("write PNG");
    path
}

/// Small deterministic generator for input sweeps.
pub struct Lcg(u64);

impl Lcg {
    pub fn new(seed: u64) -> Self {
        Self(seed)
    }

    pub fn next_u64(&mut self) -> u64 {
        self.0 = self
            .0
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        self.0 >> 33
    }

    /// Uniform integer in `[lo, hi]`.
    pub fn range(&mut self, lo: i64, hi: i64) -> i64 {
        lo + (self.next_u64() % (hi - lo + 1) as u64) as i64
    }
}
