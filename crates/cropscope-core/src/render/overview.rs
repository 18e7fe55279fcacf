use image::imageops::FilterType;
use image::{Rgba, RgbaImage};
use tracing::debug;

use crate::geometry::{SourcePoint, ViewportGeometry};
use crate::selection::Selection;

/// The selection outline in display pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct OutlineBox {
    pub left: u32,
    pub top: u32,
    pub side: u32,
}

impl OutlineBox {
    /// Project a source-space selection onto the overview.
    pub fn project(selection: &Selection, geometry: &ViewportGeometry) -> Self {
        let origin =
            geometry.to_display(SourcePoint::new(selection.x as f64, selection.y as f64));
        let side = geometry.length_to_display(selection.size).round().max(1.0);
        Self {
            left: origin.x.round().max(0.0) as u32,
            top: origin.y.round().max(0.0) as u32,
            side: side as u32,
        }
    }
}

/// Draws the scaled source with a single stroked selection outline.
pub struct OverviewRenderer {
    /// Scaled copy of the source, rebuilt once per image assignment.
    base: Option<RgbaImage>,
    surface: RgbaImage,
    outline: Option<OutlineBox>,
    color: Rgba<u8>,
    stroke_width: u32,
}

impl OverviewRenderer {
    pub fn new(color: [u8; 4], stroke_width: u32) -> Self {
        Self {
            base: None,
            surface: RgbaImage::new(0, 0),
            outline: None,
            color: Rgba(color),
            stroke_width: stroke_width.max(1),
        }
    }

    /// Scale the source to the display dimensions of `geometry`.
    pub fn prepare(&mut self, raster: &RgbaImage, geometry: &ViewportGeometry) {
        let scaled = image::imageops::resize(
            raster,
            geometry.display_width,
            geometry.display_height,
            FilterType::Triangle,
        );
        debug!(
            width = geometry.display_width,
            height = geometry.display_height,
            "Overview base prepared"
        );
        self.base = Some(scaled);
        self.outline = None;
    }

    /// Redraw the frame: scaled source first, then the outline on top.
    pub fn render(&mut self, selection: &Selection, geometry: &ViewportGeometry) {
        let Some(base) = self.base.as_ref() else {
            return;
        };

        self.surface.clone_from(base);
        let outline = OutlineBox::project(selection, geometry);
        stroke_box(&mut self.surface, &outline, self.color, self.stroke_width);
        self.outline = Some(outline);
    }

    pub fn clear(&mut self) {
        self.base = None;
        self.surface = RgbaImage::new(0, 0);
        self.outline = None;
    }

    pub fn surface(&self) -> &RgbaImage {
        &self.surface
    }

    pub fn outline(&self) -> Option<OutlineBox> {
        self.outline
    }
}

/// Stroke a hollow square, clipped to the surface.
fn stroke_box(surface: &mut RgbaImage, outline: &OutlineBox, color: Rgba<u8>, width: u32) {
    let (w, h) = surface.dimensions();
    let mut put = |x: u32, y: u32| {
        if x < w && y < h {
            surface.put_pixel(x, y, color);
        }
    };

    for t in 0..width {
        if 2 * t >= outline.side {
            break;
        }
        let x0 = outline.left + t;
        let y0 = outline.top + t;
        let x1 = outline.left + outline.side - 1 - t;
        let y1 = outline.top + outline.side - 1 - t;

        for x in x0..=x1 {
            put(x, y0);
            put(x, y1);
        }
        for y in y0..=y1 {
            put(x0, y);
            put(x1, y);
        }
    }
}
