use crate::error::{CropscopeError, Result};

/// A point on the scaled overview surface.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DisplayPoint {
    pub x: f64,
    pub y: f64,
}

impl DisplayPoint {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// A point in full-resolution source pixels.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SourcePoint {
    pub x: f64,
    pub y: f64,
}

impl SourcePoint {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Mapping between source space and the overview's display space.
///
/// Derived from the source dimensions and the display-height budget only;
/// the Selector rebuilds it wholesale and never mutates it in place.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ViewportGeometry {
    pub display_width: u32,
    pub display_height: u32,
    pub scale_factor: f64,
    pub inverse_scale_factor: f64,
}

impl ViewportGeometry {
    /// Compute the overview geometry for a `width x height` source shown in a
    /// viewport `viewport_height` pixels tall with `budget` of it available.
    pub fn compute(width: u32, height: u32, viewport_height: u32, budget: f64) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(CropscopeError::InvalidGeometry { width, height });
        }

        let display_height = (viewport_height as f64 * budget).round();
        if !display_height.is_finite() || display_height < 1.0 {
            return Err(CropscopeError::InvalidGeometry {
                width,
                height: display_height.max(0.0) as u32,
            });
        }

        let display_width = (display_height * width as f64 / height as f64).round();
        let scale_factor = display_height / height as f64;

        Ok(Self {
            display_width: display_width.max(1.0) as u32,
            display_height: display_height as u32,
            scale_factor,
            inverse_scale_factor: 1.0 / scale_factor,
        })
    }

    pub fn to_display(&self, p: SourcePoint) -> DisplayPoint {
        DisplayPoint::new(p.x * self.scale_factor, p.y * self.scale_factor)
    }

    pub fn to_source(&self, p: DisplayPoint) -> SourcePoint {
        SourcePoint::new(p.x * self.inverse_scale_factor, p.y * self.inverse_scale_factor)
    }

    /// Scale a source-space length to display pixels.
    pub fn length_to_display(&self, len: u32) -> f64 {
        len as f64 * self.scale_factor
    }
}
