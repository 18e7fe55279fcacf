use std::fmt;

use crate::geometry::{DisplayPoint, ViewportGeometry};

/// The committed square region of interest, in source pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Selection {
    pub x: u32,
    pub y: u32,
    pub size: u32,
}

impl Selection {
    pub fn new(x: u32, y: u32, size: u32) -> Self {
        Self { x, y, size }
    }

    /// Whether the tuple already satisfies every boundary invariant.
    pub fn is_within(&self, bounds: &SelectionBounds) -> bool {
        let side = bounds.max_size();
        self.size <= side
            && self.size >= bounds.min_size.min(side)
            && self.x as u64 + self.size as u64 <= bounds.width as u64
            && self.y as u64 + self.size as u64 <= bounds.height as u64
    }
}

impl fmt::Display for Selection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.x, self.y, self.size)
    }
}

/// Limits a selection must respect for one source image.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SelectionBounds {
    pub width: u32,
    pub height: u32,
    pub min_size: u32,
}

impl SelectionBounds {
    pub fn new(width: u32, height: u32, min_size: u32) -> Self {
        Self {
            width,
            height,
            min_size,
        }
    }

    /// Largest square that fits the source.
    pub fn max_size(&self) -> u32 {
        self.width.min(self.height)
    }
}

/// An unvalidated `(x, y, size)` tuple. Signed so pointer picks left of or
/// above the overview still clamp instead of wrapping.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Proposal {
    pub x: i64,
    pub y: i64,
    pub size: i64,
}

impl From<Selection> for Proposal {
    fn from(s: Selection) -> Self {
        Self {
            x: s.x as i64,
            y: s.y as i64,
            size: s.size as i64,
        }
    }
}

/// The input channels allowed to change the selection.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum SelectionInput {
    /// Click on the overview; the source pixel under the point becomes the
    /// new top-left corner.
    PointerPick(DisplayPoint),
    SetX(i64),
    SetY(i64),
    SetSize(i64),
    ResetToDefault,
}

impl SelectionInput {
    /// Build the raw proposal this input makes against `current`.
    pub fn propose(
        &self,
        current: Selection,
        geometry: &ViewportGeometry,
        default_size: u32,
    ) -> Proposal {
        let mut p = Proposal::from(current);
        match *self {
            Self::PointerPick(point) => {
                let src = geometry.to_source(point);
                p.x = floor_to_i64(src.x);
                p.y = floor_to_i64(src.y);
            }
            Self::SetX(x) => p.x = x,
            Self::SetY(y) => p.y = y,
            Self::SetSize(size) => p.size = size,
            Self::ResetToDefault => p.size = default_size as i64,
        }
        p
    }
}

impl fmt::Display for SelectionInput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PointerPick(p) => write!(f, "pick ({:.1}, {:.1})", p.x, p.y),
            Self::SetX(v) => write!(f, "x = {v}"),
            Self::SetY(v) => write!(f, "y = {v}"),
            Self::SetSize(v) => write!(f, "size = {v}"),
            Self::ResetToDefault => write!(f, "reset"),
        }
    }
}

/// Truncate a source coordinate to the pixel it falls in.
fn floor_to_i64(v: f64) -> i64 {
    if v.is_nan() {
        0
    } else {
        // Absorbs representation error from the inverse scale.
        (v + PICK_EPSILON).floor() as i64
    }
}

const PICK_EPSILON: f64 = 1e-9;

/// Force a proposal into a valid selection.
///
/// Size is clamped first; both offsets are then clamped against the new size,
/// so growing or shrinking the square can move the origin either way.
pub fn clamp(proposal: Proposal, bounds: &SelectionBounds) -> Selection {
    let max_size = bounds.max_size() as i64;
    let min_size = (bounds.min_size as i64).min(max_size);

    let size = proposal.size.clamp(min_size, max_size);
    let x = proposal.x.clamp(0, bounds.width as i64 - size);
    let y = proposal.y.clamp(0, bounds.height as i64 - size);

    Selection {
        x: x as u32,
        y: y as u32,
        size: size as u32,
    }
}
