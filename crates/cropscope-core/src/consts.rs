/// Fraction of the available vertical space given to the overview surface.
pub const DEFAULT_DISPLAY_BUDGET: f64 = 0.72;

/// Side length (source pixels) of a freshly seeded or reset selection.
pub const DEFAULT_SELECTION_SIZE: u32 = 256;

/// Smallest side length the size channel may commit.
pub const DEFAULT_MIN_SELECTION_SIZE: u32 = 1;

/// Size slider step, in source pixels.
pub const DEFAULT_SIZE_SLIDER_STEP: u32 = 256;

/// Size slider upper bound, in source pixels.
pub const DEFAULT_SIZE_SLIDER_MAX: u32 = 3000;

/// On-screen edge length of the preview box, independent of the selection size.
pub const DEFAULT_PREVIEW_DISPLAY_SIZE: u32 = 256;

/// `crop_size` value sent by the fixed crop-size policy.
pub const DEFAULT_CROP_SIZE: u32 = 256;

/// Outline stroke color on the overview (opaque green).
pub const DEFAULT_OUTLINE_COLOR: [u8; 4] = [0, 255, 0, 255];

/// Outline stroke width in display pixels.
pub const DEFAULT_OUTLINE_WIDTH: u32 = 1;

/// Crops whose fraction of pure-black pixels exceeds this are rejected.
pub const BLACK_FRACTION_THRESHOLD: f64 = 0.80;

/// Minimum pixel count (w*h) to use row-level Rayon parallelism.
pub const PARALLEL_PIXEL_THRESHOLD: usize = 65_536;
