pub mod overview;
pub mod preview;

pub use overview::{OutlineBox, OverviewRenderer};
pub use preview::PreviewRenderer;
