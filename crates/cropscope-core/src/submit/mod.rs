pub mod local;

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::config::CropSizePolicy;
use crate::error::Result;
use crate::selection::Selection;

pub use local::LocalCropService;

/// Wire payload sent to the crop service on commit.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CropRequest {
    pub x: u32,
    pub y: u32,
    /// Selected side length in source pixels.
    pub zoom: u32,
    #[serde(rename = "sourceImageId")]
    pub source_image_id: u64,
    pub crop_size: u32,
}

/// What the crop service reports back for a stored crop.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CropReceipt {
    pub crop_id: u64,
    pub source_image_id: u64,
    pub x: u32,
    pub y: u32,
    pub size: u32,
    pub path: PathBuf,
}

/// Downstream service that accepts finalized selections.
pub trait CropService: Send {
    fn submit(&self, request: &CropRequest) -> Result<CropReceipt>;
}

/// Packages a committed selection into a [`CropRequest`].
#[derive(Clone, Debug, Default)]
pub struct SubmissionAdapter {
    policy: CropSizePolicy,
}

impl SubmissionAdapter {
    pub fn new(policy: CropSizePolicy) -> Self {
        Self { policy }
    }

    pub fn package(&self, selection: &Selection, source_image_id: u64) -> CropRequest {
        let crop_size = self.policy.resolve(selection.size);
        if crop_size != selection.size {
            warn!(
                zoom = selection.size,
                crop_size,
                "crop_size differs from the selected size; the service may ignore the user's zoom"
            );
        }

        CropRequest {
            x: selection.x,
            y: selection.y,
            zoom: selection.size,
            source_image_id,
            crop_size,
        }
    }
}
