use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

use tracing::{debug, info};

use crate::consts::BLACK_FRACTION_THRESHOLD;
use crate::error::{CropscopeError, Result};
use crate::io::crop::{extract_crop, is_mostly_black, CropRect};
use crate::io::image_io::{load_raster, save_rgba};

use super::{CropReceipt, CropRequest, CropService};

/// Crop service backed by the local file system.
///
/// Sources are looked up by id in a catalog of registered files; accepted
/// crops are written as PNG into `output_dir`.
pub struct LocalCropService {
    catalog: HashMap<u64, PathBuf>,
    output_dir: PathBuf,
    black_threshold: f64,
    next_crop_id: AtomicU64,
}

impl LocalCropService {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            catalog: HashMap::new(),
            output_dir: output_dir.into(),
            black_threshold: BLACK_FRACTION_THRESHOLD,
            next_crop_id: AtomicU64::new(1),
        }
    }

    pub fn with_black_threshold(mut self, threshold: f64) -> Self {
        self.black_threshold = threshold;
        self
    }

    pub fn register(&mut self, source_image_id: u64, path: impl Into<PathBuf>) {
        self.catalog.insert(source_image_id, path.into());
    }

    /// Later crops go to `output_dir`; registered sources are kept.
    pub fn set_output_dir(&mut self, output_dir: impl Into<PathBuf>) {
        self.output_dir = output_dir.into();
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }
}

impl CropService for LocalCropService {
    fn submit(&self, request: &CropRequest) -> Result<CropReceipt> {
        let source_path = self.catalog.get(&request.source_image_id).ok_or_else(|| {
            CropscopeError::Submission(format!(
                "unknown source image {}",
                request.source_image_id
            ))
        })?;

        // The backend crops at the selected zoom; crop_size is informational.
        if request.crop_size != request.zoom {
            debug!(
                zoom = request.zoom,
                crop_size = request.crop_size,
                "Cropping at zoom, ignoring crop_size"
            );
        }

        let raster = load_raster(source_path)?;
        let (w, h) = raster.dimensions();
        let rect = CropRect {
            x: request.x,
            y: request.y,
            size: request.zoom,
        }
        .fitted(w, h)?;
        let crop = extract_crop(&raster, &rect)?;

        if is_mostly_black(&crop, self.black_threshold) {
            return Err(CropscopeError::Submission(format!(
                "crop region is more than {:.0}% black",
                self.black_threshold * 100.0
            )));
        }

        std::fs::create_dir_all(&self.output_dir)?;
        let path = self.output_dir.join(format!(
            "crop_{}_{}_{}_{}.png",
            request.source_image_id, rect.x, rect.y, rect.size
        ));
        save_rgba(&crop, &path)?;

        let crop_id = self.next_crop_id.fetch_add(1, Ordering::Relaxed);
        info!(
            crop_id,
            source = request.source_image_id,
            path = %path.display(),
            "Crop stored"
        );

        Ok(CropReceipt {
            crop_id,
            source_image_id: request.source_image_id,
            x: rect.x,
            y: rect.y,
            size: rect.size,
            path,
        })
    }
}
