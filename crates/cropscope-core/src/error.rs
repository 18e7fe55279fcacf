use thiserror::Error;

#[derive(Error, Debug)]
pub enum CropscopeError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Image format error: {0}")]
    Image(#[from] image::ImageError),

    #[error("Invalid image geometry: {width}x{height}")]
    InvalidGeometry { width: u32, height: u32 },

    #[error("Image load failed: {0}")]
    ImageLoad(String),

    #[error("Crop submission failed: {0}")]
    Submission(String),

    #[error("Invalid crop: {0}")]
    InvalidCrop(String),

    #[error("Selector is not ready (phase: {0})")]
    NotReady(String),

    #[error("Config error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, CropscopeError>;
