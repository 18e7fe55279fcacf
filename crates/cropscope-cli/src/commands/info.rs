use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use cropscope_core::consts::DEFAULT_DISPLAY_BUDGET;
use cropscope_core::geometry::ViewportGeometry;
use cropscope_core::io::image_io::probe_dimensions;

#[derive(Args)]
pub struct InfoArgs {
    /// Input image
    pub file: PathBuf,

    /// Height of the viewport the overview is laid out in
    #[arg(long, default_value = "1000")]
    pub viewport_height: u32,

    /// Fraction of the viewport height used by the overview
    #[arg(long, default_value_t = DEFAULT_DISPLAY_BUDGET)]
    pub budget: f64,
}

pub fn run(args: &InfoArgs) -> Result<()> {
    let (w, h) = probe_dimensions(&args.file)
        .with_context(|| format!("Failed to read {}", args.file.display()))?;
    let geometry = ViewportGeometry::compute(w, h, args.viewport_height, args.budget)?;

    println!("File:        {}", args.file.display());
    println!("Dimensions:  {}x{}", w, h);
    println!("Max ROI:     {}", w.min(h));
    println!(
        "Overview:    {}x{} (viewport {} px, budget {})",
        geometry.display_width, geometry.display_height, args.viewport_height, args.budget
    );
    println!("Scale:       {:.6}", geometry.scale_factor);
    println!("Inverse:     {:.6}", geometry.inverse_scale_factor);

    Ok(())
}
