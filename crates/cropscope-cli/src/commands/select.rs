use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;
use cropscope_core::io::image_io::save_rgba;
use cropscope_core::submit::SubmissionAdapter;
use image::RgbaImage;

use super::session::SessionArgs;
use crate::summary;

#[derive(Args)]
pub struct SelectArgs {
    #[command(flatten)]
    pub session: SessionArgs,

    /// Write the overview (with outline) as PNG
    #[arg(long)]
    pub overview: Option<PathBuf>,

    /// Write the preview (native-resolution selection) as PNG
    #[arg(long)]
    pub preview: Option<PathBuf>,

    /// Print the crop request as JSON instead of a summary
    #[arg(long)]
    pub json: bool,
}

pub fn run(args: &SelectArgs) -> Result<()> {
    let (selector, steps) = args.session.open()?;
    if !args.json {
        summary::print_steps(&steps);
    }

    if let Some(ref path) = args.overview {
        write_surface(selector.overview().surface(), path)?;
    }
    if let Some(ref path) = args.preview {
        write_surface(selector.preview().surface(), path)?;
    }

    let selection = selector
        .selection()
        .context("Selector has no committed selection")?;
    let request = SubmissionAdapter::new(selector.config().crop_size)
        .package(&selection, args.session.id);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&request)?);
    } else {
        summary::print_selection_summary(&args.session.file, &selector, &request);
    }

    Ok(())
}

fn write_surface(surface: &RgbaImage, path: &Path) -> Result<()> {
    save_rgba(surface, path).with_context(|| format!("Failed to write {}", path.display()))?;
    eprintln!("Saved {}x{} to {}", surface.width(), surface.height(), path.display());
    Ok(())
}
