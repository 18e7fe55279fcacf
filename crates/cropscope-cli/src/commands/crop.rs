use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;
use clap::Args;
use cropscope_core::submit::LocalCropService;
use indicatif::{ProgressBar, ProgressStyle};

use super::session::SessionArgs;
use crate::summary;

#[derive(Args)]
pub struct CropArgs {
    #[command(flatten)]
    pub session: SessionArgs,

    /// Directory the crop is written to
    #[arg(long, default_value = "crops")]
    pub output_dir: PathBuf,

    /// Reject crops with more than this fraction of pure black pixels
    #[arg(long)]
    pub black_threshold: Option<f64>,
}

pub fn run(args: &CropArgs) -> Result<()> {
    let (mut selector, steps) = args.session.open()?;
    summary::print_steps(&steps);

    let mut service = LocalCropService::new(&args.output_dir);
    if let Some(threshold) = args.black_threshold {
        service = service.with_black_threshold(threshold);
    }
    service.register(args.session.id, &args.session.file);

    let pb = ProgressBar::new_spinner();
    pb.set_style(ProgressStyle::default_spinner().template("{spinner} {msg}")?);
    pb.set_message(format!(
        "Cropping {}",
        selector.selection().map(|s| s.to_string()).unwrap_or_default()
    ));
    pb.enable_steady_tick(Duration::from_millis(80));

    let result = selector.commit(&service);
    pb.finish_and_clear();

    let receipt = result?;
    summary::print_receipt(&receipt);
    Ok(())
}
