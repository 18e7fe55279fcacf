use std::path::PathBuf;
use std::str::FromStr;

use anyhow::{bail, Context, Result};
use clap::Args;
use cropscope_core::config::SelectorConfig;
use cropscope_core::geometry::DisplayPoint;
use cropscope_core::io::image_io::{fetch_raster, probe_dimensions};
use cropscope_core::selection::{Selection, SelectionInput};
use cropscope_core::selector::{LoadOutcome, Selector};
use cropscope_core::source::SourceRef;
use tracing::debug;

/// A selection input given on the command line.
///
/// `pick:X,Y` clicks at overview display coordinates, `x:N`, `y:N` and
/// `size:N` set one field, `reset` restores the default size.
#[derive(Clone, Debug)]
pub struct InputArg(pub SelectionInput);

impl FromStr for InputArg {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let s = s.trim();
        if s.eq_ignore_ascii_case("reset") {
            return Ok(Self(SelectionInput::ResetToDefault));
        }

        let (key, value) = s
            .split_once(':')
            .ok_or_else(|| format!("expected KEY:VALUE or 'reset', got '{s}'"))?;
        let int = |v: &str| {
            v.trim()
                .parse::<i64>()
                .map_err(|_| format!("'{v}' is not an integer"))
        };

        let input = match key.trim().to_ascii_lowercase().as_str() {
            "pick" => {
                let (x, y) = value
                    .split_once(',')
                    .ok_or_else(|| format!("pick expects X,Y, got '{value}'"))?;
                let x: f64 = x.trim().parse().map_err(|_| format!("'{x}' is not a number"))?;
                let y: f64 = y.trim().parse().map_err(|_| format!("'{y}' is not a number"))?;
                SelectionInput::PointerPick(DisplayPoint::new(x, y))
            }
            "x" => SelectionInput::SetX(int(value)?),
            "y" => SelectionInput::SetY(int(value)?),
            "size" => SelectionInput::SetSize(int(value)?),
            other => return Err(format!("unknown input '{other}' (pick, x, y, size, reset)")),
        };
        Ok(Self(input))
    }
}

#[derive(Args)]
pub struct SessionArgs {
    /// Input image
    pub file: PathBuf,

    /// Source image id reported with the crop request
    #[arg(long, default_value = "1")]
    pub id: u64,

    /// Height of the viewport the overview is laid out in
    #[arg(long, default_value = "1000")]
    pub viewport_height: u32,

    /// Selector config file (TOML); defaults are used when omitted
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Selection inputs applied in order: pick:X,Y | x:N | y:N | size:N | reset
    #[arg(short, long = "input", value_name = "INPUT")]
    pub inputs: Vec<InputArg>,
}

impl SessionArgs {
    pub fn load_config(&self) -> Result<SelectorConfig> {
        match self.config {
            Some(ref path) => SelectorConfig::load(path)
                .with_context(|| format!("Failed to load config {}", path.display())),
            None => Ok(SelectorConfig::default()),
        }
    }

    /// Reference the image the way a catalog entry would.
    pub fn source_ref(&self) -> Result<SourceRef> {
        let (width, height) = probe_dimensions(&self.file)
            .with_context(|| format!("Failed to read {}", self.file.display()))?;
        Ok(SourceRef {
            id: self.id,
            raster_url: self.file.display().to_string(),
            width,
            height,
        })
    }

    /// Assign the image, decode it and run every input through the selector.
    /// Returns the selector with the committed selection after each step,
    /// starting with the seeded one.
    pub fn open(&self) -> Result<(Selector, Vec<(String, Selection)>)> {
        let mut selector = Selector::new(self.load_config()?, self.viewport_height)?;
        let source = self.source_ref()?;

        let ticket = selector.assign(source.clone());
        let seed = match selector.complete_load(ticket, fetch_raster(&source))? {
            LoadOutcome::Ready(seed) => seed,
            LoadOutcome::Stale => bail!("Decode result for {} was discarded", source.id),
        };
        debug!(selection = %seed, "Selector ready");

        let mut steps = vec![("seed".to_string(), seed)];
        for InputArg(input) in &self.inputs {
            let Some(committed) = selector.apply(*input) else {
                bail!("Input '{}' rejected in phase {}", input, selector.phase());
            };
            steps.push((input.to_string(), committed));
        }

        Ok((selector, steps))
    }
}
