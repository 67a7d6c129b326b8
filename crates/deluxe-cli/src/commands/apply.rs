use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use deluxe_core::frame::Image;
use deluxe_core::graph::ProgressReporter;
use deluxe_core::io::image_io::{load_image, save_image};
use deluxe_core::meta::config::SharpenConfig;
use deluxe_core::meta::sharpen::{grain_merge, SharpenDeluxe};
use deluxe_core::meta::MetaNode;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, info};

use super::{ShapeArg, TechniqueArg};
use crate::summary::print_apply_summary;

#[derive(Args)]
pub struct ApplyArgs {
    /// Input image file (TIFF or PNG)
    pub file: PathBuf,

    /// Sharpen config file (TOML)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Blur whose grain extract forms the high pass
    #[arg(long, value_enum)]
    pub technique: Option<TechniqueArg>,

    /// Median radius (0-35)
    #[arg(long)]
    pub median: Option<i64>,

    /// Median neighborhood shape
    #[arg(long, value_enum)]
    pub median_shape: Option<ShapeArg>,

    /// Box radius (0-11)
    #[arg(long = "box")]
    pub box_radius: Option<i64>,

    /// DCT denoise strength (20-60)
    #[arg(long)]
    pub denoise: Option<f64>,

    /// Mean curvature iterations (5-80)
    #[arg(long)]
    pub mcb: Option<f64>,

    /// Domain smooth edge preservation (0.5-0.9)
    #[arg(long)]
    pub ds: Option<f64>,

    /// Noise reduction iterations (15-30)
    #[arg(long)]
    pub nr: Option<f64>,

    /// Lens blur radius (0-11)
    #[arg(long)]
    pub lens: Option<f64>,

    /// Gaussian standard deviation (0-10)
    #[arg(long)]
    pub gaussian: Option<f64>,

    /// Grain-merge the high pass back onto the input instead of saving it
    #[arg(long)]
    pub merge: bool,

    /// Opacity of the merged high pass (0.0-1.0)
    #[arg(long, requires = "merge")]
    pub opacity: Option<f64>,

    /// Process color input as luminance
    #[arg(long)]
    pub mono: bool,

    /// Output file path
    #[arg(short, long, default_value = "sharpened.tiff")]
    pub output: PathBuf,
}

/// Drives an indicatif bar from graph evaluation.
struct BarReporter {
    bar: ProgressBar,
}

impl ProgressReporter for BarReporter {
    fn begin(&self, total_nodes: usize) {
        self.bar.set_length(total_nodes as u64);
        self.bar.set_position(0);
    }

    fn node_started(&self, label: &str) {
        self.bar.set_message(label.to_string());
    }

    fn advance(&self, nodes_done: usize) {
        self.bar.set_position(nodes_done as u64);
    }
}

pub fn run(args: &ApplyArgs) -> Result<()> {
    let config = build_config(args)?;

    let mut image = load_image(&args.file)
        .with_context(|| format!("Failed to load {}", args.file.display()))?;
    if args.mono {
        image = Image::Mono(image.to_mono());
    }
    let (height, width) = image.dim();
    info!(
        path = %args.file.display(),
        width,
        height,
        channels = image.channel_count(),
        "Input loaded"
    );

    print_apply_summary(&config, &args.file, &args.output, &image);

    let mut node = MetaNode::attached(SharpenDeluxe::new())?;
    config
        .apply_to(&mut node)
        .context("Invalid sharpen settings")?;
    debug!(technique = %config.technique, "Sharpen settings applied");

    let bar = ProgressBar::new(0);
    bar.set_style(
        ProgressStyle::default_bar()
            .template("{msg:16} [{bar:40}] {pos}/{len}")?
            .progress_chars("=> "),
    );
    let reporter = BarReporter { bar };

    let high_pass = node.process_reported(image.clone(), &reporter)?;
    let result = match config.merge {
        Some(ref merge) => {
            reporter.bar.set_message("merge");
            grain_merge(image, high_pass, merge.opacity).context("Grain merge failed")?
        }
        None => high_pass,
    };
    reporter.bar.finish_with_message("Done");
    info!(merged = config.merge.is_some(), "Sharpening complete");

    save_image(&result, &args.output)
        .with_context(|| format!("Failed to save {}", args.output.display()))?;
    info!(path = %args.output.display(), "Output saved");
    println!("\nOutput saved to {}", args.output.display());

    Ok(())
}

fn build_config(args: &ApplyArgs) -> Result<SharpenConfig> {
    let mut config = if let Some(ref path) = args.config {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?;
        toml::from_str(&contents).context("Invalid sharpen config")?
    } else {
        SharpenConfig::default()
    };

    if let Some(technique) = args.technique {
        config.technique = technique.into();
    }
    if let Some(median) = args.median {
        config.median = median;
    }
    if let Some(shape) = args.median_shape {
        config.median_shape = shape.into();
    }
    if let Some(radius) = args.box_radius {
        config.box_radius = radius;
    }
    if let Some(denoise) = args.denoise {
        config.denoise = denoise;
    }
    if let Some(mcb) = args.mcb {
        config.mcb = mcb;
    }
    if let Some(ds) = args.ds {
        config.ds = ds;
    }
    if let Some(nr) = args.nr {
        config.nr = nr;
    }
    if let Some(lens) = args.lens {
        config.lens = lens;
    }
    if let Some(gaussian) = args.gaussian {
        config.gaussian = gaussian;
    }
    if args.merge {
        let mut merge = config.merge.take().unwrap_or_default();
        if let Some(opacity) = args.opacity {
            merge.opacity = opacity;
        }
        if !(0.0..=1.0).contains(&merge.opacity) {
            anyhow::bail!("Opacity must be between 0.0 and 1.0, got {}", merge.opacity);
        }
        config.merge = Some(merge);
    }

    Ok(config)
}
