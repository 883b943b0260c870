use anyhow::{Context, Result};
use clap::Parser;
use reslice_core::{GridProvider, ImageHeader, ResliceError, TransformOptions, TransformPlan};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "reslice-cli")]
#[command(about = "Apply a spatial transform to an image header, or reslice it onto a template grid")]
struct Cli {
    /// Input image header (JSON)
    input: PathBuf,

    /// Output image header (JSON)
    output: PathBuf,

    /// JSON file with default options; flags given here override it
    #[arg(long)]
    options: Option<PathBuf>,

    /// 4x4 ASCII transform matrix applied to the input
    #[arg(long)]
    transform: Option<PathBuf>,

    /// Replace the input transform instead of composing with it
    #[arg(long)]
    replace: bool,

    /// Invert the supplied transform before use
    #[arg(long)]
    inverse: bool,

    /// Template image header to reslice onto
    #[arg(long)]
    reslice: Option<PathBuf>,

    /// Image header the supplied transform maps onto
    #[arg(long)]
    reference: Option<PathBuf>,

    /// The transform was computed with the x axis reversed
    #[arg(long)]
    flipx: bool,

    /// Interpolation method (nearest, linear, cubic)
    #[arg(long)]
    interp: Option<String>,

    /// Oversampling factors, e.g. 2,2,1
    #[arg(long, value_delimiter = ',', allow_negative_numbers = true)]
    oversample: Option<Vec<i64>>,

    /// Output sample datatype
    #[arg(long)]
    datatype: Option<String>,
}

impl Cli {
    /// Merge command line flags over the options file, if any.
    fn transform_options(&self) -> Result<TransformOptions> {
        let mut options = match &self.options {
            Some(path) => {
                let text = fs::read_to_string(path)
                    .with_context(|| format!("failed to read options file {}", path.display()))?;
                serde_json::from_str::<TransformOptions>(&text)
                    .with_context(|| format!("failed to parse options file {}", path.display()))?
            }
            None => TransformOptions::default(),
        };

        if self.transform.is_some() {
            options.transform = self.transform.clone();
        }
        if self.reslice.is_some() {
            options.reslice = self.reslice.clone();
        }
        if self.reference.is_some() {
            options.reference = self.reference.clone();
        }
        if self.interp.is_some() {
            options.interp = self.interp.clone();
        }
        if self.oversample.is_some() {
            options.oversample = self.oversample.clone();
        }
        if self.datatype.is_some() {
            options.datatype = self.datatype.clone();
        }
        options.replace |= self.replace;
        options.inverse |= self.inverse;
        options.flip_x |= self.flipx;

        Ok(options)
    }
}

/// Reads image headers stored as JSON files.
struct JsonHeaders;

impl GridProvider for JsonHeaders {
    fn load_header(&self, path: &Path) -> reslice_core::Result<ImageHeader> {
        let text = fs::read_to_string(path).map_err(|source| ResliceError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&text).map_err(|e| ResliceError::grid(path, e.to_string()))
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    run(&cli)
}

fn run(cli: &Cli) -> Result<()> {
    let options = cli
        .transform_options()?
        .validate()
        .context("invalid options")?;

    let input = JsonHeaders
        .load_header(&cli.input)
        .with_context(|| format!("failed to load input header {}", cli.input.display()))?;

    let plan = TransformPlan::new(&options, &input, &JsonHeaders).context("failed to resolve transform")?;
    report(&plan);

    let json = serde_json::to_string_pretty(plan.header())?;
    fs::write(&cli.output, json)
        .with_context(|| format!("failed to write output header {}", cli.output.display()))?;
    info!("Wrote {}", cli.output.display());

    Ok(())
}

fn report(plan: &TransformPlan) {
    let resolved = plan.resolved();
    if resolved.is_supplied() {
        println!(
            "Resolved transform ({}):",
            if resolved.replace() { "replace" } else { "compose" }
        );
        println!("{}", resolved.transform());
    } else {
        println!("No transform supplied");
    }

    let grid = &plan.header().grid;
    let [nx, ny, nz] = grid.dims();
    let vox = grid.voxel_size();
    println!("Output dims: {} x {} x {}", nx, ny, nz);
    println!("Output voxel size: {} x {} x {}", vox.x, vox.y, vox.z);
    println!("Output transform:");
    println!("{}", grid.transform());

    if let Some(filter) = plan.reslice_filter() {
        println!("Oversampling: {}", filter.oversample());
    }
}
