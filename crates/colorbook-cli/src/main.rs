//! colorbook CLI: batch conversion of line art into coloring-book SVGs.

use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, Result, bail};
use clap::{Args, Parser, Subcommand, ValueEnum};
use colorbook::{Image, VectorizeConfig};
use rayon::prelude::*;
use serde::Serialize;

const IMAGE_EXTENSIONS: [&str; 4] = ["png", "webp", "jpg", "jpeg"];

#[derive(Parser)]
#[command(name = "colorbook")]
#[command(about = "Turn raster line art into layered coloring-book SVG")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert an image, or every image in a folder, to SVG.
    Convert {
        /// Input image or folder (png, webp, jpg, jpeg; not recursive).
        #[arg(long = "in")]
        input: PathBuf,

        /// Output folder for the SVG files.
        #[arg(long)]
        out: PathBuf,

        /// Worker threads (default: all cores).
        #[arg(long)]
        jobs: Option<usize>,

        /// Write a per-image JSON report here.
        #[arg(long)]
        report: Option<PathBuf>,

        #[command(flatten)]
        config: ConfigArgs,
    },
    /// Dump every intermediate mask of one conversion for inspection.
    Stages {
        /// Input image.
        #[arg(long)]
        input: PathBuf,

        /// Output folder for the PNG masks, the SVG and meta.json.
        #[arg(long)]
        out: PathBuf,

        #[command(flatten)]
        config: ConfigArgs,
    },
}

#[derive(Args)]
struct ConfigArgs {
    /// JSON file with conversion parameters; flags below override it.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Stroke width of the line layer.
    #[arg(long)]
    stroke: Option<f32>,

    /// Closing radius in pixels (0 disables closing).
    #[arg(long)]
    close: Option<usize>,

    /// Minimum component area in pixels for the solid layer.
    #[arg(long)]
    min_solid: Option<usize>,

    /// White paintable background plate.
    #[arg(long, value_enum)]
    paintplate: Option<Toggle>,
}

#[derive(Clone, Copy, ValueEnum)]
enum Toggle {
    On,
    Off,
}

impl ConfigArgs {
    fn resolve(&self) -> Result<VectorizeConfig> {
        let mut cfg = match &self.config {
            Some(path) => {
                let text = std::fs::read_to_string(path)
                    .with_context(|| format!("reading config {}", path.display()))?;
                serde_json::from_str(&text)
                    .with_context(|| format!("parsing config {}", path.display()))?
            }
            None => VectorizeConfig::default(),
        };

        if let Some(stroke) = self.stroke {
            cfg.stroke_width = stroke;
        }
        if let Some(close) = self.close {
            cfg.close_radius = close;
        }
        if let Some(min_solid) = self.min_solid {
            cfg.min_solid_area = min_solid;
        }
        if let Some(toggle) = self.paintplate {
            cfg.background_plate = matches!(toggle, Toggle::On);
        }

        cfg.validate()?;
        Ok(cfg)
    }
}

#[derive(Debug, Serialize)]
struct ReportEntry {
    input: PathBuf,
    output: PathBuf,
    width: Option<usize>,
    height: Option<usize>,
    solids: usize,
    strokes: usize,
    elapsed_ms: f64,
    error: Option<String>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Convert {
            input,
            out,
            jobs,
            report,
            config,
        } => run_convert(&input, &out, jobs, report.as_deref(), &config.resolve()?),
        Commands::Stages { input, out, config } => run_stages(&input, &out, &config.resolve()?),
    }
}

fn run_convert(
    input: &Path,
    out_dir: &Path,
    jobs: Option<usize>,
    report_path: Option<&Path>,
    cfg: &VectorizeConfig,
) -> Result<()> {
    let inputs = collect_inputs(input)?;
    if inputs.is_empty() {
        tracing::warn!("No images found in {}", input.display());
    }

    std::fs::create_dir_all(out_dir)
        .with_context(|| format!("creating output folder {}", out_dir.display()))?;
    let outputs = output_paths(&inputs, out_dir);

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(jobs.unwrap_or(0))
        .build()
        .context("building worker pool")?;
    tracing::info!(
        "Converting {} image(s) with {} worker(s)",
        inputs.len(),
        pool.current_num_threads()
    );

    let entries: Vec<ReportEntry> = pool.install(|| {
        inputs
            .par_iter()
            .zip(outputs.par_iter())
            .map(|(input, output)| convert_one(input, output, cfg))
            .collect()
    });

    let failed = entries.iter().filter(|e| e.error.is_some()).count();
    tracing::info!("{} converted, {} failed", entries.len() - failed, failed);

    if let Some(report_path) = report_path {
        let json = serde_json::to_string_pretty(&entries)?;
        std::fs::write(report_path, json)
            .with_context(|| format!("writing report {}", report_path.display()))?;
        tracing::info!("Report written to {}", report_path.display());
    }

    if failed > 0 {
        bail!("{failed} of {} image(s) failed", entries.len());
    }
    Ok(())
}

fn convert_one(input: &Path, output: &Path, cfg: &VectorizeConfig) -> ReportEntry {
    let start = Instant::now();
    let result = colorbook::convert_file(input, output, cfg);
    let elapsed_ms = start.elapsed().as_secs_f64() * 1e3;

    match result {
        Ok(doc) => {
            tracing::info!(
                "{} -> {} ({}x{}, {} solids, {} strokes, {:.1} ms)",
                input.display(),
                output.display(),
                doc.width,
                doc.height,
                doc.solids.len(),
                doc.strokes.len(),
                elapsed_ms
            );
            ReportEntry {
                input: input.to_path_buf(),
                output: output.to_path_buf(),
                width: Some(doc.width),
                height: Some(doc.height),
                solids: doc.solids.len(),
                strokes: doc.strokes.len(),
                elapsed_ms,
                error: None,
            }
        }
        Err(err) => {
            if err.is_input_error() {
                tracing::warn!("Skipping {}: {}", input.display(), err);
            } else {
                tracing::error!("Failed on {}: {}", input.display(), err);
            }
            ReportEntry {
                input: input.to_path_buf(),
                output: output.to_path_buf(),
                width: None,
                height: None,
                solids: 0,
                strokes: 0,
                elapsed_ms,
                error: Some(err.to_string()),
            }
        }
    }
}

fn is_supported_image(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| IMAGE_EXTENSIONS.iter().any(|x| e.eq_ignore_ascii_case(x)))
}

/// A single file as given, or the supported images of a folder in name order.
fn collect_inputs(input: &Path) -> Result<Vec<PathBuf>> {
    if !input.is_dir() {
        return Ok(vec![input.to_path_buf()]);
    }

    let mut files = Vec::new();
    for entry in std::fs::read_dir(input)
        .with_context(|| format!("listing {}", input.display()))?
    {
        let path = entry?.path();
        if path.is_file() && is_supported_image(&path) {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

/// `<stem>.svg`, or `<file name>.svg` when several inputs share a stem. A
/// name still taken by an earlier input gets a `-2`, `-3`, ... suffix.
fn output_paths(inputs: &[PathBuf], out_dir: &Path) -> Vec<PathBuf> {
    let stem = |p: &PathBuf| p.file_stem().unwrap_or_default().to_os_string();

    let mut stem_counts: HashMap<_, usize> = HashMap::new();
    for input in inputs {
        *stem_counts.entry(stem(input)).or_default() += 1;
    }

    let mut taken = HashSet::new();
    inputs
        .iter()
        .map(|input| {
            let base = if stem_counts[&stem(input)] > 1 {
                input.file_name().unwrap_or_default().to_os_string()
            } else {
                stem(input)
            };

            let mut name = base.clone();
            name.push(".svg");
            let mut n = 2;
            while !taken.insert(name.clone()) {
                name = base.clone();
                name.push(format!("-{n}.svg"));
                n += 1;
            }
            out_dir.join(name)
        })
        .collect()
}

fn run_stages(input: &Path, out_dir: &Path, cfg: &VectorizeConfig) -> Result<()> {
    tracing::info!("Loading image: {}", input.display());
    let img = colorbook::decode_path(input)?;
    let rgba = colorbook::rgba_from_dynamic(&img)?;
    let (doc, stages) = colorbook::vectorize_with_stages(&rgba.as_view(), cfg)?;

    std::fs::create_dir_all(out_dir)
        .with_context(|| format!("creating output folder {}", out_dir.display()))?;

    for (name, mask) in [
        ("gray", &stages.gray),
        ("ink", &stages.ink),
        ("closed", &stages.closed),
        ("cleaned", &stages.cleaned),
        ("solid", &stages.solid),
        ("line", &stages.line),
        ("skeleton", &stages.skeleton),
    ] {
        let path = out_dir.join(format!("{name}.png"));
        save_gray(mask, &path)?;
        tracing::debug!("Wrote {}", path.display());
    }

    let svg_path = out_dir.join("result.svg");
    std::fs::write(&svg_path, doc.to_svg_string())
        .with_context(|| format!("writing {}", svg_path.display()))?;

    let meta = serde_json::json!({
        "input": input.to_string_lossy(),
        "image_size": [doc.width, doc.height],
        "threshold": stages.threshold.threshold,
        "uniform": stages.threshold.uniform,
        "solid_components": stages.solid_components,
        "line_components": stages.line_components,
        "thinning_iterations": stages.thinning.iterations,
        "solids": doc.solids.len(),
        "strokes": doc.strokes.len(),
        "config": cfg,
    });
    let meta_path = out_dir.join("meta.json");
    std::fs::write(&meta_path, serde_json::to_string_pretty(&meta)?)
        .with_context(|| format!("writing {}", meta_path.display()))?;

    tracing::info!("Stages written to {}", out_dir.display());
    Ok(())
}

fn save_gray(mask: &Image<u8>, path: &Path) -> Result<()> {
    let buf = image::GrayImage::from_raw(
        mask.width() as u32,
        mask.height() as u32,
        mask.data().to_vec(),
    )
    .context("mask buffer does not match its dimensions")?;
    buf.save(path)
        .with_context(|| format!("writing {}", path.display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;
    use std::path::{Path, PathBuf};

    use super::{is_supported_image, output_paths};

    #[test]
    fn extensions_are_case_insensitive() {
        assert!(is_supported_image(Path::new("a.PNG")));
        assert!(is_supported_image(Path::new("b.JpEg")));
        assert!(is_supported_image(Path::new("c.webp")));
        assert!(!is_supported_image(Path::new("d.gif")));
        assert!(!is_supported_image(Path::new("noext")));
    }

    #[test]
    fn colliding_stems_keep_their_extension() {
        let inputs: Vec<PathBuf> = ["in/a.jpg", "in/a.png", "in/b.png"]
            .iter()
            .map(PathBuf::from)
            .collect();
        let outputs = output_paths(&inputs, Path::new("out"));
        assert_eq!(
            outputs,
            vec![
                PathBuf::from("out/a.jpg.svg"),
                PathBuf::from("out/a.png.svg"),
                PathBuf::from("out/b.svg"),
            ]
        );
    }

    #[test]
    fn file_name_matching_another_stem_gets_a_suffix() {
        let inputs: Vec<PathBuf> = ["in/a.jpg", "in/a.png", "in/a.png.webp", "in/a.png-2.png"]
            .iter()
            .map(PathBuf::from)
            .collect();
        let outputs = output_paths(&inputs, Path::new("out"));
        assert_eq!(
            outputs,
            vec![
                PathBuf::from("out/a.jpg.svg"),
                PathBuf::from("out/a.png.svg"),
                PathBuf::from("out/a.png-2.svg"),
                PathBuf::from("out/a.png-2-2.svg"),
            ]
        );

        let unique: HashSet<_> = outputs.iter().collect();
        assert_eq!(unique.len(), outputs.len());
    }
}
