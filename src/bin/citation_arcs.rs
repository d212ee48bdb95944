//! citation-arcs: render h-index citation arc diagrams.
//!
//! Run: `citation-arcs hindex.json -o arcs.png`
//! Log: `RUST_LOG=citation_arcs=debug citation-arcs ...`

use anyhow::{bail, Context, Result};
use citation_arcs::arc::{ArcRenderer, Encoding};
use citation_arcs::config::Config;
use citation_arcs::data::CitationData;
use citation_arcs::output::{PngEncoder, SvgEncoder};
use citation_arcs::params::{ParamId, RenderParameters, Viewport};
use citation_arcs::stages::StageSequencer;
use citation_arcs::viewer::Viewer;
use clap::Parser;
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Render h-index citation arc diagrams to PNG or SVG
#[derive(Parser, Debug)]
#[command(name = "citation-arcs")]
#[command(author = "PAIML Team")]
#[command(version)]
#[command(about = "Render h-index citation arc diagrams", long_about = None)]
struct Cli {
    /// Citation JSON: an array of {"self": [...], "citedBy": [...]} records
    input: PathBuf,

    /// Output file (.png or .svg)
    #[arg(short, long, default_value = "arcs.png")]
    output: PathBuf,

    /// Output width in pixels
    #[arg(long)]
    width: Option<u32>,

    /// Output height in pixels
    #[arg(long)]
    height: Option<u32>,

    /// Config file path
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Render the scroll-staged view at this fraction of the page (0-1)
    #[arg(long)]
    scroll: Option<f32>,

    /// Rasterization encoding: quad or full-screen
    #[arg(long)]
    encoding: Option<Encoding>,

    /// Override a render parameter, e.g. --set line_alpha=0.3
    #[arg(long = "set", value_name = "NAME=VALUE", value_parser = parse_assignment)]
    overrides: Vec<(ParamId, String)>,
}

fn parse_assignment(s: &str) -> std::result::Result<(ParamId, String), String> {
    let (name, value) = s.split_once('=').ok_or_else(|| format!("expected NAME=VALUE, got '{s}'"))?;
    let id = name.trim().parse::<ParamId>().map_err(|e| e.to_string())?;
    Ok((id, value.to_string()))
}

enum OutputFormat {
    Png,
    Svg,
}

fn output_format(path: &Path) -> Result<OutputFormat> {
    match path.extension().and_then(|e| e.to_str()).map(str::to_ascii_lowercase).as_deref() {
        Some("png") => Ok(OutputFormat::Png),
        Some("svg") => Ok(OutputFormat::Svg),
        _ => bail!("unsupported output format: {} (expected .png or .svg)", path.display()),
    }
}

fn main() -> Result<()> {
    let _ = tracing_subscriber::fmt().with_env_filter(EnvFilter::from_default_env()).try_init();

    let cli = Cli::parse();
    let format = output_format(&cli.output)?;

    let config = match &cli.config {
        Some(path) => Config::load(path).with_context(|| format!("loading {}", path.display()))?,
        None => Config::default(),
    };

    let data = CitationData::load(&cli.input).with_context(|| format!("loading {}", cli.input.display()))?;

    let viewport = Viewport::new(
        cli.width.unwrap_or(config.viewport.width),
        cli.height.unwrap_or(config.viewport.height),
    );
    viewport.validate()?;

    let mut params = RenderParameters::for_axis(&data.axis);
    config.params.apply(&mut params);

    let renderer = ArcRenderer::from_data(&data)
        .style(config.style()?)
        .encoding(cli.encoding.unwrap_or(config.encoding));

    let mut viewer = Viewer::new(&data, viewport).with_renderer(renderer).with_params(params);

    if let Some(fraction) = cli.scroll {
        let settings = config.stage_settings(data.axis.highest, params.axis_font_scale);
        viewer = viewer.with_stages(StageSequencer::standard(&settings));
        viewer.scroll_to_fraction(fraction);
    }

    for (id, raw) in &cli.overrides {
        viewer.set_control(*id, raw).with_context(|| format!("--set {id}={raw}"))?;
    }

    let frame = viewer.render()?;
    match format {
        OutputFormat::Png => PngEncoder::write_to_file(&frame.image, &cli.output)?,
        OutputFormat::Svg => SvgEncoder::from_frame(&frame)?.write_to_file(&cli.output)?,
    }

    let (min, max, mean) = frame.image.luminance_stats();
    info!(
        output = %cli.output.display(),
        arcs = frame.arcs_drawn,
        luminance_min = min,
        luminance_max = max,
        luminance_mean = mean,
        "wrote diagram"
    );
    println!("{} arcs -> {}", frame.arcs_drawn, cli.output.display());

    Ok(())
}
