use clap::Parser;
use inkshape::{
    classify_with, extract_features, simplify_drawing, top_predictions, Algorithm, Drawing,
    PipelineConfig, QualityTier, UniformJitter,
};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::Serialize;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "inkshape", about = "Simplify sketch strokes and guess what was drawn")]
struct Cli {
    /// Drawing JSON: an array of strokes, each an array of {x, y, ...} points
    #[arg(short, long)]
    input: PathBuf,

    /// Simplifier: corridor, min-area or decimate
    #[arg(short, long)]
    algorithm: Option<Algorithm>,

    /// Tolerance tier: high, medium or low
    #[arg(short, long)]
    quality: Option<QualityTier>,

    /// Number of predictions to report
    #[arg(long)]
    top: Option<usize>,

    /// Seed for confidence jitter (random if omitted)
    #[arg(long)]
    seed: Option<u64>,

    /// Write a side-by-side original/simplified PNG here
    #[arg(long)]
    preview: Option<PathBuf>,

    /// Preview panel size in pixels
    #[arg(long, default_value = "400")]
    panel: u32,

    /// Also ask the external suggestion service
    #[arg(long)]
    suggest: bool,

    /// TOML preset; flags override its values
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Print a JSON report on stdout instead of the text summary
    #[arg(long)]
    json: bool,
}

#[derive(Serialize)]
struct Report<'a> {
    algorithm: Algorithm,
    quality: QualityTier,
    points_before: usize,
    points_after: usize,
    descriptor: Option<inkshape::Descriptor>,
    predictions: &'a [inkshape::Prediction],
    #[serde(skip_serializing_if = "Option::is_none")]
    suggestions: Option<&'a [inkshape::Suggestion]>,
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("inkshape=info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
        .ok();
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_logging();
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => PipelineConfig::load(path)?,
        None => PipelineConfig::default(),
    };
    if let Some(algorithm) = cli.algorithm {
        config.algorithm = algorithm;
    }
    if let Some(quality) = cli.quality {
        config.quality = quality;
    }
    if let Some(top) = cli.top {
        config.classifier.max_predictions = top;
    }

    let drawing = Drawing::from_json(&std::fs::read_to_string(&cli.input)?)?;
    tracing::info!(
        strokes = drawing.stroke_count(),
        points = drawing.total_points(),
        "loaded {}",
        cli.input.display()
    );

    // Pipeline
    let simplified = simplify_drawing(&drawing, config.algorithm, config.quality);
    let descriptor = extract_features(&drawing);
    let rng = match cli.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    };
    let predictions = top_predictions(
        classify_with(&drawing, &config.classifier, &mut UniformJitter::new(rng)),
        &config.classifier,
    );
    let suggestions = if cli.suggest { fetch_suggestions(&drawing, &config)? } else { None };

    if let Some(path) = &cli.preview {
        let png = inkshape::render::render_comparison(&drawing, &simplified, cli.panel)?;
        std::fs::write(path, png)?;
    }

    if cli.json {
        let report = Report {
            algorithm: config.algorithm,
            quality: config.quality,
            points_before: drawing.total_points(),
            points_after: simplified.total_points(),
            descriptor,
            predictions: &predictions,
            suggestions: suggestions.as_deref(),
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    // Header
    eprintln!();
    eprintln!("  inkshape \u{00b7} {}", cli.input.display());
    eprintln!();
    eprintln!(
        "  Simplify    {} ({})  {} \u{2192} {} points",
        config.algorithm,
        config.quality,
        drawing.total_points(),
        simplified.total_points()
    );
    match &descriptor {
        Some(d) => {
            eprintln!(
                "  Bounds      {:.1}\u{00d7}{:.1}  aspect={:.2}  strokes={}",
                d.width, d.height, d.aspect_ratio, d.stroke_count
            );
            eprintln!(
                "  Spread      mean={:.1}  variance={:.1}  length={:.1}",
                d.avg_distance_from_center, d.variance, d.path_length
            );
        }
        None => eprintln!("  Bounds      (too few points)"),
    }
    eprintln!();
    if predictions.is_empty() {
        eprintln!("  No guesses");
    }
    for p in &predictions {
        eprintln!("  {} {:<12} {:>5.1}%", p.label.emoji(), p.label, p.confidence);
    }
    if let Some(list) = &suggestions {
        eprintln!();
        let names: Vec<&str> = list.iter().map(|s| s.name.as_str()).collect();
        eprintln!("  Suggest     {}", if names.is_empty() { "-".to_string() } else { names.join(", ") });
    }
    if let Some(path) = &cli.preview {
        eprintln!();
        eprintln!("  Compare     {}", path.display());
    }
    eprintln!();

    Ok(())
}

#[cfg(feature = "http")]
fn fetch_suggestions(
    drawing: &Drawing,
    config: &PipelineConfig,
) -> Result<Option<Vec<inkshape::Suggestion>>, Box<dyn std::error::Error>> {
    let runtime = tokio::runtime::Builder::new_multi_thread().enable_all().build()?;
    let source = inkshape::HttpSuggestionSource::new(&config.suggest);
    let outcome = runtime.block_on(inkshape::fetch_external_suggestions(
        &source,
        &drawing.strokes,
        &config.suggest,
    ));
    match &outcome.status {
        inkshape::SuggestionStatus::Unavailable(message) => tracing::warn!("{message}"),
        inkshape::SuggestionStatus::NoStrokes => tracing::info!("nothing to send for suggestions"),
        inkshape::SuggestionStatus::Ready => {}
    }
    Ok(Some(outcome.suggestions))
}

#[cfg(not(feature = "http"))]
fn fetch_suggestions(
    _drawing: &Drawing,
    _config: &PipelineConfig,
) -> Result<Option<Vec<inkshape::Suggestion>>, Box<dyn std::error::Error>> {
    tracing::warn!("built without the `http` feature; --suggest ignored");
    Ok(None)
}
