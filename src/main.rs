use anyhow::{Context, Result, bail};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::PathBuf;
use std::time::Instant;

use boundmap::config::{FileConfig, RenderConfig};
use boundmap::render::{TextRenderer, build_scene, draw_scene, load_boundary, save_image};

/// Render a GeoJSON boundary with labeled sites to a PNG map
///
/// Examples:
///   # Render delhi-ac.geojson with the built-in site table
///   boundmap
///
///   # Render another boundary to a custom file at print resolution
///   boundmap -i wards.geojson -o wards.png --dpi 600
///
///   # Fail instead of skipping geometries that cannot be drawn
///   boundmap --strict
///
///   # Use a config file with its own site table and style
///   boundmap --config my-map.toml
#[derive(Parser, Debug)]
#[command(name = "boundmap")]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to config file (optional, auto-searches boundmap.toml if not provided)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Input GeoJSON boundary file (defaults to delhi-ac.geojson)
    #[arg(short = 'i', long)]
    input: Option<PathBuf>,

    /// Output PNG file path (defaults to delhi_boundary_sites.png)
    #[arg(short = 'o', long)]
    output: Option<PathBuf>,

    /// Output resolution in dots per inch
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..=2400))]
    dpi: Option<u32>,

    /// Figure title
    #[arg(long)]
    title: Option<String>,

    /// Path to TTF font file for labels (defaults to DejaVu Sans, then a built-in stroke font)
    #[arg(long)]
    font: Option<PathBuf>,

    /// Treat geometries other than Polygon/MultiPolygon as errors
    #[arg(long)]
    strict: bool,

    /// Enable verbose logging
    #[arg(short = 'v', long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();
    let total_start = Instant::now();

    let file_config = if let Some(ref config_path) = args.config {
        if !config_path.exists() {
            bail!("Config file not found: {:?}", config_path);
        }
        Some((FileConfig::from_path(config_path)?, config_path.clone()))
    } else {
        FileConfig::load()
    };

    let verbose = args.verbose || file_config.as_ref().is_some_and(|(c, _)| c.verbose);
    let config_source = file_config.as_ref().map(|(_, path)| path.clone());
    let base = file_config
        .map(|(file, _)| file.into_render_config())
        .unwrap_or_default();

    let config = RenderConfig {
        input: args.input.clone().unwrap_or(base.input),
        output: args.output.clone().unwrap_or(base.output),
        dpi: args.dpi.unwrap_or(base.dpi),
        title: args.title.clone().unwrap_or(base.title),
        strict: args.strict || base.strict,
        font: args.font.clone().or(base.font),
        ..base
    };

    config.validate().context("Invalid configuration")?;

    println!("boundmap - Boundary & Site Map Renderer");
    println!("=======================================");
    println!();

    if verbose {
        let (width, height) = config.canvas_size();
        println!("Configuration:");
        match &config_source {
            Some(path) => println!("  Config file: {}", path.display()),
            None => println!("  Config file: none (built-in defaults)"),
        }
        println!("  Input: {}", config.input.display());
        println!("  Output: {}", config.output.display());
        println!(
            "  Figure: {}x{} in @ {} dpi ({}x{} px)",
            config.width_in, config.height_in, config.dpi, width, height
        );
        println!("  Title: {}", config.title);
        println!("  Sites: {}", config.sites.len());
        println!(
            "  Style: fill alpha {}, line width {}pt, label offset {}",
            config.style.fill_alpha, config.style.line_width, config.style.label_offset
        );
        let text = TextRenderer::new(config.font.as_deref());
        println!(
            "  Font: {}",
            if text.is_ttf() { "TrueType" } else { "built-in stroke font" }
        );
        println!(
            "  Strict geometry: {}",
            if config.strict { "enabled" } else { "disabled" }
        );
        println!();
    }

    let spinner = create_spinner("Loading boundary file...");
    let start = Instant::now();
    let loaded = match load_boundary(&config) {
        Ok(loaded) => loaded,
        Err(e) if e.is_input() => {
            spinner.abandon();
            return Err(anyhow::Error::new(e).context(format!(
                "Failed to load boundary file {}",
                config.input.display()
            )));
        }
        Err(e) => {
            spinner.abandon();
            return Err(
                anyhow::Error::new(e).context("Boundary contains geometry that cannot be drawn")
            );
        }
    };
    let flattened = &loaded.flattened;
    spinner.finish_with_message(format!(
        "Loaded {} features, {} rings ({} points) from {} [{:.1}s]",
        loaded.features,
        flattened.rings.len(),
        flattened.point_count(),
        config.input.display(),
        start.elapsed().as_secs_f32()
    ));

    for diagnostic in &flattened.diagnostics {
        eprintln!("Warning: {}", diagnostic);
    }

    let scene = build_scene(&config, flattened).context("Failed to compute drawing extent")?;
    if verbose {
        println!(
            "  Extent: lon {:.5} .. {:.5}, lat {:.5} .. {:.5}",
            scene.extent.min_x, scene.extent.max_x, scene.extent.min_y, scene.extent.max_y
        );
        for marker in &scene.markers {
            println!(
                "  {}: ({:.5}, {:.5})",
                marker.label, marker.position.1, marker.position.0
            );
        }
    }

    let spinner = create_spinner("Rendering figure...");
    let start = Instant::now();
    let canvas = draw_scene(&config, &scene).context("Failed to render figure")?;
    spinner.finish_with_message(format!(
        "Rendered {} shapes ({} vertices) and {} sites on a {}x{} canvas [{:.1}s]",
        scene.shapes.len(),
        scene.vertex_count(),
        scene.markers.len(),
        canvas.width(),
        canvas.height(),
        start.elapsed().as_secs_f32()
    ));

    let spinner = create_spinner("Writing PNG file...");
    let start = Instant::now();
    let saved = save_image(&config, &canvas).context("Failed to write PNG file")?;
    spinner.finish_with_message(format!(
        "Wrote {}x{} image ({:.1} KB) [{:.1}s]",
        saved.width,
        saved.height,
        saved.bytes as f64 / 1024.0,
        start.elapsed().as_secs_f32()
    ));

    println!();
    println!(
        "Done! Total time: {:.1}s",
        total_start.elapsed().as_secs_f32()
    );
    println!();
    println!("Output: {}", config.output.display());

    Ok(())
}

fn create_spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::with_template("{spinner:.green} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"]),
    );
    pb.set_message(message.to_string());
    pb.enable_steady_tick(std::time::Duration::from_millis(80));
    pb
}
