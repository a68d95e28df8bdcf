pub mod figure;
pub mod png;
pub mod scene;
pub mod text;

pub use figure::Figure;
pub use png::{crop_to_content, write_png};
pub use scene::{Scene, Shape, SiteMarker};
pub use text::{StrokeFont, TextRenderer};

use crate::config::RenderConfig;
use crate::config::figure::CROP_PAD_IN;
use crate::error::Result;
use crate::geojson::{Diagnostic, Flattened, flatten_rings, load_document};
use tiny_skia::Pixmap;

/// Summary of a finished render
#[derive(Debug)]
pub struct RenderReport {
    pub shapes: usize,
    pub vertices: usize,
    pub sites: usize,
    /// Geometries that were skipped
    pub diagnostics: Vec<Diagnostic>,
    pub width: u32,
    pub height: u32,
    pub bytes: usize,
}

/// Boundary file contents reduced to drawable rings
#[derive(Debug)]
pub struct LoadedBoundary {
    /// Number of features in the document, drawable or not
    pub features: usize,
    pub flattened: Flattened,
}

/// Cropped image as written to disk
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SavedImage {
    pub width: u32,
    pub height: u32,
    pub bytes: usize,
}

/// Read the boundary file and flatten it into rings.
///
/// # Errors
/// * Any input error from the boundary file
/// * `UnsupportedGeometry` in strict mode when a geometry was skipped
pub fn load_boundary(config: &RenderConfig) -> Result<LoadedBoundary> {
    let document = load_document(&config.input)?;

    let flattened = flatten_rings(&document);
    if config.strict {
        flattened.ensure_supported()?;
    }

    Ok(LoadedBoundary {
        features: document.features.len(),
        flattened,
    })
}

/// Shapes and site markers (in ascending id order) over the drawing extent
pub fn build_scene(config: &RenderConfig, flattened: &Flattened) -> Result<Scene> {
    Scene::build(&flattened.rings, &config.sorted_sites(), &config.style)
}

pub fn draw_scene(config: &RenderConfig, scene: &Scene) -> Result<Pixmap> {
    Figure::new(config).draw(scene)
}

/// Crop the canvas to its content plus a small border and write it as PNG
pub fn save_image(config: &RenderConfig, canvas: &Pixmap) -> Result<SavedImage> {
    let pad = config.points_to_px(CROP_PAD_IN * 72.0).round() as u32;
    let image = crop_to_content(canvas, pad);
    let bytes = write_png(&image, &config.output)?;

    Ok(SavedImage {
        width: image.width(),
        height: image.height(),
        bytes,
    })
}

/// Run the whole pipeline: validate, load, build the scene, draw, crop, write
pub fn render_to_file(config: &RenderConfig) -> Result<RenderReport> {
    config.validate()?;
    let loaded = load_boundary(config)?;
    let scene = build_scene(config, &loaded.flattened)?;
    let canvas = draw_scene(config, &scene)?;
    let saved = save_image(config, &canvas)?;

    Ok(RenderReport {
        shapes: scene.shapes.len(),
        vertices: scene.vertex_count(),
        sites: scene.markers.len(),
        diagnostics: loaded.flattened.diagnostics,
        width: saved.width,
        height: saved.height,
        bytes: saved.bytes,
    })
}
