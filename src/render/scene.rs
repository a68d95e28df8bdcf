use crate::config::StyleConfig;
use crate::domain::{Ring, Site};
use crate::error::Result;
use crate::geometry::DrawingExtent;
use geo::{Coord, LineString};

/// One boundary ring ready to draw.
///
/// The outline keeps the ring's points as-is; the closing edge is added when
/// the path is drawn, never stored.
#[derive(Debug, Clone, PartialEq)]
pub struct Shape {
    pub outline: LineString<f64>,
}

impl Shape {
    pub fn from_ring(ring: &Ring) -> Self {
        let coords = ring.iter().map(|&(lon, lat)| Coord { x: lon, y: lat }).collect();
        Self {
            outline: LineString::new(coords),
        }
    }

    pub fn vertex_count(&self) -> usize {
        self.outline.0.len()
    }

    pub fn points(&self) -> Vec<(f64, f64)> {
        self.outline.coords().map(|c| (c.x, c.y)).collect()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SiteMarker {
    pub id: u32,
    /// (lon, lat)
    pub position: (f64, f64),
    pub label: String,
    /// (lon, lat) where the label's baseline starts
    pub label_anchor: (f64, f64),
}

impl SiteMarker {
    pub fn new(site: &Site, label_offset: f64) -> Self {
        let (x, y) = site.position();
        Self {
            id: site.id,
            position: (x, y),
            label: site.label(),
            label_anchor: (x + label_offset, y + label_offset),
        }
    }
}

/// Everything that ends up on the plot, in data coordinates
#[derive(Debug, Clone)]
pub struct Scene {
    pub shapes: Vec<Shape>,
    pub markers: Vec<SiteMarker>,
    pub extent: DrawingExtent,
}

impl Scene {
    /// Build shapes and markers and compute the extent they span.
    ///
    /// `sites` are drawn in the order given.
    ///
    /// # Errors
    /// * `EmptyInput` when neither rings nor sites contribute a point
    pub fn build(rings: &[Ring], sites: &[Site], style: &StyleConfig) -> Result<Self> {
        let extent = DrawingExtent::compute(rings, sites)?;
        let shapes = rings.iter().map(Shape::from_ring).collect();
        let markers = sites
            .iter()
            .map(|site| SiteMarker::new(site, style.label_offset))
            .collect();

        Ok(Self {
            shapes,
            markers,
            extent,
        })
    }

    pub fn vertex_count(&self) -> usize {
        self.shapes.iter().map(Shape::vertex_count).sum()
    }
}
