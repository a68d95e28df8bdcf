use crate::domain::{Ring, Site};
use crate::error::{Error, Result};
use geo::{BoundingRect, MultiPoint};

/// Fraction of each axis range added on both sides of the extent
pub const MARGIN_RATIO: f64 = 0.05;

/// Padding in degrees used when every point shares the same coordinate on an
/// axis, so the drawing area never collapses to a line
pub const ZERO_RANGE_PADDING: f64 = 0.01;

/// Bounding box in data coordinates (x = lon, y = lat)
#[derive(Debug, Clone, PartialEq)]
pub struct Bounds {
    pub min_x: f64,
    pub max_x: f64,
    pub min_y: f64,
    pub max_y: f64,
}

impl Bounds {
    /// Create bounds from a set of (x, y) points
    pub fn from_points(points: &[(f64, f64)]) -> Option<Self> {
        let rect = MultiPoint::from(points.to_vec()).bounding_rect()?;
        Some(Self {
            min_x: rect.min().x,
            max_x: rect.max().x,
            min_y: rect.min().y,
            max_y: rect.max().y,
        })
    }

    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }
}

/// Visible drawing area: the bounds of every ring point and site, padded per
/// axis by [`MARGIN_RATIO`] of that axis' range
#[derive(Debug, Clone, PartialEq)]
pub struct DrawingExtent {
    pub min_x: f64,
    pub max_x: f64,
    pub min_y: f64,
    pub max_y: f64,
}

impl DrawingExtent {
    /// Compute the extent over all ring points and site positions
    ///
    /// # Errors
    /// * [`Error::EmptyInput`] if there is no point at all
    pub fn compute(rings: &[Ring], sites: &[Site]) -> Result<Self> {
        let points: Vec<(f64, f64)> = rings
            .iter()
            .flatten()
            .copied()
            .chain(sites.iter().map(Site::position))
            .collect();

        let bounds = Bounds::from_points(&points).ok_or(Error::EmptyInput)?;
        Ok(Self::from_bounds(&bounds))
    }

    pub fn from_bounds(bounds: &Bounds) -> Self {
        let pad_x = axis_padding(bounds.width());
        let pad_y = axis_padding(bounds.height());

        Self {
            min_x: bounds.min_x - pad_x,
            max_x: bounds.max_x + pad_x,
            min_y: bounds.min_y - pad_y,
            max_y: bounds.max_y + pad_y,
        }
    }

    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }

    #[cfg(test)]
    pub fn contains(&self, x: f64, y: f64) -> bool {
        x >= self.min_x && x <= self.max_x && y >= self.min_y && y <= self.max_y
    }
}

fn axis_padding(range: f64) -> f64 {
    if range > 0.0 {
        range * MARGIN_RATIO
    } else {
        ZERO_RANGE_PADDING
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::default_sites;

    const EPS: f64 = 1e-12;

    #[test]
    fn test_bounds_from_points() {
        let points = vec![(0.0, 0.0), (1000.0, 2000.0), (500.0, 1000.0)];
        let bounds = Bounds::from_points(&points).unwrap();

        assert_eq!(bounds.min_x, 0.0);
        assert_eq!(bounds.max_x, 1000.0);
        assert_eq!(bounds.min_y, 0.0);
        assert_eq!(bounds.max_y, 2000.0);
    }

    #[test]
    fn test_bounds_empty() {
        assert!(Bounds::from_points(&[]).is_none());
    }

    #[test]
    fn test_extent_pads_five_percent() {
        let rings = vec![vec![(0.0, 0.0), (0.0, 1.0), (2.0, 1.0), (2.0, 0.0)]];
        let extent = DrawingExtent::compute(&rings, &[]).unwrap();

        assert!((extent.min_x - -0.1).abs() < EPS);
        assert!((extent.max_x - 2.1).abs() < EPS);
        assert!((extent.min_y - -0.05).abs() < EPS);
        assert!((extent.max_y - 1.05).abs() < EPS);
    }

    #[test]
    fn test_extent_covers_rings_and_sites() {
        let rings = vec![vec![(77.0, 28.4), (77.0, 28.9), (77.4, 28.9)]];
        let sites = default_sites();
        let extent = DrawingExtent::compute(&rings, &sites).unwrap();

        let lons: Vec<f64> = rings[0]
            .iter()
            .map(|p| p.0)
            .chain(sites.iter().map(|s| s.lon))
            .collect();
        let min_lon = lons.iter().cloned().fold(f64::INFINITY, f64::min);
        let max_lon = lons.iter().cloned().fold(f64::NEG_INFINITY, f64::max);

        assert!(extent.min_x <= min_lon);
        assert!(extent.max_x >= max_lon);
        let pad = (max_lon - min_lon) * MARGIN_RATIO;
        assert!((min_lon - extent.min_x - pad).abs() < 1e-9);
        assert!((extent.max_x - max_lon - pad).abs() < 1e-9);

        for site in &sites {
            assert!(extent.contains(site.lon, site.lat));
        }
    }

    #[test]
    fn test_extent_sites_only() {
        let extent = DrawingExtent::compute(&[], &default_sites()).unwrap();
        assert!(extent.width() > 0.0);
        assert!(extent.height() > 0.0);
    }

    #[test]
    fn test_extent_zero_range_uses_fallback() {
        let sites = vec![Site::new(1, 28.6, 77.2)];
        let extent = DrawingExtent::compute(&[], &sites).unwrap();

        assert!((extent.width() - 2.0 * ZERO_RANGE_PADDING).abs() < EPS);
        assert!((extent.height() - 2.0 * ZERO_RANGE_PADDING).abs() < EPS);
    }

    #[test]
    fn test_extent_zero_range_on_one_axis() {
        // Same latitude, different longitudes
        let sites = vec![Site::new(1, 28.6, 77.0), Site::new(2, 28.6, 77.4)];
        let extent = DrawingExtent::compute(&[], &sites).unwrap();

        let x_pad = 0.4 * MARGIN_RATIO;
        assert!((extent.min_x - (77.0 - x_pad)).abs() < 1e-9);
        assert!((extent.max_x - (77.4 + x_pad)).abs() < 1e-9);
        assert!((extent.min_y - (28.6 - ZERO_RANGE_PADDING)).abs() < 1e-9);
        assert!((extent.max_y - (28.6 + ZERO_RANGE_PADDING)).abs() < 1e-9);

        // And the transpose: same longitude, different latitudes
        let sites = vec![Site::new(1, 28.4, 77.2), Site::new(2, 28.8, 77.2)];
        let extent = DrawingExtent::compute(&[], &sites).unwrap();
        assert!((extent.width() - 2.0 * ZERO_RANGE_PADDING).abs() < 1e-9);
        assert!((extent.height() - 0.4 * (1.0 + 2.0 * MARGIN_RATIO)).abs() < 1e-9);
    }

    #[test]
    fn test_extent_empty_input() {
        let err = DrawingExtent::compute(&[], &[]).unwrap_err();
        assert!(matches!(err, Error::EmptyInput));

        let empty_rings: Vec<Ring> = vec![Vec::new()];
        assert!(matches!(
            DrawingExtent::compute(&empty_rings, &[]),
            Err(Error::EmptyInput)
        ));
    }
}
