use serde::Deserialize;

/// A labeled point of interest drawn on top of the boundary
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct Site {
    pub id: u32,
    pub lat: f64,
    pub lon: f64,
}

impl Site {
    pub fn new(id: u32, lat: f64, lon: f64) -> Self {
        Self { id, lat, lon }
    }

    pub fn label(&self) -> String {
        format!("Site {}", self.id)
    }

    /// Position as (x, y) = (lon, lat)
    pub fn position(&self) -> (f64, f64) {
        (self.lon, self.lat)
    }
}

/// The seven monitoring sites across Delhi, ordered by id.
pub fn default_sites() -> Vec<Site> {
    vec![
        Site::new(1, 28.69536, 77.18168),
        Site::new(2, 28.5718, 77.07125),
        Site::new(3, 28.58278, 77.23441),
        Site::new(4, 28.82286, 77.10197),
        Site::new(5, 28.53077, 77.27123),
        Site::new(6, 28.72954, 77.09601),
        Site::new(7, 28.71052, 77.24951),
    ]
}
