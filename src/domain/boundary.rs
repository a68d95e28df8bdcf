/// Ordered (lon, lat) pairs describing one closed boundary path.
///
/// Rings are kept exactly as read: no deduplication and no closing point is
/// appended.
pub type Ring = Vec<(f64, f64)>;

/// A geometry from the boundary document
#[derive(Debug, Clone, PartialEq)]
pub enum Geometry {
    Polygon(Vec<Ring>),
    MultiPolygon(Vec<Vec<Ring>>),
    /// Any geometry type this renderer does not draw, kept by its type tag
    Unsupported(String),
}

impl Geometry {
    pub fn type_name(&self) -> &str {
        match self {
            Geometry::Polygon(_) => "Polygon",
            Geometry::MultiPolygon(_) => "MultiPolygon",
            Geometry::Unsupported(name) => name,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Feature {
    /// `None` when the feature's geometry is `null`
    pub geometry: Option<Geometry>,
}

/// Normalized boundary document.
///
/// A bare geometry or a single feature becomes a one-feature document, so the
/// rest of the pipeline only ever deals with a list of features.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct BoundaryDocument {
    pub features: Vec<Feature>,
}

impl BoundaryDocument {
    pub fn from_geometry(geometry: Geometry) -> Self {
        Self {
            features: vec![Feature {
                geometry: Some(geometry),
            }],
        }
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_type_name() {
        assert_eq!(Geometry::Polygon(vec![]).type_name(), "Polygon");
        assert_eq!(
            Geometry::Unsupported("LineString".to_string()).type_name(),
            "LineString"
        );
    }

    #[test]
    fn test_from_geometry_wraps_single_feature() {
        let doc = BoundaryDocument::from_geometry(Geometry::MultiPolygon(vec![]));
        assert_eq!(doc.features.len(), 1);
        assert!(!doc.is_empty());
    }
}
