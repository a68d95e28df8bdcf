use crate::domain::{BoundaryDocument, Geometry, Ring};
use crate::error::{Error, Result};
use std::fmt;

/// A geometry that produced no rings
#[derive(Debug, Clone, PartialEq)]
pub struct Diagnostic {
    /// Index of the feature in the document
    pub feature: usize,
    /// Geometry type tag, or `null` for a feature without geometry
    pub geometry_type: String,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "feature {}: skipped unsupported geometry `{}`",
            self.feature, self.geometry_type
        )
    }
}

/// Rings extracted from a document plus everything that was skipped
#[derive(Debug, Default)]
pub struct Flattened {
    pub rings: Vec<Ring>,
    pub diagnostics: Vec<Diagnostic>,
}

impl Flattened {
    /// Fail on the first skipped geometry (strict mode)
    pub fn ensure_supported(&self) -> Result<()> {
        match self.diagnostics.first() {
            Some(d) => Err(Error::UnsupportedGeometry {
                feature: d.feature,
                geometry_type: d.geometry_type.clone(),
            }),
            None => Ok(()),
        }
    }

    pub fn point_count(&self) -> usize {
        self.rings.iter().map(Vec::len).sum()
    }
}

/// Flatten every drawable geometry of the document into rings
///
/// `Polygon` contributes each of its rings, `MultiPolygon` every ring of every
/// member polygon, in document order. Holes are emitted like outer rings.
pub fn flatten_rings(document: &BoundaryDocument) -> Flattened {
    let mut flattened = Flattened::default();

    for (index, feature) in document.features.iter().enumerate() {
        match &feature.geometry {
            Some(Geometry::Polygon(rings)) => {
                flattened.rings.extend(rings.iter().cloned());
            }
            Some(Geometry::MultiPolygon(polygons)) => {
                for rings in polygons {
                    flattened.rings.extend(rings.iter().cloned());
                }
            }
            Some(Geometry::Unsupported(type_name)) => {
                flattened.diagnostics.push(Diagnostic {
                    feature: index,
                    geometry_type: type_name.clone(),
                });
            }
            None => {
                flattened.diagnostics.push(Diagnostic {
                    feature: index,
                    geometry_type: "null".to_string(),
                });
            }
        }
    }

    flattened
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Feature;

    fn square(offset: f64) -> Ring {
        vec![
            (offset, offset),
            (offset, offset + 1.0),
            (offset + 1.0, offset + 1.0),
            (offset + 1.0, offset),
        ]
    }

    #[test]
    fn test_polygon_rings() {
        let doc = BoundaryDocument::from_geometry(Geometry::Polygon(vec![square(0.0)]));
        let flattened = flatten_rings(&doc);
        assert_eq!(flattened.rings.len(), 1);
        assert_eq!(flattened.rings[0].len(), 4);
        assert!(flattened.diagnostics.is_empty());
    }

    #[test]
    fn test_multipolygon_yields_all_rings() {
        // 3 polygons x 2 rings
        let polygons = (0..3)
            .map(|p| vec![square(p as f64 * 10.0), square(p as f64 * 10.0 + 0.25)])
            .collect();
        let doc = BoundaryDocument::from_geometry(Geometry::MultiPolygon(polygons));

        let flattened = flatten_rings(&doc);
        assert_eq!(flattened.rings.len(), 6);
        assert_eq!(flattened.point_count(), 24);
    }

    #[test]
    fn test_unsupported_geometries_are_reported() {
        let doc = BoundaryDocument {
            features: vec![
                Feature {
                    geometry: Some(Geometry::Unsupported("Point".to_string())),
                },
                Feature {
                    geometry: Some(Geometry::Polygon(vec![square(0.0)])),
                },
                Feature { geometry: None },
            ],
        };

        let flattened = flatten_rings(&doc);
        assert_eq!(flattened.rings.len(), 1);
        assert_eq!(
            flattened.diagnostics,
            vec![
                Diagnostic {
                    feature: 0,
                    geometry_type: "Point".to_string()
                },
                Diagnostic {
                    feature: 2,
                    geometry_type: "null".to_string()
                },
            ]
        );

        let err = flattened.ensure_supported().unwrap_err();
        assert!(matches!(err, Error::UnsupportedGeometry { feature: 0, .. }));
    }

    #[test]
    fn test_empty_document() {
        let flattened = flatten_rings(&BoundaryDocument::default());
        assert!(flattened.rings.is_empty());
        assert!(flattened.ensure_supported().is_ok());
    }
}
