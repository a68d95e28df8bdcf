use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while rendering a boundary map.
#[derive(Debug, Error)]
pub enum Error {
    /// Boundary file missing or unreadable.
    #[error("failed to read boundary file {}", path.display())]
    InputRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Boundary file is not well-formed JSON.
    #[error("boundary file {} is not valid JSON", path.display())]
    InputParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// Boundary file is JSON but not a tagged GeoJSON object.
    #[error("boundary file {} is not a valid GeoJSON document", path.display())]
    InputGeoJson {
        path: PathBuf,
        #[source]
        source: geojson::Error,
    },

    /// Coordinates missing or nested at the wrong depth.
    #[error("malformed coordinates in feature {feature}: {reason}")]
    InputCoordinates { feature: usize, reason: String },

    /// Geometry that cannot be drawn, only raised in strict mode.
    #[error("unsupported geometry type `{geometry_type}` in feature {feature}")]
    UnsupportedGeometry {
        feature: usize,
        geometry_type: String,
    },

    /// No ring point and no site to bound.
    #[error("nothing to draw: the boundary has no rings and the site table is empty")]
    EmptyInput,

    #[error("invalid render settings: {0}")]
    InvalidConfig(String),

    #[error("cannot allocate a {width}x{height} canvas")]
    Canvas { width: u32, height: u32 },

    #[error("failed to encode PNG: {0}")]
    Encode(String),

    #[error("failed to write image {}", path.display())]
    OutputWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl Error {
    /// True for every failure caused by the boundary file itself.
    pub fn is_input(&self) -> bool {
        matches!(
            self,
            Error::InputRead { .. }
                | Error::InputParse { .. }
                | Error::InputGeoJson { .. }
                | Error::InputCoordinates { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_input_classification() {
        let err = Error::InputCoordinates {
            feature: 0,
            reason: "bad".to_string(),
        };
        assert!(err.is_input());
        assert!(!Error::EmptyInput.is_input());
        assert!(!Error::InvalidConfig("dpi".to_string()).is_input());
    }

    #[test]
    fn test_unsupported_message() {
        let err = Error::UnsupportedGeometry {
            feature: 3,
            geometry_type: "LineString".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "unsupported geometry type `LineString` in feature 3"
        );
    }
}
