//! boundmap - Render a GeoJSON boundary with labeled sites to a PNG map

pub mod config;
pub mod domain;
pub mod error;
pub mod geojson;
pub mod geometry;
pub mod render;

pub use error::{Error, Result};
