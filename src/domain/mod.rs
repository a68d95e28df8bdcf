pub mod boundary;
pub mod site;

pub use boundary::{BoundaryDocument, Feature, Geometry, Ring};
pub use site::{Site, default_sites};
