use crate::domain::{BoundaryDocument, Feature, Geometry, Ring};
use crate::error::{Error, Result};
use geojson::{GeoJson, PolygonType, Value};
use serde_json::Value as JsonValue;
use std::path::Path;

/// Type tag recorded for a geometry object that has no `type` member
pub const MISSING_TYPE: &str = "missing";

/// Read and parse the boundary document at `path`
pub fn load_document(path: &Path) -> Result<BoundaryDocument> {
    let contents = std::fs::read_to_string(path).map_err(|source| Error::InputRead {
        path: path.to_path_buf(),
        source,
    })?;
    parse_document(&contents, path)
}

/// Parse a GeoJSON string into a normalized document
///
/// # Algorithm
/// 1. Parse as [`GeoJson`]; a valid document maps one feature per member
///    (`FeatureCollection`), or to a single feature (`Feature` or bare geometry)
/// 2. Otherwise re-read the JSON and walk it member by member so one bad
///    feature does not take the whole file down: a geometry without `type`
///    becomes an unsupported geometry tagged `missing`, a collection without
///    `features` is empty, and each geometry is decoded on its own
///
/// `path` is only used for error reporting.
pub fn parse_document(contents: &str, path: &Path) -> Result<BoundaryDocument> {
    let geojson_error = match contents.parse::<GeoJson>() {
        Ok(geojson) => return convert_geojson(geojson),
        Err(e) => e,
    };

    let root: JsonValue = serde_json::from_str(contents).map_err(|source| Error::InputParse {
        path: path.to_path_buf(),
        source,
    })?;

    match member_objects(root) {
        Some(members) => {
            let features = members
                .into_iter()
                .enumerate()
                .map(|(index, member)| lenient_feature(member, index))
                .collect::<Result<Vec<_>>>()?;
            Ok(BoundaryDocument { features })
        }
        None => Err(Error::InputGeoJson {
            path: path.to_path_buf(),
            source: geojson_error,
        }),
    }
}

fn convert_geojson(geojson: GeoJson) -> Result<BoundaryDocument> {
    let geometries = match geojson {
        GeoJson::FeatureCollection(collection) => collection
            .features
            .into_iter()
            .map(|feature| feature.geometry)
            .collect(),
        GeoJson::Feature(feature) => vec![feature.geometry],
        GeoJson::Geometry(geometry) => vec![Some(geometry)],
    };

    let features = geometries
        .into_iter()
        .enumerate()
        .map(|(index, geometry)| {
            let geometry = match geometry {
                Some(geometry) => Some(convert_value(geometry.value, index)?),
                None => None,
            };
            Ok(Feature { geometry })
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(BoundaryDocument { features })
}

/// Split the top-level object into per-feature members, `None` when it is not
/// a tagged GeoJSON object
fn member_objects(root: JsonValue) -> Option<Vec<JsonValue>> {
    let JsonValue::Object(mut object) = root else {
        return None;
    };
    let type_name = object.get("type")?.as_str()?.to_string();

    if type_name == "FeatureCollection" {
        match object.remove("features") {
            Some(JsonValue::Array(features)) => Some(features),
            None | Some(JsonValue::Null) => Some(Vec::new()),
            Some(_) => None,
        }
    } else {
        Some(vec![JsonValue::Object(object)])
    }
}

fn lenient_feature(member: JsonValue, index: usize) -> Result<Feature> {
    let geometry = match member {
        JsonValue::Object(mut object)
            if object.get("type").and_then(JsonValue::as_str) == Some("Feature") =>
        {
            object.remove("geometry").unwrap_or(JsonValue::Null)
        }
        other => other,
    };

    let geometry = match geometry {
        JsonValue::Null => None,
        JsonValue::Object(ref object) if !object.contains_key("type") => {
            Some(Geometry::Unsupported(MISSING_TYPE.to_string()))
        }
        value => {
            let geometry =
                geojson::Geometry::from_json_value(value).map_err(|e| Error::InputCoordinates {
                    feature: index,
                    reason: e.to_string(),
                })?;
            Some(convert_value(geometry.value, index)?)
        }
    };

    Ok(Feature { geometry })
}

fn convert_value(value: Value, index: usize) -> Result<Geometry> {
    let geometry = match value {
        Value::Polygon(rings) => Geometry::Polygon(to_rings(rings, index)?),
        Value::MultiPolygon(polygons) => Geometry::MultiPolygon(
            polygons
                .into_iter()
                .map(|rings| to_rings(rings, index))
                .collect::<Result<Vec<_>>>()?,
        ),
        Value::Point(_) => Geometry::Unsupported("Point".to_string()),
        Value::MultiPoint(_) => Geometry::Unsupported("MultiPoint".to_string()),
        Value::LineString(_) => Geometry::Unsupported("LineString".to_string()),
        Value::MultiLineString(_) => Geometry::Unsupported("MultiLineString".to_string()),
        Value::GeometryCollection(_) => Geometry::Unsupported("GeometryCollection".to_string()),
    };
    Ok(geometry)
}

fn to_rings(rings: PolygonType, index: usize) -> Result<Vec<Ring>> {
    rings
        .into_iter()
        .map(|ring| {
            ring.into_iter()
                .map(|position| match position.as_slice() {
                    // Altitude and any further members are dropped
                    [lon, lat, ..] => Ok((*lon, *lat)),
                    _ => Err(Error::InputCoordinates {
                        feature: index,
                        reason: format!(
                            "position needs at least 2 numbers, got {}",
                            position.len()
                        ),
                    }),
                })
                .collect::<Result<Ring>>()
        })
        .collect()
}
