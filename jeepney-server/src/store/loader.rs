//! Route data loading from GeoJSON.
//!
//! Routes are read from a `FeatureCollection` of `LineString` features.
//! Each feature carries its route's identity in `properties`:
//!
//! ```json
//! {
//!   "type": "Feature",
//!   "properties": {
//!     "id": 4, "code": "04L",
//!     "start_terminal": "Lahug", "end_terminal": "Carbon",
//!     "direction": "forward"
//!   },
//!   "geometry": { "type": "LineString", "coordinates": [[123.89, 10.33], [123.90, 10.29]] }
//! }
//! ```
//!
//! `direction` is optional and defaults to `forward`. A route's reverse
//! geometry is a second feature with the same id and `"direction": "reverse"`.

use std::path::Path;

use geojson::{Feature, GeoJson, Value};
use serde_json::Value as JsonValue;

use crate::domain::{Coordinate, Direction, RouteId, RouteInfo, RouteKey};

use super::geometry::InvalidGeometry;
use super::memory::InMemoryStore;

/// Errors building a store from route data.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    /// Reading the file failed
    #[error("failed to read route data: {0}")]
    Io(#[from] std::io::Error),

    /// The file is not valid GeoJSON
    #[error("invalid GeoJSON: {0}")]
    GeoJson(#[from] geojson::Error),

    /// The document is GeoJSON but not a feature collection
    #[error("route data must be a FeatureCollection")]
    NotACollection,

    /// A feature is missing or has malformed route properties or geometry
    #[error("feature {index}: {reason}")]
    InvalidFeature { index: usize, reason: String },

    /// A route's vertices do not form a usable line
    #[error("route {route}: {source}")]
    Geometry {
        route: RouteKey,
        #[source]
        source: InvalidGeometry,
    },

    /// The same route and direction appear twice
    #[error("duplicate geometry for route {0}")]
    DuplicateRoute(RouteKey),

    /// Two features for one route id disagree on code or terminals
    #[error("conflicting route info for route {0}")]
    ConflictingInfo(RouteId),

    /// A route has a reverse geometry but no forward geometry
    #[error("route {0} has no forward geometry")]
    MissingForward(RouteId),
}

/// Load routes from a GeoJSON file into an in-memory store.
pub fn load_routes(path: impl AsRef<Path>) -> Result<InMemoryStore, LoadError> {
    let text = std::fs::read_to_string(path.as_ref())?;
    parse_routes(&text)
}

/// Parse routes from GeoJSON text into an in-memory store.
pub fn parse_routes(text: &str) -> Result<InMemoryStore, LoadError> {
    let geojson: GeoJson = text.parse()?;
    let GeoJson::FeatureCollection(collection) = geojson else {
        return Err(LoadError::NotACollection);
    };

    let mut store = InMemoryStore::new();
    for (index, feature) in collection.features.iter().enumerate() {
        let (info, direction, vertices) = parse_feature(index, feature)?;
        store.insert(info, direction, vertices)?;
    }
    store.check_complete()?;

    Ok(store)
}

fn parse_feature(
    index: usize,
    feature: &Feature,
) -> Result<(RouteInfo, Direction, Vec<Coordinate>), LoadError> {
    let invalid = |reason: String| LoadError::InvalidFeature { index, reason };

    let id = property(feature, "id")
        .and_then(JsonValue::as_u64)
        .and_then(|id| u32::try_from(id).ok())
        .ok_or_else(|| invalid("missing or invalid integer property 'id'".to_string()))?;

    let text = |name: &str| -> Result<String, LoadError> {
        property(feature, name)
            .and_then(JsonValue::as_str)
            .map(str::to_string)
            .ok_or_else(|| invalid(format!("missing string property '{name}'")))
    };
    let code = text("code")?;
    let start_terminal = text("start_terminal")?;
    let end_terminal = text("end_terminal")?;

    let direction = match property(feature, "direction").and_then(JsonValue::as_str) {
        None | Some("forward") => Direction::Forward,
        Some("reverse") => Direction::Reverse,
        Some(other) => return Err(invalid(format!("unknown direction '{other}'"))),
    };

    let geometry = feature
        .geometry
        .as_ref()
        .ok_or_else(|| invalid("feature has no geometry".to_string()))?;
    let Value::LineString(positions) = &geometry.value else {
        return Err(invalid("geometry must be a LineString".to_string()));
    };

    let vertices = positions
        .iter()
        .map(|position| match position.as_slice() {
            [lon, lat, ..] => Coordinate::new(*lat, *lon)
                .map_err(|e| invalid(format!("bad vertex [{lon}, {lat}]: {e}"))),
            _ => Err(invalid("vertex needs longitude and latitude".to_string())),
        })
        .collect::<Result<Vec<_>, _>>()?;

    let info = RouteInfo::new(RouteId(id), code, start_terminal, end_terminal);
    Ok((info, direction, vertices))
}

fn property<'a>(feature: &'a Feature, name: &str) -> Option<&'a JsonValue> {
    feature.properties.as_ref().and_then(|p| p.get(name))
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;
    use crate::store::GeometryStore;

    const TWO_ROUTES: &str = r#"{
        "type": "FeatureCollection",
        "features": [
            {
                "type": "Feature",
                "properties": {"id": 1, "code": "01K", "start_terminal": "Urgello", "end_terminal": "Parkmall"},
                "geometry": {"type": "LineString", "coordinates": [[123.88, 10.30], [123.92, 10.30]]}
            },
            {
                "type": "Feature",
                "properties": {"id": 1, "code": "01K", "start_terminal": "Urgello", "end_terminal": "Parkmall", "direction": "reverse"},
                "geometry": {"type": "LineString", "coordinates": [[123.92, 10.301], [123.88, 10.301]]}
            },
            {
                "type": "Feature",
                "properties": {"id": 2, "code": "04B", "start_terminal": "Lahug", "end_terminal": "Carbon"},
                "geometry": {"type": "LineString", "coordinates": [[123.90, 10.28], [123.90, 10.32]]}
            }
        ]
    }"#;

    fn feature_collection(properties: &str, coordinates: &str) -> String {
        format!(
            r#"{{"type": "FeatureCollection", "features": [{{"type": "Feature", "properties": {properties}, "geometry": {{"type": "LineString", "coordinates": {coordinates}}}}}]}}"#
        )
    }

    #[tokio::test]
    async fn parses_routes_and_directions() {
        let store = parse_routes(TWO_ROUTES).unwrap();
        assert_eq!(store.len(), 2);
        assert!(store.geometry(RouteKey::reverse(RouteId(1))).is_ok());
        assert!(store.geometry(RouteKey::reverse(RouteId(2))).is_err());

        let routes = store.routes().await.unwrap();
        assert_eq!(routes[0].code, "01K");
        assert_eq!(routes[1].display_name(), "04B Lahug - Carbon");
    }

    #[test]
    fn longitude_comes_first() {
        let store = parse_routes(TWO_ROUTES).unwrap();
        let geometry = store.geometry(RouteKey::forward(RouteId(2))).unwrap();
        assert_eq!(geometry.vertices()[0].lat(), 10.28);
        assert_eq!(geometry.vertices()[0].lon(), 123.90);
    }

    #[test]
    fn rejects_non_collection() {
        let result = parse_routes(r#"{"type": "Point", "coordinates": [123.9, 10.3]}"#);
        assert!(matches!(result, Err(LoadError::NotACollection)));
    }

    #[test]
    fn rejects_missing_id() {
        let text = feature_collection(
            r#"{"code": "X", "start_terminal": "A", "end_terminal": "B"}"#,
            "[[123.88, 10.30], [123.92, 10.30]]",
        );
        assert!(matches!(
            parse_routes(&text),
            Err(LoadError::InvalidFeature { index: 0, .. })
        ));
    }

    #[test]
    fn rejects_unknown_direction() {
        let text = feature_collection(
            r#"{"id": 1, "code": "X", "start_terminal": "A", "end_terminal": "B", "direction": "sideways"}"#,
            "[[123.88, 10.30], [123.92, 10.30]]",
        );
        let err = parse_routes(&text).unwrap_err();
        assert!(err.to_string().contains("sideways"));
    }

    #[test]
    fn rejects_out_of_range_vertex() {
        let text = feature_collection(
            r#"{"id": 1, "code": "X", "start_terminal": "A", "end_terminal": "B"}"#,
            "[[123.88, 10.30], [223.92, 10.30]]",
        );
        assert!(matches!(
            parse_routes(&text),
            Err(LoadError::InvalidFeature { .. })
        ));
    }

    #[test]
    fn rejects_single_vertex_line() {
        let text = feature_collection(
            r#"{"id": 1, "code": "X", "start_terminal": "A", "end_terminal": "B"}"#,
            "[[123.88, 10.30], [123.88, 10.30]]",
        );
        assert!(matches!(parse_routes(&text), Err(LoadError::Geometry { .. })));
    }

    #[test]
    fn rejects_reverse_without_forward() {
        let text = feature_collection(
            r#"{"id": 1, "code": "X", "start_terminal": "A", "end_terminal": "B", "direction": "reverse"}"#,
            "[[123.88, 10.30], [123.92, 10.30]]",
        );
        assert!(matches!(
            parse_routes(&text),
            Err(LoadError::MissingForward(RouteId(1)))
        ));
    }

    #[test]
    fn loads_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(TWO_ROUTES.as_bytes()).unwrap();

        let store = load_routes(file.path()).unwrap();
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn sample_dataset_loads() {
        let path = concat!(env!("CARGO_MANIFEST_DIR"), "/../data/routes.geojson");
        let store = load_routes(path).unwrap();
        assert_eq!(store.len(), 5);
        assert!(store.geometry(RouteKey::reverse(RouteId(13))).is_ok());
    }

    #[test]
    fn missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = load_routes(dir.path().join("absent.geojson"));
        assert!(matches!(result, Err(LoadError::Io(_))));
    }
}
