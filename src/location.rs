//! # Location Resolver Module
//!
//! Maps the ISO 6709-style `format.tags.location` coordinate tag to a
//! human-readable place name.
//!
//! ## Resolution steps:
//! 1. Extract the tag, formatted as signed fixed-point latitude/longitude
//!    with a trailing slash (e.g. `+35.6762+139.6503/`)
//! 2. Parse both coordinates; a missing tag, a non-matching tag, or a
//!    zero coordinate resolves to "Unknown location"
//! 3. Query the place index for the nearest named place within 100 km,
//!    falling back to "Unknown location" when nothing is in range
//!
//! The place index is a black-box collaborator from the pipeline's point
//! of view: production uses the built-in city table, tests inject their
//! own place lists.

use crate::prober::ProbeDocument;
use regex::Regex;
use std::sync::OnceLock;
use tracing::debug;

pub const UNKNOWN_LOCATION: &str = "Unknown location";

/// Lookup radius for the nearest-place query
const MAX_DISTANCE_KM: f64 = 100.0;

const EARTH_RADIUS_KM: f64 = 6371.0;

/// A named place with its coordinates
#[derive(Debug, Clone)]
pub struct Place {
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
}

/// Nearest-named-place lookup over a fixed place list
pub struct PlaceIndex {
    places: Vec<Place>,
}

impl PlaceIndex {
    pub fn new(places: Vec<Place>) -> Self {
        Self { places }
    }

    /// Index over the built-in city table
    pub fn builtin() -> Self {
        Self::new(
            BUILTIN_PLACES
                .iter()
                .map(|(name, latitude, longitude)| Place {
                    name: (*name).to_string(),
                    latitude: *latitude,
                    longitude: *longitude,
                })
                .collect(),
        )
    }

    /// The closest place within `max_km` of the given coordinate, if any
    pub fn nearest_within(&self, latitude: f64, longitude: f64, max_km: f64) -> Option<&Place> {
        self.places
            .iter()
            .map(|place| {
                (
                    place,
                    haversine_km(latitude, longitude, place.latitude, place.longitude),
                )
            })
            .filter(|(_, distance)| *distance <= max_km)
            .min_by(|(_, a), (_, b)| a.total_cmp(b))
            .map(|(place, _)| place)
    }
}

/// Great-circle distance between two coordinates in kilometers
fn haversine_km(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let d_lat = (lat2 - lat1).to_radians();
    let d_lon = (lon2 - lon1).to_radians();

    let a = (d_lat / 2.0).sin().powi(2)
        + lat1.to_radians().cos() * lat2.to_radians().cos() * (d_lon / 2.0).sin().powi(2);

    2.0 * a.sqrt().asin() * EARTH_RADIUS_KM
}

fn coordinate_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"([+-]\d\d\.\d\d\d\d)([+-]\d\d\d\.\d\d\d\d)/").expect("valid coordinate regex")
    })
}

/// Parse a `+DD.DDDD-DDD.DDDD/` location tag into (latitude, longitude).
///
/// Zero coordinates are treated as absent: some recorders write
/// `+00.0000+000.0000/` when they never got a GPS fix.
pub fn parse_location_tag(tag: &str) -> Option<(f64, f64)> {
    let captures = coordinate_pattern().captures(tag)?;
    let latitude: f64 = captures[1].parse().ok()?;
    let longitude: f64 = captures[2].parse().ok()?;

    if latitude == 0.0 || longitude == 0.0 {
        return None;
    }

    Some((latitude, longitude))
}

/// Resolve a probed file's location tag to a place name
pub fn resolve(doc: &ProbeDocument, places: &PlaceIndex) -> String {
    let Some(tag) = doc.format_tag("location") else {
        return UNKNOWN_LOCATION.to_string();
    };

    let Some((latitude, longitude)) = parse_location_tag(tag) else {
        debug!("Location tag {:?} does not parse to a usable coordinate", tag);
        return UNKNOWN_LOCATION.to_string();
    };

    places
        .nearest_within(latitude, longitude, MAX_DISTANCE_KM)
        .map(|place| place.name.clone())
        .unwrap_or_else(|| UNKNOWN_LOCATION.to_string())
}

/// Built-in place table: major cities by coordinate.
/// Stand-in for a full gazetteer, enough to label typical recordings.
const BUILTIN_PLACES: &[(&str, f64, f64)] = &[
    ("Amsterdam", 52.3676, 4.9041),
    ("Athens", 37.9838, 23.7275),
    ("Auckland", -36.8485, 174.7633),
    ("Bangkok", 13.7563, 100.5018),
    ("Barcelona", 41.3874, 2.1686),
    ("Beijing", 39.9042, 116.4074),
    ("Berlin", 52.5200, 13.4050),
    ("Bogota", 4.7110, -74.0721),
    ("Buenos Aires", -34.6037, -58.3816),
    ("Cairo", 30.0444, 31.2357),
    ("Cape Town", -33.9249, 18.4241),
    ("Chicago", 41.8781, -87.6298),
    ("Delhi", 28.7041, 77.1025),
    ("Denver", 39.7392, -104.9903),
    ("Dubai", 25.2048, 55.2708),
    ("Dublin", 53.3498, -6.2603),
    ("Helsinki", 60.1699, 24.9384),
    ("Hong Kong", 22.3193, 114.1694),
    ("Honolulu", 21.3099, -157.8581),
    ("Istanbul", 41.0082, 28.9784),
    ("Jakarta", -6.2088, 106.8456),
    ("Johannesburg", -26.2041, 28.0473),
    ("Lagos", 6.5244, 3.3792),
    ("Lima", -12.0464, -77.0428),
    ("Lisbon", 38.7223, -9.1393),
    ("London", 51.5074, -0.1278),
    ("Los Angeles", 34.0522, -118.2437),
    ("Madrid", 40.4168, -3.7038),
    ("Melbourne", -37.8136, 144.9631),
    ("Mexico City", 19.4326, -99.1332),
    ("Miami", 25.7617, -80.1918),
    ("Milan", 45.4642, 9.1900),
    ("Moscow", 55.7558, 37.6173),
    ("Mumbai", 19.0760, 72.8777),
    ("Nairobi", -1.2921, 36.8219),
    ("New York", 40.7128, -74.0060),
    ("Oslo", 59.9139, 10.7522),
    ("Paris", 48.8566, 2.3522),
    ("Prague", 50.0755, 14.4378),
    ("Reykjavik", 64.1466, -21.9426),
    ("Rio de Janeiro", -22.9068, -43.1729),
    ("Rome", 41.9028, 12.4964),
    ("San Francisco", 37.7749, -122.4194),
    ("Santiago", -33.4489, -70.6693),
    ("Sao Paulo", -23.5505, -46.6333),
    ("Seattle", 47.6062, -122.3321),
    ("Seoul", 37.5665, 126.9780),
    ("Shanghai", 31.2304, 121.4737),
    ("Singapore", 1.3521, 103.8198),
    ("Stockholm", 59.3293, 18.0686),
    ("Sydney", -33.8688, 151.2093),
    ("Tokyo", 35.6762, 139.6503),
    ("Toronto", 43.6532, -79.3832),
    ("Vancouver", 49.2827, -123.1207),
    ("Vienna", 48.2082, 16.3738),
    ("Warsaw", 52.2297, 21.0122),
    ("Zurich", 47.3769, 8.5417),
];

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn doc_with_location(tag: &str) -> ProbeDocument {
        ProbeDocument::new(json!({
            "format": {"tags": {"location": tag}},
            "streams": []
        }))
    }

    #[test]
    fn test_parse_valid_tag() {
        let (latitude, longitude) = parse_location_tag("+35.6762+139.6503/").unwrap();
        assert!((latitude - 35.6762).abs() < 1e-9);
        assert!((longitude - 139.6503).abs() < 1e-9);
    }

    #[test]
    fn test_parse_negative_coordinates() {
        let (latitude, longitude) = parse_location_tag("-33.8688+151.2093/").unwrap();
        assert!(latitude < 0.0);
        assert!(longitude > 0.0);
    }

    #[test]
    fn test_parse_rejects_malformed_tags() {
        assert!(parse_location_tag("").is_none());
        assert!(parse_location_tag("35.6762,139.6503").is_none());
        assert!(parse_location_tag("+35.67+139.65/").is_none());
    }

    #[test]
    fn test_parse_rejects_zero_coordinates() {
        assert!(parse_location_tag("+00.0000+000.0000/").is_none());
        assert!(parse_location_tag("+00.0000+139.6503/").is_none());
    }

    #[test]
    fn test_resolve_missing_tag() {
        let doc = ProbeDocument::new(json!({"format": {"tags": {}}, "streams": []}));
        assert_eq!(resolve(&doc, &PlaceIndex::builtin()), UNKNOWN_LOCATION);
    }

    #[test]
    fn test_resolve_malformed_tag() {
        let doc = doc_with_location("somewhere nice");
        assert_eq!(resolve(&doc, &PlaceIndex::builtin()), UNKNOWN_LOCATION);
    }

    #[test]
    fn test_resolve_near_tokyo() {
        let doc = doc_with_location("+35.6762+139.6503/");
        assert_eq!(resolve(&doc, &PlaceIndex::builtin()), "Tokyo");
    }

    #[test]
    fn test_resolve_far_from_everything() {
        // Middle of the South Pacific
        let doc = doc_with_location("-48.8767-123.3933/");
        assert_eq!(resolve(&doc, &PlaceIndex::builtin()), UNKNOWN_LOCATION);
    }

    #[test]
    fn test_nearest_prefers_the_closest_place() {
        let index = PlaceIndex::new(vec![
            Place {
                name: "Near".to_string(),
                latitude: 10.0,
                longitude: 10.0,
            },
            Place {
                name: "Nearer".to_string(),
                latitude: 10.1,
                longitude: 10.1,
            },
        ]);

        let place = index.nearest_within(10.11, 10.11, 100.0).unwrap();
        assert_eq!(place.name, "Nearer");
    }

    #[test]
    fn test_nearest_respects_the_radius() {
        let index = PlaceIndex::new(vec![Place {
            name: "Lonely".to_string(),
            latitude: 0.0,
            longitude: 0.0,
        }]);

        // Roughly 111 km per degree of latitude
        assert!(index.nearest_within(1.0, 0.0, 100.0).is_none());
        assert!(index.nearest_within(1.0, 0.0, 120.0).is_some());
    }

    #[test]
    fn test_haversine_known_distance() {
        // Paris to London is about 344 km
        let distance = haversine_km(48.8566, 2.3522, 51.5074, -0.1278);
        assert!((distance - 344.0).abs() < 10.0);
    }
}
