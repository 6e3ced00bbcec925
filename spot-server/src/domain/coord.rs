//! Coordinates and the location codec.
//!
//! Spot locations arrive as text in one of two encodings:
//!
//! - Hex-encoded EWKB as returned by PostGIS for a `geography(Point, 4326)`
//!   column (`0101000020E6100000` followed by two little-endian doubles).
//! - Well-known text, `POINT(<lng> <lat>)`.
//!
//! This is the only place locations are parsed. Everything else calls
//! [`decode_location`] and treats `None` as "cannot be placed".

use std::fmt;

use serde::{Deserialize, Serialize};

/// Mean Earth radius used by the haversine formula, in meters.
pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// EWKB header for a little-endian Point with the SRID flag set and SRID 4326.
const EWKB_POINT_4326_PREFIX: &str = "0101000020E6100000";

/// Hex offsets of the longitude and latitude doubles.
const LNG_HEX: std::ops::Range<usize> = 18..34;
const LAT_HEX: std::ops::Range<usize> = 34..50;

/// A WGS84 latitude/longitude pair in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coord {
    pub lat: f64,
    pub lng: f64,
}

impl Coord {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }
}

impl fmt::Display for Coord {
    /// Formats as `lat,lng`, the form the directions API expects.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.lat, self.lng)
    }
}

/// Decode a location field into coordinates.
///
/// Returns `None` for empty, malformed, or unrecognised input. Never panics.
///
/// # Examples
///
/// ```
/// use spot_server::domain::decode_location;
///
/// let c = decode_location("POINT(139.771250 35.699250)").unwrap();
/// assert!((c.lng - 139.77125).abs() < 1e-9);
/// assert!((c.lat - 35.69925).abs() < 1e-9);
///
/// assert!(decode_location("").is_none());
/// assert!(decode_location("LINESTRING(0 0, 1 1)").is_none());
/// ```
pub fn decode_location(raw: &str) -> Option<Coord> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    if has_ewkb_prefix(raw) {
        return decode_ewkb_hex(raw);
    }

    decode_wkt(raw)
}

fn has_ewkb_prefix(raw: &str) -> bool {
    raw.get(..EWKB_POINT_4326_PREFIX.len())
        .is_some_and(|p| p.eq_ignore_ascii_case(EWKB_POINT_4326_PREFIX))
}

fn decode_ewkb_hex(raw: &str) -> Option<Coord> {
    let lng = le_f64_from_hex(raw.get(LNG_HEX)?)?;
    let lat = le_f64_from_hex(raw.get(LAT_HEX)?)?;
    finite(lat, lng)
}

/// Parse 16 hex characters as a little-endian IEEE-754 double.
fn le_f64_from_hex(hex: &str) -> Option<f64> {
    if hex.len() != 16 {
        return None;
    }

    let mut bytes = [0u8; 8];
    for (i, byte) in bytes.iter_mut().enumerate() {
        *byte = u8::from_str_radix(hex.get(i * 2..i * 2 + 2)?, 16).ok()?;
    }

    Some(f64::from_le_bytes(bytes))
}

fn decode_wkt(raw: &str) -> Option<Coord> {
    let rest = raw.strip_prefix("POINT")?.trim_start();
    let inner = rest.strip_prefix('(')?.strip_suffix(')')?;

    let mut parts = inner.split(' ').filter(|p| !p.is_empty());
    let lng: f64 = parts.next()?.parse().ok()?;
    let lat: f64 = parts.next()?.parse().ok()?;
    if parts.next().is_some() {
        return None;
    }

    finite(lat, lng)
}

fn finite(lat: f64, lng: f64) -> Option<Coord> {
    (lat.is_finite() && lng.is_finite()).then_some(Coord { lat, lng })
}

/// Encode coordinates as WKT, `POINT(lng lat)`.
pub fn encode_wkt(coord: Coord) -> String {
    format!("POINT({} {})", coord.lng, coord.lat)
}

/// Encode coordinates as hex EWKB with SRID 4326.
pub fn encode_ewkb_hex(coord: Coord) -> String {
    let mut out = String::with_capacity(50);
    out.push_str(EWKB_POINT_4326_PREFIX);
    for b in coord.lng.to_le_bytes().iter().chain(coord.lat.to_le_bytes().iter()) {
        out.push_str(&format!("{b:02X}"));
    }
    out
}

/// Haversine distance between two coordinates, in meters.
///
/// Used as a sequencing heuristic, not for billing-grade accuracy.
pub fn distance_meters(a: Coord, b: Coord) -> f64 {
    let phi1 = a.lat.to_radians();
    let phi2 = b.lat.to_radians();
    let d_phi = (b.lat - a.lat).to_radians();
    let d_lambda = (b.lng - a.lng).to_radians();

    let h = (d_phi / 2.0).sin().powi(2) + phi1.cos() * phi2.cos() * (d_lambda / 2.0).sin().powi(2);
    // Rounding can push near-antipodal pairs just past 1.
    let h = h.min(1.0);
    let c = 2.0 * h.sqrt().atan2((1.0 - h).sqrt());

    EARTH_RADIUS_M * c
}

/// A Google Maps search URL for a location, falling back to a name query.
pub fn maps_url(location: Option<&str>, name_en: &str, name_jp: &str) -> String {
    match location.and_then(decode_location) {
        Some(c) => format!(
            "https://www.google.com/maps/search/?api=1&query={},{}",
            c.lat, c.lng
        ),
        None => {
            let query = format!("{name_en} {name_jp}");
            let query = url_encode(&query);
            format!("https://www.google.com/maps/search/?api=1&query={query}")
        }
    }
}

/// Percent-encode everything outside the URI unreserved set.
fn url_encode(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for b in s.bytes() {
        match b {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
                out.push(b as char)
            }
            _ => out.push_str(&format!("%{b:02X}")),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn akihabara() -> Coord {
        Coord::new(35.69925, 139.77125)
    }

    #[test]
    fn decode_wkt_point() {
        let c = decode_location("POINT(139.771250 35.699250)").unwrap();
        assert!((c.lng - 139.77125).abs() < 1e-9);
        assert!((c.lat - 35.69925).abs() < 1e-9);
    }

    #[test]
    fn decode_wkt_negative_and_extra_spaces() {
        let c = decode_location("POINT (-0.1278   -51.5074)").unwrap();
        assert_eq!(c.lng, -0.1278);
        assert_eq!(c.lat, -51.5074);
    }

    #[test]
    fn decode_hex_example() {
        let mut hex = String::from("0101000020E6100000");
        for b in 139.77125f64.to_le_bytes() {
            hex.push_str(&format!("{b:02X}"));
        }
        for b in 35.69925f64.to_le_bytes() {
            hex.push_str(&format!("{b:02X}"));
        }

        let c = decode_location(&hex).unwrap();
        assert_eq!(c.lng, 139.77125);
        assert_eq!(c.lat, 35.69925);
    }

    #[test]
    fn decode_lowercase_hex() {
        let hex = encode_ewkb_hex(akihabara()).to_lowercase();
        assert_eq!(decode_location(&hex), Some(akihabara()));
    }

    #[test]
    fn decode_rejects_garbage() {
        assert!(decode_location("").is_none());
        assert!(decode_location("   ").is_none());
        assert!(decode_location("POINT()").is_none());
        assert!(decode_location("POINT(1)").is_none());
        assert!(decode_location("POINT(1 2 3)").is_none());
        assert!(decode_location("POINT(a b)").is_none());
        assert!(decode_location("POINT(1 2").is_none());
        assert!(decode_location("35.6,139.7").is_none());
    }

    #[test]
    fn decode_rejects_truncated_hex() {
        let hex = encode_ewkb_hex(akihabara());
        assert!(decode_location(&hex[..40]).is_none());
        assert!(decode_location("0101000020E6100000").is_none());
    }

    #[test]
    fn decode_rejects_non_hex_digits() {
        let mut hex = encode_ewkb_hex(akihabara());
        hex.replace_range(20..22, "ZZ");
        assert!(decode_location(&hex).is_none());
    }

    #[test]
    fn decode_rejects_nan_payload() {
        let c = Coord::new(f64::NAN, 139.0);
        assert!(decode_location(&encode_ewkb_hex(c)).is_none());
    }

    #[test]
    fn wkt_encoding() {
        assert_eq!(encode_wkt(akihabara()), "POINT(139.77125 35.69925)");
    }

    #[test]
    fn distance_zero_for_same_point() {
        assert_eq!(distance_meters(akihabara(), akihabara()), 0.0);
    }

    #[test]
    fn distance_known_value() {
        // Super Potato to Kanda Myojin, roughly 430 m.
        let a = Coord::new(35.69925, 139.77125);
        let b = Coord::new(35.7019, 139.7678);
        let d = distance_meters(a, b);
        assert!(d > 400.0 && d < 460.0, "got {d}");
    }

    #[test]
    fn display_is_lat_lng() {
        assert_eq!(akihabara().to_string(), "35.69925,139.77125");
    }

    #[test]
    fn maps_url_with_coordinates() {
        let url = maps_url(Some("POINT(139.7678 35.7019)"), "Kanda Myojin Shrine", "神田明神");
        assert_eq!(
            url,
            "https://www.google.com/maps/search/?api=1&query=35.7019,139.7678"
        );
    }

    #[test]
    fn maps_url_falls_back_to_name() {
        let url = maps_url(None, "Radio Center", "R");
        assert_eq!(
            url,
            "https://www.google.com/maps/search/?api=1&query=Radio%20Center%20R"
        );
    }
}
