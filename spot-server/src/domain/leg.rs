//! Travel leg types.
//!
//! A `RouteLeg` is one directed travel segment between two consecutive
//! stops, as resolved by a directions provider. Legs are immutable once
//! computed.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::SpotId;

/// How a leg is travelled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TravelMode {
    Walking,
    Transit,
}

impl TravelMode {
    /// Lowercase name used as the directions API `mode` parameter.
    pub fn as_param(&self) -> &'static str {
        match self {
            TravelMode::Walking => "walking",
            TravelMode::Transit => "transit",
        }
    }
}

impl fmt::Display for TravelMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            TravelMode::Walking => "WALKING",
            TravelMode::Transit => "TRANSIT",
        })
    }
}

/// A resolved travel segment from one spot to the next.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteLeg {
    pub from_spot_id: SpotId,
    pub to_spot_id: SpotId,
    pub mode: TravelMode,
    /// Whole minutes, rounded up from the provider's seconds.
    pub duration_minutes: u32,
    pub distance_meters: u64,
    /// Encoded polyline for rendering, when the provider supplied one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub polyline: Option<String>,
}

impl RouteLeg {
    /// Build a leg from raw provider values.
    ///
    /// # Examples
    ///
    /// ```
    /// use spot_server::domain::{RouteLeg, SpotId, TravelMode};
    ///
    /// let a = SpotId::parse("a").unwrap();
    /// let b = SpotId::parse("b").unwrap();
    /// let leg = RouteLeg::from_seconds(a, b, TravelMode::Walking, 61, 80, None);
    /// assert_eq!(leg.duration_minutes, 2);
    /// ```
    pub fn from_seconds(
        from_spot_id: SpotId,
        to_spot_id: SpotId,
        mode: TravelMode,
        duration_seconds: u64,
        distance_meters: u64,
        polyline: Option<String>,
    ) -> Self {
        Self {
            from_spot_id,
            to_spot_id,
            mode,
            duration_minutes: minutes_ceil(duration_seconds),
            distance_meters,
            polyline,
        }
    }
}

/// Seconds to whole minutes, rounding up.
pub fn minutes_ceil(seconds: u64) -> u32 {
    u32::try_from(seconds.div_ceil(60)).unwrap_or(u32::MAX)
}
