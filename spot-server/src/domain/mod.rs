//! Domain types for the spot route planner.
//!
//! Spots, legs, itineraries and saved journeys, plus the location codec.
//! Identifier types validate at construction, so code that receives them
//! can trust they are well formed.

mod coord;
mod error;
mod journey;
mod leg;
mod route;
mod spot;

pub use coord::{
    Coord, EARTH_RADIUS_M, decode_location, distance_meters, encode_ewkb_hex, encode_wkt,
    maps_url,
};
pub use error::DomainError;
pub use journey::{Journey, JourneyId, UserId};
pub use leg::{RouteLeg, TravelMode, minutes_ceil};
pub use route::{RouteData, RouteStop};
pub use spot::{Category, DEFAULT_STAY_MINUTES, Spot, SpotId, SpotStatus};
