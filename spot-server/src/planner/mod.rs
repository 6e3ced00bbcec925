//! Route construction.
//!
//! Turns an unordered selection of spots into an ordered, timed itinerary:
//!
//! 1. [`sequence`] orders the spots by greedy nearest-neighbor from the
//!    chosen start.
//! 2. [`LegResolver`] fetches a travel leg for each consecutive pair,
//!    transit first with a walking fallback.
//! 3. [`aggregate`] sums stays and travel into a [`RouteData`].
//!
//! [`revalidate`] checks a previously saved route against current spot
//! statuses before it is shown again.
//!
//! [`RouteData`]: crate::domain::RouteData

mod aggregate;
mod config;
mod legs;
mod plan;
mod revalidate;
mod sequence;


pub use aggregate::aggregate;
pub use config::RouteConfig;
pub use legs::{DirectionsProvider, LegFailure, LegResolver, RouteSummary, TransitPreference};
pub use plan::{PlannedRoute, RoutePlanner};
pub use revalidate::{StatusIndex, StatusRecord, revalidate};
pub use sequence::{RouteError, Sequence, sequence};
