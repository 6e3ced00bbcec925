//! Leg resolution against a directions provider.
//!
//! Each consecutive pair of stops becomes one [`RouteLeg`]. Transit is
//! requested first; if that fails the same pair is requested once on
//! foot. A pair that fails both ways produces no leg at all.
//!
//! Requests are made one at a time, in stop order. Callers that abandon a
//! route simply drop the future.

use std::future::Future;

use futures::{Stream, StreamExt, stream};

use crate::directions::DirectionsError;
use crate::domain::{Coord, RouteLeg, Spot, SpotId, TravelMode};

/// Routing preference passed to the provider for transit requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransitPreference {
    FewerTransfers,
    LessWalking,
}

impl TransitPreference {
    pub fn as_param(&self) -> &'static str {
        match self {
            TransitPreference::FewerTransfers => "fewer_transfers",
            TransitPreference::LessWalking => "less_walking",
        }
    }
}

/// A route returned by the provider, reduced to what a leg needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteSummary {
    pub distance_meters: u64,
    pub duration_seconds: u64,
    pub encoded_path: Option<String>,
}

/// Trait for fetching a single route between two coordinates.
///
/// This abstraction allows the resolver to be tested with mock data.
/// Implementations return [`DirectionsError::NoRoute`] when the provider
/// answers but has nothing usable.
pub trait DirectionsProvider {
    fn route(
        &self,
        origin: Coord,
        destination: Coord,
        mode: TravelMode,
        preference: Option<TransitPreference>,
    ) -> impl Future<Output = Result<RouteSummary, DirectionsError>> + Send;
}

/// A pair of stops for which no leg could be produced.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LegFailure {
    /// One of the stops has no decodable location
    #[error("cannot route {from} -> {to}: missing location")]
    Unplaceable { from: SpotId, to: SpotId },

    /// Transit and walking both failed
    #[error("no route {from} -> {to} (transit: {transit}; walking: {walking})")]
    NoRoute {
        from: SpotId,
        to: SpotId,
        transit: String,
        walking: String,
    },
}

/// Resolves legs for an ordered sequence of stops.
pub struct LegResolver<'a, P: DirectionsProvider> {
    provider: &'a P,
    preference: TransitPreference,
}

impl<'a, P: DirectionsProvider> LegResolver<'a, P> {
    /// Create a resolver that asks for fewer transfers on transit legs.
    pub fn new(provider: &'a P) -> Self {
        Self {
            provider,
            preference: TransitPreference::FewerTransfers,
        }
    }

    pub fn with_preference(mut self, preference: TransitPreference) -> Self {
        self.preference = preference;
        self
    }

    /// Lazily resolve each consecutive pair, in order.
    ///
    /// Nothing is requested until the stream is polled, and the request for
    /// pair `i + 1` is not issued until pair `i` has finished.
    pub fn legs<'s>(
        &'s self,
        ordered: &'s [Spot],
    ) -> impl Stream<Item = Result<RouteLeg, LegFailure>> + 's {
        stream::iter(ordered.windows(2)).then(move |pair| self.resolve_pair(&pair[0], &pair[1]))
    }

    /// Resolve all legs, dropping pairs that could not be routed.
    ///
    /// Returns an empty list for fewer than two stops. The result may hold
    /// fewer than `ordered.len() - 1` legs.
    #[tracing::instrument(name = "resolve_legs", skip_all, fields(stops = ordered.len()))]
    pub async fn resolve_legs(&self, ordered: &[Spot]) -> Vec<RouteLeg> {
        self.legs(ordered)
            .filter_map(|outcome| async move {
                match outcome {
                    Ok(leg) => Some(leg),
                    Err(failure) => {
                        tracing::warn!(%failure, "dropping leg");
                        None
                    }
                }
            })
            .collect()
            .await
    }

    /// Resolve one pair: transit first, then walking.
    async fn resolve_pair(&self, from: &Spot, to: &Spot) -> Result<RouteLeg, LegFailure> {
        let (Some(origin), Some(destination)) = (from.coord(), to.coord()) else {
            return Err(LegFailure::Unplaceable {
                from: from.spot_id.clone(),
                to: to.spot_id.clone(),
            });
        };

        let transit_err = match self
            .provider
            .route(origin, destination, TravelMode::Transit, Some(self.preference))
            .await
        {
            Ok(summary) => return Ok(to_leg(from, to, TravelMode::Transit, summary)),
            Err(e) => e,
        };

        tracing::debug!(
            from = %from.spot_id,
            to = %to.spot_id,
            error = %transit_err,
            "transit failed, trying walking"
        );

        match self
            .provider
            .route(origin, destination, TravelMode::Walking, None)
            .await
        {
            Ok(summary) => Ok(to_leg(from, to, TravelMode::Walking, summary)),
            Err(walk_err) => Err(LegFailure::NoRoute {
                from: from.spot_id.clone(),
                to: to.spot_id.clone(),
                transit: transit_err.to_string(),
                walking: walk_err.to_string(),
            }),
        }
    }
}

fn to_leg(from: &Spot, to: &Spot, mode: TravelMode, summary: RouteSummary) -> RouteLeg {
    RouteLeg::from_seconds(
        from.spot_id.clone(),
        to.spot_id.clone(),
        mode,
        summary.duration_seconds,
        summary.distance_meters,
        summary.encoded_path,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Category;
    use std::sync::Mutex;

    /// Provider that answers from a fixed script of per-mode outcomes.
    struct ScriptedProvider {
        transit_ok: bool,
        walking_ok: bool,
        calls: Mutex<Vec<(TravelMode, Option<TransitPreference>)>>,
    }

    impl ScriptedProvider {
        fn new(transit_ok: bool, walking_ok: bool) -> Self {
            Self {
                transit_ok,
                walking_ok,
                calls: Mutex::new(Vec::new()),
            }
        }

        fn calls(&self) -> Vec<(TravelMode, Option<TransitPreference>)> {
            self.calls.lock().unwrap().clone()
        }
    }

    impl DirectionsProvider for ScriptedProvider {
        async fn route(
            &self,
            _origin: Coord,
            _destination: Coord,
            mode: TravelMode,
            preference: Option<TransitPreference>,
        ) -> Result<RouteSummary, DirectionsError> {
            self.calls.lock().unwrap().push((mode, preference));
            let ok = match mode {
                TravelMode::Transit => self.transit_ok,
                TravelMode::Walking => self.walking_ok,
            };
            if ok {
                Ok(RouteSummary {
                    distance_meters: 500,
                    duration_seconds: 301,
                    encoded_path: Some("abc".into()),
                })
            } else {
                Err(DirectionsError::NoRoute)
            }
        }
    }

    fn spot(id: &str, lng: f64) -> Spot {
        Spot::new(SpotId::parse(id).unwrap(), id, Category::Retro)
            .with_location(format!("POINT({lng} 35.7)"))
    }

    #[tokio::test]
    async fn fewer_than_two_stops_makes_no_requests() {
        let provider = ScriptedProvider::new(true, true);
        let resolver = LegResolver::new(&provider);

        assert!(resolver.resolve_legs(&[]).await.is_empty());
        assert!(resolver.resolve_legs(&[spot("a", 139.7)]).await.is_empty());
        assert!(provider.calls().is_empty());
    }

    #[tokio::test]
    async fn transit_used_when_available() {
        let provider = ScriptedProvider::new(true, true);
        let resolver = LegResolver::new(&provider);

        let legs = resolver
            .resolve_legs(&[spot("a", 139.70), spot("b", 139.71)])
            .await;

        assert_eq!(legs.len(), 1);
        assert_eq!(legs[0].mode, TravelMode::Transit);
        assert_eq!(legs[0].duration_minutes, 6);
        assert_eq!(legs[0].distance_meters, 500);
        assert_eq!(legs[0].polyline.as_deref(), Some("abc"));
        assert_eq!(
            provider.calls(),
            vec![(TravelMode::Transit, Some(TransitPreference::FewerTransfers))]
        );
    }

    #[tokio::test]
    async fn walking_fallback_after_transit_failure() {
        let provider = ScriptedProvider::new(false, true);
        let resolver = LegResolver::new(&provider);

        let legs = resolver
            .resolve_legs(&[spot("a", 139.70), spot("b", 139.71)])
            .await;

        assert_eq!(legs.len(), 1);
        assert_eq!(legs[0].mode, TravelMode::Walking);
        assert_eq!(
            provider.calls(),
            vec![
                (TravelMode::Transit, Some(TransitPreference::FewerTransfers)),
                (TravelMode::Walking, None),
            ]
        );
    }

    #[tokio::test]
    async fn leg_dropped_when_both_modes_fail() {
        let provider = ScriptedProvider::new(false, false);
        let resolver = LegResolver::new(&provider);

        let stops = [spot("a", 139.70), spot("b", 139.71), spot("c", 139.72)];
        let legs = resolver.resolve_legs(&stops).await;

        assert!(legs.is_empty());
        // One transit and one walking attempt per pair, no more
        assert_eq!(provider.calls().len(), 4);
    }

    #[tokio::test]
    async fn stream_reports_failures_in_order() {
        let provider = ScriptedProvider::new(false, false);
        let resolver = LegResolver::new(&provider);

        let stops = [spot("a", 139.70), spot("b", 139.71)];
        let outcomes: Vec<_> = resolver.legs(&stops).collect().await;

        assert_eq!(outcomes.len(), 1);
        match &outcomes[0] {
            Err(LegFailure::NoRoute { from, to, .. }) => {
                assert_eq!(from.as_str(), "a");
                assert_eq!(to.as_str(), "b");
            }
            other => panic!("expected NoRoute, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn unplaceable_pair_skips_provider() {
        let provider = ScriptedProvider::new(true, true);
        let resolver = LegResolver::new(&provider);

        let nowhere = Spot::new(SpotId::parse("x").unwrap(), "x", Category::Retro);
        let stops = [spot("a", 139.70), nowhere, spot("c", 139.72)];
        let outcomes: Vec<_> = resolver.legs(&stops).collect().await;

        assert_eq!(outcomes.len(), 2);
        assert!(matches!(outcomes[0], Err(LegFailure::Unplaceable { .. })));
        assert!(matches!(outcomes[1], Err(LegFailure::Unplaceable { .. })));
        assert!(provider.calls().is_empty());
    }

    #[tokio::test]
    async fn legs_connect_consecutive_stops() {
        let provider = ScriptedProvider::new(true, true);
        let resolver = LegResolver::new(&provider).with_preference(TransitPreference::LessWalking);

        let stops = [spot("a", 139.70), spot("b", 139.71), spot("c", 139.72)];
        let legs = resolver.resolve_legs(&stops).await;

        assert_eq!(legs.len(), 2);
        assert_eq!(legs[0].from_spot_id.as_str(), "a");
        assert_eq!(legs[0].to_spot_id.as_str(), "b");
        assert_eq!(legs[1].from_spot_id.as_str(), "b");
        assert_eq!(legs[1].to_spot_id.as_str(), "c");
        assert_eq!(
            provider.calls()[0],
            (TravelMode::Transit, Some(TransitPreference::LessWalking))
        );
    }
}
