//! Greedy nearest-neighbor sequencing.
//!
//! Orders a set of spots into a visiting sequence starting from a chosen
//! spot, always moving to the closest unvisited spot next.

use crate::domain::{Coord, Spot, SpotId, distance_meters};

/// Error from route planning.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RouteError {
    /// The chosen start is not among the candidate spots
    #[error("start spot {0} is not among the selected spots")]
    InvalidStart(SpotId),
}

/// Result of sequencing.
///
/// `stops` is the visiting order beginning with the start spot. When the
/// walk runs out of spots it can place, the remaining spots are returned
/// in `unplaced` (input order) rather than being appended to `stops`.
#[derive(Debug, Clone, PartialEq)]
pub struct Sequence {
    pub stops: Vec<Spot>,
    pub unplaced: Vec<Spot>,
}

impl Sequence {
    /// True if every input spot was placed.
    pub fn is_complete(&self) -> bool {
        self.unplaced.is_empty()
    }
}

/// Order `spots` by greedy nearest-neighbor, starting at `start`.
///
/// - If the current spot has no decodable location, the first unvisited
///   spot in input order is taken next.
/// - Otherwise the nearest unvisited spot with a decodable location is
///   taken. Ties go to the earliest in input order.
/// - If the current spot is placeable but no unvisited spot is, the walk
///   stops and the rest are reported as unplaced.
///
/// O(n²) in the number of spots. Deterministic.
///
/// # Errors
///
/// Returns [`RouteError::InvalidStart`] if `start` is not in `spots`.
pub fn sequence(spots: &[Spot], start: &SpotId) -> Result<Sequence, RouteError> {
    let start_idx = spots
        .iter()
        .position(|s| &s.spot_id == start)
        .ok_or_else(|| RouteError::InvalidStart(start.clone()))?;

    // Decode once up front; the codec is the only parser.
    let coords: Vec<Option<Coord>> = spots.iter().map(Spot::coord).collect();

    let mut unvisited: Vec<usize> = (0..spots.len()).filter(|&i| i != start_idx).collect();
    let mut order = Vec::with_capacity(spots.len());
    order.push(start_idx);
    let mut current = start_idx;

    while !unvisited.is_empty() {
        let pick = match coords[current] {
            None => Some(0),
            Some(here) => nearest(here, &unvisited, &coords),
        };

        let Some(pos) = pick else {
            tracing::debug!(
                from = %spots[current].spot_id,
                remaining = unvisited.len(),
                "no placeable spots left, stopping sequence early"
            );
            break;
        };

        current = unvisited.remove(pos);
        order.push(current);
    }

    Ok(Sequence {
        stops: order.into_iter().map(|i| spots[i].clone()).collect(),
        unplaced: unvisited.into_iter().map(|i| spots[i].clone()).collect(),
    })
}

/// Position in `unvisited` of the closest placeable spot to `here`.
fn nearest(here: Coord, unvisited: &[usize], coords: &[Option<Coord>]) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;

    for (pos, &idx) in unvisited.iter().enumerate() {
        let Some(there) = coords[idx] else {
            continue;
        };

        let d = distance_meters(here, there);
        match best {
            Some((_, best_d)) if d >= best_d => {}
            _ => best = Some((pos, d)),
        }
    }

    best.map(|(pos, _)| pos)
}
