//! Spot catalog error types.

use std::path::PathBuf;

use crate::domain::SpotId;

/// Errors that can occur when loading or querying the spot catalog.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    /// Seed file could not be read
    #[error("failed to read {path}: {message}")]
    Io { path: PathBuf, message: String },

    /// Seed file is not a valid spot list
    #[error("JSON parse error: {message}")]
    Json { message: String },

    /// A record parsed but is not acceptable
    #[error("invalid spot {spot_id}: {message}")]
    Invalid { spot_id: SpotId, message: String },

    /// Requested spots are missing or not published
    #[error("unknown spots: {}", join_ids(.0))]
    UnknownSpots(Vec<SpotId>),
}

fn join_ids(ids: &[SpotId]) -> String {
    ids.iter()
        .map(SpotId::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_spots_lists_ids() {
        let err = CatalogError::UnknownSpots(vec![
            SpotId::parse("7").unwrap(),
            SpotId::parse("9").unwrap(),
        ]);
        assert_eq!(err.to_string(), "unknown spots: 7, 9");
    }
}
