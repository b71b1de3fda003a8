//! Outcome counters for one load

use serde::{Deserialize, Serialize};

/// Statistics collected while loading one batch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct LoadStats {
    /// Riders seen for the first time
    pub riders_created: usize,
    /// Existing riders whose nationality changed
    pub riders_updated: usize,
    pub seasons_created: usize,
    pub races_created: usize,
    pub results_created: usize,
    /// Existing results whose position or points changed
    pub results_updated: usize,
    /// Invalid records left out under [`crate::ValidationPolicy::SkipRecord`]
    pub records_skipped: usize,
}

impl LoadStats {
    pub fn new() -> Self {
        Self::default()
    }

    /// Total number of entities created
    pub fn created(&self) -> usize {
        self.riders_created + self.seasons_created + self.races_created + self.results_created
    }

    /// Total number of entities updated in place
    pub fn updated(&self) -> usize {
        self.riders_updated + self.results_updated
    }

    /// Whether the load left the store unchanged
    pub fn is_noop(&self) -> bool {
        self.created() == 0 && self.updated() == 0
    }
}

impl std::fmt::Display for LoadStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "riders {} created / {} updated, seasons {} created, races {} created, \
             results {} created / {} updated",
            self.riders_created,
            self.riders_updated,
            self.seasons_created,
            self.races_created,
            self.results_created,
            self.results_updated
        )?;
        if self.records_skipped > 0 {
            write!(f, ", {} records skipped", self.records_skipped)?;
        }
        Ok(())
    }
}
