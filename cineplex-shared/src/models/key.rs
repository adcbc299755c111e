use serde::{Deserialize, Serialize};
use std::fmt;

use super::ids::MovieId;

/// Identifies one independent pool of booked seats: a movie, a showing and
/// (when known) the auditorium it plays in.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct InventoryKey {
    pub movie_id: MovieId,
    /// Raw showing timestamp exactly as the host supplied it
    pub showing: String,
    pub auditorium: Option<String>,
}

impl InventoryKey {
    pub fn new(movie_id: MovieId, showing: impl Into<String>) -> Self {
        Self {
            movie_id,
            showing: showing.into(),
            auditorium: None,
        }
    }

    pub fn with_auditorium(mut self, auditorium: impl Into<String>) -> Self {
        self.auditorium = Some(auditorium.into());
        self
    }

    /// Key the booked set is read from and written to.
    pub fn storage_key(&self, prefix: &str) -> String {
        match &self.auditorium {
            Some(audi) => format!("{}_{}_{}_{}", prefix, self.movie_id, self.showing, audi),
            None => self.two_part_key(prefix),
        }
    }

    /// Pre-auditorium key. Only meaningful when the key carries an auditorium,
    /// otherwise it is the storage key itself.
    pub fn legacy_key(&self, prefix: &str) -> Option<String> {
        self.auditorium.as_ref().map(|_| self.two_part_key(prefix))
    }

    /// Records which auditorium adopted the legacy set for this showing.
    pub fn migration_marker_key(&self, prefix: &str) -> String {
        format!("{}_migrated_{}_{}", prefix, self.movie_id, self.showing)
    }

    fn two_part_key(&self, prefix: &str) -> String {
        format!("{}_{}_{}", prefix, self.movie_id, self.showing)
    }
}

impl fmt::Display for InventoryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.auditorium {
            Some(audi) => write!(f, "movie {} @ {} ({})", self.movie_id, self.showing, audi),
            None => write!(f, "movie {} @ {}", self.movie_id, self.showing),
        }
    }
}
