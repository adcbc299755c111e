use cineplex_core::{CoreError, CoreResult};
use cineplex_shared::MovieId;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{info, warn};

use crate::CatalogError;

/// One scheduled screening, normalized at catalog load time
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Showing {
    /// Raw ISO-8601 timestamp as published in the catalog
    pub timestamp: String,
    pub auditorium: Option<String>,
}

impl Showing {
    pub fn new(timestamp: impl Into<String>) -> Self {
        Self {
            timestamp: timestamp.into(),
            auditorium: None,
        }
    }

    pub fn in_auditorium(mut self, auditorium: impl Into<String>) -> Self {
        self.auditorium = Some(auditorium.into());
        self
    }
}

/// A movie as the booking core sees it. Read-only once loaded.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(from = "RawMovie")]
pub struct MovieCatalogEntry {
    pub id: MovieId,
    pub title: String,
    pub base_price: u32,
    pub synopsis: Option<String>,
    pub cast: Vec<String>,
    pub showings: Vec<Showing>,
}

// Catalog documents describe slots either as bare strings or as objects whose
// field names vary between data sets.
#[derive(Deserialize)]
struct RawMovie {
    id: MovieId,
    title: String,
    #[serde(alias = "basePrice", alias = "base_price")]
    price: u32,
    #[serde(default)]
    synopsis: Option<String>,
    #[serde(default)]
    cast: Vec<RawCastMember>,
    #[serde(default, alias = "showings")]
    slots: Vec<RawSlot>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawSlot {
    Text(String),
    Detailed(RawSlotObject),
    Other(serde_json::Value),
}

#[derive(Deserialize)]
struct RawSlotObject {
    time: Option<String>,
    datetime: Option<String>,
    iso: Option<String>,
    date: Option<String>,
    audi: Option<String>,
    #[serde(rename = "audiName")]
    audi_name: Option<String>,
    auditorium: Option<String>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawCastMember {
    Name(String),
    Member { name: String },
    Other(serde_json::Value),
}

impl RawSlot {
    fn into_showing(self) -> Option<Showing> {
        match self {
            RawSlot::Text(timestamp) => Some(Showing::new(timestamp)),
            RawSlot::Detailed(obj) => {
                let timestamp = obj.time.or(obj.datetime).or(obj.iso).or(obj.date)?;
                Some(Showing {
                    timestamp,
                    auditorium: obj.audi.or(obj.audi_name).or(obj.auditorium),
                })
            }
            RawSlot::Other(_) => None,
        }
    }
}

impl From<RawMovie> for MovieCatalogEntry {
    fn from(raw: RawMovie) -> Self {
        let slot_count = raw.slots.len();
        let showings: Vec<Showing> = raw.slots.into_iter().filter_map(RawSlot::into_showing).collect();
        if showings.len() < slot_count {
            warn!(
                "Movie {} has {} slot(s) without a timestamp; skipped",
                raw.id,
                slot_count - showings.len()
            );
        }

        let cast = raw
            .cast
            .into_iter()
            .filter_map(|member| match member {
                RawCastMember::Name(name) | RawCastMember::Member { name } => Some(name),
                RawCastMember::Other(_) => None,
            })
            .collect();

        Self {
            id: raw.id,
            title: raw.title,
            base_price: raw.price,
            synopsis: raw.synopsis,
            cast,
            showings,
        }
    }
}

/// The movie list supplied by the host
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    movies: Vec<MovieCatalogEntry>,
}

impl Catalog {
    pub fn new(movies: Vec<MovieCatalogEntry>) -> Self {
        Self { movies }
    }

    pub fn from_json(document: &str) -> Result<Self, CatalogError> {
        let movies: Vec<MovieCatalogEntry> = serde_json::from_str(document)?;
        Ok(Self { movies })
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, CatalogError> {
        let path = path.as_ref();
        let document = std::fs::read_to_string(path)?;
        let catalog = Self::from_json(&document)?;
        info!("Loaded {} movie(s) from {}", catalog.movies.len(), path.display());
        Ok(catalog)
    }

    pub fn movies(&self) -> &[MovieCatalogEntry] {
        &self.movies
    }

    pub fn find(&self, id: MovieId) -> CoreResult<&MovieCatalogEntry> {
        self.movies
            .iter()
            .find(|m| m.id == id)
            .ok_or_else(|| CoreError::NotFound(format!("movie {}", id)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DOCUMENT: &str = r#"[
        {
            "id": 1,
            "title": "Night Harbor",
            "price": 180,
            "synopsis": "A lighthouse keeper's last season.",
            "cast": ["Ana Ruiz", {"name": "Tom Hale", "img": "tom.jpg"}],
            "slots": [
                "2025-10-19T10:00:00",
                {"time": "2025-10-19T14:00:00", "audi": "Audi 3"},
                {"datetime": "2025-10-20T18:30:00", "audiName": "Audi 2"},
                {"iso": "2025-10-20T21:00:00Z", "auditorium": "IMAX"},
                {"audi": "Audi 9"},
                42
            ]
        },
        { "id": 2, "title": "Paper Moons", "basePrice": 220 }
    ]"#;

    #[test]
    fn test_slots_are_normalized() {
        let catalog = Catalog::from_json(DOCUMENT).unwrap();
        let movie = catalog.find(MovieId(1)).unwrap();

        assert_eq!(movie.base_price, 180);
        assert_eq!(movie.cast, vec!["Ana Ruiz".to_string(), "Tom Hale".to_string()]);
        assert_eq!(
            movie.showings,
            vec![
                Showing::new("2025-10-19T10:00:00"),
                Showing::new("2025-10-19T14:00:00").in_auditorium("Audi 3"),
                Showing::new("2025-10-20T18:30:00").in_auditorium("Audi 2"),
                Showing::new("2025-10-20T21:00:00Z").in_auditorium("IMAX"),
            ]
        );
    }

    #[test]
    fn test_optional_fields_default() {
        let catalog = Catalog::from_json(DOCUMENT).unwrap();
        let movie = catalog.find(MovieId(2)).unwrap();
        assert_eq!(movie.base_price, 220);
        assert!(movie.synopsis.is_none());
        assert!(movie.showings.is_empty());
    }

    #[test]
    fn test_unknown_movie_is_not_found() {
        let catalog = Catalog::from_json(DOCUMENT).unwrap();
        assert!(matches!(catalog.find(MovieId(99)), Err(CoreError::NotFound(_))));
    }

    #[test]
    fn test_malformed_document_is_rejected() {
        assert!(matches!(Catalog::from_json("{\"movies\": 1}"), Err(CatalogError::Json(_))));
    }
}
