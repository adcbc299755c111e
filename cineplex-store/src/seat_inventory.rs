use cineplex_core::{CoreResult, KeyValueStore};
use cineplex_shared::{InventoryKey, SeatId};
use std::collections::BTreeSet;
use std::sync::Arc;
use tracing::{debug, error, info, warn};

/// Seats already committed for one inventory key
pub type BookedSeatSet = BTreeSet<SeatId>;

/// Durable `InventoryKey -> BookedSeatSet` mapping.
///
/// Values are JSON arrays of seat-id strings. Keys carrying an auditorium are
/// canonical; the older movie+showing key is only ever read, as a migration source.
#[derive(Clone)]
pub struct SeatInventoryStore {
    backend: Arc<dyn KeyValueStore>,
    prefix: String,
}

impl SeatInventoryStore {
    pub fn new(backend: Arc<dyn KeyValueStore>, prefix: impl Into<String>) -> Self {
        Self {
            backend,
            prefix: prefix.into(),
        }
    }

    /// Booked seats for `key`. Missing, unreadable or corrupt data yields an empty set.
    pub fn load(&self, key: &InventoryKey) -> BookedSeatSet {
        let storage_key = key.storage_key(&self.prefix);
        match self.backend.get(&storage_key) {
            Ok(Some(raw)) => decode(&raw, &storage_key),
            Ok(None) => self.migrate_legacy(key).unwrap_or_default(),
            Err(err) => {
                warn!("Failed to read {}: {}", storage_key, err);
                BookedSeatSet::new()
            }
        }
    }

    /// Adopt the set stored under the pre-auditorium key, if this key is entitled to it.
    ///
    /// Only applies when `key` has an auditorium and nothing is stored under its
    /// canonical key yet. The first auditorium to adopt a legacy set claims it
    /// through a marker key; other auditoriums at the same showtime get `None`.
    /// The adopted set is re-persisted under the canonical key. If the claim cannot
    /// be written the legacy set is still returned, unclaimed. The legacy key is
    /// never written.
    pub fn migrate_legacy(&self, key: &InventoryKey) -> Option<BookedSeatSet> {
        let auditorium = key.auditorium.as_deref()?;
        let legacy_key = key.legacy_key(&self.prefix)?;
        let storage_key = key.storage_key(&self.prefix);

        match self.backend.get(&storage_key) {
            Ok(None) => {}
            Ok(Some(_)) => return None,
            Err(err) => {
                warn!("Failed to read {}: {}", storage_key, err);
                return None;
            }
        }

        let raw = match self.backend.get(&legacy_key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return None,
            Err(err) => {
                warn!("Failed to read legacy {}: {}", legacy_key, err);
                return None;
            }
        };

        let marker_key = key.migration_marker_key(&self.prefix);
        match self.backend.get(&marker_key) {
            Ok(Some(owner)) if owner != auditorium => {
                debug!("Legacy seats for {} already adopted by {}", legacy_key, owner);
                return None;
            }
            Ok(_) => {}
            Err(err) => {
                warn!("Failed to read {}: {}", marker_key, err);
                return None;
            }
        }
        let seats = decode(&raw, &legacy_key);
        if let Err(err) = self.backend.set(&marker_key, auditorium) {
            // Unclaimed, so the canonical key stays unwritten, but the seats still count as booked
            warn!("Cannot claim legacy seats for {}: {}", key, err);
            return Some(seats);
        }

        match encode(&seats).and_then(|value| self.backend.set(&storage_key, &value).map_err(Into::into)) {
            Ok(()) => info!("Migrated {} legacy seat(s) to {}", seats.len(), storage_key),
            // Marker already names this auditorium, so the next load retries
            Err(err) => warn!("Failed to re-persist legacy seats under {}: {}", storage_key, err),
        }
        Some(seats)
    }

    /// Persist the full booked set for `key`. On error nothing may be assumed durable.
    pub fn commit(&self, key: &InventoryKey, seats: &BookedSeatSet) -> CoreResult<()> {
        let storage_key = key.storage_key(&self.prefix);
        let value = encode(seats)?;
        match self.backend.set(&storage_key, &value) {
            Ok(()) => {
                info!("Committed {} booked seat(s) for {}", seats.len(), key);
                Ok(())
            }
            Err(err) => {
                error!("Failed to commit seats for {}: {}", key, err);
                Err(err.into())
            }
        }
    }
}

fn encode(seats: &BookedSeatSet) -> CoreResult<String> {
    let labels: Vec<String> = seats.iter().map(ToString::to_string).collect();
    serde_json::to_string(&labels)
        .map_err(|e| cineplex_core::CoreError::Persistence(e.to_string()))
}

fn decode(raw: &str, storage_key: &str) -> BookedSeatSet {
    let value: serde_json::Value = match serde_json::from_str(raw) {
        Ok(value) => value,
        Err(err) => {
            warn!("Corrupt seat data under {}: {}", storage_key, err);
            return BookedSeatSet::new();
        }
    };

    let Some(entries) = value.as_array() else {
        warn!("Seat data under {} is not an array", storage_key);
        return BookedSeatSet::new();
    };

    entries
        .iter()
        .filter_map(|entry| {
            let seat = entry.as_str().and_then(|s| s.parse::<SeatId>().ok());
            if seat.is_none() {
                debug!("Skipping malformed seat {} under {}", entry, storage_key);
            }
            seat
        })
        .collect()
}
