use chrono::Utc;
use cineplex_catalog::{PricingEngine, SeatMap};
use cineplex_core::{CoreError, CoreResult};
use cineplex_shared::{InventoryKey, SeatId};
use cineplex_store::{BookedSeatSet, SeatInventoryStore};
use std::collections::BTreeSet;
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::models::{AvailabilitySnapshot, BookingRecord, SeatStatus, SeatView, SessionState, ToggleOutcome};

/// What a session is booking: the inventory key plus the movie facts pricing
/// and records need.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShowingContext {
    pub key: InventoryKey,
    pub movie_title: String,
    pub base_price: u32,
}

/// Seat selection for one showing, from first click to confirmation.
///
/// The selection is never persisted; only `confirm` writes, and only the union of
/// booked and selected seats.
pub struct BookingSession {
    context: ShowingContext,
    booked: BookedSeatSet,
    selected: BTreeSet<SeatId>,
    state: SessionState,
    inventory: SeatInventoryStore,
    layout: Arc<SeatMap>,
    pricing: Arc<PricingEngine>,
}

impl BookingSession {
    pub fn open(
        context: ShowingContext,
        inventory: SeatInventoryStore,
        layout: Arc<SeatMap>,
        pricing: Arc<PricingEngine>,
    ) -> Self {
        let booked = inventory.load(&context.key);
        debug!("Opened session for {} with {} booked seat(s)", context.key, booked.len());
        Self {
            context,
            booked,
            selected: BTreeSet::new(),
            state: SessionState::Idle,
            inventory,
            layout,
            pricing,
        }
    }

    pub fn context(&self) -> &ShowingContext {
        &self.context
    }

    pub fn key(&self) -> &InventoryKey {
        &self.context.key
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn booked(&self) -> &BookedSeatSet {
        &self.booked
    }

    pub fn selected(&self) -> &BTreeSet<SeatId> {
        &self.selected
    }

    /// Running total of the current selection
    pub fn total(&self) -> u32 {
        self.pricing.total(&self.selected, self.context.base_price)
    }

    pub fn seats_remaining(&self) -> usize {
        self.layout
            .seat_ids()
            .iter()
            .filter(|seat| !self.booked.contains(*seat))
            .count()
    }

    pub fn toggle_seat(&mut self, seat: &SeatId) -> ToggleOutcome {
        if self.booked.contains(seat) {
            debug!("Seat {} is already booked for {}", seat, self.context.key);
            return ToggleOutcome::AlreadyBooked;
        }
        if !self.layout.contains(seat) {
            warn!("Seat {} is not part of the layout", seat);
            return ToggleOutcome::UnknownSeat;
        }

        let outcome = if self.selected.remove(seat) {
            ToggleOutcome::Deselected
        } else {
            self.selected.insert(*seat);
            ToggleOutcome::Selected
        };
        self.sync_state();
        outcome
    }

    pub fn clear(&mut self) {
        self.selected.clear();
        self.transition(SessionState::Idle);
    }

    /// Book the selected seats.
    ///
    /// Nothing changes unless the store accepts the write: an empty selection or a
    /// persistence failure leaves booked seats, selection and state as they were.
    pub fn confirm(&mut self) -> CoreResult<BookingRecord> {
        if self.selected.is_empty() {
            return Err(CoreError::EmptySelection);
        }

        let total_amount = self.total();
        let mut updated = self.booked.clone();
        updated.extend(self.selected.iter().copied());

        self.inventory.commit(&self.context.key, &updated)?;

        self.transition(SessionState::Confirmed);
        let record = BookingRecord::new(
            &self.context.key,
            self.context.movie_title.clone(),
            self.selected.iter().copied().collect(),
            total_amount,
            Utc::now(),
        );
        self.booked = updated;
        self.selected.clear();
        self.transition(SessionState::Idle);

        info!(
            "Booking {} confirmed: {} seat(s) for {}, total {}",
            record.booking_id, record.seat_count, self.context.key, record.total_amount
        );
        Ok(record)
    }

    /// Move to another showing. A different key starts over with freshly loaded
    /// inventory and no selection; the same key keeps the session as is.
    pub fn switch_showing(&mut self, context: ShowingContext) {
        if context.key == self.context.key {
            return;
        }
        if !self.selected.is_empty() {
            debug!("Discarding {} unconfirmed seat(s) for {}", self.selected.len(), self.context.key);
        }
        self.booked = self.inventory.load(&context.key);
        self.selected.clear();
        self.context = context;
        self.state = SessionState::Idle;
    }

    pub fn snapshot(&self) -> AvailabilitySnapshot {
        let base_price = self.context.base_price;
        let seats: Vec<SeatView> = self
            .layout
            .rows()
            .iter()
            .flat_map(|row| {
                (1..=row.capacity).filter_map(move |n| SeatId::new(row.id, n).ok().map(|seat| (row.seat_type, seat)))
            })
            .map(|(seat_type, seat)| SeatView {
                status: if self.booked.contains(&seat) {
                    SeatStatus::Booked
                } else if self.selected.contains(&seat) {
                    SeatStatus::Selected
                } else {
                    SeatStatus::Available
                },
                price: self.pricing.price(&seat, base_price),
                seat,
                seat_type,
            })
            .collect();

        let booked_count = seats.iter().filter(|s| s.status == SeatStatus::Booked).count();
        AvailabilitySnapshot {
            key: self.context.key.clone(),
            total_seats: seats.len(),
            booked_count,
            selected_count: self.selected.len(),
            seats_remaining: seats.len() - booked_count,
            selection_total: self.total(),
            seats,
        }
    }

    fn sync_state(&mut self) {
        let next = if self.selected.is_empty() {
            SessionState::Idle
        } else {
            SessionState::Selecting
        };
        self.transition(next);
    }

    fn transition(&mut self, next: SessionState) {
        if self.state != next {
            debug!("Session {}: {:?} -> {:?}", self.context.key, self.state, next);
            self.state = next;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cineplex_catalog::PricingConfig;
    use cineplex_core::KeyValueStore;
    use cineplex_shared::MovieId;
    use cineplex_store::MemoryStore;
    use proptest::prelude::*;

    const SHOWING: &str = "2025-10-19T18:30:00";

    fn seat(s: &str) -> SeatId {
        s.parse().unwrap()
    }

    fn seats(ids: &[&str]) -> BTreeSet<SeatId> {
        ids.iter().map(|s| seat(s)).collect()
    }

    fn context(showing: &str) -> ShowingContext {
        ShowingContext {
            key: InventoryKey::new(MovieId(1), showing).with_auditorium("Audi 1"),
            movie_title: "Night Harbor".to_string(),
            base_price: 200,
        }
    }

    fn open_over(backend: Arc<dyn KeyValueStore>, showing: &str) -> BookingSession {
        let layout = Arc::new(SeatMap::default());
        let pricing = Arc::new(PricingEngine::new(PricingConfig::default(), layout.clone()));
        BookingSession::open(context(showing), SeatInventoryStore::new(backend, "bookings"), layout, pricing)
    }

    fn with_booked(ids: &[&str]) -> (Arc<MemoryStore>, BookingSession) {
        let backend = Arc::new(MemoryStore::new());
        let store = SeatInventoryStore::new(backend.clone(), "bookings");
        store.commit(&context(SHOWING).key, &seats(ids)).unwrap();
        let session = open_over(backend.clone(), SHOWING);
        (backend, session)
    }

    #[test]
    fn test_selection_lifecycle() {
        let (_, mut session) = with_booked(&[]);
        assert_eq!(session.state(), SessionState::Idle);

        assert_eq!(session.toggle_seat(&seat("A1")), ToggleOutcome::Selected);
        assert_eq!(session.toggle_seat(&seat("D1")), ToggleOutcome::Selected);
        assert_eq!(session.state(), SessionState::Selecting);
        assert_eq!(session.total(), 500);

        assert_eq!(session.toggle_seat(&seat("A1")), ToggleOutcome::Deselected);
        assert_eq!(session.selected(), &seats(&["D1"]));

        session.clear();
        assert!(session.selected().is_empty());
        assert_eq!(session.state(), SessionState::Idle);
    }

    #[test]
    fn test_booked_seat_toggle_is_noop() {
        let (_, mut session) = with_booked(&["B2"]);
        assert_eq!(session.toggle_seat(&seat("B2")), ToggleOutcome::AlreadyBooked);
        assert!(session.selected().is_empty());
        assert_eq!(session.state(), SessionState::Idle);
    }

    #[test]
    fn test_unknown_seat_toggle_is_noop() {
        let (_, mut session) = with_booked(&[]);
        assert_eq!(session.toggle_seat(&seat("Z9")), ToggleOutcome::UnknownSeat);
        assert!(session.selected().is_empty());
    }

    #[test]
    fn test_confirm_empty_selection() {
        let (_, mut session) = with_booked(&["B2"]);
        assert_eq!(session.confirm().unwrap_err(), CoreError::EmptySelection);
        assert_eq!(session.booked(), &seats(&["B2"]));
        assert!(session.selected().is_empty());
        assert_eq!(session.state(), SessionState::Idle);
    }

    #[test]
    fn test_confirm_merges_and_persists() {
        let (backend, mut session) = with_booked(&["B2"]);
        session.toggle_seat(&seat("A1"));
        session.toggle_seat(&seat("D1"));

        let record = session.confirm().unwrap();
        assert_eq!(record.seats, vec![seat("A1"), seat("D1")]);
        assert_eq!(record.seat_count, 2);
        assert_eq!(record.total_amount, 500);
        assert_eq!(record.movie_title, "Night Harbor");

        assert!(session.selected().is_empty());
        assert_eq!(session.state(), SessionState::Idle);
        assert_eq!(session.booked(), &seats(&["A1", "B2", "D1"]));

        let reloaded = SeatInventoryStore::new(backend, "bookings").load(session.key());
        assert_eq!(&reloaded, session.booked());
    }

    #[test]
    fn test_confirm_persistence_failure_keeps_selection() {
        // Too small for any commit
        let backend: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::with_quota(8));
        let mut session = open_over(backend.clone(), SHOWING);
        session.toggle_seat(&seat("C4"));

        assert!(matches!(session.confirm(), Err(CoreError::Persistence(_))));
        assert_eq!(session.selected(), &seats(&["C4"]));
        assert!(session.booked().is_empty());
        assert_eq!(session.state(), SessionState::Selecting);
        assert!(SeatInventoryStore::new(backend, "bookings").load(session.key()).is_empty());
    }

    #[test]
    fn test_switch_showing_resets() {
        let (backend, mut session) = with_booked(&["A1"]);
        session.toggle_seat(&seat("A2"));

        session.switch_showing(context(SHOWING));
        assert_eq!(session.selected(), &seats(&["A2"]));

        let other = SeatInventoryStore::new(backend, "bookings");
        other.commit(&context("2025-10-19T21:00:00").key, &seats(&["E8"])).unwrap();

        session.switch_showing(context("2025-10-19T21:00:00"));
        assert!(session.selected().is_empty());
        assert_eq!(session.booked(), &seats(&["E8"]));
        assert_eq!(session.state(), SessionState::Idle);
    }

    #[test]
    fn test_snapshot() {
        let (_, mut session) = with_booked(&["A1", "E8"]);
        session.toggle_seat(&seat("D4"));

        let snapshot = session.snapshot();
        assert_eq!(snapshot.total_seats, 40);
        assert_eq!(snapshot.booked_count, 2);
        assert_eq!(snapshot.selected_count, 1);
        assert_eq!(snapshot.seats_remaining, 38);
        assert_eq!(session.seats_remaining(), 38);
        assert_eq!(snapshot.selection_total, 300);

        let d4 = snapshot.seats.iter().find(|v| v.seat == seat("D4")).unwrap();
        assert_eq!(d4.status, SeatStatus::Selected);
        assert_eq!(d4.price, 300);
        let a1 = snapshot.seats.iter().find(|v| v.seat == seat("A1")).unwrap();
        assert_eq!(a1.status, SeatStatus::Booked);
    }

    proptest! {
        #[test]
        fn prop_booked_seats_never_selected(toggles in prop::collection::vec(0usize..40, 0..60)) {
            let (_, mut session) = with_booked(&["A1", "C5", "E8"]);
            let all = SeatMap::default().seat_ids();

            for index in toggles {
                let target = all[index];
                let was_booked = session.booked().contains(&target);
                let outcome = session.toggle_seat(&target);
                if was_booked {
                    prop_assert_eq!(outcome, ToggleOutcome::AlreadyBooked);
                }
                prop_assert!(session.selected().is_disjoint(session.booked()));
            }
        }
    }
}
