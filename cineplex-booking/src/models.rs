use chrono::{DateTime, Utc};
use cineplex_catalog::SeatType;
use cineplex_shared::{InventoryKey, MovieId, SeatId};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Booking session lifecycle for one showing
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SessionState {
    Idle,
    Selecting,
    Confirmed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToggleOutcome {
    Selected,
    Deselected,
    /// Booked seats cannot be selected; nothing changed
    AlreadyBooked,
    /// Seat is not part of the theater layout; nothing changed
    UnknownSeat,
}

/// Confirmation handed back to the host after a successful booking
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookingRecord {
    pub booking_id: String,
    pub movie_id: MovieId,
    pub movie_title: String,
    pub showing: String,
    pub auditorium: Option<String>,
    /// Seats booked by this confirmation only, ascending
    pub seats: Vec<SeatId>,
    pub seat_count: usize,
    pub total_amount: u32,
    pub booked_at: DateTime<Utc>,
}

impl BookingRecord {
    pub fn new(
        key: &InventoryKey,
        movie_title: String,
        mut seats: Vec<SeatId>,
        total_amount: u32,
        booked_at: DateTime<Utc>,
    ) -> Self {
        seats.sort();
        Self {
            booking_id: booking_id(booked_at),
            movie_id: key.movie_id,
            movie_title,
            showing: key.showing.clone(),
            auditorium: key.auditorium.clone(),
            seat_count: seats.len(),
            seats,
            total_amount,
            booked_at,
        }
    }
}

/// `B<unix millis>-<8 hex>`: time-ordered, with a random suffix so two
/// confirmations in the same millisecond still differ.
fn booking_id(at: DateTime<Utc>) -> String {
    let suffix = Uuid::new_v4().simple().to_string();
    format!("B{}-{}", at.timestamp_millis(), &suffix[..8])
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SeatStatus {
    Available,
    Selected,
    Booked,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SeatView {
    pub seat: SeatId,
    pub seat_type: SeatType,
    pub status: SeatStatus,
    pub price: u32,
}

/// Seat grid state for one showing, as rendered by the host
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AvailabilitySnapshot {
    pub key: InventoryKey,
    pub seats: Vec<SeatView>,
    pub total_seats: usize,
    pub booked_count: usize,
    pub selected_count: usize,
    pub seats_remaining: usize,
    /// Running total of the current selection
    pub selection_total: u32,
}
