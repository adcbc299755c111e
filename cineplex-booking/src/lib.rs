pub mod models;
pub mod session;
pub mod box_office;

pub use models::{AvailabilitySnapshot, BookingRecord, SeatStatus, SeatView, SessionState, ToggleOutcome};
pub use session::{BookingSession, ShowingContext};
pub use box_office::{BoxOffice, ConfirmOutcome, Rejection};
