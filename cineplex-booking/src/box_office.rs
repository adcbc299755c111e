use cineplex_catalog::{
    parse_showtime, AudiResolver, Catalog, PricingEngine, SeatMap, SeatType, ShowtimeDay, TimeZoneSlotGrouper,
};
use cineplex_core::CoreError;
use cineplex_shared::{InventoryKey, MovieId, Navigation, Notification, SeatId};
use cineplex_store::SeatInventoryStore;
use std::sync::Arc;
use tracing::{info, warn};

use crate::models::{AvailabilitySnapshot, BookingRecord, ToggleOutcome};
use crate::session::{BookingSession, ShowingContext};

const MOVIE_NOT_FOUND: &str = "Movie not found.";
const INVALID_SHOWTIME: &str = "Invalid or missing showtime. Please select a time from the movie page.";
const EMPTY_SELECTION: &str = "Select at least one seat.";
const CONFIRM_FAILED: &str = "Failed to confirm booking. Try again.";

/// A request the core refused, with what to tell the user and where to send them
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rejection {
    pub error: CoreError,
    pub notification: Notification,
    pub navigation: Navigation,
}

#[derive(Debug, Clone)]
pub struct ConfirmOutcome {
    pub notification: Notification,
    pub record: Option<BookingRecord>,
}

/// Host-facing boundary of the booking core.
///
/// Takes what the surrounding UI knows (a movie id, a raw slot, seat clicks) and
/// answers with sessions, notifications and navigation intents. It never navigates.
pub struct BoxOffice {
    catalog: Arc<Catalog>,
    inventory: SeatInventoryStore,
    layout: Arc<SeatMap>,
    pricing: Arc<PricingEngine>,
    grouper: TimeZoneSlotGrouper,
    resolver: AudiResolver,
}

impl BoxOffice {
    pub fn new(
        catalog: Arc<Catalog>,
        inventory: SeatInventoryStore,
        layout: Arc<SeatMap>,
        pricing: Arc<PricingEngine>,
        grouper: TimeZoneSlotGrouper,
        resolver: AudiResolver,
    ) -> Self {
        Self {
            catalog,
            inventory,
            layout,
            pricing,
            grouper,
            resolver,
        }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn showtimes(&self, movie_id: MovieId) -> Result<Vec<ShowtimeDay>, Rejection> {
        let movie = self.catalog.find(movie_id).map_err(movie_not_found)?;
        Ok(self.grouper.group(&movie.showings))
    }

    /// Unit price per seat tier for a movie
    pub fn tier_prices(&self, movie_id: MovieId) -> Result<Vec<(SeatType, u32)>, Rejection> {
        let movie = self.catalog.find(movie_id).map_err(movie_not_found)?;
        Ok(self.pricing.tier_prices(movie.base_price))
    }

    pub fn open_session(&self, movie_id: MovieId, raw_slot: &str) -> Result<BookingSession, Rejection> {
        let context = self.resolve_context(movie_id, raw_slot)?;
        Ok(BookingSession::open(
            context,
            self.inventory.clone(),
            self.layout.clone(),
            self.pricing.clone(),
        ))
    }

    /// Point an open session at another showtime of any movie
    pub fn switch_showing(
        &self,
        session: &mut BookingSession,
        movie_id: MovieId,
        raw_slot: &str,
    ) -> Result<(), Rejection> {
        let context = self.resolve_context(movie_id, raw_slot)?;
        session.switch_showing(context);
        Ok(())
    }

    pub fn toggle_seat(&self, session: &mut BookingSession, seat: &SeatId) -> Option<Notification> {
        match session.toggle_seat(seat) {
            ToggleOutcome::AlreadyBooked => Some(Notification::error(format!("Seat {} already booked", seat))),
            ToggleOutcome::Selected | ToggleOutcome::Deselected | ToggleOutcome::UnknownSeat => None,
        }
    }

    pub fn confirm(&self, session: &mut BookingSession) -> ConfirmOutcome {
        match session.confirm() {
            Ok(record) => {
                info!(
                    "Booking {} for {:?} ({}): seats {:?}, total {}",
                    record.booking_id,
                    record.movie_title,
                    record.showing,
                    record.seats.iter().map(ToString::to_string).collect::<Vec<_>>(),
                    record.total_amount
                );
                ConfirmOutcome {
                    notification: Notification::success(format!(
                        "Booking confirmed! {} seat(s) booked successfully",
                        record.seat_count
                    )),
                    record: Some(record),
                }
            }
            Err(CoreError::EmptySelection) => ConfirmOutcome {
                notification: Notification::error(EMPTY_SELECTION),
                record: None,
            },
            Err(err) => {
                warn!("Booking for {} not confirmed: {}", session.key(), err);
                ConfirmOutcome {
                    notification: Notification::error(CONFIRM_FAILED),
                    record: None,
                }
            }
        }
    }

    /// Seat grid for a showing without starting a selection
    pub fn availability(&self, movie_id: MovieId, raw_slot: &str) -> Result<AvailabilitySnapshot, Rejection> {
        self.open_session(movie_id, raw_slot).map(|session| session.snapshot())
    }

    fn resolve_context(&self, movie_id: MovieId, raw_slot: &str) -> Result<ShowingContext, Rejection> {
        let movie = self.catalog.find(movie_id).map_err(movie_not_found)?;

        if let Err(err) = parse_showtime(raw_slot, self.grouper.timezone()) {
            warn!("Rejected showtime {:?} for movie {}: {}", raw_slot, movie_id, err);
            return Err(Rejection {
                error: err,
                notification: Notification::error(INVALID_SHOWTIME),
                navigation: Navigation::MovieDetail(movie_id),
            });
        }

        let auditorium = self
            .resolver
            .resolve(&movie.showings, raw_slot)
            .unwrap_or_else(|| self.resolver.default_label().to_string());

        Ok(ShowingContext {
            key: InventoryKey::new(movie_id, raw_slot).with_auditorium(auditorium),
            movie_title: movie.title.clone(),
            base_price: movie.base_price,
        })
    }
}

fn movie_not_found(err: CoreError) -> Rejection {
    warn!("{}", err);
    Rejection {
        error: err,
        notification: Notification::error(MOVIE_NOT_FOUND),
        navigation: Navigation::Catalog,
    }
}
