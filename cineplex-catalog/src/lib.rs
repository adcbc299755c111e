pub mod movie;
pub mod layout;
pub mod pricing;
pub mod schedule;
pub mod audi;

pub use movie::{Catalog, MovieCatalogEntry, Showing};
pub use layout::{RowDefinition, SeatMap, SeatType};
pub use pricing::{PricingConfig, PricingEngine};
pub use schedule::{parse_showtime, ShowtimeDay, ShowtimeSlot, TimeZoneSlotGrouper};
pub use audi::{AudiResolver, DEFAULT_AUDITORIUM};

#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("Unknown time zone: {0}")]
    InvalidTimeZone(String),

    #[error("Invalid theater layout: {0}")]
    InvalidLayout(String),

    #[error("Catalog file could not be read: {0}")]
    Io(#[from] std::io::Error),

    #[error("Catalog document is malformed: {0}")]
    Json(#[from] serde_json::Error),
}
