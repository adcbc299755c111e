pub mod models;

pub use models::ids::{MovieId, SeatId, SeatIdError};
pub use models::key::InventoryKey;
pub use models::notifications::{Navigation, Notification};
