pub mod ids;
pub mod key;
pub mod notifications;
