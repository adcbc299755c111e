use serde::{Deserialize, Serialize};

use super::ids::MovieId;

/// User-visible message the host should display
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "message", rename_all = "snake_case")]
pub enum Notification {
    Error(String),
    Success(String),
}

impl Notification {
    pub fn error(message: impl Into<String>) -> Self {
        Self::Error(message.into())
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self::Success(message.into())
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Self::Error(_))
    }

    pub fn message(&self) -> &str {
        match self {
            Self::Error(msg) | Self::Success(msg) => msg,
        }
    }
}

/// Fallback route the host should take. The core never navigates by itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "route", content = "movie_id", rename_all = "snake_case")]
pub enum Navigation {
    MovieDetail(MovieId),
    Catalog,
}
