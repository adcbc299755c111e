use chrono_tz::Tz;
use tracing::debug;

use crate::movie::Showing;
use crate::schedule::parse_showtime;

pub const DEFAULT_AUDITORIUM: &str = "Audi 1";

/// Finds the auditorium a chosen showtime plays in
#[derive(Debug, Clone)]
pub struct AudiResolver {
    tz: Tz,
    default_label: String,
}

impl AudiResolver {
    pub fn new(tz: Tz, default_label: impl Into<String>) -> Self {
        Self {
            tz,
            default_label: default_label.into(),
        }
    }

    pub fn default_label(&self) -> &str {
        &self.default_label
    }

    /// Exact instant match against the movie's showings. Showings without a label
    /// play in the default auditorium. `None` when the target is unparseable or
    /// matches nothing.
    pub fn resolve(&self, showings: &[Showing], target: &str) -> Option<String> {
        let target_instant = match parse_showtime(target, self.tz) {
            Ok(instant) => instant,
            Err(err) => {
                debug!("Cannot resolve auditorium for {:?}: {}", target, err);
                return None;
            }
        };

        showings
            .iter()
            .find(|showing| {
                parse_showtime(&showing.timestamp, self.tz)
                    .map(|instant| instant == target_instant)
                    .unwrap_or(false)
            })
            .map(|showing| {
                showing
                    .auditorium
                    .clone()
                    .unwrap_or_else(|| self.default_label.clone())
            })
    }
}

impl Default for AudiResolver {
    fn default() -> Self {
        Self::new(chrono_tz::Asia::Kolkata, DEFAULT_AUDITORIUM)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn showings() -> Vec<Showing> {
        vec![
            Showing::new("2025-10-19T10:00:00"),
            Showing::new("2025-10-19T14:00:00").in_auditorium("Audi 3"),
        ]
    }

    #[test]
    fn test_explicit_label() {
        let resolver = AudiResolver::default();
        assert_eq!(resolver.resolve(&showings(), "2025-10-19T14:00:00").as_deref(), Some("Audi 3"));
    }

    #[test]
    fn test_default_label_when_unlabelled() {
        let resolver = AudiResolver::default();
        assert_eq!(resolver.resolve(&showings(), "2025-10-19T10:00:00").as_deref(), Some("Audi 1"));
    }

    #[test]
    fn test_matches_on_instant_not_text() {
        let resolver = AudiResolver::default();
        // Same instant as 14:00 in Kolkata
        assert_eq!(resolver.resolve(&showings(), "2025-10-19T08:30:00Z").as_deref(), Some("Audi 3"));
    }

    #[test]
    fn test_unresolved() {
        let resolver = AudiResolver::default();
        assert_eq!(resolver.resolve(&showings(), "2025-10-19T14:01:00"), None);
        assert_eq!(resolver.resolve(&showings(), "garbage"), None);
        assert_eq!(resolver.resolve(&[], "2025-10-19T14:00:00"), None);
    }
}
