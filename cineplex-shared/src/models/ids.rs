use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Catalog identifier of a movie
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MovieId(pub u32);

impl fmt::Display for MovieId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u32> for MovieId {
    fn from(id: u32) -> Self {
        Self(id)
    }
}

impl FromStr for MovieId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().parse().map(Self)
    }
}

/// Seat identity within a showing: row letter followed by a 1-based seat number (`D7`).
///
/// Ordering is row first, then numeric seat number, so `A2` sorts before `A10`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct SeatId {
    row: char,
    number: u16,
}

impl SeatId {
    pub fn new(row: char, number: u16) -> Result<Self, SeatIdError> {
        if !row.is_ascii_uppercase() {
            return Err(SeatIdError::InvalidRow(row.to_string()));
        }
        if number == 0 {
            return Err(SeatIdError::InvalidNumber(number.to_string()));
        }
        Ok(Self { row, number })
    }

    pub fn row(&self) -> char {
        self.row
    }

    pub fn number(&self) -> u16 {
        self.number
    }
}

impl fmt::Display for SeatId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.row, self.number)
    }
}

impl FromStr for SeatId {
    type Err = SeatIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut chars = s.chars();
        let row = chars.next().ok_or(SeatIdError::Empty)?;
        let digits = chars.as_str();
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return Err(SeatIdError::InvalidNumber(digits.to_string()));
        }
        let number = digits
            .parse::<u16>()
            .map_err(|_| SeatIdError::InvalidNumber(digits.to_string()))?;
        Self::new(row, number)
    }
}

impl TryFrom<String> for SeatId {
    type Error = SeatIdError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<SeatId> for String {
    fn from(seat: SeatId) -> Self {
        seat.to_string()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SeatIdError {
    #[error("Seat id is empty")]
    Empty,

    #[error("Invalid seat row: {0}")]
    InvalidRow(String),

    #[error("Invalid seat number: {0}")]
    InvalidNumber(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seat_id_parse_and_display() {
        let seat: SeatId = "D7".parse().unwrap();
        assert_eq!(seat.row(), 'D');
        assert_eq!(seat.number(), 7);
        assert_eq!(seat.to_string(), "D7");
    }

    #[test]
    fn test_seat_id_rejects_malformed() {
        assert_eq!("".parse::<SeatId>(), Err(SeatIdError::Empty));
        assert!("a1".parse::<SeatId>().is_err());
        assert!("A".parse::<SeatId>().is_err());
        assert!("A0".parse::<SeatId>().is_err());
        assert!("A-1".parse::<SeatId>().is_err());
        assert!("AB1".parse::<SeatId>().is_err());
    }

    #[test]
    fn test_seat_id_orders_numerically_within_row() {
        let mut seats: Vec<SeatId> = ["B1", "A10", "A2"].iter().map(|s| s.parse().unwrap()).collect();
        seats.sort();
        let labels: Vec<String> = seats.iter().map(ToString::to_string).collect();
        assert_eq!(labels, vec!["A2", "A10", "B1"]);
    }

    #[test]
    fn test_seat_id_serializes_as_string() {
        let seat: SeatId = "E8".parse().unwrap();
        assert_eq!(serde_json::to_string(&seat).unwrap(), "\"E8\"");
        let back: SeatId = serde_json::from_str("\"E8\"").unwrap();
        assert_eq!(back, seat);
        assert!(serde_json::from_str::<SeatId>("\"8E\"").is_err());
    }
}
