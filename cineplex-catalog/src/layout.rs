use cineplex_shared::SeatId;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

use crate::CatalogError;

/// Seat tiers. They differ only in price.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SeatType {
    Standard,
    Recliner,
}

impl fmt::Display for SeatType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SeatType::Standard => write!(f, "standard"),
            SeatType::Recliner => write!(f, "recliner"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RowDefinition {
    pub id: char,
    pub seat_type: SeatType,
    pub capacity: u16,
}

impl RowDefinition {
    pub const fn new(id: char, seat_type: SeatType, capacity: u16) -> Self {
        Self { id, seat_type, capacity }
    }
}

const DEFAULT_ROWS: [RowDefinition; 5] = [
    RowDefinition::new('A', SeatType::Standard, 8),
    RowDefinition::new('B', SeatType::Standard, 8),
    RowDefinition::new('C', SeatType::Standard, 8),
    RowDefinition::new('D', SeatType::Recliner, 8),
    RowDefinition::new('E', SeatType::Recliner, 8),
];

/// Theater layout shared by every showing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeatMap {
    rows: Vec<RowDefinition>,
}

impl SeatMap {
    pub fn new(rows: Vec<RowDefinition>) -> Result<Self, CatalogError> {
        if rows.is_empty() {
            return Err(CatalogError::InvalidLayout("layout has no rows".to_string()));
        }

        let mut seen = HashSet::new();
        for row in &rows {
            if !row.id.is_ascii_uppercase() {
                return Err(CatalogError::InvalidLayout(format!("row id {:?} is not a letter A-Z", row.id)));
            }
            if row.capacity == 0 {
                return Err(CatalogError::InvalidLayout(format!("row {} has no seats", row.id)));
            }
            if !seen.insert(row.id) {
                return Err(CatalogError::InvalidLayout(format!("row {} is defined twice", row.id)));
            }
        }

        Ok(Self { rows })
    }

    pub fn rows(&self) -> &[RowDefinition] {
        &self.rows
    }

    /// All seats in row-major order
    pub fn seat_ids(&self) -> Vec<SeatId> {
        self.rows
            .iter()
            .flat_map(|row| (1..=row.capacity).filter_map(move |n| SeatId::new(row.id, n).ok()))
            .collect()
    }

    pub fn row_of(&self, seat: &SeatId) -> Option<&RowDefinition> {
        self.rows
            .iter()
            .find(|row| row.id == seat.row() && seat.number() <= row.capacity)
    }

    pub fn type_of(&self, seat: &SeatId) -> Option<SeatType> {
        self.row_of(seat).map(|row| row.seat_type)
    }

    pub fn contains(&self, seat: &SeatId) -> bool {
        self.row_of(seat).is_some()
    }

    pub fn capacity(&self) -> usize {
        self.rows.iter().map(|row| row.capacity as usize).sum()
    }
}

impl Default for SeatMap {
    fn default() -> Self {
        Self {
            rows: DEFAULT_ROWS.to_vec(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seat(s: &str) -> SeatId {
        s.parse().unwrap()
    }

    #[test]
    fn test_default_layout_has_forty_unique_seats() {
        let map = SeatMap::default();
        let seats = map.seat_ids();
        assert_eq!(seats.len(), 40);
        assert_eq!(map.capacity(), 40);

        let unique: HashSet<_> = seats.iter().collect();
        assert_eq!(unique.len(), 40);

        for id in &seats {
            let label = id.to_string();
            assert!(matches!(label.chars().next(), Some('A'..='E')));
            let number: u16 = label[1..].parse().unwrap();
            assert!((1..=8).contains(&number));
        }

        assert_eq!(seats.first().map(ToString::to_string).as_deref(), Some("A1"));
        assert_eq!(seats.get(8).map(ToString::to_string).as_deref(), Some("B1"));
        assert_eq!(seats.last().map(ToString::to_string).as_deref(), Some("E8"));
    }

    #[test]
    fn test_seat_types() {
        let map = SeatMap::default();
        assert_eq!(map.type_of(&seat("A1")), Some(SeatType::Standard));
        assert_eq!(map.type_of(&seat("C8")), Some(SeatType::Standard));
        assert_eq!(map.type_of(&seat("D1")), Some(SeatType::Recliner));
        assert_eq!(map.row_of(&seat("E4")).map(|r| r.id), Some('E'));
    }

    #[test]
    fn test_seats_outside_layout() {
        let map = SeatMap::default();
        assert!(!map.contains(&seat("A9")));
        assert!(!map.contains(&seat("F1")));
        assert_eq!(map.type_of(&seat("F1")), None);
    }

    #[test]
    fn test_invalid_layouts_rejected() {
        assert!(SeatMap::new(vec![]).is_err());
        assert!(SeatMap::new(vec![RowDefinition::new('a', SeatType::Standard, 4)]).is_err());
        assert!(SeatMap::new(vec![RowDefinition::new('A', SeatType::Standard, 0)]).is_err());
        assert!(SeatMap::new(vec![
            RowDefinition::new('A', SeatType::Standard, 4),
            RowDefinition::new('A', SeatType::Recliner, 4),
        ])
        .is_err());

        let small = SeatMap::new(vec![RowDefinition::new('R', SeatType::Recliner, 3)]).unwrap();
        assert_eq!(small.seat_ids().len(), 3);
    }
}
