use cineplex_shared::SeatId;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::layout::{SeatMap, SeatType};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PricingConfig {
    #[serde(default = "default_standard_multiplier")]
    pub standard_multiplier: f64,

    #[serde(default = "default_recliner_multiplier")]
    pub recliner_multiplier: f64,
}

fn default_standard_multiplier() -> f64 { 1.0 }
fn default_recliner_multiplier() -> f64 { 1.5 }

impl Default for PricingConfig {
    fn default() -> Self {
        Self {
            standard_multiplier: default_standard_multiplier(),
            recliner_multiplier: default_recliner_multiplier(),
        }
    }
}

/// Seat-tier pricing on top of a movie's base price
pub struct PricingEngine {
    config: PricingConfig,
    layout: Arc<SeatMap>,
}

impl PricingEngine {
    pub fn new(config: PricingConfig, layout: Arc<SeatMap>) -> Self {
        Self { config, layout }
    }

    pub fn multiplier(&self, seat_type: SeatType) -> f64 {
        match seat_type {
            SeatType::Standard => self.config.standard_multiplier,
            SeatType::Recliner => self.config.recliner_multiplier,
        }
    }

    /// Displayed price of a single seat, rounded to a whole unit.
    /// Seats outside the layout are priced as standard.
    pub fn price(&self, seat: &SeatId, base_price: u32) -> u32 {
        round_amount(self.unrounded(seat, base_price))
    }

    /// Sum of per-seat prices, rounded once after summing. For odd base prices this
    /// can differ from adding up `price` results.
    pub fn total<'a, I>(&self, seats: I, base_price: u32) -> u32
    where
        I: IntoIterator<Item = &'a SeatId>,
    {
        let sum: f64 = seats
            .into_iter()
            .map(|seat| self.unrounded(seat, base_price))
            .sum();
        round_amount(sum)
    }

    /// Unit price of each tier, for the pricing panel
    pub fn tier_prices(&self, base_price: u32) -> Vec<(SeatType, u32)> {
        [SeatType::Standard, SeatType::Recliner]
            .into_iter()
            .map(|tier| (tier, round_amount(base_price as f64 * self.multiplier(tier))))
            .collect()
    }

    fn unrounded(&self, seat: &SeatId, base_price: u32) -> f64 {
        let seat_type = self.layout.type_of(seat).unwrap_or(SeatType::Standard);
        base_price as f64 * self.multiplier(seat_type)
    }
}

// Half away from zero; amounts are never negative.
fn round_amount(amount: f64) -> u32 {
    amount.round().max(0.0) as u32
}
