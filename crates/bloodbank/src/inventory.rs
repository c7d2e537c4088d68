//! Read-only blood inventory and the home page stock cards.
//!
//! The rows are fixed demonstration data; there is no write path.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::blood::{BloodType, ParseOptionError};

/// Stock level recorded on an inventory row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StockStatus {
    /// Needs donors.
    Low,
    /// Adequate.
    Medium,
    /// Well stocked.
    High,
}

impl StockStatus {
    /// All statuses in display order.
    pub const ALL: [StockStatus; 3] = [Self::Low, Self::Medium, Self::High];

    /// Display label.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Low => "Low",
            Self::Medium => "Medium",
            Self::High => "High",
        }
    }
}

impl fmt::Display for StockStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for StockStatus {
    type Err = ParseOptionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Self::ALL
            .into_iter()
            .find(|status| status.label().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| ParseOptionError {
                kind: "stock status",
                value: s.to_string(),
            })
    }
}

/// One row of the inventory table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InventoryItem {
    /// Row identifier, e.g. `INV003`.
    pub id: &'static str,
    /// Blood type stored.
    pub blood_type: BloodType,
    /// Units on hand.
    pub quantity: u32,
    /// Stock level.
    pub status: StockStatus,
    /// Date the row was last counted.
    pub last_updated: NaiveDate,
    /// Earliest expiry among the units.
    pub expiry_date: NaiveDate,
    /// Storage location.
    pub location: &'static str,
}

fn date(month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, month, day).unwrap_or_default()
}

const ROWS: [(&str, BloodType, u32, StockStatus, &str); 8] = [
    ("INV001", BloodType::OPositive, 45, StockStatus::Medium, "Main Storage"),
    ("INV002", BloodType::ONegative, 20, StockStatus::Low, "Main Storage"),
    ("INV003", BloodType::APositive, 67, StockStatus::High, "Secondary Storage"),
    ("INV004", BloodType::ANegative, 15, StockStatus::Low, "Main Storage"),
    ("INV005", BloodType::BPositive, 52, StockStatus::High, "Secondary Storage"),
    ("INV006", BloodType::BNegative, 12, StockStatus::Low, "Main Storage"),
    ("INV007", BloodType::AbPositive, 32, StockStatus::Medium, "Cold Storage"),
    ("INV008", BloodType::AbNegative, 8, StockStatus::Low, "Cold Storage"),
];

/// The inventory table, in id order.
#[must_use]
pub fn inventory() -> Vec<InventoryItem> {
    (1_u32..)
        .zip(ROWS)
        .map(
            |(day, (id, blood_type, quantity, status, location))| InventoryItem {
                id,
                blood_type,
                quantity,
                status,
                last_updated: date(5, day),
                expiry_date: date(6, day),
                location,
            },
        )
        .collect()
}

/// Predicates over the inventory table. `None` means "any".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InventoryFilter {
    /// Keep only this blood type.
    pub blood_type: Option<BloodType>,
    /// Keep only this status, compared case-insensitively.
    pub status: Option<String>,
    /// Keep rows whose blood type or location contains this text.
    pub search: Option<String>,
}

/// Treat blank input and the literal `all` as "no filter".
fn active(value: Option<&str>) -> Option<&str> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty() && !v.eq_ignore_ascii_case("all"))
}

impl InventoryFilter {
    /// Build a filter from raw user input.
    ///
    /// # Errors
    ///
    /// Returns an error if `blood_type` is set but is not a blood type label.
    pub fn from_input(
        blood_type: Option<&str>,
        status: Option<&str>,
        search: Option<&str>,
    ) -> Result<Self, ParseOptionError> {
        Ok(Self {
            blood_type: active(blood_type).map(str::parse).transpose()?,
            status: active(status).map(str::to_string),
            search: search
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string),
        })
    }

    /// The filter that keeps every row.
    #[must_use]
    pub fn reset() -> Self {
        Self::default()
    }

    /// True if no predicate is active.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.blood_type.is_none() && self.status.is_none() && self.search.is_none()
    }

    /// True if `item` passes every active predicate.
    #[must_use]
    pub fn matches(&self, item: &InventoryItem) -> bool {
        if self.blood_type.is_some_and(|t| t != item.blood_type) {
            return false;
        }
        if let Some(status) = &self.status {
            if !item.status.label().eq_ignore_ascii_case(status) {
                return false;
            }
        }
        if let Some(search) = &self.search {
            let needle = search.to_lowercase();
            let in_type = item.blood_type.label().to_lowercase().contains(&needle);
            let in_location = item.location.to_lowercase().contains(&needle);
            if !in_type && !in_location {
                return false;
            }
        }
        true
    }

    /// Rows of `items` that pass the filter, in their original order.
    #[must_use]
    pub fn apply(&self, items: &[InventoryItem]) -> Vec<InventoryItem> {
        items.iter().filter(|item| self.matches(item)).cloned().collect()
    }
}

/// Stock level message shown on a home page card.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StockLevel {
    /// Under 30% of capacity.
    Low,
    /// Under 70% of capacity.
    Moderate,
    /// 70% of capacity or more.
    Good,
}

impl StockLevel {
    /// Card message.
    #[must_use]
    pub fn message(self) -> &'static str {
        match self {
            Self::Low => "Low stock! Donors needed",
            Self::Moderate => "Moderate stock available",
            Self::Good => "Good stock available",
        }
    }
}

/// A home page card summarizing one blood type's stock.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StockCard {
    /// Blood type summarized.
    pub blood_type: BloodType,
    /// Units on hand.
    pub units: u32,
    /// Capacity the fill percentage is measured against.
    pub max_units: u32,
}

impl StockCard {
    /// Capacity shared by all cards.
    pub const CAPACITY: u32 = 100;

    /// Fill level as a percentage of capacity.
    #[must_use]
    pub fn percentage(&self) -> f64 {
        if self.max_units == 0 {
            return 0.0;
        }
        f64::from(self.units) / f64::from(self.max_units) * 100.0
    }

    /// Stock level for the fill percentage.
    #[must_use]
    pub fn level(&self) -> StockLevel {
        let percentage = self.percentage();
        if percentage < 30.0 {
            StockLevel::Low
        } else if percentage < 70.0 {
            StockLevel::Moderate
        } else {
            StockLevel::Good
        }
    }
}

/// One card per inventory row, in inventory order.
#[must_use]
pub fn stock_cards() -> Vec<StockCard> {
    inventory()
        .into_iter()
        .map(|item| StockCard {
            blood_type: item.blood_type,
            units: item.quantity,
            max_units: StockCard::CAPACITY,
        })
        .collect()
}
