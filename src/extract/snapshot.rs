/// Normalizer / formatter
///
/// BCV reports magnitudes in thousands of bolívares; the published figures
/// are in billions (millardos). A snapshot is the latest week plus a short
/// history, each tagged with the direction of its variation.
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::series::{PeriodRecord, Series};
use crate::utils::round2;

const THOUSANDS_PER_BILLION: f64 = 1_000_000.0;

/// Convert a magnitude in thousands to billions, rounded to 2 decimals
pub fn to_billions(thousands: Option<f64>) -> Option<f64> {
    thousands.map(|value| round2(value / THOUSANDS_PER_BILLION))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum VariationDirection {
    Up,
    Down,
    Neutral,
}

impl VariationDirection {
    pub fn from_variation(variation_pct: Option<f64>) -> Self {
        match variation_pct {
            Some(v) if v > 0.0 => VariationDirection::Up,
            Some(v) if v < 0.0 => VariationDirection::Down,
            _ => VariationDirection::Neutral,
        }
    }

    pub fn arrow(&self) -> &'static str {
        match self {
            VariationDirection::Up => "↑",
            VariationDirection::Down => "↓",
            VariationDirection::Neutral => "=",
        }
    }
}

/// One normalized week
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SnapshotEntry {
    pub date: String,
    pub primary_billions: Option<f64>,
    pub secondary_billions: Option<f64>,
    pub variation_pct: Option<f64>,
    pub variation_direction: VariationDirection,
}

impl From<&PeriodRecord> for SnapshotEntry {
    fn from(record: &PeriodRecord) -> Self {
        Self {
            date: record.period_label.clone(),
            primary_billions: to_billions(record.primary_value),
            secondary_billions: to_billions(record.secondary_value),
            variation_pct: record.variation_pct,
            variation_direction: VariationDirection::from_variation(record.variation_pct),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub latest: SnapshotEntry,
    pub history: Vec<SnapshotEntry>,
}

impl Snapshot {
    /// `None` for an empty series
    pub fn from_series(series: &Series, history_len: usize) -> Option<Self> {
        let latest = SnapshotEntry::from(series.latest()?);
        let history = series
            .iter()
            .take(history_len)
            .map(SnapshotEntry::from)
            .collect();

        Some(Self { latest, history })
    }
}
