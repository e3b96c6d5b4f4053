use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::extract::{Snapshot, SnapshotEntry, VariationDirection};
use crate::fetcher::ExchangeRate;

// Published document models (bcv-liquidity.json / bcv-rates.json)

/// Latest liquidity week
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct LiquidityLatest {
    /// Week closing date, DD/MM/YYYY
    pub date: String,
    pub m1_billions: Option<f64>,
    pub m2_billions: Option<f64>,
    pub variation_pct: Option<f64>,
    pub variation_direction: VariationDirection,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct LiquidityHistoryEntry {
    pub date: String,
    pub m2_billions: Option<f64>,
    pub variation_pct: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct BaseMonetariaLatest {
    pub date: String,
    pub value_billions: Option<f64>,
    pub variation_pct: Option<f64>,
    pub variation_direction: VariationDirection,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct BaseMonetariaHistoryEntry {
    pub date: String,
    pub value_billions: Option<f64>,
    pub variation_pct: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct BaseMonetariaSection {
    pub latest: BaseMonetariaLatest,
    pub history: Vec<BaseMonetariaHistoryEntry>,
}

/// Monetary indicators as published
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct IndicatorsDocument {
    pub last_updated: DateTime<Utc>,
    pub latest: LiquidityLatest,
    pub history: Vec<LiquidityHistoryEntry>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_monetaria: Option<BaseMonetariaSection>,
}

/// Exchange rates as published; EUR and USD are always present
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct RatesDocument {
    pub last_updated: DateTime<Utc>,
    pub eur: ExchangeRate,
    pub usd: ExchangeRate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub usdt: Option<ExchangeRate>,
}

impl From<&SnapshotEntry> for LiquidityLatest {
    fn from(entry: &SnapshotEntry) -> Self {
        Self {
            date: entry.date.clone(),
            m1_billions: entry.secondary_billions,
            m2_billions: entry.primary_billions,
            variation_pct: entry.variation_pct,
            variation_direction: entry.variation_direction,
        }
    }
}

impl From<&SnapshotEntry> for LiquidityHistoryEntry {
    fn from(entry: &SnapshotEntry) -> Self {
        Self {
            date: entry.date.clone(),
            m2_billions: entry.primary_billions,
            variation_pct: entry.variation_pct,
        }
    }
}

impl From<&SnapshotEntry> for BaseMonetariaLatest {
    fn from(entry: &SnapshotEntry) -> Self {
        Self {
            date: entry.date.clone(),
            value_billions: entry.primary_billions,
            variation_pct: entry.variation_pct,
            variation_direction: entry.variation_direction,
        }
    }
}

impl From<&SnapshotEntry> for BaseMonetariaHistoryEntry {
    fn from(entry: &SnapshotEntry) -> Self {
        Self {
            date: entry.date.clone(),
            value_billions: entry.primary_billions,
            variation_pct: entry.variation_pct,
        }
    }
}

impl From<&Snapshot> for BaseMonetariaSection {
    fn from(snapshot: &Snapshot) -> Self {
        Self {
            latest: BaseMonetariaLatest::from(&snapshot.latest),
            history: snapshot.history.iter().map(Into::into).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry() -> SnapshotEntry {
        SnapshotEntry {
            date: "02/01/2026".to_string(),
            primary_billions: Some(115.0),
            secondary_billions: Some(80.5),
            variation_pct: Some(2.68),
            variation_direction: VariationDirection::Up,
        }
    }

    #[test]
    fn test_liquidity_latest_maps_m1_and_m2() {
        let latest = LiquidityLatest::from(&entry());
        assert_eq!(latest.m2_billions, Some(115.0));
        assert_eq!(latest.m1_billions, Some(80.5));
    }

    #[test]
    fn test_document_json_shape() {
        let doc = IndicatorsDocument {
            last_updated: "2026-01-09T12:00:00Z".parse().unwrap(),
            latest: LiquidityLatest::from(&entry()),
            history: vec![LiquidityHistoryEntry::from(&entry())],
            base_monetaria: None,
        };

        let json = serde_json::to_value(&doc).unwrap();
        assert_eq!(json["latest"]["variation_direction"], "up");
        assert_eq!(json["history"][0]["m2_billions"], 115.0);
        assert!(json.get("base_monetaria").is_none());
        assert!(json["history"][0].get("m1_billions").is_none());
    }

    #[test]
    fn test_rates_document_omits_missing_usdt() {
        let rate = |symbol: &str| ExchangeRate {
            rate: 1.0,
            date: "2026-01-09".to_string(),
            symbol: symbol.to_string(),
            live: None,
        };
        let doc = RatesDocument {
            last_updated: "2026-01-09T12:00:00Z".parse().unwrap(),
            eur: rate("€"),
            usd: rate("$"),
            usdt: None,
        };

        let json = serde_json::to_string_pretty(&doc).unwrap();
        assert!(json.contains("\"€\""));
        assert!(!json.contains("usdt"));
        assert!(!json.contains("live"));
    }
}
