use std::collections::{HashMap, HashSet};

use super::models::{BaseMonetariaHistoryEntry, LiquidityHistoryEntry};
use crate::utils::parse_period_date;

/// A dated entry in a published history list
pub trait HistoryEntry: Clone {
    fn period_label(&self) -> &str;

    /// Take values this entry leaves null from an older entry for the same week
    fn fill_unknown_from(&mut self, older: &Self);
}

impl HistoryEntry for LiquidityHistoryEntry {
    fn period_label(&self) -> &str {
        &self.date
    }

    fn fill_unknown_from(&mut self, older: &Self) {
        self.m2_billions = self.m2_billions.or(older.m2_billions);
        self.variation_pct = self.variation_pct.or(older.variation_pct);
    }
}

impl HistoryEntry for BaseMonetariaHistoryEntry {
    fn period_label(&self) -> &str {
        &self.date
    }

    fn fill_unknown_from(&mut self, older: &Self) {
        self.value_billions = self.value_billions.or(older.value_billions);
        self.variation_pct = self.variation_pct.or(older.variation_pct);
    }
}

/// Merge freshly extracted history into the previously published one
///
/// Fresh entries replace previous entries with the same date, except that a
/// null in the fresh entry never erases a value already published for that
/// week. The result is newest first and holds at most `retention` entries.
pub fn merge_history<T: HistoryEntry>(fresh: &[T], previous: &[T], retention: usize) -> Vec<T> {
    let mut published: HashMap<&str, &T> = HashMap::new();
    for entry in previous {
        published.entry(entry.period_label()).or_insert(entry);
    }

    let mut seen = HashSet::new();
    let mut merged: Vec<T> = fresh
        .iter()
        .map(|entry| {
            let mut entry = entry.clone();
            if let Some(older) = published.get(entry.period_label()) {
                entry.fill_unknown_from(older);
            }
            entry
        })
        .chain(previous.iter().cloned())
        .filter(|entry| seen.insert(entry.period_label().to_string()))
        .collect();

    merged.sort_by_key(|entry| std::cmp::Reverse(parse_period_date(entry.period_label())));
    merged.truncate(retention);
    merged
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(date: &str, m2: f64) -> LiquidityHistoryEntry {
        LiquidityHistoryEntry {
            date: date.to_string(),
            m2_billions: Some(m2),
            variation_pct: None,
        }
    }

    #[test]
    fn test_fresh_wins_on_same_date() {
        let fresh = vec![entry("09/01/2026", 120.0), entry("02/01/2026", 116.0)];
        let previous = vec![entry("02/01/2026", 115.0), entry("26/12/2025", 112.0)];

        let merged = merge_history(&fresh, &previous, 26);
        let dates: Vec<_> = merged.iter().map(|e| e.date.as_str()).collect();
        assert_eq!(dates, vec!["09/01/2026", "02/01/2026", "26/12/2025"]);
        assert_eq!(merged[1].m2_billions, Some(116.0));
    }

    #[test]
    fn test_fresh_null_keeps_published_value() {
        let mut fresh_oldest = entry("09/01/2026", 120.0);
        fresh_oldest.variation_pct = None;
        let mut published = entry("09/01/2026", 119.0);
        published.variation_pct = Some(1.5);

        let merged = merge_history(&[fresh_oldest], &[published], 26);
        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].m2_billions, Some(120.0));
        assert_eq!(merged[0].variation_pct, Some(1.5));
    }

    #[test]
    fn test_fresh_value_overrides_published_value() {
        let mut fresh = entry("09/01/2026", 120.0);
        fresh.variation_pct = Some(2.0);
        let mut published = entry("09/01/2026", 120.0);
        published.variation_pct = Some(1.5);

        let merged = merge_history(&[fresh], &[published], 26);
        assert_eq!(merged[0].variation_pct, Some(2.0));
    }

    #[test]
    fn test_base_monetaria_null_value_is_filled() {
        let fresh = BaseMonetariaHistoryEntry {
            date: "02/01/2026".to_string(),
            value_billions: None,
            variation_pct: None,
        };
        let published = BaseMonetariaHistoryEntry {
            date: "02/01/2026".to_string(),
            value_billions: Some(40.0),
            variation_pct: Some(0.5),
        };

        let merged = merge_history(&[fresh], &[published], 26);
        assert_eq!(merged[0].value_billions, Some(40.0));
        assert_eq!(merged[0].variation_pct, Some(0.5));
    }

    #[test]
    fn test_retention_cap_keeps_newest() {
        let fresh = vec![entry("09/01/2026", 1.0)];
        let previous = vec![
            entry("02/01/2026", 1.0),
            entry("26/12/2025", 1.0),
            entry("19/12/2025", 1.0),
        ];

        let merged = merge_history(&fresh, &previous, 2);
        assert_eq!(merged.len(), 2);
        assert_eq!(merged[1].date, "02/01/2026");
    }

    #[test]
    fn test_previous_out_of_order_is_resorted() {
        let previous = vec![entry("19/12/2025", 1.0), entry("26/12/2025", 1.0)];
        let merged = merge_history(&[], &previous, 26);
        assert_eq!(merged[0].date, "26/12/2025");
    }
}
