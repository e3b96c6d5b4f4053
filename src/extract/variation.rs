/// Variation resolver
///
/// Fills in the week-over-week percent change for records whose sheet did
/// not report one. The comparison is always against the next older record
/// (index + 1); the oldest record in the window has nothing to compare to.
use super::series::{PeriodRecord, Series, VariationSource};
use crate::utils::round2;

/// Percent change from `previous` to `current`, rounded to 2 decimals
///
/// Returns `None` when either value is missing or the previous value is not
/// positive.
pub fn derive_variation(current: Option<f64>, previous: Option<f64>) -> Option<f64> {
    match (current, previous) {
        (Some(current), Some(previous)) if previous > 0.0 => {
            Some(round2((current - previous) / previous * 100.0))
        }
        _ => None,
    }
}

/// Return a new series with missing variations derived from primary values
pub fn resolve_variations(series: &Series) -> Series {
    let records = series.records();

    let resolved = records
        .iter()
        .enumerate()
        .map(|(i, record)| {
            if record.variation_pct.is_some() {
                return record.clone();
            }

            let derived = records
                .get(i + 1)
                .and_then(|older| derive_variation(record.primary_value, older.primary_value));

            PeriodRecord {
                variation_pct: derived,
                variation_source: derived.map(|_| VariationSource::Derived),
                ..record.clone()
            }
        })
        .collect();

    Series::from_resolved(resolved)
}
