use chrono::{DateTime, Utc};
use std::collections::BTreeMap;

use super::IngestSummary;
use crate::error::Result;
use crate::models::BodyCompositionRow;
use crate::payload::{Metric, MetricKind};
use crate::store::MetricStore;
use crate::timestamp::parse_any_datetime;

/// Merge weight, BMI, body fat and lean mass samples that share a timestamp
/// and source into one row per key.
///
/// Samples without a date or source are dropped. When the same key and field
/// appear twice, the later sample wins.
pub fn merge_body_composition(metrics: &[Metric]) -> Result<Vec<BodyCompositionRow>> {
    let mut merged: BTreeMap<(DateTime<Utc>, String), BodyCompositionRow> = BTreeMap::new();

    for metric in metrics {
        let kind = metric.kind();
        if !kind.is_body_composition() {
            continue;
        }

        for entry in &metric.data {
            let (Some(date), Some(source)) = (entry.date.as_deref(), entry.source.as_deref()) else {
                continue;
            };

            let measured_at = parse_any_datetime(date)?.with_timezone(&Utc);
            let row = merged
                .entry((measured_at, source.to_string()))
                .or_insert_with(|| BodyCompositionRow::new(measured_at, source.to_string()));

            match kind {
                MetricKind::WeightBodyMass => row.weight_kg = entry.qty,
                MetricKind::BodyMassIndex => row.bmi = entry.qty,
                MetricKind::BodyFatPercentage => row.body_fat_percentage = entry.qty,
                MetricKind::LeanBodyMass => row.lean_mass_kg = entry.qty,
                _ => {}
            }
        }
    }

    Ok(merged.into_values().collect())
}

/// Insert merged rows whose (measured_at, source) is not stored yet.
///
/// Rows already stored are left untouched, so a field that arrives in a later
/// batch for an existing key is not back-filled.
pub async fn process_body_composition<S: MetricStore>(
    metrics: &[Metric],
    store: &mut S,
    summary: &mut IngestSummary,
) -> Result<()> {
    for row in merge_body_composition(metrics)? {
        if store.body_composition_exists(&row).await? {
            summary.body_composition.record(false);
            continue;
        }

        store.insert_body_composition(&row).await?;
        summary.body_composition.record(true);
    }

    Ok(())
}
