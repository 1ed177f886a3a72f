//! Per-metric normalization and check-then-insert loading
//!
//! [`process_all_metrics`] is the batch entry point. Body composition always
//! runs over the whole batch because one row merges several metric types;
//! every other metric type is grouped by name and handed to its loader.

pub mod body_composition;
pub mod heart;
pub mod sleep;

use log::debug;
use serde::Serialize;
use std::collections::HashMap;

use crate::error::Result;
use crate::models::HeartContext;
use crate::payload::{Metric, MetricKind, RootPayload};
use crate::store::MetricStore;

/// Inserted and skipped (already present) rows for one table
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TableCounts {
    pub inserted: usize,
    pub skipped: usize,
}

impl TableCounts {
    pub fn record(&mut self, inserted: bool) {
        if inserted {
            self.inserted += 1;
        } else {
            self.skipped += 1;
        }
    }
}

/// What one batch did to each table
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct IngestSummary {
    pub body_composition: TableCounts,
    pub sleep_sessions: TableCounts,
    pub heart_data: TableCounts,
    pub misc_measurements: TableCounts,
    /// ensure-partition calls issued (each is idempotent)
    pub partitions_ensured: usize,
    /// Metric names with no loader
    pub ignored_metrics: Vec<String>,
}

impl IngestSummary {
    pub fn rows_inserted(&self) -> usize {
        self.body_composition.inserted
            + self.sleep_sessions.inserted
            + self.heart_data.inserted
            + self.misc_measurements.inserted
    }

    pub fn rows_skipped(&self) -> usize {
        self.body_composition.skipped
            + self.sleep_sessions.skipped
            + self.heart_data.skipped
            + self.misc_measurements.skipped
    }
}

/// Order in which grouped metric types are loaded
const DISPATCH_ORDER: [MetricKind; 6] = [
    MetricKind::SleepAnalysis,
    MetricKind::Vo2Max,
    MetricKind::HeartRate,
    MetricKind::RestingHeartRate,
    MetricKind::RespiratoryRate,
    MetricKind::HeartRateVariability,
];

/// Load every metric of a request into `store`.
///
/// The first error aborts the batch; the caller owns the transaction and
/// rolls back.
pub async fn process_all_metrics<S: MetricStore>(
    payload: &RootPayload,
    store: &mut S,
) -> Result<IngestSummary> {
    let metrics = &payload.data.metrics;
    let mut summary = IngestSummary::default();

    body_composition::process_body_composition(metrics, store, &mut summary).await?;

    let mut grouped: HashMap<MetricKind, Vec<&Metric>> = HashMap::new();
    for metric in metrics {
        match metric.kind() {
            MetricKind::Unrecognized => {
                debug!("Ignoring metric without a loader: {}", metric.name);
                if !summary.ignored_metrics.contains(&metric.name) {
                    summary.ignored_metrics.push(metric.name.clone());
                }
            }
            kind => grouped.entry(kind).or_default().push(metric),
        }
    }

    for kind in DISPATCH_ORDER {
        let Some(group) = grouped.get(&kind) else {
            continue;
        };

        match kind {
            MetricKind::SleepAnalysis => {
                sleep::process_sleep_analysis(group, store, &mut summary).await?
            }
            MetricKind::Vo2Max => {
                heart::process_heart_context(group, HeartContext::Vo2Max, store, &mut summary)
                    .await?
            }
            MetricKind::HeartRate => {
                heart::process_heart_context(group, HeartContext::HeartRate, store, &mut summary)
                    .await?
            }
            MetricKind::RestingHeartRate => {
                heart::process_heart_context(
                    group,
                    HeartContext::RestingHeartRate,
                    store,
                    &mut summary,
                )
                .await?
            }
            MetricKind::HeartRateVariability => {
                heart::process_heart_context(group, HeartContext::Hrv, store, &mut summary).await?
            }
            MetricKind::RespiratoryRate => {
                heart::process_respiratory_rate(group, store, &mut summary).await?
            }
            // Body composition kinds were merged above
            MetricKind::WeightBodyMass
            | MetricKind::BodyMassIndex
            | MetricKind::BodyFatPercentage
            | MetricKind::LeanBodyMass
            | MetricKind::Unrecognized => {}
        }
    }

    Ok(summary)
}
