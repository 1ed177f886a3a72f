//! Heart rate, resting heart rate, HRV, VO2 max and respiratory rate loaders

use super::IngestSummary;
use crate::error::Result;
use crate::models::{HeartContext, HeartDataRow, MiscMeasurementRow, RESPIRATORY_RATE};
use crate::partition::MonthlyPartition;
use crate::payload::{Metric, MetricData};
use crate::store::MetricStore;
use crate::timestamp::{epoch_millis, parse_any_datetime, parse_plain_date};

/// Build the heart data row for one sample, or `None` when it has no date.
///
/// Only heart rate carries avg/min/max and the sample's context label; the
/// other contexts store `qty` and leave those columns null.
pub fn heart_row(sample: &MetricData, context: HeartContext) -> Result<Option<HeartDataRow>> {
    let Some(date_full) = sample.date.as_deref() else {
        return Ok(None);
    };

    let mut row = HeartDataRow {
        recorded_at: parse_any_datetime(date_full)?,
        date: parse_plain_date(date_full)?,
        source: sample.source.clone(),
        context,
        qty: sample.qty,
        avg_bpm: None,
        min_bpm: None,
        max_bpm: None,
        health_context: None,
    };

    if context == HeartContext::HeartRate {
        row.qty = None;
        row.avg_bpm = sample.avg;
        row.min_bpm = sample.min;
        row.max_bpm = sample.max;
        row.health_context = sample.context.clone();
    }

    Ok(Some(row))
}

/// Check-then-insert every dated sample as a `context` row in `silver_heart_data`.
///
/// The monthly partition for the row's date is ensured right before the
/// insert, on the parent given by [`HeartContext::partition_parent`].
pub async fn process_heart_context<S: MetricStore>(
    metrics: &[&Metric],
    context: HeartContext,
    store: &mut S,
    summary: &mut IngestSummary,
) -> Result<()> {
    for metric in metrics {
        for sample in &metric.data {
            let Some(row) = heart_row(sample, context)? else {
                continue;
            };

            if store.heart_data_exists(&row).await? {
                summary.heart_data.record(false);
                continue;
            }

            let partition = MonthlyPartition::for_month_of(context.partition_parent(), row.date)?;
            store.ensure_partition(&partition).await?;
            summary.partitions_ensured += 1;

            store.insert_heart_data(&row).await?;
            summary.heart_data.record(true);
        }
    }

    Ok(())
}

/// Build the respiratory rate row for one sample, or `None` when it has no date
pub fn respiratory_row(sample: &MetricData) -> Result<Option<MiscMeasurementRow>> {
    let Some(date_full) = sample.date.as_deref() else {
        return Ok(None);
    };

    let measured_at = parse_any_datetime(date_full)?;
    Ok(Some(MiscMeasurementRow {
        measured_at,
        measured_at_ts: epoch_millis(&measured_at),
        qty: sample.qty,
        measurement_type: RESPIRATORY_RATE.to_string(),
        source: sample.source.clone(),
    }))
}

/// Respiratory rate goes to the flat `silver_misc_measurments` table; no partitions.
pub async fn process_respiratory_rate<S: MetricStore>(
    metrics: &[&Metric],
    store: &mut S,
    summary: &mut IngestSummary,
) -> Result<()> {
    for metric in metrics {
        for sample in &metric.data {
            let Some(row) = respiratory_row(sample)? else {
                continue;
            };

            if store.misc_measurement_exists(&row).await? {
                summary.misc_measurements.record(false);
                continue;
            }

            store.insert_misc_measurement(&row).await?;
            summary.misc_measurements.record(true);
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn heart_sample() -> MetricData {
        MetricData {
            date: Some("2024-03-01 10:00:00 +0100".to_string()),
            qty: Some(58.0),
            source: Some("Watch".to_string()),
            avg: Some(61.5),
            min: Some(55.0),
            max: Some(70.0),
            context: Some("resting".to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn test_heart_rate_carries_bpm_fields() {
        let row = heart_row(&heart_sample(), HeartContext::HeartRate)
            .unwrap()
            .unwrap();
        assert_eq!(row.qty, None);
        assert_eq!(row.avg_bpm, Some(61.5));
        assert_eq!(row.max_bpm, Some(70.0));
        assert_eq!(row.health_context.as_deref(), Some("resting"));
        assert_eq!(row.date, NaiveDate::from_ymd_opt(2024, 3, 1).unwrap());
    }

    #[test]
    fn test_other_contexts_null_bpm_fields() {
        for context in [HeartContext::RestingHeartRate, HeartContext::Hrv, HeartContext::Vo2Max] {
            let row = heart_row(&heart_sample(), context).unwrap().unwrap();
            assert_eq!(row.qty, Some(58.0));
            assert_eq!(row.avg_bpm, None);
            assert_eq!(row.min_bpm, None);
            assert_eq!(row.health_context, None);
        }
    }

    #[test]
    fn test_partition_date_is_the_written_date() {
        // 00:30 at +02:00 is still the previous day in UTC; the partition follows the written date.
        let sample = MetricData {
            date: Some("2024-04-01 00:30:00 +0200".to_string()),
            qty: Some(40.0),
            ..Default::default()
        };
        let row = heart_row(&sample, HeartContext::Hrv).unwrap().unwrap();
        assert_eq!(row.date, NaiveDate::from_ymd_opt(2024, 4, 1).unwrap());
    }

    #[test]
    fn test_undated_samples_are_skipped() {
        let sample = MetricData {
            qty: Some(40.0),
            ..Default::default()
        };
        assert!(heart_row(&sample, HeartContext::Vo2Max).unwrap().is_none());
        assert!(respiratory_row(&sample).unwrap().is_none());
    }

    #[test]
    fn test_respiratory_row() {
        let sample = MetricData {
            date: Some("2024-03-01T09:00:00Z".to_string()),
            qty: Some(14.5),
            source: Some("Watch".to_string()),
            ..Default::default()
        };
        let row = respiratory_row(&sample).unwrap().unwrap();
        assert_eq!(row.measurement_type, "respiratory_rate");
        assert_eq!(row.measured_at_ts, 1_709_283_600_000);
    }
}
