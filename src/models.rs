//! Rows written to the silver tables
//!
//! Each row type knows its natural key so stores can detect an existing
//! equivalent row before inserting. Timestamps compare as instants, so
//! `10:00 +01:00` and `09:00Z` are the same key.

use chrono::{DateTime, FixedOffset, NaiveDate, Utc};

use crate::partition::PartitionParent;

/// Merged weight / BMI / body fat / lean mass snapshot
#[derive(Debug, Clone, PartialEq)]
pub struct BodyCompositionRow {
    pub measured_at: DateTime<Utc>,
    pub source: String,
    pub weight_kg: Option<f64>,
    pub bmi: Option<f64>,
    pub body_fat_percentage: Option<f64>,
    pub lean_mass_kg: Option<f64>,
}

impl BodyCompositionRow {
    pub fn new(measured_at: DateTime<Utc>, source: String) -> Self {
        Self {
            measured_at,
            source,
            weight_kg: None,
            bmi: None,
            body_fat_percentage: None,
            lean_mass_kg: None,
        }
    }

    /// Natural key: (measured_at, source)
    pub fn same_key(&self, other: &Self) -> bool {
        self.measured_at == other.measured_at && self.source == other.source
    }
}

/// Value of the `context` column in `silver_heart_data`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HeartContext {
    HeartRate,
    RestingHeartRate,
    Hrv,
    Vo2Max,
}

impl HeartContext {
    pub fn as_str(&self) -> &'static str {
        match self {
            HeartContext::HeartRate => "heart_rate",
            HeartContext::RestingHeartRate => "resting_heart_rate",
            HeartContext::Hrv => "hrv",
            HeartContext::Vo2Max => "Vo2_Max",
        }
    }

    /// Parent table whose monthly partition is ensured before inserting a row
    /// of this context.
    ///
    /// Only VO2 max targets `silver_heart_data`, the table rows actually land
    /// in. The other contexts create the identically named partition on
    /// `heart_rate_detailed`; rows for those contexts still go to
    /// `silver_heart_data`.
    pub fn partition_parent(&self) -> PartitionParent {
        match self {
            HeartContext::Vo2Max => PartitionParent::SilverHeartData,
            HeartContext::HeartRate | HeartContext::RestingHeartRate | HeartContext::Hrv => {
                PartitionParent::HeartRateDetailed
            }
        }
    }
}

/// One heart rate, resting heart rate, HRV or VO2 max reading
#[derive(Debug, Clone, PartialEq)]
pub struct HeartDataRow {
    pub recorded_at: DateTime<FixedOffset>,
    /// Partition key, the date as written in the source timestamp
    pub date: NaiveDate,
    pub source: Option<String>,
    pub context: HeartContext,
    pub qty: Option<f64>,
    pub avg_bpm: Option<f64>,
    pub min_bpm: Option<f64>,
    pub max_bpm: Option<f64>,
    pub health_context: Option<String>,
}

impl HeartDataRow {
    /// Natural key: (recorded_at, source, context)
    pub fn same_key(&self, other: &Self) -> bool {
        self.recorded_at == other.recorded_at
            && self.source == other.source
            && self.context == other.context
    }
}

/// One sleep stage segment
#[derive(Debug, Clone, PartialEq)]
pub struct SleepSegmentRow {
    pub session_start: DateTime<FixedOffset>,
    pub session_end: DateTime<FixedOffset>,
    pub duration_hours: Option<f64>,
    pub stage: Option<String>,
    pub source: Option<String>,
    pub sleep_date: NaiveDate,
}

impl SleepSegmentRow {
    /// Natural key: (session_start, session_end, duration_hours, stage, sleep_date)
    pub fn same_key(&self, other: &Self) -> bool {
        self.session_start == other.session_start
            && self.session_end == other.session_end
            && self.duration_hours == other.duration_hours
            && self.stage == other.stage
            && self.sleep_date == other.sleep_date
    }
}

pub const RESPIRATORY_RATE: &str = "respiratory_rate";

/// A measurement stored in the flat misc table
#[derive(Debug, Clone, PartialEq)]
pub struct MiscMeasurementRow {
    pub measured_at: DateTime<FixedOffset>,
    /// `measured_at` as epoch milliseconds, for range queries
    pub measured_at_ts: i64,
    pub qty: Option<f64>,
    pub measurement_type: String,
    pub source: Option<String>,
}

impl MiscMeasurementRow {
    /// Natural key: (measured_at, qty, measurement_type, source)
    pub fn same_key(&self, other: &Self) -> bool {
        self.measured_at == other.measured_at
            && self.qty == other.qty
            && self.measurement_type == other.measurement_type
            && self.source == other.source
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(offset_hours: i32, hour: u32) -> DateTime<FixedOffset> {
        FixedOffset::east_opt(offset_hours * 3600)
            .unwrap()
            .with_ymd_and_hms(2024, 3, 1, hour, 0, 0)
            .unwrap()
    }

    fn heart_row(context: HeartContext, recorded_at: DateTime<FixedOffset>) -> HeartDataRow {
        HeartDataRow {
            recorded_at,
            date: NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
            source: Some("Watch".to_string()),
            context,
            qty: Some(50.0),
            avg_bpm: None,
            min_bpm: None,
            max_bpm: None,
            health_context: None,
        }
    }

    #[test]
    fn test_heart_key_compares_instants() {
        let a = heart_row(HeartContext::Hrv, at(1, 10));
        let b = heart_row(HeartContext::Hrv, at(0, 9));
        assert!(a.same_key(&b));
    }

    #[test]
    fn test_heart_key_includes_context() {
        let a = heart_row(HeartContext::HeartRate, at(0, 9));
        let b = heart_row(HeartContext::RestingHeartRate, at(0, 9));
        assert!(!a.same_key(&b));
    }

    #[test]
    fn test_context_literals() {
        assert_eq!(HeartContext::Vo2Max.as_str(), "Vo2_Max");
        assert_eq!(HeartContext::Hrv.as_str(), "hrv");
        assert_eq!(
            HeartContext::Vo2Max.partition_parent(),
            PartitionParent::SilverHeartData
        );
        assert_eq!(
            HeartContext::RestingHeartRate.partition_parent(),
            PartitionParent::HeartRateDetailed
        );
    }
}
