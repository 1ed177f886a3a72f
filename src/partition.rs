//! Monthly range partitions for the heart data tables

use chrono::{Datelike, NaiveDate};

use crate::error::{IngestError, Result};
use crate::timestamp::parse_plain_date;

/// Prefix shared by every monthly partition, whichever parent it attaches to
pub const PARTITION_PREFIX: &str = "heart_rate_detailed";

/// Partitioned parent tables that accept monthly partitions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PartitionParent {
    /// `silver_heart_data`, the table heart rows are inserted into
    SilverHeartData,
    /// `heart_rate_detailed`, targeted by the heart rate, resting heart rate and HRV loaders
    HeartRateDetailed,
}

impl PartitionParent {
    pub fn table_name(&self) -> &'static str {
        match self {
            PartitionParent::SilverHeartData => "silver_heart_data",
            PartitionParent::HeartRateDetailed => "heart_rate_detailed",
        }
    }
}

/// One calendar month of a partitioned parent: `[start, end)`
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MonthlyPartition {
    pub parent: PartitionParent,
    pub name: String,
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl MonthlyPartition {
    /// Partition covering the month of `date`
    pub fn for_month_of(parent: PartitionParent, date: NaiveDate) -> Result<Self> {
        let (year, month) = (date.year(), date.month());
        let start = NaiveDate::from_ymd_opt(year, month, 1)
            .ok_or_else(|| IngestError::format(date.to_string()))?;
        let end = if month == 12 {
            NaiveDate::from_ymd_opt(year + 1, 1, 1)
        } else {
            NaiveDate::from_ymd_opt(year, month + 1, 1)
        }
        .ok_or_else(|| IngestError::format(date.to_string()))?;

        Ok(Self {
            parent,
            name: partition_name(year, month),
            start,
            end,
        })
    }

    /// Partition covering the month of a date or timestamp string such as
    /// `2024-12-15` or `2024-12-15 08:00:00 +0100`
    pub fn for_date(parent: PartitionParent, date_str: &str) -> Result<Self> {
        Self::for_month_of(parent, parse_plain_date(date_str)?)
    }
}

/// `heart_rate_detailed_<YYYY>_<MM>`
pub fn partition_name(year: i32, month: u32) -> String {
    format!("{}_{}_{:02}", PARTITION_PREFIX, year, month)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_december_rolls_into_next_year() {
        let p = MonthlyPartition::for_date(PartitionParent::HeartRateDetailed, "2024-12-15").unwrap();
        assert_eq!(p.name, "heart_rate_detailed_2024_12");
        assert_eq!(p.start, NaiveDate::from_ymd_opt(2024, 12, 1).unwrap());
        assert_eq!(p.end, NaiveDate::from_ymd_opt(2025, 1, 1).unwrap());
    }

    #[test]
    fn test_month_is_zero_padded() {
        let p = MonthlyPartition::for_date(PartitionParent::SilverHeartData, "2024-03-31 23:59:59 +0200")
            .unwrap();
        assert_eq!(p.name, "heart_rate_detailed_2024_03");
        assert_eq!(p.end, NaiveDate::from_ymd_opt(2024, 4, 1).unwrap());
    }

    #[test]
    fn test_both_parents_share_names() {
        let a = MonthlyPartition::for_date(PartitionParent::SilverHeartData, "2024-07-04").unwrap();
        let b = MonthlyPartition::for_date(PartitionParent::HeartRateDetailed, "2024-07-20").unwrap();
        assert_eq!(a.name, b.name);
        assert_ne!(a.parent, b.parent);
    }

    #[test]
    fn test_invalid_date() {
        let err = MonthlyPartition::for_date(PartitionParent::SilverHeartData, "15.12.2024").unwrap_err();
        assert!(matches!(err, IngestError::Format(_)));
    }
}
