//! In-memory [`MetricStore`] used by `load --dry-run`
//!
//! Applies the same natural-key checks as the PostgreSQL tables so a dry run
//! reports the inserts and skips a real load would make.
//!
//! Partitions follow PostgreSQL table naming: names share one namespace, so
//! ensuring a partition whose name is already taken by another parent is a
//! no-op, and a heart row is only accepted when a `silver_heart_data`
//! partition covers its date.

use async_trait::async_trait;

use crate::error::{IngestError, Result};
use crate::loaders::{process_all_metrics, IngestSummary};
use crate::models::{BodyCompositionRow, HeartDataRow, MiscMeasurementRow, SleepSegmentRow};
use crate::partition::{MonthlyPartition, PartitionParent};
use crate::payload::RootPayload;
use crate::store::MetricStore;

#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    pub body_composition: Vec<BodyCompositionRow>,
    pub heart_data: Vec<HeartDataRow>,
    pub sleep_segments: Vec<SleepSegmentRow>,
    pub misc_measurements: Vec<MiscMeasurementRow>,
    pub partitions: Vec<MonthlyPartition>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a payload all-or-nothing: work happens on a copy that replaces
    /// `self` only when every metric succeeded.
    pub async fn ingest(&mut self, payload: &RootPayload) -> Result<IngestSummary> {
        let mut staged = self.clone();
        let summary = process_all_metrics(payload, &mut staged).await?;
        *self = staged;
        Ok(summary)
    }

    /// Partition attached under `name`, whichever parent created it first
    pub fn partition(&self, name: &str) -> Option<&MonthlyPartition> {
        self.partitions.iter().find(|p| p.name == name)
    }

    fn heart_partition_covers(&self, row: &HeartDataRow) -> bool {
        self.partitions.iter().any(|p| {
            p.parent == PartitionParent::SilverHeartData && p.start <= row.date && row.date < p.end
        })
    }

    pub fn row_count(&self) -> usize {
        self.body_composition.len()
            + self.heart_data.len()
            + self.sleep_segments.len()
            + self.misc_measurements.len()
    }
}

#[async_trait]
impl MetricStore for MemoryStore {
    async fn body_composition_exists(&mut self, row: &BodyCompositionRow) -> Result<bool> {
        Ok(self.body_composition.iter().any(|r| r.same_key(row)))
    }

    async fn insert_body_composition(&mut self, row: &BodyCompositionRow) -> Result<()> {
        self.body_composition.push(row.clone());
        Ok(())
    }

    async fn heart_data_exists(&mut self, row: &HeartDataRow) -> Result<bool> {
        Ok(self.heart_data.iter().any(|r| r.same_key(row)))
    }

    async fn insert_heart_data(&mut self, row: &HeartDataRow) -> Result<()> {
        if !self.heart_partition_covers(row) {
            return Err(IngestError::MissingPartition {
                table: PartitionParent::SilverHeartData.table_name(),
                date: row.date,
            });
        }
        self.heart_data.push(row.clone());
        Ok(())
    }

    async fn sleep_segment_exists(&mut self, row: &SleepSegmentRow) -> Result<bool> {
        Ok(self.sleep_segments.iter().any(|r| r.same_key(row)))
    }

    async fn insert_sleep_segment(&mut self, row: &SleepSegmentRow) -> Result<()> {
        self.sleep_segments.push(row.clone());
        Ok(())
    }

    async fn misc_measurement_exists(&mut self, row: &MiscMeasurementRow) -> Result<bool> {
        Ok(self.misc_measurements.iter().any(|r| r.same_key(row)))
    }

    async fn insert_misc_measurement(&mut self, row: &MiscMeasurementRow) -> Result<()> {
        self.misc_measurements.push(row.clone());
        Ok(())
    }

    async fn ensure_partition(&mut self, partition: &MonthlyPartition) -> Result<()> {
        // CREATE TABLE IF NOT EXISTS: a taken name is skipped, even under another parent
        if self.partition(&partition.name).is_none() {
            self.partitions.push(partition.clone());
        }
        Ok(())
    }
}
