//! Storage seam between the loaders and the database
//!
//! Loaders only ever ask "does an equivalent row exist?", "insert this row"
//! and "make sure this partition exists". [`crate::db_postgres::PgStore`]
//! answers those inside one PostgreSQL transaction;
//! [`crate::memory_store::MemoryStore`] answers them in memory for dry runs.

use async_trait::async_trait;

use crate::error::Result;
use crate::models::{BodyCompositionRow, HeartDataRow, MiscMeasurementRow, SleepSegmentRow};
use crate::partition::MonthlyPartition;

#[async_trait]
pub trait MetricStore: Send {
    async fn body_composition_exists(&mut self, row: &BodyCompositionRow) -> Result<bool>;
    async fn insert_body_composition(&mut self, row: &BodyCompositionRow) -> Result<()>;

    async fn heart_data_exists(&mut self, row: &HeartDataRow) -> Result<bool>;
    async fn insert_heart_data(&mut self, row: &HeartDataRow) -> Result<()>;

    async fn sleep_segment_exists(&mut self, row: &SleepSegmentRow) -> Result<bool>;
    async fn insert_sleep_segment(&mut self, row: &SleepSegmentRow) -> Result<()>;

    async fn misc_measurement_exists(&mut self, row: &MiscMeasurementRow) -> Result<bool>;
    async fn insert_misc_measurement(&mut self, row: &MiscMeasurementRow) -> Result<()>;

    /// Create the partition if it is not there yet; a no-op otherwise
    async fn ensure_partition(&mut self, partition: &MonthlyPartition) -> Result<()>;
}
