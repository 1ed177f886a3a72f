use sea_query::{ColumnDef, Index, PostgresQueryBuilder, Table, TableCreateStatement};

use crate::partition::MonthlyPartition;
use crate::schema::{
    HeartRateDetailed, SilverBodyComposition, SilverHeartData, SilverMiscMeasurments,
    SilverSleepSessions,
};

/// CREATE TABLE IF NOT EXISTS silver_body_composition (
///     id BIGSERIAL PRIMARY KEY,
///     measured_at TIMESTAMPTZ NOT NULL,
///     source TEXT NOT NULL,
///     weight_kg, bmi, body_fat_percentage, lean_mass_kg DOUBLE PRECISION
/// )
pub fn create_body_composition_table() -> String {
    Table::create()
        .table(SilverBodyComposition::Table)
        .if_not_exists()
        .col(
            ColumnDef::new(SilverBodyComposition::Id)
                .big_integer()
                .primary_key()
                .auto_increment(),
        )
        .col(
            ColumnDef::new(SilverBodyComposition::MeasuredAt)
                .timestamp_with_time_zone()
                .not_null(),
        )
        .col(ColumnDef::new(SilverBodyComposition::Source).text().not_null())
        .col(ColumnDef::new(SilverBodyComposition::WeightKg).double())
        .col(ColumnDef::new(SilverBodyComposition::Bmi).double())
        .col(ColumnDef::new(SilverBodyComposition::BodyFatPercentage).double())
        .col(ColumnDef::new(SilverBodyComposition::LeanMassKg).double())
        .to_string(PostgresQueryBuilder)
}

/// CREATE TABLE IF NOT EXISTS silver_sleep_sessions (
///     id BIGSERIAL PRIMARY KEY,
///     session_start TIMESTAMPTZ NOT NULL,
///     session_end TIMESTAMPTZ NOT NULL,
///     duration_hours DOUBLE PRECISION,
///     stage TEXT,
///     source TEXT,
///     sleep_date DATE NOT NULL
/// )
pub fn create_sleep_sessions_table() -> String {
    Table::create()
        .table(SilverSleepSessions::Table)
        .if_not_exists()
        .col(
            ColumnDef::new(SilverSleepSessions::Id)
                .big_integer()
                .primary_key()
                .auto_increment(),
        )
        .col(
            ColumnDef::new(SilverSleepSessions::SessionStart)
                .timestamp_with_time_zone()
                .not_null(),
        )
        .col(
            ColumnDef::new(SilverSleepSessions::SessionEnd)
                .timestamp_with_time_zone()
                .not_null(),
        )
        .col(ColumnDef::new(SilverSleepSessions::DurationHours).double())
        .col(ColumnDef::new(SilverSleepSessions::Stage).text())
        .col(ColumnDef::new(SilverSleepSessions::Source).text())
        .col(ColumnDef::new(SilverSleepSessions::SleepDate).date().not_null())
        .to_string(PostgresQueryBuilder)
}

/// CREATE TABLE IF NOT EXISTS silver_misc_measurments (
///     id BIGSERIAL PRIMARY KEY,
///     qty DOUBLE PRECISION,
///     source TEXT,
///     measured_at TIMESTAMPTZ NOT NULL,
///     measurement_type TEXT NOT NULL,
///     measured_at_ts BIGINT NOT NULL
/// )
pub fn create_misc_measurements_table() -> String {
    Table::create()
        .table(SilverMiscMeasurments::Table)
        .if_not_exists()
        .col(
            ColumnDef::new(SilverMiscMeasurments::Id)
                .big_integer()
                .primary_key()
                .auto_increment(),
        )
        .col(ColumnDef::new(SilverMiscMeasurments::Qty).double())
        .col(ColumnDef::new(SilverMiscMeasurments::Source).text())
        .col(
            ColumnDef::new(SilverMiscMeasurments::MeasuredAt)
                .timestamp_with_time_zone()
                .not_null(),
        )
        .col(
            ColumnDef::new(SilverMiscMeasurments::MeasurementType)
                .text()
                .not_null(),
        )
        .col(
            ColumnDef::new(SilverMiscMeasurments::MeasuredAtTs)
                .big_integer()
                .not_null(),
        )
        .to_string(PostgresQueryBuilder)
}

/// Heart data column layout shared by both partitioned parents.
/// The primary key includes `date` because PostgreSQL requires the partition
/// key in every unique constraint of a partitioned table.
fn heart_data_layout(stmt: &mut TableCreateStatement) -> &mut TableCreateStatement {
    stmt.if_not_exists()
        .col(
            ColumnDef::new(SilverHeartData::Id)
                .big_integer()
                .not_null()
                .auto_increment(),
        )
        .col(ColumnDef::new(SilverHeartData::Qty).double())
        .col(
            ColumnDef::new(SilverHeartData::RecordedAt)
                .timestamp_with_time_zone()
                .not_null(),
        )
        .col(ColumnDef::new(SilverHeartData::Date).date().not_null())
        .col(ColumnDef::new(SilverHeartData::Source).text())
        .col(ColumnDef::new(SilverHeartData::Context).text().not_null())
        .col(ColumnDef::new(SilverHeartData::MinBpm).double())
        .col(ColumnDef::new(SilverHeartData::MaxBpm).double())
        .col(ColumnDef::new(SilverHeartData::AvgBpm).double())
        .col(ColumnDef::new(SilverHeartData::HealthContext).text())
        .primary_key(
            Index::create()
                .col(SilverHeartData::Id)
                .col(SilverHeartData::Date),
        )
}

/// CREATE TABLE IF NOT EXISTS silver_heart_data (...) PARTITION BY RANGE ("date")
pub fn create_heart_data_table() -> String {
    let sql = heart_data_layout(Table::create().table(SilverHeartData::Table))
        .to_string(PostgresQueryBuilder);
    format!("{sql} PARTITION BY RANGE (\"date\")")
}

/// CREATE TABLE IF NOT EXISTS heart_rate_detailed (...) PARTITION BY RANGE ("date")
pub fn create_heart_rate_detailed_table() -> String {
    let sql = heart_data_layout(Table::create().table(HeartRateDetailed::Table))
        .to_string(PostgresQueryBuilder);
    format!("{sql} PARTITION BY RANGE (\"date\")")
}

/// CREATE INDEX IF NOT EXISTS idx_body_composition_key ON silver_body_composition(measured_at, source)
pub fn create_body_composition_key_index() -> String {
    Index::create()
        .if_not_exists()
        .name("idx_body_composition_key")
        .table(SilverBodyComposition::Table)
        .col(SilverBodyComposition::MeasuredAt)
        .col(SilverBodyComposition::Source)
        .to_string(PostgresQueryBuilder)
}

/// CREATE INDEX IF NOT EXISTS idx_heart_data_key ON silver_heart_data(recorded_at, context)
pub fn create_heart_data_key_index() -> String {
    Index::create()
        .if_not_exists()
        .name("idx_heart_data_key")
        .table(SilverHeartData::Table)
        .col(SilverHeartData::RecordedAt)
        .col(SilverHeartData::Context)
        .to_string(PostgresQueryBuilder)
}

/// CREATE INDEX IF NOT EXISTS idx_sleep_sessions_key ON silver_sleep_sessions(session_start, sleep_date)
pub fn create_sleep_sessions_key_index() -> String {
    Index::create()
        .if_not_exists()
        .name("idx_sleep_sessions_key")
        .table(SilverSleepSessions::Table)
        .col(SilverSleepSessions::SessionStart)
        .col(SilverSleepSessions::SleepDate)
        .to_string(PostgresQueryBuilder)
}

/// CREATE INDEX IF NOT EXISTS idx_misc_measurements_ts ON silver_misc_measurments(measured_at_ts)
pub fn create_misc_measurements_ts_index() -> String {
    Index::create()
        .if_not_exists()
        .name("idx_misc_measurements_ts")
        .table(SilverMiscMeasurments::Table)
        .col(SilverMiscMeasurments::MeasuredAtTs)
        .to_string(PostgresQueryBuilder)
}

/// CREATE TABLE IF NOT EXISTS <name> PARTITION OF <parent> FOR VALUES FROM ('<start>') TO ('<end>')
///
/// sea-query has no partition DDL, so this one is formatted by hand. Every
/// interpolated value comes from [`MonthlyPartition`], never from a request.
pub fn create_monthly_partition(partition: &MonthlyPartition) -> String {
    format!(
        "CREATE TABLE IF NOT EXISTS \"{}\" PARTITION OF \"{}\" FOR VALUES FROM ('{}') TO ('{}')",
        partition.name,
        partition.parent.table_name(),
        partition.start.format("%Y-%m-%d"),
        partition.end.format("%Y-%m-%d"),
    )
}

/// Every statement `init-schema` runs, in order
pub fn all_statements() -> Vec<String> {
    vec![
        create_body_composition_table(),
        create_sleep_sessions_table(),
        create_misc_measurements_table(),
        create_heart_data_table(),
        create_heart_rate_detailed_table(),
        create_body_composition_key_index(),
        create_heart_data_key_index(),
        create_sleep_sessions_key_index(),
        create_misc_measurements_ts_index(),
    ]
}
