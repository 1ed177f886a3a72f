use sea_query::Iden;

/// Body composition snapshots, one row per (measured_at, source)
#[derive(Iden, Clone, Copy)]
pub enum SilverBodyComposition {
    Table,
    Id,
    MeasuredAt,
    Source,
    WeightKg,
    Bmi,
    BodyFatPercentage,
    LeanMassKg,
}

/// Heart data rows, range-partitioned by `date`
#[derive(Iden, Clone, Copy)]
pub enum SilverHeartData {
    Table,
    Id,
    Qty,
    RecordedAt,
    Date,
    Source,
    Context,
    MinBpm,
    MaxBpm,
    AvgBpm,
    HealthContext,
}

/// Second partitioned parent with the heart data layout
#[derive(Iden, Clone, Copy)]
pub enum HeartRateDetailed {
    Table,
}

/// Sleep segments attributed to a sleep date
#[derive(Iden, Clone, Copy)]
pub enum SilverSleepSessions {
    Table,
    Id,
    SessionStart,
    SessionEnd,
    DurationHours,
    Stage,
    Source,
    SleepDate,
}

/// Miscellaneous measurements (respiratory rate)
#[derive(Iden, Clone, Copy)]
pub enum SilverMiscMeasurments {
    Table,
    Id,
    Qty,
    Source,
    MeasuredAt,
    MeasurementType,
    MeasuredAtTs,
}
