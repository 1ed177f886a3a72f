use sea_query::{Expr, PostgresQueryBuilder, Query};

use super::eq_or_null;
use crate::models::HeartDataRow;
use crate::schema::SilverHeartData;

/// SELECT 1 FROM silver_heart_data
/// WHERE recorded_at = ? AND source = ? AND context = ? LIMIT 1
pub fn exists(row: &HeartDataRow) -> String {
    Query::select()
        .expr(Expr::val(1))
        .from(SilverHeartData::Table)
        .and_where(Expr::col(SilverHeartData::RecordedAt).eq(row.recorded_at))
        .and_where(eq_or_null(SilverHeartData::Source, row.source.as_deref()))
        .and_where(Expr::col(SilverHeartData::Context).eq(row.context.as_str()))
        .limit(1)
        .to_string(PostgresQueryBuilder)
}

/// INSERT INTO silver_heart_data
///     (qty, recorded_at, date, source, context, min_bpm, max_bpm, health_context, avg_bpm)
/// VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
pub fn insert(row: &HeartDataRow) -> String {
    Query::insert()
        .into_table(SilverHeartData::Table)
        .columns([
            SilverHeartData::Qty,
            SilverHeartData::RecordedAt,
            SilverHeartData::Date,
            SilverHeartData::Source,
            SilverHeartData::Context,
            SilverHeartData::MinBpm,
            SilverHeartData::MaxBpm,
            SilverHeartData::HealthContext,
            SilverHeartData::AvgBpm,
        ])
        .values_panic([
            row.qty.into(),
            row.recorded_at.into(),
            row.date.into(),
            row.source.clone().into(),
            row.context.as_str().into(),
            row.min_bpm.into(),
            row.max_bpm.into(),
            row.health_context.clone().into(),
            row.avg_bpm.into(),
        ])
        .to_string(PostgresQueryBuilder)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::HeartContext;
    use crate::timestamp::parse_any_datetime;
    use chrono::NaiveDate;

    fn row(source: Option<&str>) -> HeartDataRow {
        HeartDataRow {
            recorded_at: parse_any_datetime("2024-03-01 10:00:00 +0100").unwrap(),
            date: NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
            source: source.map(str::to_string),
            context: HeartContext::HeartRate,
            qty: None,
            avg_bpm: Some(61.5),
            min_bpm: Some(55.0),
            max_bpm: Some(70.0),
            health_context: Some("resting".to_string()),
        }
    }

    #[test]
    fn test_exists_uses_context_literal() {
        let sql = exists(&row(Some("Watch")));
        assert!(sql.contains("\"context\" = 'heart_rate'"));
        assert!(sql.contains("\"source\" = 'Watch'"));
    }

    #[test]
    fn test_exists_matches_missing_source() {
        let sql = exists(&row(None));
        assert!(sql.contains("\"source\" IS NULL"));
    }

    #[test]
    fn test_insert_targets_parent_table() {
        let sql = insert(&row(Some("Watch")));
        assert!(sql.starts_with("INSERT INTO \"silver_heart_data\""));
        assert!(sql.contains("'2024-03-01'"));
        assert!(sql.contains("'resting'"));
    }
}
