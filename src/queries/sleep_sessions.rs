use sea_query::{Expr, PostgresQueryBuilder, Query};

use super::eq_or_null;
use crate::models::SleepSegmentRow;
use crate::schema::SilverSleepSessions;

/// SELECT 1 FROM silver_sleep_sessions
/// WHERE session_start = ? AND session_end = ? AND duration_hours = ?
///   AND stage = ? AND sleep_date = ? LIMIT 1
pub fn exists(row: &SleepSegmentRow) -> String {
    Query::select()
        .expr(Expr::val(1))
        .from(SilverSleepSessions::Table)
        .and_where(Expr::col(SilverSleepSessions::SessionStart).eq(row.session_start))
        .and_where(Expr::col(SilverSleepSessions::SessionEnd).eq(row.session_end))
        .and_where(eq_or_null(SilverSleepSessions::DurationHours, row.duration_hours))
        .and_where(eq_or_null(SilverSleepSessions::Stage, row.stage.as_deref()))
        .and_where(Expr::col(SilverSleepSessions::SleepDate).eq(row.sleep_date))
        .limit(1)
        .to_string(PostgresQueryBuilder)
}

/// INSERT INTO silver_sleep_sessions
///     (session_start, session_end, duration_hours, stage, source, sleep_date)
/// VALUES (?, ?, ?, ?, ?, ?)
pub fn insert(row: &SleepSegmentRow) -> String {
    Query::insert()
        .into_table(SilverSleepSessions::Table)
        .columns([
            SilverSleepSessions::SessionStart,
            SilverSleepSessions::SessionEnd,
            SilverSleepSessions::DurationHours,
            SilverSleepSessions::Stage,
            SilverSleepSessions::Source,
            SilverSleepSessions::SleepDate,
        ])
        .values_panic([
            row.session_start.into(),
            row.session_end.into(),
            row.duration_hours.into(),
            row.stage.clone().into(),
            row.source.clone().into(),
            row.sleep_date.into(),
        ])
        .to_string(PostgresQueryBuilder)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::timestamp::parse_any_datetime;
    use chrono::NaiveDate;

    #[test]
    fn test_exists_without_stage() {
        let row = SleepSegmentRow {
            session_start: parse_any_datetime("2024-05-10 23:00:00 +0200").unwrap(),
            session_end: parse_any_datetime("2024-05-11 01:00:00 +0200").unwrap(),
            duration_hours: Some(2.0),
            stage: None,
            source: Some("Watch".to_string()),
            sleep_date: NaiveDate::from_ymd_opt(2024, 5, 10).unwrap(),
        };

        let sql = exists(&row);
        assert!(sql.contains("\"stage\" IS NULL"));
        assert!(sql.contains("\"sleep_date\" = '2024-05-10'"));
        // source is stored but is not part of the key
        assert!(!sql.contains("\"source\""));
    }
}
