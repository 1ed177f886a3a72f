use sea_query::{Expr, PostgresQueryBuilder, Query};

use super::eq_or_null;
use crate::models::MiscMeasurementRow;
use crate::schema::SilverMiscMeasurments;

/// SELECT 1 FROM silver_misc_measurments
/// WHERE measured_at = ? AND qty = ? AND measurement_type = ? AND source = ? LIMIT 1
pub fn exists(row: &MiscMeasurementRow) -> String {
    Query::select()
        .expr(Expr::val(1))
        .from(SilverMiscMeasurments::Table)
        .and_where(Expr::col(SilverMiscMeasurments::MeasuredAt).eq(row.measured_at))
        .and_where(eq_or_null(SilverMiscMeasurments::Qty, row.qty))
        .and_where(
            Expr::col(SilverMiscMeasurments::MeasurementType).eq(row.measurement_type.as_str()),
        )
        .and_where(eq_or_null(SilverMiscMeasurments::Source, row.source.as_deref()))
        .limit(1)
        .to_string(PostgresQueryBuilder)
}

/// INSERT INTO silver_misc_measurments
///     (qty, source, measured_at, measurement_type, measured_at_ts)
/// VALUES (?, ?, ?, ?, ?)
pub fn insert(row: &MiscMeasurementRow) -> String {
    Query::insert()
        .into_table(SilverMiscMeasurments::Table)
        .columns([
            SilverMiscMeasurments::Qty,
            SilverMiscMeasurments::Source,
            SilverMiscMeasurments::MeasuredAt,
            SilverMiscMeasurments::MeasurementType,
            SilverMiscMeasurments::MeasuredAtTs,
        ])
        .values_panic([
            row.qty.into(),
            row.source.clone().into(),
            row.measured_at.into(),
            row.measurement_type.as_str().into(),
            row.measured_at_ts.into(),
        ])
        .to_string(PostgresQueryBuilder)
}
