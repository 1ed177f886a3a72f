use sea_query::{Expr, PostgresQueryBuilder, Query};

use crate::models::BodyCompositionRow;
use crate::schema::SilverBodyComposition;

/// SELECT 1 FROM silver_body_composition WHERE measured_at = ? AND source = ? LIMIT 1
pub fn exists(row: &BodyCompositionRow) -> String {
    Query::select()
        .expr(Expr::val(1))
        .from(SilverBodyComposition::Table)
        .and_where(Expr::col(SilverBodyComposition::MeasuredAt).eq(row.measured_at))
        .and_where(Expr::col(SilverBodyComposition::Source).eq(row.source.as_str()))
        .limit(1)
        .to_string(PostgresQueryBuilder)
}

/// INSERT INTO silver_body_composition
///     (measured_at, source, weight_kg, bmi, body_fat_percentage, lean_mass_kg)
/// VALUES (?, ?, ?, ?, ?, ?)
pub fn insert(row: &BodyCompositionRow) -> String {
    Query::insert()
        .into_table(SilverBodyComposition::Table)
        .columns([
            SilverBodyComposition::MeasuredAt,
            SilverBodyComposition::Source,
            SilverBodyComposition::WeightKg,
            SilverBodyComposition::Bmi,
            SilverBodyComposition::BodyFatPercentage,
            SilverBodyComposition::LeanMassKg,
        ])
        .values_panic([
            row.measured_at.into(),
            row.source.as_str().into(),
            row.weight_kg.into(),
            row.bmi.into(),
            row.body_fat_percentage.into(),
            row.lean_mass_kg.into(),
        ])
        .to_string(PostgresQueryBuilder)
}
