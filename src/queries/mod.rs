//! SQL text for the silver tables, built with sea-query

pub mod body_composition;
pub mod ddl;
pub mod heart_data;
pub mod misc_measurements;
pub mod sleep_sessions;

use sea_query::{Expr, IntoColumnRef, SimpleExpr};

/// `col = value`, or `col IS NULL` when the value is missing, so optional key
/// columns still match an existing row
pub(crate) fn eq_or_null<C, V>(col: C, value: Option<V>) -> SimpleExpr
where
    C: IntoColumnRef,
    V: Into<SimpleExpr>,
{
    match value {
        Some(v) => Expr::col(col).eq(v),
        None => Expr::col(col).is_null(),
    }
}
