//! Customer segmentation reports: frequency, breadth, per-country ranking,
//! spend percentiles, first purchases, and order cadence.

use crate::engine::{
    dates, AggCall, Cmp, EngineError, Frame, Predicate, SortKey, Value, WindowSpec,
};
use crate::reports::facts;
use crate::store::RecordStore;

/// Customers with at least three distinct orders, with their first and last
/// order dates.
pub fn frequent_buyers(store: &RecordStore) -> Result<Frame, EngineError> {
    facts::sales_frame(store)
        .group_by(
            &["sales.customer_id"],
            &[
                AggCall::count_distinct("sales.id", "orders"),
                AggCall::min("sales.sale_date", "first_order"),
                AggCall::max("sales.sale_date", "last_order"),
            ],
        )?
        .having(&Predicate::col_lit("orders", Cmp::GtEq, Value::int(3)))?
        .sort_by(&[SortKey::desc("orders"), SortKey::asc("sales.customer_id")])?
        .select(&[
            ("sales.customer_id", "customer_id"),
            ("orders", "orders"),
            ("first_order", "first_order"),
            ("last_order", "last_order"),
        ])
}

/// Customers buying across at least three product categories.
pub fn multi_category_customers(store: &RecordStore) -> Result<Frame, EngineError> {
    facts::line_facts(store)?
        .group_by(
            &["sales.customer_id"],
            &[AggCall::count_distinct("products.category", "categories")],
        )?
        .having(&Predicate::col_lit("categories", Cmp::GtEq, Value::int(3)))?
        .sort_by(&[SortKey::desc("categories"), SortKey::asc("sales.customer_id")])?
        .select(&[("sales.customer_id", "customer_id"), ("categories", "categories")])
}

/// Top 5 customers per country by net spend. Position comes from
/// ROW_NUMBER with a customer-id tie-break, so the per-country row bound
/// holds even when spends tie.
pub fn top_customers_per_country(store: &RecordStore) -> Result<Frame, EngineError> {
    facts::line_facts(store)?
        .group_by(
            &["customers.country", "sales.customer_id"],
            &[AggCall::sum("net_revenue", "spend")],
        )?
        .window(&WindowSpec::row_number(
            &["customers.country"],
            &[SortKey::desc("spend"), SortKey::asc("sales.customer_id")],
            "pos",
        ))?
        .filter(&Predicate::col_lit("pos", Cmp::LtEq, Value::int(5)))?
        .sort_by(&[SortKey::asc("customers.country"), SortKey::asc("pos")])?
        .select(&[
            ("customers.country", "country"),
            ("sales.customer_id", "customer_id"),
            ("spend", "spend"),
            ("pos", "pos"),
        ])
}

fn spend_with_percentile(store: &RecordStore) -> Result<Frame, EngineError> {
    facts::line_facts(store)?
        .group_by(&["sales.customer_id"], &[AggCall::sum("net_revenue", "spend")])?
        .window(&WindowSpec::percent_rank(&[], &[SortKey::asc("spend")], "percentile"))
}

/// Every customer's total net spend with its PERCENT_RANK across all
/// customers (0 = lowest spender, 1 = highest).
pub fn customer_spend_percentile(store: &RecordStore) -> Result<Frame, EngineError> {
    spend_with_percentile(store)?
        .sort_by(&[SortKey::desc("spend"), SortKey::asc("sales.customer_id")])?
        .select(&[
            ("sales.customer_id", "customer_id"),
            ("spend", "spend"),
            ("percentile", "percentile"),
        ])
}

/// Each customer's first sale: earliest sale date, ties broken by sale id.
pub fn first_purchase_per_customer(store: &RecordStore) -> Result<Frame, EngineError> {
    facts::sales_frame(store)
        .window(&WindowSpec::row_number(
            &["sales.customer_id"],
            &[SortKey::asc("sales.sale_date"), SortKey::asc("sales.id")],
            "pos",
        ))?
        .filter(&Predicate::col_lit("pos", Cmp::Eq, Value::int(1)))?
        .sort_by(&[SortKey::asc("sales.customer_id")])?
        .select(&[
            ("sales.customer_id", "customer_id"),
            ("sales.id", "sale_id"),
            ("sales.sale_date", "first_order_date"),
            ("sales.channel", "channel"),
        ])
}

/// Mean days between consecutive orders per customer; customers with a
/// single order have no gap and drop out.
pub fn avg_days_between_orders(store: &RecordStore) -> Result<Frame, EngineError> {
    facts::sales_frame(store)
        .window(&WindowSpec::lag(
            &["sales.customer_id"],
            &[SortKey::asc("sales.sale_date"), SortKey::asc("sales.id")],
            "sales.sale_date",
            "prev_date",
        ))?
        .with_column("gap_days", |r| {
            match (r.value("prev_date").as_date(), r.value("sales.sale_date").as_date()) {
                (Some(prev), Some(cur)) => Value::int(dates::day_diff(prev, cur)),
                _ => Value::Null,
            }
        })?
        .group_by(
            &["sales.customer_id"],
            &[AggCall::avg("gap_days", "avg_days_between"), AggCall::count("gap_days", "gaps")],
        )?
        .having(&Predicate::col_lit("gaps", Cmp::GtEq, Value::int(1)))?
        .sort_by(&[SortKey::asc("avg_days_between"), SortKey::asc("sales.customer_id")])?
        .select(&[
            ("sales.customer_id", "customer_id"),
            ("avg_days_between", "avg_days_between"),
        ])
}

/// Customers in the top spend decile: PERCENT_RANK >= 0.9.
pub fn top_decile_customers(store: &RecordStore) -> Result<Frame, EngineError> {
    spend_with_percentile(store)?
        .filter(&Predicate::col_lit("percentile", Cmp::GtEq, Value::float(0.9)))?
        .sort_by(&[SortKey::desc("spend"), SortKey::asc("sales.customer_id")])?
        .select(&[
            ("sales.customer_id", "customer_id"),
            ("spend", "spend"),
            ("percentile", "percentile"),
        ])
}
