//! Time-series reports over customer and cohort months: running spend,
//! month-over-month deltas, the growth chain, and signup-cohort behavior.

use std::collections::HashMap;

use chrono::NaiveDate;

use crate::engine::{
    dates, AggCall, Cmp, EngineError, Frame, Predicate, Row, SortKey, Value, WindowSpec,
};
use crate::reports::facts;
use crate::store::RecordStore;

fn monthly_spend(store: &RecordStore) -> Result<Frame, EngineError> {
    facts::line_facts(store)?.group_by(
        &["sales.customer_id", "sale_month"],
        &[AggCall::sum("net_revenue", "monthly_spend")],
    )
}

/// Per-customer monthly spend with a running total.
pub fn customer_cumulative_spend(store: &RecordStore) -> Result<Frame, EngineError> {
    monthly_spend(store)?
        .window(&WindowSpec::cum_sum(
            &["sales.customer_id"],
            &[SortKey::asc("sale_month")],
            "monthly_spend",
            "cumulative_spend",
        ))?
        .sort_by(&[SortKey::asc("sales.customer_id"), SortKey::asc("sale_month")])?
        .select(&[
            ("sales.customer_id", "customer_id"),
            ("sale_month", "month"),
            ("monthly_spend", "monthly_spend"),
            ("cumulative_spend", "cumulative_spend"),
        ])
}

/// Per-customer monthly spend against the previous active month. The delta
/// is null on a customer's first month.
pub fn customer_mom_spend_delta(store: &RecordStore) -> Result<Frame, EngineError> {
    monthly_spend(store)?
        .window(&WindowSpec::lag(
            &["sales.customer_id"],
            &[SortKey::asc("sale_month")],
            "monthly_spend",
            "prev_spend",
        ))?
        .with_column("delta", |r| {
            match (r.value("monthly_spend").as_f64(), r.value("prev_spend").as_f64()) {
                (Some(cur), Some(prev)) => Value::float(cur - prev),
                _ => Value::Null,
            }
        })?
        .sort_by(&[SortKey::asc("sales.customer_id"), SortKey::asc("sale_month")])?
        .select(&[
            ("sales.customer_id", "customer_id"),
            ("sale_month", "month"),
            ("monthly_spend", "monthly_spend"),
            ("prev_spend", "prev_spend"),
            ("delta", "delta"),
        ])
}

/// Month-over-month quantity growth of at least 20%, chained month by
/// month. A customer's chain starts only at the globally earliest month in
/// the data and advances strictly one calendar month at a time; a gap kills
/// the chain for that customer at that point. The threshold filters the
/// output, it does not break the chain. Realized as one materialized
/// (customer, month) sequence diffed adjacently, not as recursion.
pub fn mom_quantity_growth(store: &RecordStore) -> Result<Frame, EngineError> {
    let monthly = facts::line_facts(store)?
        .group_by(
            &["sales.customer_id", "sale_month"],
            &[AggCall::sum("sale_items.quantity", "quantity")],
        )?
        .sort_by(&[SortKey::asc("sales.customer_id"), SortKey::asc("sale_month")])?;

    let chain_start: Option<NaiveDate> =
        monthly.rows().iter().filter_map(|r| r.value("sale_month").as_date()).min();

    let columns = vec![
        "customer_id".to_string(),
        "month".to_string(),
        "quantity".to_string(),
        "prev_quantity".to_string(),
        "growth".to_string(),
        "pct_growth".to_string(),
    ];
    let mut out: Vec<Row> = Vec::new();

    // (customer, month, quantity, chain alive through this row)
    let mut prev: Option<(i64, NaiveDate, i64, bool)> = None;
    for row in monthly.rows() {
        let (Some(customer), Some(month), Some(qty)) = (
            row.value("sales.customer_id").as_i64(),
            row.value("sale_month").as_date(),
            row.value("quantity").as_i64(),
        ) else {
            continue;
        };

        let alive = match &prev {
            Some((prev_customer, prev_month, prev_qty, prev_alive))
                if *prev_customer == customer =>
            {
                if *prev_alive && dates::month_diff(*prev_month, month) == 1 {
                    let growth = qty - prev_qty;
                    if *prev_qty > 0 && growth as f64 / *prev_qty as f64 >= 0.2 {
                        out.push(Row::from_pairs([
                            ("customer_id".to_string(), Value::int(customer)),
                            ("month".to_string(), Value::date(month)),
                            ("quantity".to_string(), Value::int(qty)),
                            ("prev_quantity".to_string(), Value::int(*prev_qty)),
                            ("growth".to_string(), Value::int(growth)),
                            (
                                "pct_growth".to_string(),
                                Value::float(growth as f64 / *prev_qty as f64),
                            ),
                        ]));
                    }
                    true
                } else {
                    false
                }
            }
            // first month seen for this customer
            _ => chain_start == Some(month),
        };
        prev = Some((customer, month, qty, alive));
    }

    // rows already come out ordered by (customer, month)
    Ok(Frame::from_parts(columns, out))
}

/// Signup-month cohort crossed with sale month: net revenue and distinct
/// active customers.
pub fn cohort_monthly_revenue(store: &RecordStore) -> Result<Frame, EngineError> {
    facts::line_facts(store)?
        .group_by(
            &["signup_month", "sale_month"],
            &[
                AggCall::sum("net_revenue", "revenue"),
                AggCall::count_distinct("sales.customer_id", "active_customers"),
            ],
        )?
        .sort_by(&[SortKey::asc("signup_month"), SortKey::asc("sale_month")])?
        .select(&[
            ("signup_month", "cohort_month"),
            ("sale_month", "sale_month"),
            ("revenue", "revenue"),
            ("active_customers", "active_customers"),
        ])
}

/// Share of each signup cohort that ordered more than once. Cohorts with no
/// repeat buyers (or no buyers at all) still appear, at rate 0.
pub fn cohort_repeat_rate(store: &RecordStore) -> Result<Frame, EngineError> {
    let repeat = facts::sales_frame(store)
        .group_by(&["sales.customer_id"], &[AggCall::count_distinct("sales.id", "orders")])?
        .having(&Predicate::col_lit("orders", Cmp::GtEq, Value::int(2)))?
        .inner_join(&facts::customers_frame(store), &[("sales.customer_id", "customers.id")])?
        .with_column("cohort_month", |r| facts::month_col(r, "customers.signup_date"))?
        .group_by(&["cohort_month"], &[AggCall::count_star("repeat_buyers")])?;

    let by_cohort: HashMap<Value, Value> = repeat
        .rows()
        .iter()
        .map(|r| (r.value("cohort_month"), r.value("repeat_buyers")))
        .collect();

    facts::customers_frame(store)
        .with_column("cohort_month", |r| facts::month_col(r, "customers.signup_date"))?
        .group_by(&["cohort_month"], &[AggCall::count_star("cohort_size")])?
        .with_column("repeat_buyers", move |r| {
            by_cohort.get(&r.value("cohort_month")).cloned().unwrap_or(Value::int(0))
        })?
        .with_column("repeat_rate", |r| {
            Value::ratio(&r.value("repeat_buyers"), &r.value("cohort_size"))
        })?
        .sort_by(&[SortKey::asc("cohort_month")])?
        .select(&[
            ("cohort_month", "cohort_month"),
            ("cohort_size", "cohort_size"),
            ("repeat_buyers", "repeat_buyers"),
            ("repeat_rate", "repeat_rate"),
        ])
}
