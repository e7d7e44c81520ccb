//! Shared building blocks for the catalog: typed scans lifted into frames,
//! the line-level fact join, and the per-sale rollup. Net revenue, gross
//! revenue and profit are derived here exactly once so every report agrees
//! on what they mean.

use crate::engine::{dates, AggCall, EngineError, Frame, Row, Value};
use crate::store::RecordStore;

pub fn customers_frame(store: &RecordStore) -> Frame {
    Frame::scan(
        "customers",
        &["id", "country", "signup_date"],
        store.customers().map(|c| {
            vec![Value::int(c.id), Value::str(&c.country), Value::date(c.signup_date)]
        }),
    )
}

pub fn products_frame(store: &RecordStore) -> Frame {
    Frame::scan(
        "products",
        &["id", "brand", "category", "cost_price"],
        store.products().map(|p| {
            vec![
                Value::int(p.id),
                Value::str(&p.brand),
                Value::str(&p.category),
                Value::float(p.cost_price),
            ]
        }),
    )
}

pub fn sales_frame(store: &RecordStore) -> Frame {
    Frame::scan(
        "sales",
        &["id", "customer_id", "sale_date", "channel", "campaign"],
        store.sales().map(|s| {
            vec![
                Value::int(s.id),
                Value::int(s.customer_id),
                Value::date(s.sale_date),
                Value::str(&s.channel),
                Value::str(&s.campaign),
            ]
        }),
    )
}

pub fn sale_items_frame(store: &RecordStore) -> Frame {
    Frame::scan(
        "sale_items",
        &["sale_id", "product_id", "quantity", "unit_price", "discount"],
        store.sale_items().map(|i| {
            vec![
                Value::int(i.sale_id),
                Value::int(i.product_id),
                Value::int(i.quantity),
                Value::float(i.unit_price),
                Value::float(i.discount),
            ]
        }),
    )
}

fn times(row: &Row, a: &str, b: &str) -> Value {
    match (row.value(a).as_f64(), row.value(b).as_f64()) {
        (Some(x), Some(y)) => Value::float(x * y),
        _ => Value::Null,
    }
}

fn minus(row: &Row, a: &str, b: &str) -> Value {
    match (row.value(a).as_f64(), row.value(b).as_f64()) {
        (Some(x), Some(y)) => Value::float(x - y),
        _ => Value::Null,
    }
}

pub(crate) fn month_col(row: &Row, date_col: &str) -> Value {
    match row.value(date_col).as_date() {
        Some(d) => Value::date(dates::month_of(d)),
        None => Value::Null,
    }
}

/// One row per sale line, joined through sale, product and customer, with
/// the derived metric columns attached:
///
/// - `gross_revenue` = quantity * unit_price (discount omitted)
/// - `net_revenue`   = gross_revenue - discount
/// - `profit`        = net_revenue - quantity * cost_price
/// - `line_cost`     = quantity * cost_price
/// - `sale_month`, `signup_month` = first-of-month truncations
pub fn line_facts(store: &RecordStore) -> Result<Frame, EngineError> {
    sale_items_frame(store)
        .inner_join(&sales_frame(store), &[("sale_items.sale_id", "sales.id")])?
        .inner_join(&products_frame(store), &[("sale_items.product_id", "products.id")])?
        .inner_join(&customers_frame(store), &[("sales.customer_id", "customers.id")])?
        .with_column("gross_revenue", |r| times(r, "sale_items.quantity", "sale_items.unit_price"))?
        .with_column("net_revenue", |r| minus(r, "gross_revenue", "sale_items.discount"))?
        .with_column("line_cost", |r| times(r, "sale_items.quantity", "products.cost_price"))?
        .with_column("profit", |r| minus(r, "net_revenue", "line_cost"))?
        .with_column("sale_month", |r| month_col(r, "sales.sale_date"))?
        .with_column("signup_month", |r| month_col(r, "customers.signup_date"))
}

/// One row per sale: line facts rolled up to the sale, keeping the sale's
/// descriptive columns (all functionally dependent on the sale id).
pub fn sale_facts(store: &RecordStore) -> Result<Frame, EngineError> {
    line_facts(store)?.group_by(
        &[
            "sales.id",
            "sales.customer_id",
            "sales.channel",
            "sales.campaign",
            "sales.sale_date",
            "sale_month",
            "customers.country",
        ],
        &[
            AggCall::sum("net_revenue", "sale_revenue"),
            AggCall::sum("sale_items.quantity", "sale_quantity"),
        ],
    )
}
