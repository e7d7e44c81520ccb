//! Product and category reports. The two ranking reports (top products
//! overall and per category) rank by gross revenue with discount omitted,
//! unlike the rest of the catalog; the source queries did the same and the
//! difference is kept.

use crate::engine::{AggCall, Cmp, EngineError, Frame, Predicate, SortKey, Value, WindowSpec};
use crate::reports::facts;
use crate::store::RecordStore;

/// Product ranking by gross revenue, competition-ranked, RANK <= 10.
pub fn top_products_by_gross_revenue(store: &RecordStore) -> Result<Frame, EngineError> {
    facts::line_facts(store)?
        .group_by(
            &["products.id", "products.brand", "products.category"],
            &[AggCall::sum("gross_revenue", "revenue")],
        )?
        .window(&WindowSpec::rank(&[], &[SortKey::desc("revenue")], "rank"))?
        .filter(&Predicate::col_lit("rank", Cmp::LtEq, Value::int(10)))?
        .sort_by(&[SortKey::asc("rank"), SortKey::asc("products.id")])?
        .select(&[
            ("products.id", "product_id"),
            ("products.brand", "brand"),
            ("products.category", "category"),
            ("revenue", "revenue"),
            ("rank", "rank"),
        ])
}

/// Profit margin per category: SUM(profit) / SUM(net revenue), null when a
/// category's revenue nets out to zero.
pub fn category_profit_margin(store: &RecordStore) -> Result<Frame, EngineError> {
    facts::line_facts(store)?
        .group_by(
            &["products.category"],
            &[AggCall::sum("profit", "profit"), AggCall::sum("net_revenue", "revenue")],
        )?
        .with_column("margin", |r| Value::ratio(&r.value("profit"), &r.value("revenue")))?
        .sort_by(&[SortKey::desc("margin"), SortKey::asc("products.category")])?
        .select(&[
            ("products.category", "category"),
            ("profit", "profit"),
            ("revenue", "revenue"),
            ("margin", "margin"),
        ])
}

/// Brands whose summed profit is negative.
pub fn loss_making_brands(store: &RecordStore) -> Result<Frame, EngineError> {
    facts::line_facts(store)?
        .group_by(&["products.brand"], &[AggCall::sum("profit", "profit")])?
        .having(&Predicate::col_lit("profit", Cmp::Lt, Value::int(0)))?
        .sort_by(&[SortKey::asc("profit"), SortKey::asc("products.brand")])?
        .select(&[("products.brand", "brand"), ("profit", "profit")])
}

/// Each product's net revenue and its share of the category total.
pub fn product_share_of_category(store: &RecordStore) -> Result<Frame, EngineError> {
    let per_product = facts::line_facts(store)?.group_by(
        &["products.id", "products.category"],
        &[AggCall::sum("net_revenue", "revenue")],
    )?;
    let per_category = facts::line_facts(store)?
        .group_by(&["products.category"], &[AggCall::sum("net_revenue", "category_revenue")])?
        .select(&[
            ("products.category", "category_key"),
            ("category_revenue", "category_revenue"),
        ])?;
    per_product
        .inner_join(&per_category, &[("products.category", "category_key")])?
        .with_column("share", |r| {
            Value::ratio(&r.value("revenue"), &r.value("category_revenue"))
        })?
        .sort_by(&[
            SortKey::asc("products.category"),
            SortKey::desc("share"),
            SortKey::asc("products.id"),
        ])?
        .select(&[
            ("products.id", "product_id"),
            ("products.category", "category"),
            ("revenue", "revenue"),
            ("category_revenue", "category_revenue"),
            ("share", "share"),
        ])
}

/// Top 3 products inside each category by gross revenue.
pub fn top_products_per_category(store: &RecordStore) -> Result<Frame, EngineError> {
    facts::line_facts(store)?
        .group_by(
            &["products.category", "products.id", "products.brand"],
            &[AggCall::sum("gross_revenue", "revenue")],
        )?
        .window(&WindowSpec::rank(&["products.category"], &[SortKey::desc("revenue")], "rank"))?
        .filter(&Predicate::col_lit("rank", Cmp::LtEq, Value::int(3)))?
        .sort_by(&[
            SortKey::asc("products.category"),
            SortKey::asc("rank"),
            SortKey::asc("products.id"),
        ])?
        .select(&[
            ("products.category", "category"),
            ("products.id", "product_id"),
            ("products.brand", "brand"),
            ("revenue", "revenue"),
            ("rank", "rank"),
        ])
}

/// Quantity share of each category within its channel.
pub fn category_share_by_channel(store: &RecordStore) -> Result<Frame, EngineError> {
    let per = facts::line_facts(store)?.group_by(
        &["sales.channel", "products.category"],
        &[AggCall::sum("sale_items.quantity", "quantity")],
    )?;
    let totals = facts::line_facts(store)?
        .group_by(&["sales.channel"], &[AggCall::sum("sale_items.quantity", "channel_quantity")])?
        .select(&[("sales.channel", "channel_key"), ("channel_quantity", "channel_quantity")])?;
    per.inner_join(&totals, &[("sales.channel", "channel_key")])?
        .with_column("share", |r| {
            Value::ratio(&r.value("quantity"), &r.value("channel_quantity"))
        })?
        .sort_by(&[
            SortKey::asc("sales.channel"),
            SortKey::desc("share"),
            SortKey::asc("products.category"),
        ])?
        .select(&[
            ("sales.channel", "channel"),
            ("products.category", "category"),
            ("quantity", "quantity"),
            ("share", "share"),
        ])
}
