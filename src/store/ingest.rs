use chrono::{NaiveDate, NaiveDateTime};
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::{debug, info};

use crate::store::{
    Customer, IngestConfig, Product, RecordStore, Sale, SaleItem, StagingBatch, StagingCustomer,
    StagingProduct, StagingSale, StagingSaleItem,
};

static DIGITS: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[0-9]+$").unwrap());

/// A staging row that failed validation, kept for inspection instead of
/// being re-filtered by every report.
#[derive(Debug, Clone, PartialEq)]
pub struct Rejected {
    pub table: &'static str,
    pub index: usize,
    pub reason: String,
}

/// Result of loading one staging batch: the typed store plus the quarantine.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LoadOutcome {
    pub store: RecordStore,
    pub rejected: Vec<Rejected>,
}

/// Validate and parse a staging batch with the default fallbacks.
pub fn load(batch: StagingBatch) -> LoadOutcome {
    load_with(&IngestConfig::default(), batch)
}

/// Validate and parse a staging batch. Each row is checked independently:
/// a bad row lands in the quarantine with a reason, good rows still load.
pub fn load_with(config: &IngestConfig, batch: StagingBatch) -> LoadOutcome {
    let mut rejected = Vec::new();

    let mut customers = Vec::with_capacity(batch.customers.len());
    for (index, row) in batch.customers.iter().enumerate() {
        match parse_customer(row) {
            Ok(c) => customers.push(c),
            Err(reason) => quarantine(&mut rejected, "customers", index, reason),
        }
    }

    let mut products = Vec::with_capacity(batch.products.len());
    for (index, row) in batch.products.iter().enumerate() {
        match parse_product(row) {
            Ok(p) => products.push(p),
            Err(reason) => quarantine(&mut rejected, "products", index, reason),
        }
    }

    let mut sales = Vec::with_capacity(batch.sales.len());
    for (index, row) in batch.sales.iter().enumerate() {
        match parse_sale(config, row) {
            Ok(s) => sales.push(s),
            Err(reason) => quarantine(&mut rejected, "sales", index, reason),
        }
    }

    let mut sale_items = Vec::with_capacity(batch.sale_items.len());
    for (index, row) in batch.sale_items.iter().enumerate() {
        match parse_sale_item(config, row) {
            Ok(i) => sale_items.push(i),
            Err(reason) => quarantine(&mut rejected, "sale_items", index, reason),
        }
    }

    info!(
        customers = customers.len(),
        products = products.len(),
        sales = sales.len(),
        sale_items = sale_items.len(),
        rejected = rejected.len(),
        "staging batch loaded"
    );

    LoadOutcome {
        store: RecordStore::from_tables(customers, products, sales, sale_items),
        rejected,
    }
}

fn quarantine(rejected: &mut Vec<Rejected>, table: &'static str, index: usize, reason: String) {
    debug!(table, index, %reason, "staging row quarantined");
    rejected.push(Rejected { table, index, reason });
}

// ---- field parsers ----

fn parse_id(field: &str, raw: &str) -> Result<i64, String> {
    if !DIGITS.is_match(raw) {
        return Err(format!("{field} {raw:?} is not a digit-only identifier"));
    }
    raw.parse().map_err(|_| format!("{field} {raw:?} overflows i64"))
}

fn parse_date(field: &str, raw: &str) -> Result<NaiveDate, String> {
    if let Ok(d) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Ok(d);
    }
    // timestamps are accepted and truncated to their date
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S")
        .map(|ts| ts.date())
        .map_err(|_| format!("{field} {raw:?} is not a date"))
}

fn parse_decimal(field: &str, raw: &str) -> Result<f64, String> {
    let v: f64 =
        raw.trim().parse().map_err(|_| format!("{field} {raw:?} is not numeric"))?;
    if v.is_finite() { Ok(v) } else { Err(format!("{field} {raw:?} is not finite")) }
}

fn parse_int(field: &str, raw: &str) -> Result<i64, String> {
    raw.trim().parse().map_err(|_| format!("{field} {raw:?} is not an integer"))
}

fn blank(opt: &Option<String>) -> bool {
    opt.as_deref().map(str::trim).is_none_or(str::is_empty)
}

// ---- row parsers ----

fn parse_customer(row: &StagingCustomer) -> Result<Customer, String> {
    Ok(Customer {
        id: parse_id("id", &row.id)?,
        country: row.country.clone(),
        signup_date: parse_date("signup_date", &row.signup_date)?,
    })
}

fn parse_product(row: &StagingProduct) -> Result<Product, String> {
    Ok(Product {
        id: parse_id("id", &row.id)?,
        brand: row.brand.clone(),
        category: row.category.clone(),
        cost_price: parse_decimal("cost_price", &row.cost_price)?,
    })
}

fn parse_sale(config: &IngestConfig, row: &StagingSale) -> Result<Sale, String> {
    let campaign = if blank(&row.campaign) {
        config.default_campaign.clone()
    } else {
        row.campaign.clone().unwrap_or_default()
    };
    Ok(Sale {
        id: parse_id("id", &row.id)?,
        customer_id: parse_id("customer_id", &row.customer_id)?,
        sale_date: parse_date("sale_date", &row.sale_date)?,
        channel: row.channel.clone(),
        campaign,
    })
}

fn parse_sale_item(config: &IngestConfig, row: &StagingSaleItem) -> Result<SaleItem, String> {
    let discount = match &row.discount {
        Some(raw) if !raw.trim().is_empty() => parse_decimal("discount", raw)?,
        _ => config.default_discount,
    };
    Ok(SaleItem {
        sale_id: parse_id("sale_id", &row.sale_id)?,
        product_id: parse_id("product_id", &row.product_id)?,
        quantity: parse_int("quantity", &row.quantity)?,
        unit_price: parse_decimal("unit_price", &row.unit_price)?,
        discount,
    })
}
