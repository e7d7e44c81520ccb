use chrono::NaiveDate;

/// Typed records held by the store. All identifiers have already passed the
/// digit-only check and all dates/decimals parsed during ingestion.
#[derive(Debug, Clone, PartialEq)]
pub struct Customer {
    pub id: i64,
    pub country: String,
    pub signup_date: NaiveDate,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Product {
    pub id: i64,
    pub brand: String,
    pub category: String,
    pub cost_price: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Sale {
    pub id: i64,
    pub customer_id: i64,
    pub sale_date: NaiveDate,
    pub channel: String,
    pub campaign: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SaleItem {
    pub sale_id: i64,
    pub product_id: i64,
    pub quantity: i64,
    pub unit_price: f64,
    pub discount: f64,
}
