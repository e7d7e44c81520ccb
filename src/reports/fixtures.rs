//! Shared dataset for catalog tests, loaded through the real ingestion
//! boundary. Laid out so each report has output that can be checked by
//! hand:
//!
//! - customer 1 (BR, Jan cohort): sales in Jan/Feb/Mar, quantities 2/3/6 —
//!   net revenue 18/30/85, three categories, the month-over-month chain.
//! - customer 2 (BR, Jan cohort): sales in Jan and Mar (gap at Feb); the
//!   Mar sale carries an over-discounted line (discount 18 > gross 15).
//! - customer 3 (PT, Feb cohort): a single Feb sale.
//! - customer 4 (PT, Mar cohort): never buys.
//! - brand "bolt" loses money overall; category "books" has negative margin.

use serde_json::json;

use crate::store::{ingest, RecordStore, StagingBatch};

pub fn fixture_store() -> RecordStore {
    let batch = StagingBatch::from_json(json!({
        "customers": [
            { "id": "1", "country": "BR", "signup_date": "2024-01-05" },
            { "id": "2", "country": "BR", "signup_date": "2024-01-20" },
            { "id": "3", "country": "PT", "signup_date": "2024-02-10" },
            { "id": "4", "country": "PT", "signup_date": "2024-03-02" }
        ],
        "products": [
            { "id": "1", "brand": "acme", "category": "toys",  "cost_price": "5" },
            { "id": "2", "brand": "acme", "category": "games", "cost_price": "10" },
            { "id": "3", "brand": "bolt", "category": "toys",  "cost_price": "2" },
            { "id": "4", "brand": "bolt", "category": "books", "cost_price": "30" }
        ],
        "sales": [
            { "id": "1", "customer_id": "1", "sale_date": "2024-01-15", "channel": "web" },
            { "id": "2", "customer_id": "1", "sale_date": "2024-02-10", "channel": "web",
              "campaign": "spring" },
            { "id": "3", "customer_id": "1", "sale_date": "2024-03-08", "channel": "app",
              "campaign": "spring" },
            { "id": "4", "customer_id": "2", "sale_date": "2024-01-22", "channel": "app" },
            { "id": "5", "customer_id": "2", "sale_date": "2024-03-19", "channel": "web" },
            { "id": "6", "customer_id": "3", "sale_date": "2024-02-14", "channel": "store",
              "campaign": "promo" }
        ],
        "sale_items": [
            { "sale_id": "1", "product_id": "1", "quantity": "2",  "unit_price": "10",
              "discount": "2" },
            { "sale_id": "2", "product_id": "1", "quantity": "3",  "unit_price": "10" },
            { "sale_id": "3", "product_id": "1", "quantity": "4",  "unit_price": "10" },
            { "sale_id": "3", "product_id": "2", "quantity": "1",  "unit_price": "25" },
            { "sale_id": "3", "product_id": "4", "quantity": "1",  "unit_price": "20" },
            { "sale_id": "4", "product_id": "3", "quantity": "5",  "unit_price": "4" },
            { "sale_id": "5", "product_id": "3", "quantity": "10", "unit_price": "4",
              "discount": "20" },
            { "sale_id": "5", "product_id": "4", "quantity": "1",  "unit_price": "15",
              "discount": "18" },
            { "sale_id": "6", "product_id": "2", "quantity": "2",  "unit_price": "12",
              "discount": "4" }
        ]
    }))
    .unwrap();

    let out = ingest::load(batch);
    assert!(out.rejected.is_empty(), "fixture must load cleanly: {:?}", out.rejected);
    out.store
}
