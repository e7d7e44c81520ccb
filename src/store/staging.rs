use serde::Deserialize;

use crate::engine::EngineError;

/// Staging rows as the source system delivers them: identifiers, dates and
/// numerics still textual, optional columns possibly absent. Validation and
/// parsing happen in `ingest`, never here.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct StagingCustomer {
    pub id: String,
    pub country: String,
    pub signup_date: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct StagingProduct {
    pub id: String,
    pub brand: String,
    pub category: String,
    pub cost_price: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct StagingSale {
    pub id: String,
    pub customer_id: String,
    pub sale_date: String,
    pub channel: String,
    #[serde(default)]
    pub campaign: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct StagingSaleItem {
    pub sale_id: String,
    pub product_id: String,
    pub quantity: String,
    pub unit_price: String,
    #[serde(default)]
    pub discount: Option<String>,
}

/// One delivery of all four staging tables. Tables may be individually
/// absent in a batch, which just means no rows for that table.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct StagingBatch {
    #[serde(default)]
    pub customers: Vec<StagingCustomer>,
    #[serde(default)]
    pub products: Vec<StagingProduct>,
    #[serde(default)]
    pub sales: Vec<StagingSale>,
    #[serde(default)]
    pub sale_items: Vec<StagingSaleItem>,
}

impl StagingBatch {
    /// Deserialize a batch from a JSON document.
    pub fn from_json(value: serde_json::Value) -> Result<StagingBatch, EngineError> {
        serde_json::from_value(value).map_err(|e| EngineError::Other(format!("staging batch: {e}")))
    }
}
