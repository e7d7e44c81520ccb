/// Fallbacks applied while staging rows are parsed into typed records.
#[derive(Debug, Clone, PartialEq)]
pub struct IngestConfig {
    /// Campaign assigned to sales with a missing or blank campaign.
    pub default_campaign: String,
    /// Discount assigned to sale items with a missing or blank discount.
    pub default_discount: f64,
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self { default_campaign: "NA".to_string(), default_discount: 0.0 }
    }
}

impl IngestConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from(default_campaign: &str, default_discount: f64) -> Self {
        Self {
            default_campaign: default_campaign.to_string(),
            default_discount,
        }
    }
}
