use indexmap::IndexMap;
use once_cell::sync::Lazy;
use tracing::debug;

use crate::engine::{EngineError, Frame};
use crate::reports::{cohorts, customers, products, revenue};
use crate::store::RecordStore;

static GLOBAL: Lazy<ReportRegistry> = Lazy::new(ReportRegistry::default_report_registry);

type RunFn = fn(&RecordStore) -> Result<Frame, EngineError>;

/// One catalog entry: a name to invoke it by, a human title, and the pure
/// function from store to output frame.
pub struct Report {
    pub name: &'static str,
    pub title: &'static str,
    run: RunFn,
}

impl Report {
    pub fn run(&self, store: &RecordStore) -> Result<Frame, EngineError> {
        let frame = (self.run)(store)?;
        debug!(report = self.name, rows = frame.len(), "report evaluated");
        Ok(frame)
    }
}

/// The 25 report definitions, in catalog order.
pub struct ReportRegistry {
    by_name: IndexMap<&'static str, Report>,
}

impl ReportRegistry {
    pub fn global() -> &'static ReportRegistry {
        &GLOBAL
    }

    fn register(&mut self, name: &'static str, title: &'static str, run: RunFn) {
        self.by_name.insert(name, Report { name, title, run });
    }

    pub fn get(&self, name: &str) -> Option<&Report> {
        self.by_name.get(name)
    }

    /// Report names in catalog order.
    pub fn list(&self) -> Vec<&'static str> {
        self.by_name.keys().copied().collect()
    }

    pub fn reports(&self) -> impl Iterator<Item = &Report> {
        self.by_name.values()
    }

    /// Evaluate a report by name.
    pub fn run(&self, store: &RecordStore, name: &str) -> Result<Frame, EngineError> {
        let report =
            self.get(name).ok_or_else(|| EngineError::UnknownReport(name.to_string()))?;
        report.run(store)
    }

    pub fn default_report_registry() -> Self {
        let mut r = ReportRegistry { by_name: IndexMap::new() };
        r.register(
            "monthly_revenue_by_country",
            "Monthly net revenue by country",
            revenue::monthly_revenue_by_country,
        );
        r.register(
            "channel_revenue_and_profit",
            "Revenue, profit and orders per channel",
            revenue::channel_revenue_and_profit,
        );
        r.register(
            "top_products_by_gross_revenue",
            "Top 10 products by gross revenue",
            products::top_products_by_gross_revenue,
        );
        r.register(
            "avg_order_value_by_campaign",
            "Average order value per campaign",
            revenue::avg_order_value_by_campaign,
        );
        r.register(
            "frequent_buyers",
            "Customers with three or more orders",
            customers::frequent_buyers,
        );
        r.register(
            "category_profit_margin",
            "Profit margin per category",
            products::category_profit_margin,
        );
        r.register(
            "channel_revenue_discount_capped",
            "Channel revenue excluding over-discounted lines",
            revenue::channel_revenue_discount_capped,
        );
        r.register(
            "loss_making_brands",
            "Brands with negative total profit",
            products::loss_making_brands,
        );
        r.register(
            "multi_category_customers",
            "Customers buying across three or more categories",
            customers::multi_category_customers,
        );
        r.register(
            "channel_effectiveness",
            "Net revenue per order, per channel",
            revenue::channel_effectiveness,
        );
        r.register(
            "top_customers_per_country",
            "Top 5 customers per country by spend",
            customers::top_customers_per_country,
        );
        r.register(
            "customer_cumulative_spend",
            "Monthly spend with running total per customer",
            cohorts::customer_cumulative_spend,
        );
        r.register(
            "channel_monthly_moving_avg",
            "Monthly channel revenue with 3-month moving average",
            revenue::channel_monthly_moving_avg,
        );
        r.register(
            "customer_mom_spend_delta",
            "Month-over-month spend delta per customer",
            cohorts::customer_mom_spend_delta,
        );
        r.register(
            "product_share_of_category",
            "Product share of category revenue",
            products::product_share_of_category,
        );
        r.register(
            "customer_spend_percentile",
            "Customer spend percentile",
            customers::customer_spend_percentile,
        );
        r.register(
            "first_purchase_per_customer",
            "First purchase per customer",
            customers::first_purchase_per_customer,
        );
        r.register(
            "mom_quantity_growth",
            "Chained month-over-month quantity growth of 20%+",
            cohorts::mom_quantity_growth,
        );
        r.register(
            "top_products_per_category",
            "Top 3 products per category by gross revenue",
            products::top_products_per_category,
        );
        r.register(
            "cohort_monthly_revenue",
            "Signup cohort revenue by sale month",
            cohorts::cohort_monthly_revenue,
        );
        r.register(
            "cohort_repeat_rate",
            "Repeat-buyer rate per signup cohort",
            cohorts::cohort_repeat_rate,
        );
        r.register(
            "avg_days_between_orders",
            "Average days between orders per customer",
            customers::avg_days_between_orders,
        );
        r.register(
            "campaign_lift",
            "Campaign order value lift over the unattributed baseline",
            revenue::campaign_lift,
        );
        r.register(
            "category_share_by_channel",
            "Category quantity share within each channel",
            products::category_share_by_channel,
        );
        r.register(
            "top_decile_customers",
            "Customers in the top spend decile",
            customers::top_decile_customers,
        );
        r
    }
}
