use crate::store::{Customer, Product, Sale, SaleItem};

/// The four typed tables, immutable once built. Scans are plain restartable
/// iterators; nothing here filters, casts, or validates.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecordStore {
    customers: Vec<Customer>,
    products: Vec<Product>,
    sales: Vec<Sale>,
    sale_items: Vec<SaleItem>,
}

impl RecordStore {
    pub fn from_tables(
        customers: Vec<Customer>,
        products: Vec<Product>,
        sales: Vec<Sale>,
        sale_items: Vec<SaleItem>,
    ) -> RecordStore {
        RecordStore { customers, products, sales, sale_items }
    }

    pub fn customers(&self) -> impl Iterator<Item = &Customer> {
        self.customers.iter()
    }

    pub fn products(&self) -> impl Iterator<Item = &Product> {
        self.products.iter()
    }

    pub fn sales(&self) -> impl Iterator<Item = &Sale> {
        self.sales.iter()
    }

    pub fn sale_items(&self) -> impl Iterator<Item = &SaleItem> {
        self.sale_items.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.customers.is_empty()
            && self.products.is_empty()
            && self.sales.is_empty()
            && self.sale_items.is_empty()
    }
}
