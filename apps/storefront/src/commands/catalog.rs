//! # Catalog Commands

use agri_core::Product;
use tracing::debug;

use crate::state::Catalog;

/// Lists every product, in catalog order.
pub fn list_products(catalog: &dyn Catalog) -> Vec<Product> {
    debug!("list_products command");
    catalog.list()
}
