//! # Catalog
//!
//! Read-only product source. The storefront only needs to look products up
//! by id and to list them; search, filters and reviews live elsewhere.

use std::collections::BTreeMap;
use std::sync::Arc;

use agri_core::{Money, Product};

/// Read-only product source.
pub trait Catalog: Send + Sync {
    /// Looks up a product by id.
    fn get(&self, id: &str) -> Option<Product>;

    /// All products, in catalog order.
    fn list(&self) -> Vec<Product>;
}

impl<C: Catalog + ?Sized> Catalog for Arc<C> {
    fn get(&self, id: &str) -> Option<Product> {
        (**self).get(id)
    }

    fn list(&self) -> Vec<Product> {
        (**self).list()
    }
}

/// Catalog held in memory.
#[derive(Debug, Clone, Default)]
pub struct InMemoryCatalog {
    products: BTreeMap<String, Product>,
}

impl InMemoryCatalog {
    /// Builds a catalog from products.
    pub fn new(products: impl IntoIterator<Item = Product>) -> Self {
        InMemoryCatalog {
            products: products.into_iter().map(|p| (p.id.clone(), p)).collect(),
        }
    }

    /// The demo tractors and implements.
    pub fn seeded() -> Self {
        let product = |id: &str,
                       name: &str,
                       brand: &str,
                       price: i64,
                       original: Option<i64>,
                       stock: i64,
                       image: &str| Product {
            id: id.to_string(),
            name: name.to_string(),
            brand: brand.to_string(),
            price: Money::from_rupees(price),
            original_price: original.map(Money::from_rupees),
            image: image.to_string(),
            stock,
            variant: None,
        };

        InMemoryCatalog::new(vec![
            product(
                "1",
                "Mahindra 575 DI XP Plus",
                "Mahindra",
                895_000,
                Some(925_000),
                5,
                "https://images.unsplash.com/photo-1581833971358-2c8b550f87b3?w=400&h=300&fit=crop",
            ),
            product(
                "2",
                "John Deere 5310",
                "John Deere",
                1_250_000,
                Some(1_300_000),
                8,
                "https://images.unsplash.com/photo-1544197150-b99a580bb7a8?w=400&h=300&fit=crop",
            ),
            product(
                "3",
                "Swaraj 744 FE",
                "Swaraj",
                675_000,
                Some(695_000),
                12,
                "https://images.unsplash.com/photo-1581833971358-2c8b550f87b3?w=400&h=300&fit=crop",
            ),
            product(
                "4",
                "New Holland 3630 TX",
                "New Holland",
                1_125_000,
                None,
                3,
                "https://images.unsplash.com/photo-1544197150-b99a580bb7a8?w=400&h=300&fit=crop",
            ),
            product(
                "5",
                "Shaktiman Rotavator 6 ft",
                "Shaktiman",
                125_000,
                Some(135_000),
                15,
                "https://images.unsplash.com/photo-1592982537447-7440770cbfc9?w=400&h=300&fit=crop",
            ),
            product(
                "6",
                "Sonalika Seed Drill 9 Tyne",
                "Sonalika",
                45_000,
                None,
                0,
                "https://images.unsplash.com/photo-1625246333195-78d9c38ad449?w=400&h=300&fit=crop",
            ),
        ])
    }
}

impl Catalog for InMemoryCatalog {
    fn get(&self, id: &str) -> Option<Product> {
        self.products.get(id).cloned()
    }

    fn list(&self) -> Vec<Product> {
        self.products.values().cloned().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seeded_catalog() {
        let catalog = InMemoryCatalog::seeded();
        let mahindra = catalog.get("1").unwrap();

        assert_eq!(mahindra.price, Money::from_rupees(895_000));
        assert!(mahindra.in_stock());
        assert_eq!(catalog.list().len(), 6);
        assert!(!catalog.get("6").unwrap().in_stock());
        assert!(catalog.get("missing").is_none());
    }
}
