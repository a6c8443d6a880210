//! # Catalog
//!
//! The fixed set of sellable items and their prices.
//!
//! The catalog is loaded once at startup (from storage, or the built-in
//! default menu) and never changes during a session. Items are identified
//! by `id`; display order is the order of the menu list.
//!
//! ## Stored Shape
//! ```json
//! { "id": "m_tea", "name": "Tea", "price": 10, "img": "images/chai.jpg" }
//! ```

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::ValidationError;
use crate::money::Money;
use crate::validation::validate_menu;

/// A sellable menu item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct CatalogItem {
    /// Unique identifier (e.g. `m_tea`).
    pub id: String,

    /// Display name shown on the menu and the receipt.
    pub name: String,

    /// Unit price in minor units.
    #[serde(rename = "price")]
    #[ts(type = "number")]
    pub unit_price: Money,

    /// Optional image reference for the menu row.
    #[serde(rename = "img", default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

impl CatalogItem {
    pub fn new(id: impl Into<String>, name: impl Into<String>, unit_price: Money) -> Self {
        CatalogItem {
            id: id.into(),
            name: name.into(),
            unit_price,
            image: None,
        }
    }

    /// Attaches an image reference.
    pub fn with_image(mut self, image: impl Into<String>) -> Self {
        self.image = Some(image.into());
        self
    }
}

/// The items on sale, in menu order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Catalog {
    items: Vec<CatalogItem>,
}

impl Catalog {
    /// Builds a catalog after checking ids are unique and prices non-negative.
    pub fn new(items: Vec<CatalogItem>) -> Result<Self, ValidationError> {
        validate_menu(&items)?;
        Ok(Catalog { items })
    }

    /// Looks up an item by id.
    pub fn get(&self, id: &str) -> Option<&CatalogItem> {
        self.items.iter().find(|item| item.id == id)
    }

    /// Unit price for an id, if the id is on the menu.
    pub fn price(&self, id: &str) -> Option<Money> {
        self.get(id).map(|item| item.unit_price)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    /// Items in menu order.
    pub fn items(&self) -> &[CatalogItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl Default for Catalog {
    /// The built-in menu.
    fn default() -> Self {
        Catalog {
            items: default_menu(),
        }
    }
}

/// The menu the counter starts with when nothing valid is stored.
pub fn default_menu() -> Vec<CatalogItem> {
    vec![
        CatalogItem::new("m_chicken_rice", "Chicken Rice", Money::from_minor(100))
            .with_image("images/cr.jpg"),
        CatalogItem::new("m_chapati", "Chapati", Money::from_minor(20))
            .with_image("images/chapathi.jpg"),
        CatalogItem::new("m_dosa", "Dosa", Money::from_minor(30)).with_image("images/dosa.png"),
        CatalogItem::new("m_parotta", "Parotta", Money::from_minor(25))
            .with_image("images/parotta.jpg"),
        CatalogItem::new("m_tea", "Tea", Money::from_minor(10)).with_image("images/chai.jpg"),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_catalog_lookup() {
        let catalog = Catalog::default();
        assert_eq!(catalog.len(), 5);
        assert_eq!(catalog.price("m_chicken_rice"), Some(Money::from_minor(100)));
        assert_eq!(catalog.get("m_tea").map(|i| i.name.as_str()), Some("Tea"));
        assert!(catalog.price("m_biryani").is_none());
        assert!(!catalog.contains("m_biryani"));
    }

    #[test]
    fn test_new_rejects_duplicates() {
        let items = vec![
            CatalogItem::new("A", "Alpha", Money::from_minor(1)),
            CatalogItem::new("A", "Again", Money::from_minor(2)),
        ];
        assert!(Catalog::new(items).is_err());
    }

    #[test]
    fn test_stored_shape() {
        let json = r#"[
            {"id":"m_tea","name":"Tea","price":10,"img":"images/chai.jpg","updated_at":1700000000000},
            {"id":"m_dosa","name":"Dosa","price":30}
        ]"#;
        let catalog: Catalog = serde_json::from_str(json).unwrap();

        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.items()[0].image.as_deref(), Some("images/chai.jpg"));
        assert_eq!(catalog.items()[1].image, None);

        let back = serde_json::to_value(&catalog).unwrap();
        assert_eq!(back[0]["price"], 10);
        assert!(back[1].get("img").is_none());
    }
}
