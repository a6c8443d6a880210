//! # Menu Repository
//!
//! The menu is read once when a session opens. Anything that does not
//! parse or fails validation (empty id, negative price, duplicate ids)
//! is treated as corrupt and the built-in menu is used instead.

use agro_core::{Catalog, CatalogItem};
use tracing::{info, warn};

use super::{load_json, save_json, LoadSource, Loaded, MENU_KEY};
use crate::error::DbResult;
use crate::store::KeyValueStore;

/// Repository for the persisted menu.
pub struct MenuRepository<'a> {
    store: &'a dyn KeyValueStore,
}

impl<'a> MenuRepository<'a> {
    pub fn new(store: &'a dyn KeyValueStore) -> Self {
        MenuRepository { store }
    }

    /// Loads the menu, falling back to [`Catalog::default`].
    pub fn load(&self) -> Loaded<Catalog> {
        let loaded = load_json::<Option<Vec<CatalogItem>>, _>(self.store, MENU_KEY, || None);

        let items = match loaded.value {
            Some(items) => items,
            None => {
                let source = match loaded.source {
                    // `null` parses fine but is not a menu
                    LoadSource::Stored => LoadSource::Corrupt,
                    other => other,
                };
                return Loaded {
                    value: Catalog::default(),
                    source,
                };
            }
        };

        match Catalog::new(items) {
            Ok(catalog) => {
                info!(items = catalog.len(), "Menu loaded from store");
                Loaded {
                    value: catalog,
                    source: LoadSource::Stored,
                }
            }
            Err(e) => {
                warn!(error = %e, "Stored menu is invalid, using default menu");
                Loaded {
                    value: Catalog::default(),
                    source: LoadSource::Corrupt,
                }
            }
        }
    }

    /// Replaces the stored menu.
    pub fn save(&self, catalog: &Catalog) -> DbResult<()> {
        save_json(self.store, MENU_KEY, catalog)
    }
}
