//! # Menu Commands

use agro_core::MenuRow;
use serde::Serialize;
use tracing::debug;

use crate::state::Register;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MenuResponse {
    pub items: Vec<MenuRow>,
}

/// Lists the menu with the quantity of each item currently in the cart.
pub fn get_menu(register: &Register) -> MenuResponse {
    debug!("get_menu command");

    let money = register.money();
    let items = register
        .catalog()
        .items()
        .iter()
        .map(|item| MenuRow {
            id: item.id.clone(),
            name: item.name.clone(),
            price_label: money.format(item.unit_price),
            image: item.image.clone(),
            qty: register.cart().quantity(&item.id),
        })
        .collect();

    MenuResponse { items }
}

#[cfg(test)]
mod tests {
    use super::*;
    use agro_db::MemoryStore;

    #[test]
    fn test_menu_shows_cart_quantities() {
        let mut register = Register::with_defaults(Box::new(MemoryStore::new()));
        register.set_quantity("m_parotta", 4);

        let menu = get_menu(&register);
        let ids: Vec<_> = menu.items.iter().map(|row| row.id.as_str()).collect();
        assert_eq!(
            ids,
            vec!["m_chicken_rice", "m_chapati", "m_dosa", "m_parotta", "m_tea"]
        );

        let parotta = &menu.items[3];
        assert_eq!(parotta.qty, 4);
        assert_eq!(parotta.price_label, "₹25");
    }
}
