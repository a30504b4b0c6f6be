use stock::{Inventory, InventoryItem, utils::sanitize};

use crate::error::AppError::{self, MalformedPayload};

pub fn clean_name(name: &str) -> Result<String, AppError> {
    let clean = sanitize(name);

    if clean.is_empty() {
        return Err(MalformedPayload("empty flavor name".to_string()));
    }

    Ok(clean)
}

pub fn check_item(name: &str, item: &InventoryItem) -> Result<(), AppError> {
    if !item.is_consistent() {
        return Err(MalformedPayload(format!(
            "{name}: current stock {} exceeds max stock {}",
            item.current_stock, item.max_stock
        )));
    }

    Ok(())
}

pub fn clean_inventory(inventory: Inventory) -> Result<Inventory, AppError> {
    let mut cleaned = Inventory::new();

    for (name, item) in inventory {
        let clean = clean_name(&name)?;
        check_item(&clean, &item)?;

        if cleaned.insert(clean.clone(), item).is_some() {
            return Err(MalformedPayload(format!("duplicate flavor name: {clean}")));
        }
    }

    Ok(cleaned)
}
