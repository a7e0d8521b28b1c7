//! Command handlers.

pub mod items;
pub mod notifications;
pub mod radar;
pub mod remind;
pub mod route;

use anyhow::{bail, Result};
use wanderlist_core::model::BucketItem;
use wanderlist_core::store::ItemStore;

/// Finds an item by exact id, unique id prefix, or exact title.
pub fn resolve_item(store: &dyn ItemStore, needle: &str) -> Result<BucketItem> {
    let items = store.all();

    if let Some(item) = items.iter().find(|i| i.id == needle) {
        return Ok(item.clone());
    }

    let prefix: Vec<_> = items.iter().filter(|i| i.id.starts_with(needle)).collect();
    match prefix.as_slice() {
        [single] => return Ok((*single).clone()),
        [] => {}
        _ => bail!("id prefix \"{needle}\" is ambiguous"),
    }

    if let Some(item) = items
        .iter()
        .find(|i| i.title.eq_ignore_ascii_case(needle))
    {
        return Ok(item.clone());
    }

    bail!("no item matches \"{needle}\"")
}
