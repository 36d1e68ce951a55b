//! Item wire and storage types.

use serde::{Deserialize, Serialize};

/// Key under which an item is stored.
pub type ItemId = i64;

/// The single resource managed by the service.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Item {
    pub name: String,

    pub price: f64,

    /// Always serialized; `null` when the client never set it.
    #[serde(default)]
    pub is_offer: Option<bool>,
}

/// Confirmation returned by a successful write.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ItemReceipt {
    pub item_name: String,
    pub item_id: ItemId,
}

impl ItemReceipt {
    pub fn new(item_id: ItemId, item: &Item) -> Self {
        Self {
            item_name: item.name.clone(),
            item_id,
        }
    }
}
