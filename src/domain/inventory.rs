use serde::{Deserialize, Serialize};

use super::Record;

/// Stock of one book in one store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Inventory {
    pub store_id: u32,
    pub isbn13: i64,
    pub quantity: u32,
}

impl Record for Inventory {
    type Key = (u32, i64);
    const KIND: &'static str = "Inventory row";

    fn key(&self) -> (u32, i64) {
        (self.store_id, self.isbn13)
    }
}
