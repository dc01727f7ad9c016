use serde::{Deserialize, Serialize};

use super::Record;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Store {
    pub id: u32,
    pub name: String,
    pub address: String,
    pub city: String,
    pub country: String,
    pub postal_code: String,
}

impl Record for Store {
    type Key = u32;
    const KIND: &'static str = "Store";

    fn key(&self) -> u32 {
        self.id
    }
}
