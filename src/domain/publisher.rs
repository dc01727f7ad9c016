use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::Record;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Publisher {
    pub id: u32,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Publisher {
    pub fn draft() -> Self {
        let now = Utc::now();
        Self {
            id: 0,
            name: String::new(),
            created_at: now,
            updated_at: now,
        }
    }
}

impl Record for Publisher {
    type Key = u32;
    const KIND: &'static str = "Publisher";

    fn key(&self) -> u32 {
        self.id
    }
}
