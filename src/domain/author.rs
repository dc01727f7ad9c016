use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::Record;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Author {
    pub id: u32,
    pub first_name: String,
    pub last_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub birthday: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Author {
    /// Draft with no id yet; the store assigns one on create.
    pub fn draft() -> Self {
        let now = Utc::now();
        Self {
            id: 0,
            first_name: String::new(),
            last_name: String::new(),
            birthday: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

impl Record for Author {
    type Key = u32;
    const KIND: &'static str = "Author";

    fn key(&self) -> u32 {
        self.id
    }
}
