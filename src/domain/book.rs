use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::Record;

/// Number of digits in an ISBN-13 identifier.
pub const ISBN13_LEN: usize = 13;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Book {
    pub isbn13: i64,
    pub title: String,
    pub language: String,
    pub price_sek: f64,
    pub publishing_date: NaiveDate,
    pub total_pages: u32,
    pub author_id: u32,
    pub publisher_id: u32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Book {
    pub fn draft(isbn13: i64, author_id: u32, publisher_id: u32, today: NaiveDate) -> Self {
        let now = Utc::now();
        Self {
            isbn13,
            title: String::new(),
            language: String::new(),
            price_sek: 0.0,
            publishing_date: today,
            total_pages: 0,
            author_id,
            publisher_id,
            created_at: now,
            updated_at: now,
        }
    }
}

impl Record for Book {
    type Key = i64;
    const KIND: &'static str = "Book";

    fn key(&self) -> i64 {
        self.isbn13
    }
}

/// Parses a 13-digit ISBN. Leading/trailing whitespace is not accepted.
pub fn parse_isbn13(input: &str) -> Option<i64> {
    if input.len() != ISBN13_LEN || !input.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    input.parse().ok()
}

/// Zero-padded 13-digit form, so a leading zero survives display and
/// pre-filled edits.
pub fn format_isbn13(isbn13: i64) -> String {
    format!("{isbn13:0width$}", width = ISBN13_LEN)
}
