//! Catalog entities persisted by the record store.

pub mod author;
pub mod book;
pub mod inventory;
pub mod publisher;
pub mod store;

use std::fmt::Debug;

use serde::{de::DeserializeOwned, Serialize};

pub use author::Author;
pub use book::Book;
pub use inventory::Inventory;
pub use publisher::Publisher;
pub use store::Store;

/// A row that can live in a keyed table.
pub trait Record: Clone + Serialize + DeserializeOwned {
    type Key: Ord + Copy + Debug + Serialize + DeserializeOwned;

    /// Human-readable entity name used in store errors.
    const KIND: &'static str;

    fn key(&self) -> Self::Key;
}
