//! The record store behind the interactive flows.
//!
//! Every mutation runs against a copy of [`CatalogData`], is written through
//! the optional [`JsonStorage`] backend, and only then replaces the live data.
//! A failed write therefore leaves the catalog exactly as it was.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::domain::{Author, Book, Inventory, Publisher, Record, Store};
use crate::errors::StoreError;

use super::{JsonStorage, Result, Table};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogData {
    pub authors: Table<Author>,
    pub publishers: Table<Publisher>,
    pub books: Table<Book>,
    pub stores: Table<Store>,
    pub inventory: Table<Inventory>,
}

pub struct Catalog {
    data: CatalogData,
    backend: Option<JsonStorage>,
}

impl Catalog {
    /// Catalog that lives only for the current process.
    pub fn in_memory() -> Self {
        Self {
            data: CatalogData::default(),
            backend: None,
        }
    }

    pub fn open(storage: JsonStorage) -> Result<Self> {
        let data = storage.load()?;
        info!(
            path = %storage.path().display(),
            books = data.books.len(),
            authors = data.authors.len(),
            "catalog loaded"
        );
        Ok(Self {
            data,
            backend: Some(storage),
        })
    }

    pub fn with_backend(mut self, storage: JsonStorage) -> Self {
        self.backend = Some(storage);
        self
    }

    fn commit<T>(&mut self, change: impl FnOnce(&mut CatalogData) -> Result<T>) -> Result<T> {
        let mut next = self.data.clone();
        let outcome = change(&mut next)?;
        if let Some(backend) = &self.backend {
            backend.save(&next)?;
        }
        self.data = next;
        Ok(outcome)
    }

    // Authors

    pub fn create_author(&mut self, mut author: Author) -> Result<Author> {
        let created = self.commit(|data| {
            author.id = next_id(&data.authors);
            touch_new(&mut author.created_at, &mut author.updated_at);
            data.authors.create(author)
        })?;
        debug!(id = created.id, "author created");
        Ok(created)
    }

    pub fn author(&self, id: u32) -> Option<Author> {
        self.data.authors.get(id).cloned()
    }

    pub fn author_exists(&self, id: u32) -> bool {
        self.data.authors.exists(id)
    }

    /// True when another author already carries this name. `excluding` skips
    /// the record being edited.
    pub fn author_name_exists(&self, first: &str, last: &str, excluding: Option<u32>) -> bool {
        self.data.authors.any(|a| {
            Some(a.id) != excluding
                && a.first_name.trim().eq_ignore_ascii_case(first.trim())
                && a.last_name.trim().eq_ignore_ascii_case(last.trim())
        })
    }

    pub fn authors(&self) -> Vec<Author> {
        self.data.authors.all()
    }

    pub fn update_author(&mut self, mut author: Author) -> Result<Author> {
        self.commit(|data| {
            author.updated_at = Utc::now();
            data.authors.update(author)
        })
    }

    pub fn delete_author(&mut self, id: u32) -> Result<bool> {
        self.commit(|data| {
            let books = data.books.list(|b| b.author_id == id).len();
            if books > 0 {
                return Err(StoreError::Referenced(format!("{books} book(s)")));
            }
            Ok(data.authors.delete(id))
        })
    }

    // Publishers

    pub fn create_publisher(&mut self, mut publisher: Publisher) -> Result<Publisher> {
        let created = self.commit(|data| {
            publisher.id = next_id(&data.publishers);
            touch_new(&mut publisher.created_at, &mut publisher.updated_at);
            data.publishers.create(publisher)
        })?;
        debug!(id = created.id, "publisher created");
        Ok(created)
    }

    pub fn publisher(&self, id: u32) -> Option<Publisher> {
        self.data.publishers.get(id).cloned()
    }

    pub fn publisher_exists(&self, id: u32) -> bool {
        self.data.publishers.exists(id)
    }

    pub fn publisher_name_exists(&self, name: &str, excluding: Option<u32>) -> bool {
        self.data
            .publishers
            .any(|p| Some(p.id) != excluding && p.name.trim().eq_ignore_ascii_case(name.trim()))
    }

    pub fn publishers(&self) -> Vec<Publisher> {
        self.data.publishers.all()
    }

    pub fn update_publisher(&mut self, mut publisher: Publisher) -> Result<Publisher> {
        self.commit(|data| {
            publisher.updated_at = Utc::now();
            data.publishers.update(publisher)
        })
    }

    pub fn delete_publisher(&mut self, id: u32) -> Result<bool> {
        self.commit(|data| {
            let books = data.books.list(|b| b.publisher_id == id).len();
            if books > 0 {
                return Err(StoreError::Referenced(format!("{books} book(s)")));
            }
            Ok(data.publishers.delete(id))
        })
    }

    // Books

    pub fn create_book(&mut self, mut book: Book) -> Result<Book> {
        let created = self.commit(|data| {
            check_book_references(data, &book)?;
            touch_new(&mut book.created_at, &mut book.updated_at);
            data.books.create(book)
        })?;
        debug!(isbn13 = created.isbn13, "book created");
        Ok(created)
    }

    pub fn book(&self, isbn13: i64) -> Option<Book> {
        self.data.books.get(isbn13).cloned()
    }

    pub fn book_exists(&self, isbn13: i64) -> bool {
        self.data.books.exists(isbn13)
    }

    pub fn books(&self) -> Vec<Book> {
        self.data.books.all()
    }

    /// Replaces the book stored under `original_isbn13`. Changing the ISBN
    /// re-keys the book and moves its inventory rows along with it.
    pub fn update_book(&mut self, original_isbn13: i64, mut book: Book) -> Result<Book> {
        self.commit(|data| {
            check_book_references(data, &book)?;
            book.updated_at = Utc::now();
            if original_isbn13 == book.isbn13 {
                return data.books.update(book);
            }
            if data.books.exists(book.isbn13) {
                return Err(StoreError::Constraint(format!(
                    "ISBN13 {} is already in use",
                    book.isbn13
                )));
            }
            if !data.books.delete(original_isbn13) {
                return Err(StoreError::NotFound(format!("Book {original_isbn13}")));
            }
            let moved = data.inventory.list(|row| row.isbn13 == original_isbn13);
            data.inventory.delete_where(|row| row.isbn13 == original_isbn13);
            for mut row in moved {
                row.isbn13 = book.isbn13;
                data.inventory.create(row)?;
            }
            data.books.create(book)
        })
    }

    pub fn delete_book(&mut self, isbn13: i64) -> Result<bool> {
        self.commit(|data| {
            let stocked = data.inventory.list(|row| row.isbn13 == isbn13).len();
            if stocked > 0 {
                return Err(StoreError::Referenced(format!("{stocked} inventory row(s)")));
            }
            Ok(data.books.delete(isbn13))
        })
    }

    pub fn delete_books_by_author(&mut self, author_id: u32) -> Result<usize> {
        self.commit(|data| Ok(data.books.delete_where(|b| b.author_id == author_id)))
    }

    pub fn delete_books_by_publisher(&mut self, publisher_id: u32) -> Result<usize> {
        self.commit(|data| Ok(data.books.delete_where(|b| b.publisher_id == publisher_id)))
    }

    // Stores

    pub fn create_store(&mut self, mut store: Store) -> Result<Store> {
        self.commit(|data| {
            store.id = next_id(&data.stores);
            data.stores.create(store)
        })
    }

    pub fn store(&self, id: u32) -> Option<Store> {
        self.data.stores.get(id).cloned()
    }

    pub fn stores(&self) -> Vec<Store> {
        self.data.stores.all()
    }

    // Inventory

    pub fn inventory_row(&self, store_id: u32, isbn13: i64) -> Option<Inventory> {
        self.data.inventory.get((store_id, isbn13)).cloned()
    }

    pub fn store_inventory(&self, store_id: u32) -> Vec<Inventory> {
        self.data.inventory.list(|row| row.store_id == store_id)
    }

    pub fn create_inventory(&mut self, row: Inventory) -> Result<Inventory> {
        self.commit(|data| {
            if !data.stores.exists(row.store_id) {
                return Err(StoreError::Constraint(format!(
                    "store {} does not exist",
                    row.store_id
                )));
            }
            if !data.books.exists(row.isbn13) {
                return Err(StoreError::Constraint(format!(
                    "book {} does not exist",
                    row.isbn13
                )));
            }
            data.inventory.create(row)
        })
    }

    pub fn update_inventory(&mut self, row: Inventory) -> Result<Inventory> {
        self.commit(|data| data.inventory.update(row))
    }

    pub fn delete_inventory(&mut self, store_id: u32, isbn13: i64) -> Result<bool> {
        self.commit(|data| Ok(data.inventory.delete((store_id, isbn13))))
    }

    pub fn delete_inventory_by_isbn(&mut self, isbn13: i64) -> Result<usize> {
        self.commit(|data| Ok(data.inventory.delete_where(|row| row.isbn13 == isbn13)))
    }

    /// Removes stock rows for every book written by `author_id`.
    pub fn delete_inventory_by_author(&mut self, author_id: u32) -> Result<usize> {
        self.commit(|data| {
            let isbns: Vec<i64> = data
                .books
                .list(|b| b.author_id == author_id)
                .iter()
                .map(|b| b.isbn13)
                .collect();
            Ok(data.inventory.delete_where(|row| isbns.contains(&row.isbn13)))
        })
    }

    pub fn delete_inventory_by_publisher(&mut self, publisher_id: u32) -> Result<usize> {
        self.commit(|data| {
            let isbns: Vec<i64> = data
                .books
                .list(|b| b.publisher_id == publisher_id)
                .iter()
                .map(|b| b.isbn13)
                .collect();
            Ok(data.inventory.delete_where(|row| isbns.contains(&row.isbn13)))
        })
    }
}

fn next_id<R: Record<Key = u32>>(table: &Table<R>) -> u32 {
    table.last_key().map_or(1, |last| last + 1)
}

fn touch_new(created_at: &mut chrono::DateTime<Utc>, updated_at: &mut chrono::DateTime<Utc>) {
    let now = Utc::now();
    *created_at = now;
    *updated_at = now;
}

fn check_book_references(data: &CatalogData, book: &Book) -> Result<()> {
    if !data.authors.exists(book.author_id) {
        return Err(StoreError::Constraint(format!(
            "author {} does not exist",
            book.author_id
        )));
    }
    if !data.publishers.exists(book.publisher_id) {
        return Err(StoreError::Constraint(format!(
            "publisher {} does not exist",
            book.publisher_id
        )));
    }
    Ok(())
}
