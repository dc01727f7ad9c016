use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::domain::Record;
use crate::errors::StoreError;

use super::Result;

/// Ordered rows of one entity kind, keyed by the record's primary key.
///
/// Serialized as a plain list so composite keys survive JSON.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(bound = "R: Record", from = "Vec<R>", into = "Vec<R>")]
pub struct Table<R: Record> {
    rows: BTreeMap<R::Key, R>,
}

impl<R: Record> Default for Table<R> {
    fn default() -> Self {
        Self {
            rows: BTreeMap::new(),
        }
    }
}

impl<R: Record> From<Vec<R>> for Table<R> {
    fn from(rows: Vec<R>) -> Self {
        Self {
            rows: rows.into_iter().map(|row| (row.key(), row)).collect(),
        }
    }
}

impl<R: Record> From<Table<R>> for Vec<R> {
    fn from(table: Table<R>) -> Self {
        table.rows.into_values().collect()
    }
}

impl<R: Record> Table<R> {
    pub fn create(&mut self, record: R) -> Result<R> {
        let key = record.key();
        if self.rows.contains_key(&key) {
            return Err(StoreError::Constraint(format!(
                "{} {:?} already exists",
                R::KIND,
                key
            )));
        }
        self.rows.insert(key, record.clone());
        Ok(record)
    }

    pub fn get(&self, key: R::Key) -> Option<&R> {
        self.rows.get(&key)
    }

    pub fn exists(&self, key: R::Key) -> bool {
        self.rows.contains_key(&key)
    }

    pub fn any(&self, predicate: impl Fn(&R) -> bool) -> bool {
        self.rows.values().any(predicate)
    }

    /// Rows in key order, optionally filtered.
    pub fn list(&self, filter: impl Fn(&R) -> bool) -> Vec<R> {
        self.rows.values().filter(|row| filter(row)).cloned().collect()
    }

    pub fn all(&self) -> Vec<R> {
        self.list(|_| true)
    }

    pub fn update(&mut self, record: R) -> Result<R> {
        let key = record.key();
        match self.rows.get_mut(&key) {
            Some(slot) => {
                *slot = record.clone();
                Ok(record)
            }
            None => Err(StoreError::NotFound(format!("{} {:?}", R::KIND, key))),
        }
    }

    pub fn delete(&mut self, key: R::Key) -> bool {
        self.rows.remove(&key).is_some()
    }

    /// Drops every row matching `predicate`, returning how many were removed.
    pub fn delete_where(&mut self, predicate: impl Fn(&R) -> bool) -> usize {
        let before = self.rows.len();
        self.rows.retain(|_, row| !predicate(row));
        before - self.rows.len()
    }

    pub fn last_key(&self) -> Option<R::Key> {
        self.rows.keys().next_back().copied()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Inventory;

    fn row(store_id: u32, isbn13: i64, quantity: u32) -> Inventory {
        Inventory {
            store_id,
            isbn13,
            quantity,
        }
    }

    #[test]
    fn create_rejects_duplicate_keys() {
        let mut table = Table::default();
        table.create(row(1, 10, 2)).unwrap();
        let err = table.create(row(1, 10, 5)).unwrap_err();
        assert!(matches!(err, StoreError::Constraint(_)));
        assert_eq!(table.get((1, 10)).map(|r| r.quantity), Some(2));
    }

    #[test]
    fn update_requires_existing_row() {
        let mut table = Table::default();
        assert!(matches!(
            table.update(row(1, 10, 2)),
            Err(StoreError::NotFound(_))
        ));
        table.create(row(1, 10, 2)).unwrap();
        table.update(row(1, 10, 7)).unwrap();
        assert_eq!(table.get((1, 10)).map(|r| r.quantity), Some(7));
    }

    #[test]
    fn list_is_key_ordered_and_filterable() {
        let mut table = Table::default();
        table.create(row(2, 1, 1)).unwrap();
        table.create(row(1, 9, 1)).unwrap();
        table.create(row(1, 3, 0)).unwrap();
        let keys: Vec<_> = table.all().iter().map(|r| r.key()).collect();
        assert_eq!(keys, vec![(1, 3), (1, 9), (2, 1)]);
        assert_eq!(table.list(|r| r.store_id == 1).len(), 2);
        assert_eq!(table.delete_where(|r| r.quantity == 0), 1);
        assert_eq!(table.len(), 2);
    }

    #[test]
    fn serializes_as_a_list() {
        let mut table = Table::default();
        table.create(row(1, 10, 2)).unwrap();
        let json = serde_json::to_string(&table).unwrap();
        assert!(json.starts_with('['));
        let back: Table<Inventory> = serde_json::from_str(&json).unwrap();
        assert!(back.exists((1, 10)));
    }
}
