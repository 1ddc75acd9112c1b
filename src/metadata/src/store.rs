//! In-memory table keyed by a sequential id.
//!
//! Every method holds the table lock for the duration of a single operation, so a
//! constraint check and the write it guards are never interleaved with another writer.

use std::collections::BTreeMap;
use std::sync::RwLock;
use std::sync::RwLockReadGuard;
use std::sync::RwLockWriteGuard;

use crate::error::MetadataError;
use crate::Result;

pub struct Table<T> {
    name: &'static str,
    inner: RwLock<Inner<T>>,
}

struct Inner<T> {
    seq: u64,
    rows: BTreeMap<u64, T>,
}

impl<T: Clone> Table<T> {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            inner: RwLock::new(Inner {
                seq: 0,
                rows: BTreeMap::new(),
            }),
        }
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, Inner<T>>> {
        self.inner
            .read()
            .map_err(|err| MetadataError::Internal(format!("{} lock poisoned: {err}", self.name)))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, Inner<T>>> {
        self.inner
            .write()
            .map_err(|err| MetadataError::Internal(format!("{} lock poisoned: {err}", self.name)))
    }

    fn not_found(&self, id: u64) -> MetadataError {
        MetadataError::NotFound(format!("{} {id} not found", self.name))
    }

    /// Inserts the row built by `make` unless an existing row `conflicts` with it.
    pub fn insert<F, C>(&self, make: F, conflicts: C) -> Result<T>
    where
        F: FnOnce(u64) -> T,
        C: Fn(&T, &T) -> bool,
    {
        self.insert_checked(|_| Ok(()), make, conflicts)
    }

    /// Like [`Table::insert`], but first runs `validate` against the current rows under the
    /// same write lock.
    pub fn insert_checked<V, F, C>(&self, validate: V, make: F, conflicts: C) -> Result<T>
    where
        V: FnOnce(&BTreeMap<u64, T>) -> Result<()>,
        F: FnOnce(u64) -> T,
        C: Fn(&T, &T) -> bool,
    {
        let mut inner = self.write()?;
        validate(&inner.rows)?;
        let row = make(inner.seq + 1);
        if inner.rows.values().any(|existing| conflicts(existing, &row)) {
            return Err(MetadataError::AlreadyExists(format!(
                "{} already exists",
                self.name
            )));
        }
        inner.seq += 1;
        let id = inner.seq;
        inner.rows.insert(id, row.clone());

        Ok(row)
    }

    pub fn get(&self, id: u64) -> Result<T> {
        self.read()?
            .rows
            .get(&id)
            .cloned()
            .ok_or_else(|| self.not_found(id))
    }

    pub fn find<P>(&self, pred: P) -> Result<Option<T>>
    where P: Fn(&T) -> bool {
        Ok(self.read()?.rows.values().find(|row| pred(row)).cloned())
    }

    pub fn list(&self) -> Result<Vec<T>> {
        Ok(self.read()?.rows.values().cloned().collect())
    }

    pub fn filter<P>(&self, pred: P) -> Result<Vec<T>>
    where P: Fn(&T) -> bool {
        Ok(self
            .read()?
            .rows
            .values()
            .filter(|row| pred(row))
            .cloned()
            .collect())
    }

    /// Applies `f` to a copy of the row and stores it only if `f` succeeds and no other
    /// row `conflicts` with the result.
    pub fn update<F, C>(&self, id: u64, f: F, conflicts: C) -> Result<T>
    where
        F: FnOnce(&mut T) -> Result<()>,
        C: Fn(&T, &T) -> bool,
    {
        let mut inner = self.write()?;
        let mut row = inner.rows.get(&id).cloned().ok_or_else(|| self.not_found(id))?;
        f(&mut row)?;
        if inner
            .rows
            .iter()
            .any(|(other_id, existing)| *other_id != id && conflicts(existing, &row))
        {
            return Err(MetadataError::AlreadyExists(format!(
                "{} already exists",
                self.name
            )));
        }
        inner.rows.insert(id, row.clone());

        Ok(row)
    }

    pub fn delete(&self, id: u64) -> Result<T> {
        self.write()?
            .rows
            .remove(&id)
            .ok_or_else(|| self.not_found(id))
    }

    /// Removes the row and, transitively, every row whose `parent_of` points at a removed one.
    pub fn delete_tree<P>(&self, id: u64, parent_of: P) -> Result<Vec<T>>
    where P: Fn(&T) -> Option<u64> {
        let mut inner = self.write()?;
        let root = inner.rows.remove(&id).ok_or_else(|| self.not_found(id))?;
        let mut removed = vec![root];
        let mut pending = vec![id];
        while let Some(parent_id) = pending.pop() {
            let children: Vec<u64> = inner
                .rows
                .iter()
                .filter(|(_, row)| parent_of(row) == Some(parent_id))
                .map(|(id, _)| *id)
                .collect();
            for child_id in children {
                if let Some(child) = inner.rows.remove(&child_id) {
                    removed.push(child);
                    pending.push(child_id);
                }
            }
        }

        Ok(removed)
    }

    pub fn delete_where<P>(&self, pred: P) -> Result<Vec<T>>
    where P: Fn(&T) -> bool {
        let mut inner = self.write()?;
        let ids: Vec<u64> = inner
            .rows
            .iter()
            .filter(|(_, row)| pred(row))
            .map(|(id, _)| *id)
            .collect();

        Ok(ids
            .into_iter()
            .filter_map(|id| inner.rows.remove(&id))
            .collect())
    }
}

pub fn no_conflicts<T>(_: &T, _: &T) -> bool {
    false
}
