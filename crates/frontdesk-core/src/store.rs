//! The in-memory record store shared by both offices.
//!
//! A single `RwLock` guards both the record vector and the id counter, so id
//! allocation is atomic with insertion and every read-modify-write cycle
//! sees a consistent snapshot. Records keep creation order; ids count up
//! from 1 and are never reused, not even after a removal.

use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::error::{Error, Result};

/// Sequential record identifier, assigned from 1 in creation order.
pub type RecordId = u32;

/// Access to the identifier a stored record carries.
pub trait Keyed {
  fn id(&self) -> RecordId;
}

struct Inner<T> {
  records: Vec<T>,
  next_id: RecordId,
}

/// An ordered, lock-guarded, in-process collection of records.
pub struct MemoryStore<T> {
  inner: RwLock<Inner<T>>,
}

impl<T: Keyed + Clone> MemoryStore<T> {
  pub fn new() -> Self {
    Self {
      inner: RwLock::new(Inner { records: Vec::new(), next_id: 1 }),
    }
  }

  // A poisoned lock only means another thread panicked mid-access; the data
  // itself is a plain Vec and stays usable.
  fn read(&self) -> RwLockReadGuard<'_, Inner<T>> {
    self.inner.read().unwrap_or_else(PoisonError::into_inner)
  }

  fn write(&self) -> RwLockWriteGuard<'_, Inner<T>> {
    self.inner.write().unwrap_or_else(PoisonError::into_inner)
  }

  /// Allocate the next id, build the record and append it, all under one
  /// write lock. Returns a clone of the stored record.
  pub fn create(&self, build: impl FnOnce(RecordId) -> T) -> T {
    let mut inner = self.write();
    let id = inner.next_id;
    inner.next_id += 1;
    let record = build(id);
    inner.records.push(record.clone());
    record
  }

  /// All records, in creation order.
  pub fn list(&self) -> Vec<T> {
    self.read().records.clone()
  }

  /// The record with the given id, if any.
  pub fn find(&self, id: RecordId) -> Option<T> {
    self.read().records.iter().find(|r| r.id() == id).cloned()
  }

  /// Mutate the record with the given id in place. Fails with
  /// [`Error::RecordNotFound`] when the id is absent.
  pub fn update(&self, id: RecordId, apply: impl FnOnce(&mut T)) -> Result<()> {
    let mut inner = self.write();
    let record = inner
      .records
      .iter_mut()
      .find(|r| r.id() == id)
      .ok_or(Error::RecordNotFound(id))?;
    apply(record);
    Ok(())
  }

  /// Remove the record with the given id, reporting whether anything was
  /// removed. Removing an absent id is a no-op; the id counter is unaffected
  /// either way.
  pub fn remove(&self, id: RecordId) -> bool {
    let mut inner = self.write();
    let before = inner.records.len();
    inner.records.retain(|r| r.id() != id);
    inner.records.len() != before
  }

  /// Scan records in creation order under the read lock and return the
  /// first mapped value.
  pub fn scan<R>(&self, f: impl FnMut(&T) -> Option<R>) -> Option<R> {
    self.read().records.iter().find_map(f)
  }

  pub fn len(&self) -> usize {
    self.read().records.len()
  }

  pub fn is_empty(&self) -> bool {
    self.len() == 0
  }
}

impl<T: Keyed + Clone> Default for MemoryStore<T> {
  fn default() -> Self {
    Self::new()
  }
}
