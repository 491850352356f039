//! The medical office's "data changed" poll flag.

use std::sync::atomic::{AtomicBool, Ordering};

use serde::Serialize;

/// Process-wide flag raised when record data of interest changes outside a
/// staff member's own browser session, and lowered the moment the index or
/// a patient detail view has rendered fresh data. Reads and writes are
/// single atomic operations; racing writers resolve last-writer-wins.
#[derive(Debug, Default)]
pub struct DataStatus {
  update: AtomicBool,
}

impl DataStatus {
  pub fn new() -> Self {
    Self::default()
  }

  /// Raise the flag. Called by the external event producer, never by the
  /// office's own handlers, whose redirect-refresh already shows the change.
  pub fn mark_changed(&self) {
    self.update.store(true, Ordering::Relaxed);
  }

  /// Lower the flag after a view has shown the fresh data.
  pub fn clear(&self) {
    self.update.store(false, Ordering::Relaxed);
  }

  pub fn changed(&self) -> bool {
    self.update.load(Ordering::Relaxed)
  }
}

/// Wire shape of `GET /medicaloffice/update_status`.
#[derive(Debug, Serialize)]
pub struct UpdateStatus {
  pub update: bool,
}
