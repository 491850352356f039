//! Error types for `frontdesk-core`.

use thiserror::Error;

use crate::store::RecordId;

#[derive(Debug, Error)]
pub enum Error {
  #[error("record not found: {0}")]
  RecordNotFound(RecordId),

  #[error("invalid calendar date {value:?}: {source}")]
  InvalidDate {
    value:  String,
    source: chrono::ParseError,
  },

  #[error("unknown gender: {0:?}")]
  UnknownGender(String),

  #[error("unknown vaccine: {0:?}")]
  UnknownVaccine(String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
