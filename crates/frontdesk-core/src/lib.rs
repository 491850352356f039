//! Core types for the record offices.
//!
//! This crate is deliberately free of HTTP dependencies. Both offices share
//! the person fields, the invitation reference and the in-memory record
//! store defined here.

pub mod error;
pub mod insurance;
pub mod invitation;
pub mod medical;
pub mod person;
pub mod store;

pub use error::{Error, Result};
