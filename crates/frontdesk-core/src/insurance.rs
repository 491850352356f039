//! Insurance-office entities.
//!
//! A customer is a person record plus an optional insurance block. The
//! office itself never writes the insurance block; it is filled in by the
//! external credential-exchange process once the customer's wallet has
//! completed the invitation flow.

use crate::{
  error::Result,
  invitation::Invitation,
  person::Person,
  store::{Keyed, MemoryStore, RecordId},
};

/// The insurant identity established by the credential exchange.
#[derive(Debug, Clone)]
pub struct Insurant {
  pub insurant_id: String,
}

/// The nested insurance record. Read-only for the office handlers.
#[derive(Debug, Clone)]
pub struct Insurance {
  pub insurant: Option<Insurant>,
}

/// A registered customer of the insurance office.
#[derive(Debug, Clone)]
pub struct Customer {
  pub id:         RecordId,
  pub person:     Person,
  pub insurance:  Option<Insurance>,
  pub invitation: Invitation,
}

impl Customer {
  /// A fresh registration carries no insurance block yet.
  pub fn new(id: RecordId, person: Person, invitation: Invitation) -> Self {
    Self { id, person, insurance: None, invitation }
  }

  /// The insurant id, once the external process has assigned one.
  pub fn insurant_id(&self) -> Option<&str> {
    self
      .insurance
      .as_ref()?
      .insurant
      .as_ref()
      .map(|i| i.insurant_id.as_str())
  }
}

impl Keyed for Customer {
  fn id(&self) -> RecordId {
    self.id
  }
}

/// Write seam for the credential-exchange process: attach the insurant
/// identity to a registered customer.
pub fn assign_insurant(
  store: &MemoryStore<Customer>,
  id: RecordId,
  insurant_id: String,
) -> Result<()> {
  store.update(id, |customer| {
    customer.insurance = Some(Insurance {
      insurant: Some(Insurant { insurant_id }),
    });
  })
}
