//! The generic record office.
//!
//! Both front ends are the same office component instantiated for a
//! different record type: a store, the invitation minter and the mount
//! prefix its redirects point back at.

use std::sync::Arc;

use frontdesk_core::{
  Error as CoreError,
  insurance::Customer,
  invitation::Invitation,
  medical::Patient,
  person::Person,
  store::{Keyed, MemoryStore, RecordId},
};
use frontdesk_invite::InvitationService;
use uuid::Uuid;

use crate::{
  error::Result,
  forms::PersonForm,
};

/// Implemented by the record type an office manages.
pub trait OfficeRecord: Keyed + Clone + Send + Sync + 'static {
  /// Construct a fresh record; nested collections start empty.
  fn new(id: RecordId, person: Person, invitation: Invitation) -> Self;
  fn person(&self) -> &Person;
  fn person_mut(&mut self) -> &mut Person;
  fn invitation(&self) -> &Invitation;
}

impl OfficeRecord for Customer {
  fn new(id: RecordId, person: Person, invitation: Invitation) -> Self {
    Customer::new(id, person, invitation)
  }

  fn person(&self) -> &Person {
    &self.person
  }

  fn person_mut(&mut self) -> &mut Person {
    &mut self.person
  }

  fn invitation(&self) -> &Invitation {
    &self.invitation
  }
}

impl OfficeRecord for Patient {
  fn new(id: RecordId, person: Person, invitation: Invitation) -> Self {
    Patient::new(id, person, invitation)
  }

  fn person(&self) -> &Person {
    &self.person
  }

  fn person_mut(&mut self) -> &mut Person {
    &mut self.person
  }

  fn invitation(&self) -> &Invitation {
    &self.invitation
  }
}

/// One record office: the store plus the collaborators its handlers need.
pub struct Office<T> {
  store:   MemoryStore<T>,
  invites: Arc<InvitationService>,
  prefix:  &'static str,
}

impl<T: OfficeRecord> Office<T> {
  pub fn new(invites: Arc<InvitationService>, prefix: &'static str) -> Self {
    Self { store: MemoryStore::new(), invites, prefix }
  }

  pub fn store(&self) -> &MemoryStore<T> {
    &self.store
  }

  pub fn invites(&self) -> &InvitationService {
    &self.invites
  }

  /// Create a record from a posted form: validate, allocate the next id,
  /// attach a freshly minted invitation, append.
  pub fn create(&self, form: PersonForm) -> Result<T> {
    let person = form.into_person()?;
    let invitation = self.invites.create();
    let record = self.store.create(|id| T::new(id, person, invitation));
    tracing::info!(office = self.prefix, id = record.id(), "record created");
    Ok(record)
  }

  /// All records, in registration order.
  pub fn list(&self) -> Vec<T> {
    self.store.list()
  }

  /// The record with the given id, or `RecordNotFound`.
  pub fn find(&self, id: RecordId) -> Result<T> {
    self
      .store
      .find(id)
      .ok_or_else(|| CoreError::RecordNotFound(id).into())
  }

  /// Apply a validated update in place. An absent id is an error, never a
  /// silent no-op.
  pub fn update(&self, id: RecordId, form: PersonForm) -> Result<()> {
    let update = form.into_update()?;
    self.store.update(id, |record| update.apply(record.person_mut()))?;
    tracing::info!(office = self.prefix, id, "record updated");
    Ok(())
  }

  /// Remove a record. Removing an absent id succeeds; ids are never reused.
  pub fn delete(&self, id: RecordId) {
    if self.store.remove(id) {
      tracing::info!(office = self.prefix, id, "record deleted");
    } else {
      tracing::debug!(office = self.prefix, id, "delete of absent record");
    }
  }

  /// The record whose own invitation carries the given id. Invitations on
  /// nested entries are the medical module's concern.
  pub fn find_by_invitation(&self, invitation_id: Uuid) -> Option<T> {
    self
      .store
      .scan(|r| (r.invitation().id == invitation_id).then(|| r.clone()))
  }

  /// Path of a record's detail page under this office's mount point.
  pub fn detail_path(&self, id: RecordId) -> String {
    format!("{}/{id}", self.prefix)
  }

  /// Path of this office's index.
  pub fn index_path(&self) -> &'static str {
    self.prefix
  }
}
