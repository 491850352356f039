//! Medical-office entities: patients and their vaccination entries.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};
use uuid::Uuid;

use crate::{
  error::{Error, Result},
  invitation::Invitation,
  person::Person,
  store::{Keyed, RecordId},
};

/// The closed list of vaccine products the office may administer.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display,
  EnumString, EnumIter,
)]
pub enum Vaccine {
  Comirnaty,
  Spikevax,
  Vaxzevria,
  Jcovden,
  Nuvaxovid,
  Valneva,
}

impl Vaccine {
  /// Parse a posted form value against the authorised list; the label must
  /// match exactly.
  pub fn from_form_value(value: &str) -> Result<Self> {
    value
      .parse()
      .map_err(|_| Error::UnknownVaccine(value.to_string()))
  }
}

/// One vaccination entry. Entries are append-only; they are never edited or
/// removed once recorded.
#[derive(Debug, Clone)]
pub struct Vaccination {
  /// Noon UTC of the submitted date, or the submission instant when the
  /// form left the date blank.
  pub date_of_vaccination: DateTime<Utc>,
  pub atc_code:            String,
  pub vaccine:             Vaccine,
  pub batch_number:        String,
  /// Dose sequence number as entered; not checked for order or uniqueness.
  pub order:               u32,
  pub invitation:          Invitation,
}

/// A patient of the medical office.
#[derive(Debug, Clone)]
pub struct Patient {
  pub id:           RecordId,
  pub person:       Person,
  pub invitation:   Invitation,
  pub vaccinations: Vec<Vaccination>,
}

impl Patient {
  pub fn new(id: RecordId, person: Person, invitation: Invitation) -> Self {
    Self { id, person, invitation, vaccinations: Vec::new() }
  }

  /// Match an invitation id against the patient's own invitation or any of
  /// the nested vaccination invitations, earliest entry first.
  pub fn match_invitation(&self, invitation_id: Uuid) -> Option<InvitationMatch> {
    if self.invitation.id == invitation_id {
      return Some(InvitationMatch::Patient(self.clone()));
    }
    self
      .vaccinations
      .iter()
      .find(|v| v.invitation.id == invitation_id)
      .map(|v| InvitationMatch::Vaccination(self.clone(), v.clone()))
  }
}

impl Keyed for Patient {
  fn id(&self) -> RecordId {
    self.id
  }
}

/// The owner of a matched invitation id in the medical office.
#[derive(Debug, Clone)]
pub enum InvitationMatch {
  /// The patient's own invitation.
  Patient(Patient),
  /// A vaccination entry's invitation, paired with the owning patient.
  Vaccination(Patient, Vaccination),
}
