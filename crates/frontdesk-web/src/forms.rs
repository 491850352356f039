//! Form payloads and their validation.
//!
//! Every field arrives as `Option<String>` so a missing field yields the
//! office's own "missing field" error instead of an opaque extractor
//! rejection. Blank values are significant: a blank gender means
//! `Undefined` and a blank vaccination date means "now".

use chrono::{DateTime, Utc};
use frontdesk_core::{
  invitation::Invitation,
  medical::{Vaccination, Vaccine},
  person::{Gender, Person, parse_calendar_date},
};
use serde::Deserialize;

use crate::error::{Error, Result};

fn required(value: Option<String>, field: &'static str) -> Result<String> {
  value.ok_or(Error::MissingField(field))
}

// ─── Person form ─────────────────────────────────────────────────────────────

/// Raw fields of the registration and edit forms.
#[derive(Debug, Default, Deserialize)]
pub struct PersonForm {
  pub name:      Option<String>,
  pub givenname: Option<String>,
  pub gender:    Option<String>,
  pub birthdate: Option<String>,
  pub email:     Option<String>,
}

impl PersonForm {
  /// Validate for record creation; every field is required.
  pub fn into_person(self) -> Result<Person> {
    let name = required(self.name, "name")?;
    let given_name = required(self.givenname, "givenname")?;
    let gender = Gender::from_form_value(&required(self.gender, "gender")?)?;
    let birth_date =
      parse_calendar_date(&required(self.birthdate, "birthdate")?)?;
    let email = required(self.email, "email")?;
    Ok(Person { name, given_name, birth_date, gender, email })
  }

  /// Validate for record update; an absent `email` leaves the stored value
  /// untouched.
  pub fn into_update(self) -> Result<PersonUpdate> {
    let name = required(self.name, "name")?;
    let given_name = required(self.givenname, "givenname")?;
    let gender = Gender::from_form_value(&required(self.gender, "gender")?)?;
    let birth_date =
      parse_calendar_date(&required(self.birthdate, "birthdate")?)?;
    Ok(PersonUpdate {
      name,
      given_name,
      birth_date,
      gender,
      email: self.email,
    })
  }
}

/// A validated update payload.
#[derive(Debug, Clone)]
pub struct PersonUpdate {
  pub name:       String,
  pub given_name: String,
  pub birth_date: DateTime<Utc>,
  pub gender:     Gender,
  pub email:      Option<String>,
}

impl PersonUpdate {
  /// Overwrite the stored person fields in place.
  pub fn apply(self, person: &mut Person) {
    person.name = self.name;
    person.given_name = self.given_name;
    person.birth_date = self.birth_date;
    person.gender = self.gender;
    if let Some(email) = self.email {
      person.email = email;
    }
  }
}

// ─── Edit form ───────────────────────────────────────────────────────────────

/// What the `_action` discriminator of an edit submission asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditAction {
  Update,
  Delete,
}

/// Raw fields of the edit form: the `_action` discriminator plus the person
/// fields, which only matter for `update`.
#[derive(Debug, Default, Deserialize)]
pub struct EditForm {
  #[serde(rename = "_action")]
  pub action:    Option<String>,
  pub name:      Option<String>,
  pub givenname: Option<String>,
  pub gender:    Option<String>,
  pub birthdate: Option<String>,
  pub email:     Option<String>,
}

impl EditForm {
  pub fn action(&self) -> Result<EditAction> {
    match self.action.as_deref() {
      Some("update") => Ok(EditAction::Update),
      Some("delete") => Ok(EditAction::Delete),
      Some(other) => Err(Error::UnknownAction(other.to_string())),
      None => Err(Error::MissingField("_action")),
    }
  }

  pub fn into_person_form(self) -> PersonForm {
    PersonForm {
      name:      self.name,
      givenname: self.givenname,
      gender:    self.gender,
      birthdate: self.birthdate,
      email:     self.email,
    }
  }
}

// ─── Vaccination form ────────────────────────────────────────────────────────

/// Raw fields of the add-vaccination form. The wire names follow the
/// template's camelCase inputs.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VaccinationForm {
  pub date_of_vaccination: Option<String>,
  pub atc_code:            Option<String>,
  pub vaccine:             Option<String>,
  pub batch_number:        Option<String>,
  pub order:               Option<String>,
}

impl VaccinationForm {
  /// Validate into a vaccination entry. The invitation is supplied by the
  /// caller, which mints exactly one per accepted entry.
  pub fn into_vaccination(self, invitation: Invitation) -> Result<Vaccination> {
    let raw_date =
      required(self.date_of_vaccination, "dateOfVaccination")?;
    let date_of_vaccination = if raw_date.trim().is_empty() {
      Utc::now()
    } else {
      parse_calendar_date(&raw_date)?
    };
    let atc_code = required(self.atc_code, "atcCode")?;
    let vaccine =
      Vaccine::from_form_value(&required(self.vaccine, "vaccine")?)?;
    let batch_number = required(self.batch_number, "batchNumber")?;
    let raw_order = required(self.order, "order")?;
    let order = raw_order
      .trim()
      .parse()
      .map_err(|_| Error::InvalidOrder(raw_order.clone()))?;
    Ok(Vaccination {
      date_of_vaccination,
      atc_code,
      vaccine,
      batch_number,
      order,
      invitation,
    })
  }
}
