//! Person fields shared by both record offices.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use crate::error::{Error, Result};

/// Gender as submitted by the office forms.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, Display,
  EnumString,
)]
pub enum Gender {
  Male,
  Female,
  Other,
  #[default]
  Undefined,
}

impl Gender {
  /// Parse a posted form value. A blank value resolves to
  /// [`Gender::Undefined`]; anything else must match a variant label
  /// exactly.
  pub fn from_form_value(value: &str) -> Result<Self> {
    if value.trim().is_empty() {
      return Ok(Gender::Undefined);
    }
    value
      .parse()
      .map_err(|_| Error::UnknownGender(value.to_string()))
  }
}

/// The personal fields carried by both customers and patients.
#[derive(Debug, Clone)]
pub struct Person {
  pub name:       String,
  pub given_name: String,
  /// Always the noon-UTC instant of the submitted calendar date.
  pub birth_date: DateTime<Utc>,
  pub gender:     Gender,
  pub email:      String,
}

/// Parse an ISO calendar date (`YYYY-MM-DD`) and normalise it to the
/// noon-UTC instant of that date, so the stored value maps back to the same
/// calendar date in every timezone a consumer is likely to render it in.
pub fn parse_calendar_date(value: &str) -> Result<DateTime<Utc>> {
  let date: NaiveDate = value.parse().map_err(|source| Error::InvalidDate {
    value: value.to_string(),
    source,
  })?;
  Ok(at_noon_utc(date))
}

/// The noon-UTC instant of a calendar date.
pub fn at_noon_utc(date: NaiveDate) -> DateTime<Utc> {
  date
    .and_hms_opt(12, 0, 0)
    .expect("noon is a valid time of day")
    .and_utc()
}
