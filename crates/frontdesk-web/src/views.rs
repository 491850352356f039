//! Rendering plumbing shared by every page.

use askama::Template;
use axum::response::{Html, IntoResponse, Response};
use chrono::{DateTime, Utc};
use frontdesk_core::{person::Person, store::RecordId};

use crate::error::Error;

/// Wraps a view model so handlers can return it directly; a failed render
/// surfaces as a 500 through the web error type.
pub struct Page<T>(pub T);

impl<T: Template> IntoResponse for Page<T> {
  fn into_response(self) -> Response {
    match self.0.render() {
      Ok(html) => Html(html).into_response(),
      Err(err) => Error::Template(err).into_response(),
    }
  }
}

/// Format a stored noon-UTC instant back to the calendar date it encodes.
pub fn calendar_date(instant: DateTime<Utc>) -> String {
  instant.format("%Y-%m-%d").to_string()
}

/// Table and detail row shape shared by both offices' person records.
pub struct PersonRow {
  pub id:         RecordId,
  pub name:       String,
  pub given_name: String,
  pub birth_date: String,
  pub gender:     String,
  pub email:      String,
}

impl PersonRow {
  pub fn new(id: RecordId, person: &Person) -> Self {
    Self {
      id,
      name:       person.name.clone(),
      given_name: person.given_name.clone(),
      birth_date: calendar_date(person.birth_date),
      gender:     person.gender.to_string(),
      email:      person.email.clone(),
    }
  }
}
