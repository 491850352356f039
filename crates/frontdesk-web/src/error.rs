//! Error types and axum `IntoResponse` implementation.

use askama::Template;
use axum::{
  http::StatusCode,
  response::{Html, IntoResponse, Response},
};
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum Error {
  #[error("missing form field: {0}")]
  MissingField(&'static str),
  #[error("unknown action: {0:?}")]
  UnknownAction(String),
  #[error("invalid dose number: {0:?}")]
  InvalidOrder(String),
  #[error("invitation not found: {0}")]
  InvitationNotFound(Uuid),
  #[error(transparent)]
  Core(#[from] frontdesk_core::Error),
  #[error("invitation rendering failed: {0}")]
  Invite(#[from] frontdesk_invite::Error),
  #[error("template rendering failed: {0}")]
  Template(#[from] askama::Error),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

impl Error {
  fn status(&self) -> StatusCode {
    match self {
      Error::MissingField(_)
      | Error::UnknownAction(_)
      | Error::InvalidOrder(_) => StatusCode::BAD_REQUEST,
      Error::InvitationNotFound(_) => StatusCode::NOT_FOUND,
      Error::Core(core) => match core {
        frontdesk_core::Error::RecordNotFound(_) => StatusCode::NOT_FOUND,
        _ => StatusCode::BAD_REQUEST,
      },
      Error::Invite(_) | Error::Template(_) => {
        StatusCode::INTERNAL_SERVER_ERROR
      }
    }
  }
}

#[derive(Template)]
#[template(path = "error.html")]
struct ErrorPage<'a> {
  status:  u16,
  reason:  &'a str,
  message: &'a str,
}

impl IntoResponse for Error {
  fn into_response(self) -> Response {
    let status = self.status();
    let message = self.to_string();
    let page = ErrorPage {
      status:  status.as_u16(),
      reason:  status.canonical_reason().unwrap_or("Error"),
      message: &message,
    };
    match page.render() {
      Ok(html) => (status, Html(html)).into_response(),
      // Fall back to plain text if the error page itself fails to render.
      Err(_) => (status, message).into_response(),
    }
  }
}
