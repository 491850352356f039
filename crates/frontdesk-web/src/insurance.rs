//! Insurance-office routes.
//!
//! | Method | Path                      | Purpose                          |
//! |--------|---------------------------|----------------------------------|
//! | GET    | `/`                       | customer index                   |
//! | POST   | `/`                       | register a customer              |
//! | GET    | `/new`                    | registration form                |
//! | GET    | `/{id}`                   | customer detail                  |
//! | GET    | `/{id}/edit`              | edit form                        |
//! | POST   | `/{id}/edit`              | update or delete (`_action`)     |
//! | GET    | `/{uuid}/invitation`      | invitation page by invitation id |

use askama::Template;
use axum::{
  Form, Router,
  extract::{Path, State},
  response::Redirect,
  routing::get,
};
use frontdesk_core::{insurance::Customer, store::RecordId};
use uuid::Uuid;

use crate::{
  AppState,
  error::{Error, Result},
  forms::{EditAction, EditForm, PersonForm},
  views::{Page, PersonRow},
};

pub fn router() -> Router<AppState> {
  Router::new()
    .route("/", get(index).post(create))
    .route("/new", get(new_form))
    .route("/{id}", get(show))
    .route("/{id}/edit", get(edit_form).post(edit))
    .route("/{id}/invitation", get(invitation))
}

// ─── View models ─────────────────────────────────────────────────────────────

#[derive(Template)]
#[template(path = "insurance/index.html")]
struct IndexPage {
  customers: Vec<PersonRow>,
}

#[derive(Template)]
#[template(path = "insurance/new.html")]
struct NewCustomerPage;

#[derive(Template)]
#[template(path = "insurance/show.html")]
struct CustomerPage {
  customer:      PersonRow,
  insurant_id:   Option<String>,
  invitation_id: String,
}

#[derive(Template)]
#[template(path = "insurance/edit.html")]
struct EditCustomerPage {
  customer: PersonRow,
}

#[derive(Template)]
#[template(path = "insurance/invitation.html")]
struct CustomerInvitationPage {
  name:        String,
  given_name:  String,
  insurant_id: Option<String>,
  url:         String,
  qr_svg:      String,
}

fn row(customer: &Customer) -> PersonRow {
  PersonRow::new(customer.id, &customer.person)
}

// ─── Handlers ────────────────────────────────────────────────────────────────

async fn index(State(state): State<AppState>) -> Page<IndexPage> {
  let customers = state.insurance.list().iter().map(row).collect();
  Page(IndexPage { customers })
}

async fn new_form() -> Page<NewCustomerPage> {
  Page(NewCustomerPage)
}

async fn create(
  State(state): State<AppState>,
  Form(form): Form<PersonForm>,
) -> Result<Redirect> {
  let customer = state.insurance.create(form)?;
  Ok(Redirect::to(&state.insurance.detail_path(customer.id)))
}

async fn show(
  State(state): State<AppState>,
  Path(id): Path<RecordId>,
) -> Result<Page<CustomerPage>> {
  let customer = state.insurance.find(id)?;
  Ok(Page(CustomerPage {
    insurant_id:   customer.insurant_id().map(str::to_string),
    invitation_id: customer.invitation.id.to_string(),
    customer:      row(&customer),
  }))
}

async fn edit_form(
  State(state): State<AppState>,
  Path(id): Path<RecordId>,
) -> Result<Page<EditCustomerPage>> {
  let customer = state.insurance.find(id)?;
  Ok(Page(EditCustomerPage { customer: row(&customer) }))
}

async fn edit(
  State(state): State<AppState>,
  Path(id): Path<RecordId>,
  Form(form): Form<EditForm>,
) -> Result<Redirect> {
  match form.action()? {
    EditAction::Update => {
      state.insurance.update(id, form.into_person_form())?;
      Ok(Redirect::to(&state.insurance.detail_path(id)))
    }
    EditAction::Delete => {
      state.insurance.delete(id);
      Ok(Redirect::to(state.insurance.index_path()))
    }
  }
}

async fn invitation(
  State(state): State<AppState>,
  Path(invitation_id): Path<Uuid>,
) -> Result<Page<CustomerInvitationPage>> {
  let Some(customer) = state.insurance.find_by_invitation(invitation_id) else {
    tracing::debug!(%invitation_id, "invitation lookup missed");
    return Err(Error::InvitationNotFound(invitation_id));
  };
  let invites = state.insurance.invites();
  Ok(Page(CustomerInvitationPage {
    name:        customer.person.name.clone(),
    given_name:  customer.person.given_name.clone(),
    insurant_id: customer.insurant_id().map(str::to_string),
    url:         invites.url(&customer.invitation),
    qr_svg:      invites.qr_svg(&customer.invitation)?,
  }))
}
