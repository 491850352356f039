//! Medical-office routes.
//!
//! | Method | Path                     | Purpose                           |
//! |--------|--------------------------|-----------------------------------|
//! | GET    | `/`                      | patient index (clears poll flag)  |
//! | POST   | `/`                      | admit a patient                   |
//! | GET    | `/update_status`         | JSON poll flag                    |
//! | GET    | `/new`                   | admission form                    |
//! | GET    | `/{id}`                  | patient detail (clears poll flag) |
//! | GET    | `/{id}/edit`             | edit form                         |
//! | POST   | `/{id}/edit`             | update or delete (`_action`)      |
//! | GET    | `/{id}/addVaccination`   | vaccination entry form            |
//! | POST   | `/{id}/addVaccination`   | append a vaccination              |
//! | GET    | `/{uuid}/invitation`     | invitation page by invitation id  |
//! | GET    | `/checkin`               | standing check-in invitation      |

use askama::Template;
use axum::{
  Form, Json, Router,
  extract::{Path, State},
  response::{IntoResponse, Redirect, Response},
  routing::get,
};
use frontdesk_core::{
  medical::{InvitationMatch, Patient, Vaccination, Vaccine},
  store::RecordId,
};
use strum::IntoEnumIterator;
use uuid::Uuid;

use crate::{
  AppState,
  error::{Error, Result},
  forms::{EditAction, EditForm, PersonForm, VaccinationForm},
  status::UpdateStatus,
  views::{Page, PersonRow, calendar_date},
};

pub fn router() -> Router<AppState> {
  Router::new()
    .route("/", get(index).post(create))
    .route("/update_status", get(update_status))
    .route("/new", get(new_form))
    .route("/checkin", get(checkin))
    .route("/{id}", get(show))
    .route("/{id}/edit", get(edit_form).post(edit))
    .route("/{id}/addVaccination", get(vaccination_form).post(add_vaccination))
    .route("/{id}/invitation", get(invitation))
}

// ─── View models ─────────────────────────────────────────────────────────────

/// One row of the patient detail vaccination table.
struct VaccinationRow {
  date:          String,
  atc_code:      String,
  vaccine:       String,
  batch_number:  String,
  order:         u32,
  invitation_id: String,
}

impl From<&Vaccination> for VaccinationRow {
  fn from(entry: &Vaccination) -> Self {
    Self {
      date:          calendar_date(entry.date_of_vaccination),
      atc_code:      entry.atc_code.clone(),
      vaccine:       entry.vaccine.to_string(),
      batch_number:  entry.batch_number.clone(),
      order:         entry.order,
      invitation_id: entry.invitation.id.to_string(),
    }
  }
}

#[derive(Template)]
#[template(path = "medical/index.html")]
struct IndexPage {
  patients: Vec<PersonRow>,
}

#[derive(Template)]
#[template(path = "medical/new.html")]
struct NewPatientPage;

#[derive(Template)]
#[template(path = "medical/show.html")]
struct PatientPage {
  patient:       PersonRow,
  vaccinations:  Vec<VaccinationRow>,
  invitation_id: String,
}

#[derive(Template)]
#[template(path = "medical/edit.html")]
struct EditPatientPage {
  patient: PersonRow,
}

#[derive(Template)]
#[template(path = "medical/vaccination_form.html")]
struct VaccinationFormPage {
  patient:  PersonRow,
  vaccines: Vec<String>,
}

#[derive(Template)]
#[template(path = "medical/invitation_patient.html")]
struct PatientInvitationPage {
  name:       String,
  given_name: String,
  url:        String,
  qr_svg:     String,
}

#[derive(Template)]
#[template(path = "medical/invitation_vaccination.html")]
struct VaccinationInvitationPage {
  name:                String,
  given_name:          String,
  date_of_vaccination: String,
  vaccine:             String,
  url:                 String,
  qr_svg:              String,
}

#[derive(Template)]
#[template(path = "medical/checkin.html")]
struct CheckinPage {
  url:    String,
  qr_svg: String,
}

fn row(patient: &Patient) -> PersonRow {
  PersonRow::new(patient.id, &patient.person)
}

// ─── Handlers ────────────────────────────────────────────────────────────────

async fn index(State(state): State<AppState>) -> Page<IndexPage> {
  let patients = state.medical.list().iter().map(row).collect();
  state.status.clear();
  Page(IndexPage { patients })
}

async fn update_status(State(state): State<AppState>) -> Json<UpdateStatus> {
  Json(UpdateStatus { update: state.status.changed() })
}

async fn new_form() -> Page<NewPatientPage> {
  Page(NewPatientPage)
}

async fn create(
  State(state): State<AppState>,
  Form(form): Form<PersonForm>,
) -> Result<Redirect> {
  let patient = state.medical.create(form)?;
  Ok(Redirect::to(&state.medical.detail_path(patient.id)))
}

async fn show(
  State(state): State<AppState>,
  Path(id): Path<RecordId>,
) -> Result<Page<PatientPage>> {
  let patient = state.medical.find(id)?;
  let page = PatientPage {
    patient:       row(&patient),
    vaccinations:  patient.vaccinations.iter().map(VaccinationRow::from).collect(),
    invitation_id: patient.invitation.id.to_string(),
  };
  state.status.clear();
  Ok(Page(page))
}

async fn edit_form(
  State(state): State<AppState>,
  Path(id): Path<RecordId>,
) -> Result<Page<EditPatientPage>> {
  let patient = state.medical.find(id)?;
  Ok(Page(EditPatientPage { patient: row(&patient) }))
}

async fn edit(
  State(state): State<AppState>,
  Path(id): Path<RecordId>,
  Form(form): Form<EditForm>,
) -> Result<Redirect> {
  match form.action()? {
    EditAction::Update => {
      state.medical.update(id, form.into_person_form())?;
      Ok(Redirect::to(&state.medical.detail_path(id)))
    }
    EditAction::Delete => {
      state.medical.delete(id);
      Ok(Redirect::to(state.medical.index_path()))
    }
  }
}

async fn vaccination_form(
  State(state): State<AppState>,
  Path(id): Path<RecordId>,
) -> Result<Page<VaccinationFormPage>> {
  let patient = state.medical.find(id)?;
  Ok(Page(VaccinationFormPage {
    patient:  row(&patient),
    vaccines: Vaccine::iter().map(|v| v.to_string()).collect(),
  }))
}

async fn add_vaccination(
  State(state): State<AppState>,
  Path(id): Path<RecordId>,
  Form(form): Form<VaccinationForm>,
) -> Result<Redirect> {
  // Locate the patient before validating, so an absent id is a 404 even
  // when the form is broken too.
  state.medical.find(id)?;
  let entry = form.into_vaccination(state.medical.invites().create())?;
  state
    .medical
    .store()
    .update(id, |patient| patient.vaccinations.push(entry))?;
  tracing::info!(id, "vaccination recorded");
  Ok(Redirect::to(&state.medical.detail_path(id)))
}

async fn invitation(
  State(state): State<AppState>,
  Path(invitation_id): Path<Uuid>,
) -> Result<Response> {
  let Some(matched) = state
    .medical
    .store()
    .scan(|p| p.match_invitation(invitation_id))
  else {
    tracing::debug!(%invitation_id, "invitation lookup missed");
    return Err(Error::InvitationNotFound(invitation_id));
  };
  let invites = state.medical.invites();

  let response = match matched {
    InvitationMatch::Patient(patient) => Page(PatientInvitationPage {
      name:       patient.person.name.clone(),
      given_name: patient.person.given_name.clone(),
      url:        invites.url(&patient.invitation),
      qr_svg:     invites.qr_svg(&patient.invitation)?,
    })
    .into_response(),
    InvitationMatch::Vaccination(patient, entry) => {
      Page(VaccinationInvitationPage {
        name:                patient.person.name.clone(),
        given_name:          patient.person.given_name.clone(),
        date_of_vaccination: calendar_date(entry.date_of_vaccination),
        vaccine:             entry.vaccine.to_string(),
        url:                 invites.url(&entry.invitation),
        qr_svg:              invites.qr_svg(&entry.invitation)?,
      })
      .into_response()
    }
  };
  Ok(response)
}

async fn checkin(State(state): State<AppState>) -> Result<Page<CheckinPage>> {
  let invites = state.medical.invites();
  Ok(Page(CheckinPage {
    url:    invites.url(&state.checkin),
    qr_svg: invites.qr_svg(&state.checkin)?,
  }))
}
