//! Web front ends for the two record offices.
//!
//! Exposes an axum [`Router`] mounting the insurance office under
//! `/insurance` and the medical office under `/medicaloffice`, plus a
//! landing page linking both. All records live in process memory; state is
//! rebuilt empty on every start.

pub mod error;
pub mod forms;
pub mod insurance;
pub mod medical;
pub mod office;
pub mod status;
pub mod views;

pub use error::Error;

use std::sync::Arc;

use askama::Template;
use axum::{Router, extract::State, routing::get};
use frontdesk_core::{
  insurance::Customer, invitation::Invitation, medical::Patient,
};
use frontdesk_invite::InvitationService;
use serde::Deserialize;
use tower_http::trace::TraceLayer;

use office::Office;
use status::DataStatus;
use views::Page;

/// Mount prefixes for the two offices.
pub const INSURANCE_MOUNT: &str = "/insurance";
pub const MEDICAL_MOUNT: &str = "/medicaloffice";

// ─── Configuration ────────────────────────────────────────────────────────────

/// Runtime server configuration, deserialised from `config.toml` and
/// `FRONTDESK_*` environment variables. Every field has a default, so the
/// server also starts with no configuration at all.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
  #[serde(default = "default_host")]
  pub host: String,
  #[serde(default = "default_port")]
  pub port: u16,
  /// Wallet-facing endpoint encoded into invitation links; derived from
  /// `host` and `port` when unset.
  pub exchange_endpoint: Option<String>,
}

fn default_host() -> String {
  "127.0.0.1".to_string()
}

fn default_port() -> u16 {
  8080
}

impl Default for ServerConfig {
  fn default() -> Self {
    Self {
      host: default_host(),
      port: default_port(),
      exchange_endpoint: None,
    }
  }
}

impl ServerConfig {
  /// The address the HTTP listener binds.
  pub fn bind_address(&self) -> String {
    format!("{}:{}", self.host, self.port)
  }

  /// The endpoint invitation deep links point at.
  pub fn exchange_endpoint(&self) -> String {
    self
      .exchange_endpoint
      .clone()
      .unwrap_or_else(|| format!("http://{}/exchange", self.bind_address()))
  }
}

// ─── Application state ────────────────────────────────────────────────────────

/// Shared state threaded through all axum handlers.
#[derive(Clone)]
pub struct AppState {
  pub insurance: Arc<Office<Customer>>,
  pub medical:   Arc<Office<Patient>>,
  /// Raised by the external event producer, lowered by the medical views.
  pub status:    Arc<DataStatus>,
  /// Standing check-in invitation, minted once at startup.
  pub checkin:   Invitation,
  pub config:    Arc<ServerConfig>,
}

impl AppState {
  /// Build both offices from configuration. Stores start empty.
  pub fn new(config: ServerConfig) -> Self {
    let invites = Arc::new(InvitationService::new(config.exchange_endpoint()));
    let checkin = invites.create();
    tracing::info!(checkin = %checkin.id, "offices initialised");
    Self {
      insurance: Arc::new(Office::new(invites.clone(), INSURANCE_MOUNT)),
      medical:   Arc::new(Office::new(invites, MEDICAL_MOUNT)),
      status:    Arc::new(DataStatus::new()),
      checkin,
      config:    Arc::new(config),
    }
  }
}

// ─── Router ───────────────────────────────────────────────────────────────────

/// Build the axum [`Router`] serving both offices.
pub fn router(state: AppState) -> Router {
  Router::new()
    .route("/", get(landing))
    .nest(INSURANCE_MOUNT, insurance::router())
    .nest(MEDICAL_MOUNT, medical::router())
    .layer(TraceLayer::new_for_http())
    .with_state(state)
}

// ─── Landing page ─────────────────────────────────────────────────────────────

#[derive(Template)]
#[template(path = "landing.html")]
struct LandingPage {
  host: String,
}

async fn landing(State(state): State<AppState>) -> Page<LandingPage> {
  Page(LandingPage { host: state.config.bind_address() })
}

// ─── Integration tests ────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
  use super::*;

  use axum::{
    body::Body,
    http::{Request, StatusCode, header},
  };
  use chrono::{TimeZone, Utc};
  use frontdesk_core::{insurance::assign_insurant, person::Gender};
  use tower::ServiceExt as _;
  use uuid::Uuid;

  const ANNA: &str = "name=M%C3%BCller&givenname=Anna&gender=Female\
                      &birthdate=1990-05-20&email=anna%40example.com";
  const PETER: &str = "name=Hargreaves&givenname=Peter&gender=Male\
                      &birthdate=1979-11-02&email=peter%40example.com";
  const FIRST_DOSE: &str = "dateOfVaccination=2021-06-01&atcCode=J07BX03\
                            &vaccine=Comirnaty&batchNumber=EX1234&order=1";

  fn make_state() -> AppState {
    AppState::new(ServerConfig::default())
  }

  async fn send(
    state: AppState,
    method: &str,
    uri: &str,
    form: &str,
  ) -> axum::response::Response {
    let mut builder = Request::builder().method(method).uri(uri);
    if method == "POST" {
      builder = builder
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded");
    }
    let req = builder.body(Body::from(form.to_string())).unwrap();
    router(state).oneshot(req).await.unwrap()
  }

  async fn body_string(resp: axum::response::Response) -> String {
    let bytes =
      axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
  }

  fn location(resp: &axum::response::Response) -> &str {
    resp
      .headers()
      .get(header::LOCATION)
      .and_then(|v| v.to_str().ok())
      .unwrap_or_default()
  }

  // ── Landing ─────────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn landing_links_both_offices() {
    let resp = send(make_state(), "GET", "/", "").await;
    assert_eq!(resp.status(), StatusCode::OK);

    let html = body_string(resp).await;
    assert!(html.contains("/insurance"), "missing insurance link: {html}");
    assert!(
      html.contains("/medicaloffice"),
      "missing medical link: {html}"
    );
  }

  // ── Registration ────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn register_customer_assigns_id_and_redirects() {
    let state = make_state();

    let resp = send(state.clone(), "POST", "/insurance", ANNA).await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&resp), "/insurance/1");

    let customers = state.insurance.list();
    assert_eq!(customers.len(), 1);
    assert_eq!(customers[0].id, 1);
    assert_eq!(customers[0].person.gender, Gender::Female);
    assert_eq!(
      customers[0].person.birth_date,
      Utc.with_ymd_and_hms(1990, 5, 20, 12, 0, 0).unwrap()
    );
    assert!(customers[0].insurance.is_none());
  }

  #[tokio::test]
  async fn registered_customers_keep_registration_order() {
    let state = make_state();
    send(state.clone(), "POST", "/insurance", ANNA).await;
    let resp = send(state.clone(), "POST", "/insurance", PETER).await;
    assert_eq!(location(&resp), "/insurance/2");

    let index = body_string(send(state, "GET", "/insurance", "").await).await;
    let anna = index.find("Müller").expect("first customer listed");
    let peter = index.find("Hargreaves").expect("second customer listed");
    assert!(anna < peter, "index out of registration order: {index}");
  }

  #[tokio::test]
  async fn registration_with_missing_field_is_rejected() {
    let state = make_state();
    let form = "name=M%C3%BCller&givenname=Anna&gender=Female&birthdate=1984-03-01";

    let resp = send(state.clone(), "POST", "/insurance", form).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert!(state.insurance.list().is_empty());
  }

  #[tokio::test]
  async fn registration_with_unknown_gender_is_rejected() {
    let form = "name=M%C3%BCller&givenname=Anna&gender=female\
                &birthdate=1984-03-01&email=anna%40example.com";
    let resp = send(make_state(), "POST", "/insurance", form).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
  }

  #[tokio::test]
  async fn registration_with_malformed_birthdate_is_rejected() {
    let form = "name=M%C3%BCller&givenname=Anna&gender=Female\
                &birthdate=01.03.1984&email=anna%40example.com";
    let resp = send(make_state(), "POST", "/insurance", form).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
  }

  #[tokio::test]
  async fn blank_gender_registers_as_undefined() {
    let state = make_state();
    let form = "name=M%C3%BCller&givenname=Anna&gender=\
                &birthdate=1984-03-01&email=anna%40example.com";

    let resp = send(state.clone(), "POST", "/insurance", form).await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(state.insurance.list()[0].person.gender, Gender::Undefined);
  }

  #[tokio::test]
  async fn creation_forms_render() {
    let resp = send(make_state(), "GET", "/insurance/new", "").await;
    assert_eq!(resp.status(), StatusCode::OK);
    let html = body_string(resp).await;
    assert!(html.contains("name=\"givenname\""), "body: {html}");

    let resp = send(make_state(), "GET", "/medicaloffice/new", "").await;
    assert_eq!(resp.status(), StatusCode::OK);
  }

  // ── Detail ──────────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn customer_detail_shows_person_fields() {
    let state = make_state();
    send(state.clone(), "POST", "/insurance", ANNA).await;

    let resp = send(state, "GET", "/insurance/1", "").await;
    assert_eq!(resp.status(), StatusCode::OK);

    let html = body_string(resp).await;
    assert!(html.contains("Müller"), "body: {html}");
    assert!(html.contains("anna@example.com"), "body: {html}");
    assert!(html.contains("1990-05-20"), "body: {html}");
  }

  #[tokio::test]
  async fn customer_detail_missing_returns_404() {
    let resp = send(make_state(), "GET", "/insurance/99", "").await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
  }

  #[tokio::test]
  async fn insurant_id_appears_once_assigned() {
    let state = make_state();
    send(state.clone(), "POST", "/insurance", ANNA).await;

    assign_insurant(state.insurance.store(), 1, "Z123456789".into()).unwrap();

    let html =
      body_string(send(state, "GET", "/insurance/1", "").await).await;
    assert!(html.contains("Z123456789"), "body: {html}");
  }

  // ── Update / delete ─────────────────────────────────────────────────────────

  #[tokio::test]
  async fn edit_forms_prefill_the_record() {
    let state = make_state();
    send(state.clone(), "POST", "/insurance", ANNA).await;
    send(state.clone(), "POST", "/medicaloffice", PETER).await;

    let resp = send(state.clone(), "GET", "/insurance/1/edit", "").await;
    assert_eq!(resp.status(), StatusCode::OK);
    let html = body_string(resp).await;
    assert!(html.contains("Müller"), "body: {html}");

    let resp = send(state, "GET", "/medicaloffice/1/edit", "").await;
    assert_eq!(resp.status(), StatusCode::OK);
    let html = body_string(resp).await;
    assert!(html.contains("Hargreaves"), "body: {html}");
  }

  #[tokio::test]
  async fn edit_form_of_missing_customer_returns_404() {
    let resp = send(make_state(), "GET", "/insurance/9/edit", "").await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
  }

  #[tokio::test]
  async fn update_overwrites_fields_but_keeps_email_when_absent() {
    let state = make_state();
    send(state.clone(), "POST", "/insurance", ANNA).await;

    let form = "_action=update&name=Schmidt&givenname=Anna\
                &gender=Other&birthdate=1985-04-02";
    let resp = send(state.clone(), "POST", "/insurance/1/edit", form).await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&resp), "/insurance/1");

    let customer = state.insurance.find(1).unwrap();
    assert_eq!(customer.person.name, "Schmidt");
    assert_eq!(customer.person.gender, Gender::Other);
    assert_eq!(customer.person.email, "anna@example.com");
  }

  #[tokio::test]
  async fn update_with_email_present_replaces_the_stored_value() {
    let state = make_state();
    send(state.clone(), "POST", "/insurance", ANNA).await;

    let form = "_action=update&name=M%C3%BCller&givenname=Anna\
                &gender=Female&birthdate=1990-05-20&email=new%40example.com";
    let resp = send(state.clone(), "POST", "/insurance/1/edit", form).await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);

    assert_eq!(
      state.insurance.find(1).unwrap().person.email,
      "new@example.com"
    );
  }

  #[tokio::test]
  async fn update_with_blank_email_stores_the_blank_value() {
    let state = make_state();
    send(state.clone(), "POST", "/insurance", ANNA).await;

    let form = "_action=update&name=M%C3%BCller&givenname=Anna\
                &gender=Female&birthdate=1990-05-20&email=";
    let resp = send(state.clone(), "POST", "/insurance/1/edit", form).await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);

    assert_eq!(state.insurance.find(1).unwrap().person.email, "");
  }

  #[tokio::test]
  async fn update_of_missing_customer_returns_404() {
    let form = "_action=update&name=M%C3%BCller&givenname=Anna\
                &gender=Female&birthdate=1984-03-01";
    let resp = send(make_state(), "POST", "/insurance/7/edit", form).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
  }

  #[tokio::test]
  async fn unknown_edit_action_is_rejected() {
    let state = make_state();
    send(state.clone(), "POST", "/insurance", ANNA).await;

    let resp =
      send(state.clone(), "POST", "/insurance/1/edit", "_action=archive").await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert_eq!(state.insurance.list().len(), 1);
  }

  #[tokio::test]
  async fn delete_removes_customer_and_redirects_to_index() {
    let state = make_state();
    send(state.clone(), "POST", "/insurance", ANNA).await;
    send(state.clone(), "POST", "/insurance", PETER).await;

    let resp =
      send(state.clone(), "POST", "/insurance/1/edit", "_action=delete").await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&resp), "/insurance");

    let remaining = state.insurance.list();
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0].id, 2);

    let resp = send(state, "GET", "/insurance/1", "").await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
  }

  #[tokio::test]
  async fn deleting_an_absent_customer_still_succeeds() {
    let resp =
      send(make_state(), "POST", "/insurance/42/edit", "_action=delete").await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&resp), "/insurance");
  }

  // ── Invitations ─────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn customer_invitation_page_renders_link_and_qr() {
    let state = make_state();
    send(state.clone(), "POST", "/insurance", ANNA).await;
    let invitation_id = state.insurance.list()[0].invitation.id;

    let uri = format!("/insurance/{invitation_id}/invitation");
    let resp = send(state, "GET", &uri, "").await;
    assert_eq!(resp.status(), StatusCode::OK);

    let html = body_string(resp).await;
    assert!(html.contains(&format!("?oob={invitation_id}")), "body: {html}");
    assert!(html.contains("<svg"), "QR missing: {html}");
  }

  #[tokio::test]
  async fn unknown_invitation_returns_404() {
    let uri = format!("/insurance/{}/invitation", Uuid::new_v4());
    let resp = send(make_state(), "GET", &uri, "").await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
  }

  #[tokio::test]
  async fn invitations_do_not_leak_across_offices() {
    let state = make_state();
    send(state.clone(), "POST", "/medicaloffice", PETER).await;
    let patient_invitation = state.medical.list()[0].invitation.id;

    let uri = format!("/insurance/{patient_invitation}/invitation");
    let resp = send(state, "GET", &uri, "").await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
  }

  // ── Medical office ──────────────────────────────────────────────────────────

  #[tokio::test]
  async fn admit_patient_and_record_vaccinations() {
    let state = make_state();

    let resp = send(state.clone(), "POST", "/medicaloffice", PETER).await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&resp), "/medicaloffice/1");

    let resp = send(
      state.clone(),
      "POST",
      "/medicaloffice/1/addVaccination",
      FIRST_DOSE,
    )
    .await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&resp), "/medicaloffice/1");

    let second = "dateOfVaccination=2021-09-13&atcCode=J07BX03\
                  &vaccine=Spikevax&batchNumber=EX9999&order=2";
    send(state.clone(), "POST", "/medicaloffice/1/addVaccination", second)
      .await;

    let patient = state.medical.find(1).unwrap();
    assert_eq!(patient.vaccinations.len(), 2);
    let orders: Vec<_> =
      patient.vaccinations.iter().map(|v| v.order).collect();
    assert_eq!(orders, [1, 2]);
    assert_ne!(
      patient.vaccinations[0].invitation.id,
      patient.vaccinations[1].invitation.id
    );
    assert_ne!(patient.invitation.id, patient.vaccinations[0].invitation.id);

    let html =
      body_string(send(state, "GET", "/medicaloffice/1", "").await).await;
    assert!(html.contains("Comirnaty"), "body: {html}");
    assert!(html.contains("Spikevax"), "body: {html}");
  }

  #[tokio::test]
  async fn vaccination_for_missing_patient_returns_404() {
    let resp = send(
      make_state(),
      "POST",
      "/medicaloffice/9/addVaccination",
      FIRST_DOSE,
    )
    .await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
  }

  #[tokio::test]
  async fn vaccination_with_unknown_vaccine_is_rejected() {
    let state = make_state();
    send(state.clone(), "POST", "/medicaloffice", PETER).await;

    let form = "dateOfVaccination=2021-06-01&atcCode=J07BX03\
                &vaccine=Sputnik&batchNumber=EX1234&order=1";
    let resp =
      send(state.clone(), "POST", "/medicaloffice/1/addVaccination", form)
        .await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert!(state.medical.find(1).unwrap().vaccinations.is_empty());
  }

  #[tokio::test]
  async fn vaccination_form_offers_the_authorised_products() {
    let state = make_state();
    send(state.clone(), "POST", "/medicaloffice", PETER).await;

    let html = body_string(
      send(state, "GET", "/medicaloffice/1/addVaccination", "").await,
    )
    .await;
    assert!(html.contains("Comirnaty"), "body: {html}");
    assert!(html.contains("Valneva"), "body: {html}");
  }

  #[tokio::test]
  async fn vaccination_invitation_page_shows_the_entry() {
    let state = make_state();
    send(state.clone(), "POST", "/medicaloffice", PETER).await;
    send(
      state.clone(),
      "POST",
      "/medicaloffice/1/addVaccination",
      FIRST_DOSE,
    )
    .await;

    let entry_invitation =
      state.medical.find(1).unwrap().vaccinations[0].invitation.id;
    let uri = format!("/medicaloffice/{entry_invitation}/invitation");
    let resp = send(state, "GET", &uri, "").await;
    assert_eq!(resp.status(), StatusCode::OK);

    let html = body_string(resp).await;
    assert!(html.contains("Comirnaty"), "body: {html}");
    assert!(html.contains("2021-06-01"), "body: {html}");
    assert!(html.contains("<svg"), "QR missing: {html}");
  }

  #[tokio::test]
  async fn patient_invitation_page_renders() {
    let state = make_state();
    send(state.clone(), "POST", "/medicaloffice", PETER).await;
    let invitation_id = state.medical.list()[0].invitation.id;

    let uri = format!("/medicaloffice/{invitation_id}/invitation");
    let html = body_string(send(state, "GET", &uri, "").await).await;
    assert!(html.contains("Hargreaves"), "body: {html}");
    assert!(html.contains(&format!("?oob={invitation_id}")), "body: {html}");
  }

  // ── Poll flag ───────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn update_status_reflects_the_flag_and_index_clears_it() {
    let state = make_state();

    let resp =
      send(state.clone(), "GET", "/medicaloffice/update_status", "").await;
    assert_eq!(resp.status(), StatusCode::OK);
    let status: serde_json::Value =
      serde_json::from_str(&body_string(resp).await).unwrap();
    assert_eq!(status["update"], serde_json::json!(false));

    state.status.mark_changed();
    let resp =
      send(state.clone(), "GET", "/medicaloffice/update_status", "").await;
    let status: serde_json::Value =
      serde_json::from_str(&body_string(resp).await).unwrap();
    assert_eq!(status["update"], serde_json::json!(true));

    send(state.clone(), "GET", "/medicaloffice", "").await;
    assert!(!state.status.changed());
  }

  #[tokio::test]
  async fn patient_detail_render_clears_the_flag() {
    let state = make_state();
    send(state.clone(), "POST", "/medicaloffice", PETER).await;

    state.status.mark_changed();
    send(state.clone(), "GET", "/medicaloffice/1", "").await;
    assert!(!state.status.changed());
  }

  #[tokio::test]
  async fn missing_detail_does_not_clear_the_flag() {
    let state = make_state();
    state.status.mark_changed();

    let resp = send(state.clone(), "GET", "/medicaloffice/9", "").await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    assert!(state.status.changed());
  }

  // ── Check-in ────────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn checkin_page_reuses_the_standing_invitation() {
    let state = make_state();
    let expected = format!("?oob={}", state.checkin.id);

    let first =
      body_string(send(state.clone(), "GET", "/medicaloffice/checkin", "").await)
        .await;
    let second =
      body_string(send(state, "GET", "/medicaloffice/checkin", "").await).await;

    assert!(first.contains(&expected), "body: {first}");
    assert!(second.contains(&expected), "body: {second}");
    assert!(first.contains("<svg"), "QR missing: {first}");
  }

  // ── Isolation ───────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn offices_number_records_independently() {
    let state = make_state();
    send(state.clone(), "POST", "/insurance", ANNA).await;
    send(state.clone(), "POST", "/insurance", PETER).await;

    let resp = send(state.clone(), "POST", "/medicaloffice", PETER).await;
    assert_eq!(location(&resp), "/medicaloffice/1");

    assert_eq!(state.insurance.list().len(), 2);
    assert_eq!(state.medical.list().len(), 1);
  }
}
