//! Invitation derivations for the record offices.
//!
//! Records store only an invitation id ([`frontdesk_core::invitation`]).
//! This crate turns that id into the two shareable representations a wallet
//! can consume: the out-of-band deep link and its QR rendering. Both are
//! pure functions of the id plus the configured exchange endpoint. Pure
//! synchronous; no HTTP dependencies.
//!
//! # Quick start
//!
//! ```no_run
//! use frontdesk_invite::InvitationService;
//!
//! let invites = InvitationService::new("https://wallet.example/exchange");
//! let invitation = invites.create();
//! println!("{}", invites.url(&invitation));
//! ```

pub mod error;

pub use error::{Error, Result};
use frontdesk_core::invitation::Invitation;
use qrcode::{QrCode, render::svg};

/// Mints invitations and derives their shareable representations.
#[derive(Debug, Clone)]
pub struct InvitationService {
  exchange_endpoint: String,
}

impl InvitationService {
  /// `exchange_endpoint` is the wallet-facing base URL every invitation
  /// link points at.
  pub fn new(exchange_endpoint: impl Into<String>) -> Self {
    Self { exchange_endpoint: exchange_endpoint.into() }
  }

  /// Mint a fresh invitation. Called once per record or vaccination entry,
  /// at creation time.
  pub fn create(&self) -> Invitation {
    let invitation = Invitation::new();
    tracing::debug!(id = %invitation.id, "invitation minted");
    invitation
  }

  /// The out-of-band deep link a wallet dereferences to reach the record
  /// behind the invitation.
  pub fn url(&self, invitation: &Invitation) -> String {
    format!("{}?oob={}", self.exchange_endpoint, invitation.id)
  }

  /// The invitation link rendered as an inline SVG QR code.
  pub fn qr_svg(&self, invitation: &Invitation) -> Result<String> {
    let code = QrCode::new(self.url(invitation))?;
    Ok(
      code
        .render()
        .min_dimensions(240, 240)
        .dark_color(svg::Color("#000000"))
        .light_color(svg::Color("#ffffff"))
        .build(),
    )
  }
}
