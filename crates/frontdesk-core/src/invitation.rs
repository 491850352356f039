//! The stored invitation reference.
//!
//! Records own only the invitation id. The shareable URL and the scannable
//! code are derived on demand by the invitation collaborator; neither is
//! stored state.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A shareable reference, generated once per record (or vaccination entry)
/// at creation time and never replaced afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Invitation {
  pub id: Uuid,
}

impl Invitation {
  /// Mint a fresh invitation with a random id.
  pub fn new() -> Self {
    Self { id: Uuid::new_v4() }
  }
}

impl Default for Invitation {
  fn default() -> Self {
    Self::new()
  }
}
