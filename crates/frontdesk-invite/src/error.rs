//! Error types for `frontdesk-invite`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("QR encoding failed: {0}")]
  Qr(#[from] qrcode::types::QrError),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
