use anyhow::Error as AnyError;
use thiserror::Error;

use crate::token::StoreError;

/// Typed rejection raised by the handler hooks.
///
/// Each variant is the response code surfaced to the host. None of them is
/// retried by this layer, and the registry is untouched whenever one is
/// returned.
#[derive(Error, Debug)]
pub enum VerificationError {
    #[error("invalid transaction body")]
    InvalidTransactionBody,
    #[error("token type does not support private transfers")]
    NotSupported,
    #[error("payer does not own the consumed note")]
    Unauthorized,
    #[error("token not associated to account")]
    TokenNotAssociatedToAccount,
    #[error("account KYC not granted for token")]
    AccountKycNotGrantedForToken,
    #[error("store error: {0}")]
    Store(#[from] StoreError),
    #[error(transparent)]
    AnyError(#[from] AnyError),
}
