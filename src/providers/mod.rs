//! External collaborators behind swappable traits.
//!
//! The core treats payment processing and asset storage as opaque
//! capabilities; HTTP-backed implementations live here alongside
//! in-memory ones used by tests.

pub mod assets;
pub mod payments;

pub use assets::{AssetStorage, HttpAssetStorage, InMemoryAssetStorage};
pub use payments::{MockPaymentProvider, PaymentIntent, PaymentProvider, StripeGateway};

use crate::errors::ServiceError;

#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    #[error("provider request failed: {0}")]
    Request(String),
    #[error("provider returned an error: {0}")]
    Api(String),
    #[error("invalid amount: {0}")]
    InvalidAmount(String),
}

impl From<ProviderError> for ServiceError {
    fn from(err: ProviderError) -> Self {
        match err {
            ProviderError::InvalidAmount(msg) => ServiceError::ValidationError(msg),
            other => ServiceError::ExternalServiceError(other.to_string()),
        }
    }
}

impl From<reqwest::Error> for ProviderError {
    fn from(err: reqwest::Error) -> Self {
        ProviderError::Request(err.to_string())
    }
}
