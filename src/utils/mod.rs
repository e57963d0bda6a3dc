//! Shared helpers

pub mod error;
pub mod x509;

pub use error::{ProviderError, ProviderResult};
