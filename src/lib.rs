//! step-ca provider library
//!
//! A typed client for the step-ca signing and admin API, plus the reconcilers
//! and data sources that map declarative state onto it.

pub mod config;
pub mod data_sources;
pub mod dummy_ca;
pub mod logging;
pub mod models;
pub mod provider;
pub mod resources;
pub mod services;
pub mod utils;

pub use config::{AppConfig, ProviderConfig};
pub use provider::StepCaProvider;
pub use services::StepCaClient;
pub use utils::error::{ProviderError, ProviderResult};
