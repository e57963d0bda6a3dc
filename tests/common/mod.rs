//! Common test utilities and helpers
//!
//! - Certificate fixtures generated with rcgen
//! - A wiremock-backed step-ca with a configured provider pointed at it

pub mod fixtures;
pub mod mocks;

pub use fixtures::*;
pub use mocks::*;
