//! Data models

mod admin;
mod certificate;
mod diagnostics;
mod provisioner;
mod template;

pub use admin::*;
pub use certificate::*;
pub use diagnostics::*;
pub use provisioner::*;
pub use template::*;
