//! Command implementations for the kegbridge CLI
//!
//! - **check**: specifier classification, no brew calls
//! - **awaken**: dispatch one specifier
//! - **harmonize**: apply a manifest's `system.brew` section
//! - **query**: `info` and `snapshot`
//! - **completions**: shell completion scripts

pub mod awaken;
pub mod check;
pub mod completions;
pub mod harmonize;
pub mod query;
mod render;

pub use awaken::awaken;
pub use check::check;
pub use completions::completions;
pub use harmonize::harmonize;
pub use query::{info, snapshot};
