//! Library interface for kegbridge
//!
//! Routes `brew:`, `cask:` and `system:` dependency specifiers from a
//! language-level package manager to Homebrew. Hosts build a
//! [`SystemBridge`], ask [`should_awaken`] for each dependency, and hand
//! claimed ones to [`SystemBridge::awaken`].

pub mod backend;
pub mod bridge;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod info;
pub mod installed;
pub mod locate;
pub mod manifest;
pub mod snapshot;
pub mod specifier;

// Re-export commonly used items
pub use backend::{Backend, BrewCli, CommandOutput};
pub use bridge::{HarmonyReport, HarmonyStep, SystemBridge};
pub use config::BridgeConfig;
pub use dispatch::{InstallReport, InstallStatus, Operation, Outcome};
pub use error::{BridgeError, Result};
pub use info::{PackageRecord, RecordLookup};
pub use installed::{InstalledSet, PackageKind, ScanStatus};
pub use manifest::{Manifest, ManifestDocument};
pub use snapshot::SystemSnapshot;
pub use specifier::{Specifier, claims as should_awaken};
