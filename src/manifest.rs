//! Declarative manifest for `harmonize`, read from the host's `package.json`.
//!
//! ```json
//! {
//!   "name": "my-app",
//!   "system": {
//!     "brew": {
//!       "formulas": { "jq": "*", "wget": "latest" },
//!       "casks": { "iterm2": "*" },
//!       "taps": ["homebrew/cask-fonts"]
//!     }
//!   }
//! }
//! ```
//!
//! Versions are kept for display only; installs always take brew's current
//! version.

use crate::dispatch::Operation;
use crate::error::Result;
use crate::installed::PackageKind;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Manifest {
    #[serde(default)]
    pub formulas: BTreeMap<String, String>,
    #[serde(default)]
    pub casks: BTreeMap<String, String>,
    #[serde(default)]
    pub taps: Vec<String>,
}

impl Manifest {
    pub fn is_empty(&self) -> bool {
        self.formulas.is_empty() && self.casks.is_empty() && self.taps.is_empty()
    }

    /// Operations in application order: formulas, then casks, then taps
    pub fn plan(&self) -> Vec<Operation> {
        let formulas = self.formulas.keys().map(|name| {
            Operation::install_named(PackageKind::Formula, name, Vec::new(), "system.brew.formulas")
        });
        let casks = self.casks.keys().map(|name| {
            Operation::install_named(PackageKind::Cask, name, Vec::new(), "system.brew.casks")
        });
        let taps = self
            .taps
            .iter()
            .map(|tap| Operation::add_tap(tap, "system.brew.taps"));

        formulas.chain(casks).chain(taps).collect()
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
struct SystemSection {
    #[serde(default)]
    brew: Option<Manifest>,
}

/// A host document that may carry a `system.brew` section; other keys are ignored
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ManifestDocument {
    #[serde(default)]
    system: Option<SystemSection>,
}

impl ManifestDocument {
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_path(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            anyhow::anyhow!("Failed to read manifest {}: {}", path.display(), e)
        })?;
        Self::from_json_str(&content)
    }

    /// Wrap a bare manifest, for hosts that build one in code
    pub fn from_manifest(manifest: Manifest) -> Self {
        Self {
            system: Some(SystemSection {
                brew: Some(manifest),
            }),
        }
    }

    pub fn brew(&self) -> Option<&Manifest> {
        self.system.as_ref().and_then(|s| s.brew.as_ref())
    }
}
