//! Installed-state cache: which formulas and casks brew reports as installed.
//!
//! Populated once from `brew list --formula` / `brew list --cask` when the
//! bridge is built, then only grown by successful installs. Membership is a
//! best-effort hint; absence never proves a package is missing.

use crate::backend::{Backend, brew_args};
use serde::Serialize;
use std::collections::HashSet;
use std::fmt;

/// Formula or cask; decides which set, which flags and which JSON key apply
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PackageKind {
    Formula,
    Cask,
}

impl PackageKind {
    pub fn is_cask(self) -> bool {
        matches!(self, Self::Cask)
    }

    fn list_flag(self) -> &'static str {
        match self {
            Self::Formula => "--formula",
            Self::Cask => "--cask",
        }
    }
}

impl fmt::Display for PackageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Formula => write!(f, "formula"),
            Self::Cask => write!(f, "cask"),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InstalledSet {
    formulas: HashSet<String>,
    casks: HashSet<String>,
}

impl InstalledSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_names<F, C>(formulas: F, casks: C) -> Self
    where
        F: IntoIterator,
        F::Item: Into<String>,
        C: IntoIterator,
        C::Item: Into<String>,
    {
        Self {
            formulas: formulas.into_iter().map(Into::into).collect(),
            casks: casks.into_iter().map(Into::into).collect(),
        }
    }

    fn set(&self, kind: PackageKind) -> &HashSet<String> {
        match kind {
            PackageKind::Formula => &self.formulas,
            PackageKind::Cask => &self.casks,
        }
    }

    pub fn contains(&self, kind: PackageKind, name: &str) -> bool {
        self.set(kind).contains(name)
    }

    /// Record a successful install; returns false if already present
    pub fn insert(&mut self, kind: PackageKind, name: &str) -> bool {
        let set = match kind {
            PackageKind::Formula => &mut self.formulas,
            PackageKind::Cask => &mut self.casks,
        };
        set.insert(name.to_string())
    }

    /// Names of one kind, sorted
    pub fn names(&self, kind: PackageKind) -> Vec<String> {
        let mut names: Vec<String> = self.set(kind).iter().cloned().collect();
        names.sort();
        names
    }

    pub fn len(&self, kind: PackageKind) -> usize {
        self.set(kind).len()
    }

    pub fn is_empty(&self) -> bool {
        self.formulas.is_empty() && self.casks.is_empty()
    }
}

/// How the startup scan went
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScanStatus {
    Complete,
    /// At least one listing failed; its set was left empty
    Degraded { reason: String },
}

impl ScanStatus {
    pub fn is_complete(&self) -> bool {
        matches!(self, Self::Complete)
    }
}

/// Split line-oriented brew output into trimmed, non-blank entries
pub fn parse_listing(stdout: &str) -> Vec<String> {
    stdout
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

/// Populate an [`InstalledSet`] from `brew list`.
///
/// Never fails: a listing that cannot be obtained leaves its set empty and
/// downgrades the status.
pub async fn scan<B: Backend + ?Sized>(backend: &B) -> (InstalledSet, ScanStatus) {
    let mut installed = InstalledSet::new();
    let mut problems = Vec::new();

    for kind in [PackageKind::Formula, PackageKind::Cask] {
        match list_kind(backend, kind).await {
            Ok(names) => {
                let set = match kind {
                    PackageKind::Formula => &mut installed.formulas,
                    PackageKind::Cask => &mut installed.casks,
                };
                set.extend(names);
            }
            Err(reason) => {
                tracing::warn!("could not list installed {kind}s: {reason}");
                problems.push(format!("{kind} listing: {reason}"));
            }
        }
    }

    let status = if problems.is_empty() {
        ScanStatus::Complete
    } else {
        ScanStatus::Degraded {
            reason: problems.join("; "),
        }
    };

    tracing::debug!(
        "installed scan: {} formulas, {} casks",
        installed.len(PackageKind::Formula),
        installed.len(PackageKind::Cask)
    );

    (installed, status)
}

async fn list_kind<B: Backend + ?Sized>(
    backend: &B,
    kind: PackageKind,
) -> std::result::Result<Vec<String>, String> {
    let output = backend
        .capture(&brew_args(["list", kind.list_flag()]))
        .await
        .map_err(|e| e.to_string())?;

    if !output.success {
        let stderr = output.stderr.trim();
        return Err(if stderr.is_empty() {
            "brew list exited with an error".to_string()
        } else {
            stderr.to_string()
        });
    }

    Ok(parse_listing(&output.stdout))
}
