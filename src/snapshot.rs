//! Full-state export (`system:soul`): every cached package plus live taps.

use crate::backend::{Backend, brew_args};
use crate::info::{self, PackageRecord};
use crate::installed::{InstalledSet, PackageKind, parse_listing};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SystemSnapshot {
    pub formulas: Vec<PackageRecord>,
    pub casks: Vec<PackageRecord>,
    pub taps: Vec<String>,
}

impl SystemSnapshot {
    pub fn package_count(&self) -> usize {
        self.formulas.len() + self.casks.len()
    }
}

/// Current taps from `brew tap`; empty (and logged) if the listing fails
pub async fn list_taps<B: Backend + ?Sized>(backend: &B) -> Vec<String> {
    match backend.capture(&brew_args(["tap"])).await {
        Ok(output) if output.success => parse_listing(&output.stdout),
        Ok(output) => {
            tracing::warn!("brew tap failed: {}", output.stderr.trim());
            Vec::new()
        }
        Err(e) => {
            tracing::warn!("brew tap failed: {}", e);
            Vec::new()
        }
    }
}

/// Build a snapshot from the cache, one info lookup per cached name.
///
/// Never served from a previous snapshot; each call re-queries brew.
pub async fn capture<B: Backend + ?Sized>(backend: &B, installed: &InstalledSet) -> SystemSnapshot {
    let mut snapshot = SystemSnapshot::default();

    for kind in [PackageKind::Formula, PackageKind::Cask] {
        let mut records = Vec::with_capacity(installed.len(kind));
        for name in installed.names(kind) {
            let lookup = info::lookup(backend, &name, kind, true).await;
            records.push(lookup.into_record());
        }
        match kind {
            PackageKind::Formula => snapshot.formulas = records,
            PackageKind::Cask => snapshot.casks = records,
        }
    }

    snapshot.taps = list_taps(backend).await;
    snapshot
}
