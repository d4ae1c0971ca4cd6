//! The bridge handle: the host's single entry point for system dependencies.
//!
//! A [`SystemBridge`] owns its backend and its installed-state cache. Hosts
//! construct one explicitly and pass it around; there is no global instance.
//!
//! ```no_run
//! use kegbridge::{BridgeConfig, SystemBridge};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let mut bridge = SystemBridge::connect(&BridgeConfig::from_env()).await?;
//!
//!     if SystemBridge::should_awaken("brew:wget") {
//!         let outcome = bridge.awaken("wget", "brew:wget").await;
//!         println!("succeeded: {}", outcome.succeeded());
//!     }
//!
//!     Ok(())
//! }
//! ```
//!
//! Operations take `&mut self`, so one handle never runs two brew commands at
//! once. Nothing here fails after construction: brew failures are reported
//! inside the returned outcomes.

use crate::backend::{Backend, BrewCli, brew_args};
use crate::config::BridgeConfig;
use crate::dispatch::{
    InstallReport, InstallStatus, MaintenanceTask, Operation, Outcome, TapAction,
};
use crate::error::Result;
use crate::info::{self, RecordLookup};
use crate::installed::{self, InstalledSet, PackageKind, ScanStatus};
use crate::manifest::ManifestDocument;
use crate::snapshot::{self, SystemSnapshot};
use crate::specifier::{self, Specifier};
use serde::Serialize;

/// One applied manifest item
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HarmonyStep {
    pub operation: String,
    pub outcome: Outcome,
}

/// Per-item results of [`SystemBridge::harmonize`], in application order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct HarmonyReport {
    pub steps: Vec<HarmonyStep>,
}

impl HarmonyReport {
    pub fn failures(&self) -> impl Iterator<Item = &HarmonyStep> {
        self.steps.iter().filter(|step| !step.outcome.succeeded())
    }

    pub fn is_clean(&self) -> bool {
        self.failures().next().is_none()
    }
}

pub struct SystemBridge<B: Backend = BrewCli> {
    backend: B,
    installed: InstalledSet,
    scan_status: ScanStatus,
}

impl SystemBridge<BrewCli> {
    /// Locate brew and scan installed packages.
    ///
    /// Fails only when no brew executable can be found.
    pub async fn connect(config: &BridgeConfig) -> Result<Self> {
        let backend = BrewCli::locate(config)?;
        Ok(Self::with_backend(backend).await)
    }

    /// Whether a dependency specifier belongs to the bridge
    pub fn should_awaken(specifier: &str) -> bool {
        specifier::claims(specifier)
    }
}

impl<B: Backend> SystemBridge<B> {
    pub async fn with_backend(backend: B) -> Self {
        let (installed, scan_status) = installed::scan(&backend).await;
        Self {
            backend,
            installed,
            scan_status,
        }
    }

    /// Parse, dispatch and run a claimed specifier for `package_name`
    pub async fn awaken(&mut self, package_name: &str, specifier: &str) -> Outcome {
        let spec = Specifier::parse(specifier);
        let operation = Operation::resolve(&spec, package_name);
        tracing::debug!("{} resolved to {:?}", specifier, operation);
        self.execute(operation).await
    }

    pub async fn execute(&mut self, operation: Operation) -> Outcome {
        match operation {
            Operation::Install {
                kind,
                name,
                options,
            } => Outcome::Install(self.install(kind, &name, &options).await),
            Operation::Tap { action, tap } => {
                let success = self.tap(action, &tap).await;
                Outcome::Tap {
                    tap,
                    action,
                    success,
                }
            }
            Operation::Maintenance(task) => Outcome::Maintenance {
                task,
                success: self.maintenance(task).await,
            },
            Operation::ExportSnapshot => Outcome::Snapshot(self.export_snapshot().await),
            Operation::Passthrough { command, args } => {
                let success = self.passthrough(&command, &args).await;
                Outcome::Passthrough {
                    command,
                    args,
                    success,
                }
            }
            Operation::Invalid { specifier, reason } => {
                tracing::warn!("rejected {}: {}", specifier, reason);
                Outcome::Rejected { specifier, reason }
            }
        }
    }

    /// Install a formula or cask unless the cache already lists it
    pub async fn install(
        &mut self,
        kind: PackageKind,
        name: &str,
        options: &[String],
    ) -> InstallReport {
        if self.installed.contains(kind, name) {
            tracing::debug!("{} {} already installed, skipping brew", kind, name);
            return InstallReport {
                status: InstallStatus::AlreadyInstalled,
                record: self.info(name, kind).await.into_record(),
            };
        }

        let mut args = brew_args(["install"]);
        if kind.is_cask() {
            args.push("--cask".to_string());
        }
        args.push(name.to_string());
        args.extend(options.iter().cloned());

        let status = if self.run(&args).await {
            self.installed.insert(kind, name);
            tracing::info!("installed {} {}", kind, name);
            InstallStatus::Installed
        } else {
            tracing::warn!("brew failed to install {} {}", kind, name);
            InstallStatus::Failed
        };

        InstallReport {
            status,
            record: self.info(name, kind).await.into_record(),
        }
    }

    /// Add or remove a tap; taps are never cached
    pub async fn tap(&self, action: TapAction, tap: &str) -> bool {
        let success = self.run(&brew_args([action.subcommand(), tap])).await;
        if success {
            tracing::info!("{} {}", action.subcommand(), tap);
        }
        success
    }

    pub async fn maintenance(&self, task: MaintenanceTask) -> bool {
        self.run(&brew_args([task.subcommand()])).await
    }

    /// Run any brew subcommand verbatim
    pub async fn passthrough(&self, command: &str, args: &[String]) -> bool {
        let mut full = Vec::with_capacity(args.len() + 1);
        full.push(command.to_string());
        full.extend(args.iter().cloned());
        self.run(&full).await
    }

    /// Normalized metadata for one package; never fails
    pub async fn info(&self, name: &str, kind: PackageKind) -> RecordLookup {
        let installed = self.installed.contains(kind, name);
        info::lookup(&self.backend, name, kind, installed).await
    }

    pub async fn export_snapshot(&self) -> SystemSnapshot {
        snapshot::capture(&self.backend, &self.installed).await
    }

    /// Apply the `system.brew` section of a manifest.
    ///
    /// Formulas, then casks, then taps. Every item is attempted even when an
    /// earlier one failed; the report carries each outcome.
    pub async fn harmonize(&mut self, document: &ManifestDocument) -> HarmonyReport {
        let mut report = HarmonyReport::default();
        let Some(manifest) = document.brew() else {
            tracing::debug!("manifest has no system.brew section");
            return report;
        };

        for operation in manifest.plan() {
            let label = describe(&operation);
            let outcome = self.execute(operation).await;
            report.steps.push(HarmonyStep {
                operation: label,
                outcome,
            });
        }

        report
    }

    /// Re-run the installed scan, replacing the cache
    pub async fn refresh(&mut self) -> &ScanStatus {
        let (installed, status) = installed::scan(&self.backend).await;
        self.installed = installed;
        self.scan_status = status;
        &self.scan_status
    }

    pub fn installed(&self) -> &InstalledSet {
        &self.installed
    }

    pub fn scan_status(&self) -> &ScanStatus {
        &self.scan_status
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    async fn run(&self, args: &[String]) -> bool {
        match self.backend.run(args).await {
            Ok(success) => success,
            Err(e) => {
                tracing::warn!("{}", e);
                false
            }
        }
    }
}

fn describe(operation: &Operation) -> String {
    match operation {
        Operation::Install { kind, name, .. } => format!("install {} {}", kind, name),
        Operation::Tap { action, tap } => format!("{} {}", action.subcommand(), tap),
        Operation::Maintenance(task) => task.to_string(),
        Operation::ExportSnapshot => "snapshot".to_string(),
        Operation::Passthrough { command, args } => {
            std::iter::once(command.as_str())
                .chain(args.iter().map(String::as_str))
                .collect::<Vec<_>>()
                .join(" ")
        }
        Operation::Invalid { specifier, .. } => format!("invalid {}", specifier),
    }
}
