//! Routing parsed specifiers to operations, and the typed results they yield.

use crate::info::PackageRecord;
use crate::installed::PackageKind;
use crate::snapshot::SystemSnapshot;
use crate::specifier::{Protocol, Specifier};
use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TapAction {
    Add,
    Remove,
}

impl TapAction {
    pub fn subcommand(self) -> &'static str {
        match self {
            Self::Add => "tap",
            Self::Remove => "untap",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MaintenanceTask {
    Update,
    Upgrade,
    Cleanup,
}

impl MaintenanceTask {
    pub fn subcommand(self) -> &'static str {
        match self {
            Self::Update => "update",
            Self::Upgrade => "upgrade",
            Self::Cleanup => "cleanup",
        }
    }
}

impl fmt::Display for MaintenanceTask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.subcommand())
    }
}

/// Exactly one backend action per specifier
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operation {
    Install {
        kind: PackageKind,
        name: String,
        options: Vec<String>,
    },
    Tap {
        action: TapAction,
        tap: String,
    },
    Maintenance(MaintenanceTask),
    ExportSnapshot,
    Passthrough {
        command: String,
        args: Vec<String>,
    },
    /// Nothing to run; the specifier cannot name a target
    Invalid {
        specifier: String,
        reason: String,
    },
}

impl Operation {
    /// Pick the operation for a parsed specifier.
    ///
    /// `package_name` is the host's name for the dependency; it becomes the
    /// install target when `brew:`/`cask:` carry no command.
    pub fn resolve(spec: &Specifier, package_name: &str) -> Self {
        match &spec.protocol {
            Protocol::Brew => Self::install(spec, package_name, PackageKind::Formula),
            Protocol::Cask => Self::install(spec, package_name, PackageKind::Cask),
            Protocol::System => Self::resolve_system(spec),
            Protocol::Other(_) => Self::passthrough(spec),
        }
    }

    fn install(spec: &Specifier, package_name: &str, kind: PackageKind) -> Self {
        Self::install_named(
            kind,
            spec.target(package_name),
            spec.args.clone(),
            &spec.to_string(),
        )
    }

    /// Install `name`, or [`Operation::Invalid`] when it is blank.
    ///
    /// `source` names where the request came from (a specifier or a manifest
    /// entry) for the rejection message.
    pub fn install_named(
        kind: PackageKind,
        name: &str,
        options: Vec<String>,
        source: &str,
    ) -> Self {
        if name.trim().is_empty() {
            return Self::Invalid {
                specifier: source.to_string(),
                reason: format!("empty {} name", kind),
            };
        }

        Self::Install {
            kind,
            name: name.to_string(),
            options,
        }
    }

    /// Add `tap`, or [`Operation::Invalid`] when it is blank
    pub fn add_tap(tap: &str, source: &str) -> Self {
        if tap.trim().is_empty() {
            return Self::Invalid {
                specifier: source.to_string(),
                reason: "empty tap name".to_string(),
            };
        }

        Self::Tap {
            action: TapAction::Add,
            tap: tap.to_string(),
        }
    }

    fn resolve_system(spec: &Specifier) -> Self {
        match spec.command.as_str() {
            "tap" => Self::tap(spec, TapAction::Add),
            "untap" => Self::tap(spec, TapAction::Remove),
            "update" => Self::Maintenance(MaintenanceTask::Update),
            "upgrade" => Self::Maintenance(MaintenanceTask::Upgrade),
            "cleanup" => Self::Maintenance(MaintenanceTask::Cleanup),
            "soul" => Self::ExportSnapshot,
            _ => Self::passthrough(spec),
        }
    }

    // A tap command without a name degrades to the bare brew subcommand.
    fn tap(spec: &Specifier, action: TapAction) -> Self {
        match spec.args.first() {
            Some(tap) => Self::Tap {
                action,
                tap: tap.clone(),
            },
            None => Self::passthrough(spec),
        }
    }

    fn passthrough(spec: &Specifier) -> Self {
        Self::Passthrough {
            command: spec.command.clone(),
            args: spec.args.clone(),
        }
    }
}

/// Whether an install ran, and how it ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum InstallStatus {
    /// Cache hit; brew was not invoked
    AlreadyInstalled,
    Installed,
    Failed,
}

impl InstallStatus {
    pub fn succeeded(self) -> bool {
        !matches!(self, Self::Failed)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InstallReport {
    pub status: InstallStatus,
    /// Queried after the attempt; `installed` mirrors the cache, so a failed
    /// install reports `false`
    pub record: PackageRecord,
}

/// Result of one dispatched operation
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum Outcome {
    Install(InstallReport),
    Tap {
        tap: String,
        action: TapAction,
        success: bool,
    },
    Maintenance {
        task: MaintenanceTask,
        success: bool,
    },
    Snapshot(SystemSnapshot),
    Passthrough {
        command: String,
        args: Vec<String>,
        success: bool,
    },
    Rejected {
        specifier: String,
        reason: String,
    },
}

impl Outcome {
    pub fn succeeded(&self) -> bool {
        match self {
            Self::Install(report) => report.status.succeeded(),
            Self::Tap { success, .. }
            | Self::Maintenance { success, .. }
            | Self::Passthrough { success, .. } => *success,
            Self::Snapshot(_) => true,
            Self::Rejected { .. } => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resolve(spec: &str, package: &str) -> Operation {
        Operation::resolve(&Specifier::parse(spec), package)
    }

    #[test]
    fn test_brew_installs_formula() {
        assert_eq!(
            resolve("brew:wget", "wget-dep"),
            Operation::Install {
                kind: PackageKind::Formula,
                name: "wget".to_string(),
                options: vec![],
            }
        );
    }

    #[test]
    fn test_cask_with_options() {
        assert_eq!(
            resolve("cask:firefox:--no-quarantine", "browser"),
            Operation::Install {
                kind: PackageKind::Cask,
                name: "firefox".to_string(),
                options: vec!["--no-quarantine".to_string()],
            }
        );
    }

    #[test]
    fn test_empty_command_uses_package_name() {
        assert_eq!(
            resolve("brew:", "ripgrep"),
            Operation::Install {
                kind: PackageKind::Formula,
                name: "ripgrep".to_string(),
                options: vec![],
            }
        );
    }

    #[test]
    fn test_empty_command_and_package_is_invalid() {
        assert!(matches!(resolve("cask:", ""), Operation::Invalid { .. }));
    }

    #[test]
    fn test_system_commands() {
        assert_eq!(
            resolve("system:tap:homebrew/cask-fonts", "x"),
            Operation::Tap {
                action: TapAction::Add,
                tap: "homebrew/cask-fonts".to_string(),
            }
        );
        assert_eq!(
            resolve("system:untap:foo/bar", "x"),
            Operation::Tap {
                action: TapAction::Remove,
                tap: "foo/bar".to_string(),
            }
        );
        assert_eq!(
            resolve("system:update", "x"),
            Operation::Maintenance(MaintenanceTask::Update)
        );
        assert_eq!(
            resolve("system:upgrade", "x"),
            Operation::Maintenance(MaintenanceTask::Upgrade)
        );
        assert_eq!(
            resolve("system:cleanup", "x"),
            Operation::Maintenance(MaintenanceTask::Cleanup)
        );
        assert_eq!(resolve("system:soul", "x"), Operation::ExportSnapshot);
    }

    #[test]
    fn test_system_unknown_is_passthrough() {
        assert_eq!(
            resolve("system:doctor:--verbose", "x"),
            Operation::Passthrough {
                command: "doctor".to_string(),
                args: vec!["--verbose".to_string()],
            }
        );
    }

    #[test]
    fn test_blank_install_name_is_invalid() {
        assert!(matches!(resolve("brew:", "  "), Operation::Invalid { .. }));
        match Operation::install_named(PackageKind::Formula, "", vec![], "system.brew.formulas") {
            Operation::Invalid { specifier, reason } => {
                assert_eq!(specifier, "system.brew.formulas");
                assert_eq!(reason, "empty formula name");
            }
            other => panic!("expected invalid, got {:?}", other),
        }
        assert!(matches!(Operation::add_tap(" ", "system.brew.taps"), Operation::Invalid { .. }));
        assert_eq!(
            Operation::add_tap("foo/bar", "system.brew.taps"),
            Operation::Tap {
                action: TapAction::Add,
                tap: "foo/bar".to_string(),
            }
        );
    }

    #[test]
    fn test_system_without_command_is_bare_passthrough() {
        assert_eq!(
            resolve("system:", "x"),
            Operation::Passthrough {
                command: String::new(),
                args: vec![],
            }
        );
    }

    #[test]
    fn test_tap_without_name_is_passthrough() {
        assert_eq!(
            resolve("system:tap", "x"),
            Operation::Passthrough {
                command: "tap".to_string(),
                args: vec![],
            }
        );
    }

    #[test]
    fn test_other_protocol_is_passthrough() {
        assert_eq!(
            resolve("port:install:curl", "x"),
            Operation::Passthrough {
                command: "install".to_string(),
                args: vec!["curl".to_string()],
            }
        );
    }

    #[test]
    fn test_outcome_serializes_with_kind_tag() {
        let outcome = Outcome::Maintenance {
            task: MaintenanceTask::Cleanup,
            success: true,
        };
        let value = serde_json::to_value(&outcome).unwrap();
        assert_eq!(value["kind"], "maintenance");
        assert_eq!(value["task"], "cleanup");
        assert!(outcome.succeeded());
    }

    #[test]
    fn test_install_status_success() {
        assert!(InstallStatus::AlreadyInstalled.succeeded());
        assert!(InstallStatus::Installed.succeeded());
        assert!(!InstallStatus::Failed.succeeded());
    }
}
