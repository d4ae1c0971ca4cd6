//! Normalizing `brew info --json=v2` output into [`PackageRecord`]s.
//!
//! Lookups never fail. Anything that goes wrong (spawn error, non-zero exit,
//! malformed JSON, an empty `formulae`/`casks` array) produces a minimal
//! record marked [`RecordLookup::Degraded`].

use crate::backend::{Backend, brew_args};
use crate::installed::PackageKind;
use serde::{Deserialize, Serialize};

/// Version reported when brew gives none
pub const UNKNOWN_VERSION: &str = "unknown";

/// One installable unit as seen by the bridge
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PackageRecord {
    pub name: String,
    pub version: String,
    /// Cache membership at lookup time, never brew's own opinion
    pub installed: bool,
    /// Formulas only; `None` for casks and degraded lookups
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dependencies: Option<Vec<String>>,
    pub is_cask: bool,
}

impl PackageRecord {
    /// The record returned when metadata is unavailable
    pub fn minimal(name: &str, kind: PackageKind, installed: bool) -> Self {
        Self {
            name: name.to_string(),
            version: UNKNOWN_VERSION.to_string(),
            installed,
            dependencies: None,
            is_cask: kind.is_cask(),
        }
    }
}

/// Outcome of a metadata lookup
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordLookup {
    Resolved(PackageRecord),
    Degraded { record: PackageRecord, reason: String },
}

impl RecordLookup {
    pub fn record(&self) -> &PackageRecord {
        match self {
            Self::Resolved(record) | Self::Degraded { record, .. } => record,
        }
    }

    pub fn into_record(self) -> PackageRecord {
        match self {
            Self::Resolved(record) | Self::Degraded { record, .. } => record,
        }
    }

    pub fn is_degraded(&self) -> bool {
        matches!(self, Self::Degraded { .. })
    }
}

#[derive(Debug, Default, Deserialize)]
struct InfoDocument {
    #[serde(default)]
    formulae: Vec<FormulaInfo>,
    #[serde(default)]
    casks: Vec<CaskInfo>,
}

#[derive(Debug, Deserialize)]
struct FormulaInfo {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    versions: Option<Versions>,
    #[serde(default)]
    version: Option<String>,
    #[serde(default)]
    dependencies: Option<Vec<String>>,
}

#[derive(Debug, Default, Deserialize)]
struct Versions {
    #[serde(default)]
    stable: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CaskInfo {
    #[serde(default)]
    token: Option<String>,
    #[serde(default)]
    version: Option<String>,
}

fn info_args(name: &str, kind: PackageKind) -> Vec<String> {
    match kind {
        PackageKind::Formula => brew_args(["info", "--json=v2", name]),
        PackageKind::Cask => brew_args(["info", "--cask", "--json=v2", name]),
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// Turn raw `info --json=v2` text into a record
pub fn normalize(
    queried: &str,
    kind: PackageKind,
    installed: bool,
    json: &str,
) -> std::result::Result<PackageRecord, String> {
    let doc: InfoDocument =
        serde_json::from_str(json).map_err(|e| format!("malformed info JSON: {}", e))?;

    match kind {
        PackageKind::Formula => {
            let info = doc
                .formulae
                .into_iter()
                .next()
                .ok_or_else(|| "no formula entry in info JSON".to_string())?;

            let version = non_empty(info.versions.and_then(|v| v.stable))
                .or_else(|| non_empty(info.version))
                .unwrap_or_else(|| UNKNOWN_VERSION.to_string());

            Ok(PackageRecord {
                name: non_empty(info.name).unwrap_or_else(|| queried.to_string()),
                version,
                installed,
                dependencies: Some(info.dependencies.unwrap_or_default()),
                is_cask: false,
            })
        }
        PackageKind::Cask => {
            let info = doc
                .casks
                .into_iter()
                .next()
                .ok_or_else(|| "no cask entry in info JSON".to_string())?;

            Ok(PackageRecord {
                name: non_empty(info.token).unwrap_or_else(|| queried.to_string()),
                version: non_empty(info.version).unwrap_or_else(|| UNKNOWN_VERSION.to_string()),
                installed,
                dependencies: None,
                is_cask: true,
            })
        }
    }
}

/// Query brew for one package and normalize the answer
pub async fn lookup<B: Backend + ?Sized>(
    backend: &B,
    name: &str,
    kind: PackageKind,
    installed: bool,
) -> RecordLookup {
    let reason = match backend.capture(&info_args(name, kind)).await {
        Ok(output) if output.success => match normalize(name, kind, installed, &output.stdout) {
            Ok(record) => return RecordLookup::Resolved(record),
            Err(reason) => reason,
        },
        Ok(output) => {
            let stderr = output.stderr.trim();
            if stderr.is_empty() {
                "brew info exited with an error".to_string()
            } else {
                stderr.to_string()
            }
        }
        Err(e) => e.to_string(),
    };

    tracing::warn!("info lookup for {kind} {name} degraded: {reason}");
    RecordLookup::Degraded {
        record: PackageRecord::minimal(name, kind, installed),
        reason,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const JQ_INFO: &str = r#"{
        "formulae": [{
            "name": "jq",
            "full_name": "jq",
            "versions": {"stable": "1.7.1", "head": "HEAD", "bottle": true},
            "dependencies": ["oniguruma"],
            "build_dependencies": ["autoconf"]
        }],
        "casks": []
    }"#;

    #[test]
    fn test_normalize_formula() {
        let record = normalize("jq", PackageKind::Formula, true, JQ_INFO).unwrap();
        assert_eq!(record.name, "jq");
        assert_eq!(record.version, "1.7.1");
        assert!(record.installed);
        assert_eq!(record.dependencies, Some(vec!["oniguruma".to_string()]));
        assert!(!record.is_cask);
    }

    #[test]
    fn test_installed_comes_from_caller() {
        let record = normalize("jq", PackageKind::Formula, false, JQ_INFO).unwrap();
        assert!(!record.installed);
    }

    #[test]
    fn test_normalize_formula_missing_fields() {
        let json = r#"{"formulae": [{}]}"#;
        let record = normalize("wget", PackageKind::Formula, false, json).unwrap();
        assert_eq!(record.name, "wget");
        assert_eq!(record.version, UNKNOWN_VERSION);
        assert_eq!(record.dependencies, Some(vec![]));
    }

    #[test]
    fn test_normalize_formula_null_stable_falls_back_to_version() {
        let json = r#"{"formulae": [{"name": "x", "versions": {"stable": null}, "version": "2.0"}]}"#;
        let record = normalize("x", PackageKind::Formula, false, json).unwrap();
        assert_eq!(record.version, "2.0");
    }

    #[test]
    fn test_normalize_cask() {
        let json = r#"{
            "formulae": [],
            "casks": [{"token": "firefox", "name": ["Mozilla Firefox"], "version": "131.0"}]
        }"#;
        let record = normalize("firefox", PackageKind::Cask, true, json).unwrap();
        assert_eq!(record.name, "firefox");
        assert_eq!(record.version, "131.0");
        assert!(record.is_cask);
        assert!(record.dependencies.is_none());
    }

    #[test]
    fn test_normalize_rejects_bad_input() {
        assert!(normalize("jq", PackageKind::Formula, false, "").is_err());
        assert!(normalize("jq", PackageKind::Formula, false, "not json").is_err());
        assert!(normalize("jq", PackageKind::Formula, false, "{}").is_err());
        assert!(normalize("jq", PackageKind::Cask, false, JQ_INFO).is_err());
    }

    #[test]
    fn test_minimal_record() {
        let record = PackageRecord::minimal("wget", PackageKind::Formula, true);
        assert_eq!(record.version, "unknown");
        assert!(record.installed);
        assert!(record.dependencies.is_none());
    }

    #[test]
    fn test_record_serializes_camel_case() {
        let record = PackageRecord::minimal("iterm2", PackageKind::Cask, false);
        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(value["isCask"], true);
        assert!(value.get("dependencies").is_none());
    }

    #[test]
    fn test_info_args() {
        assert_eq!(
            info_args("jq", PackageKind::Formula),
            vec!["info", "--json=v2", "jq"]
        );
        assert_eq!(
            info_args("firefox", PackageKind::Cask),
            vec!["info", "--cask", "--json=v2", "firefox"]
        );
    }
}
