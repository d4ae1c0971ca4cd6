//! Runtime configuration resolved from the environment and CLI flags.

use std::path::PathBuf;

/// Environment variable that pins the brew executable explicitly
pub const BREW_OVERRIDE_VAR: &str = "KEGBRIDGE_BREW";

/// Default manifest consumed by `harmonize`
pub const DEFAULT_MANIFEST: &str = "package.json";

/// Well-known install locations, probed in order
const WELL_KNOWN_BREW_PATHS: &[&str] = &[
    "/opt/homebrew/bin/brew",
    "/usr/local/bin/brew",
    "/home/linuxbrew/.linuxbrew/bin/brew",
];

#[derive(Debug, Clone, Default)]
pub struct BridgeConfig {
    /// Explicit brew binary; skips probing when set
    pub brew_override: Option<PathBuf>,
    /// `HOMEBREW_PREFIX`, probed before the fixed locations
    pub homebrew_prefix: Option<PathBuf>,
    pub manifest_path: PathBuf,
    /// Route brew's interactive stdout to stderr (set for `--json` output)
    pub brew_output_on_stderr: bool,
}

impl BridgeConfig {
    /// Read configuration from process environment
    pub fn from_env() -> Self {
        Self {
            brew_override: non_empty_var(BREW_OVERRIDE_VAR).map(PathBuf::from),
            homebrew_prefix: non_empty_var("HOMEBREW_PREFIX").map(PathBuf::from),
            manifest_path: PathBuf::from(DEFAULT_MANIFEST),
            brew_output_on_stderr: false,
        }
    }

    pub fn with_brew_output_on_stderr(mut self, enabled: bool) -> Self {
        self.brew_output_on_stderr = enabled;
        self
    }

    /// Apply CLI flags on top of the environment
    pub fn with_overrides(mut self, brew: Option<PathBuf>, manifest: Option<PathBuf>) -> Self {
        if let Some(brew) = brew {
            self.brew_override = Some(brew);
        }
        if let Some(manifest) = manifest {
            self.manifest_path = manifest;
        }
        self
    }

    /// Candidate brew executables in probe order
    pub fn probe_paths(&self) -> Vec<PathBuf> {
        let mut paths = Vec::with_capacity(WELL_KNOWN_BREW_PATHS.len() + 1);

        if let Some(prefix) = &self.homebrew_prefix {
            paths.push(prefix.join("bin").join("brew"));
        }

        for candidate in WELL_KNOWN_BREW_PATHS {
            let candidate = PathBuf::from(candidate);
            if !paths.contains(&candidate) {
                paths.push(candidate);
            }
        }

        paths
    }
}

fn non_empty_var(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}
