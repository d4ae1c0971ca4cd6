//! Locating the brew executable

use crate::config::BridgeConfig;
use crate::error::{BridgeError, Result};
use std::path::{Path, PathBuf};

/// Find the brew executable: explicit override, fixed probe list, then `PATH`.
///
/// An override that does not point at an executable file is an error; probing
/// is skipped entirely once an override is set.
pub fn locate_brew(config: &BridgeConfig) -> Result<PathBuf> {
    if let Some(path) = &config.brew_override {
        if is_executable(path) {
            return Ok(path.clone());
        }
        return Err(BridgeError::BackendNotFound {
            probed: vec![path.clone()],
        });
    }

    let probed = config.probe_paths();
    if let Some(found) = probed.iter().find(|p| is_executable(p)) {
        tracing::debug!("found brew at {}", found.display());
        return Ok(found.clone());
    }

    match which::which("brew") {
        Ok(path) => {
            tracing::debug!("found brew on PATH at {}", path.display());
            Ok(path)
        }
        Err(_) => Err(BridgeError::BackendNotFound { probed }),
    }
}

#[cfg(unix)]
fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;

    path.metadata()
        .map(|m| m.is_file() && m.permissions().mode() & 0o111 != 0)
        .unwrap_or(false)
}

#[cfg(not(unix))]
fn is_executable(path: &Path) -> bool {
    path.is_file()
}
