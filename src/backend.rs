//! The seam between the bridge and the brew executable.
//!
//! Every brew invocation goes through [`Backend`], so tests can swap the real
//! [`BrewCli`] for a stub that records calls. Arguments are passed as owned
//! tokens exactly as they will appear on the command line after `brew`.

use crate::config::BridgeConfig;
use crate::error::{BridgeError, Result};
use crate::locate;
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::sync::Arc;
use tokio::process::Command;

/// Captured result of a non-interactive brew run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    pub success: bool,
    pub stdout: String,
    pub stderr: String,
}

#[async_trait]
pub trait Backend: Send + Sync {
    /// Run a brew subcommand and capture its output (list, info, tap listing)
    async fn capture(&self, args: &[String]) -> Result<CommandOutput>;

    /// Run a brew subcommand with the terminal attached.
    ///
    /// Returns whether the process exited with status zero; `Err` only when
    /// the process could not be started at all.
    async fn run(&self, args: &[String]) -> Result<bool>;
}

#[async_trait]
impl<B: Backend + ?Sized> Backend for Arc<B> {
    async fn capture(&self, args: &[String]) -> Result<CommandOutput> {
        (**self).capture(args).await
    }

    async fn run(&self, args: &[String]) -> Result<bool> {
        (**self).run(args).await
    }
}

/// Build an argument vector from string literals and names
pub fn brew_args<I, S>(parts: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    parts.into_iter().map(Into::into).collect()
}

/// The real backend: spawns the located brew binary
#[derive(Debug, Clone)]
pub struct BrewCli {
    binary: PathBuf,
    stdout_to_stderr: bool,
}

impl BrewCli {
    pub fn new(binary: impl Into<PathBuf>) -> Self {
        Self {
            binary: binary.into(),
            stdout_to_stderr: false,
        }
    }

    /// Send interactive runs' stdout to our stderr, keeping stdout for
    /// machine-readable output
    pub fn stdout_to_stderr(mut self, enabled: bool) -> Self {
        self.stdout_to_stderr = enabled;
        self
    }

    /// Resolve the brew binary from configuration; fatal if none is found
    pub fn locate(config: &BridgeConfig) -> Result<Self> {
        let binary = locate::locate_brew(config)?;
        Ok(Self::new(binary).stdout_to_stderr(config.brew_output_on_stderr))
    }

    pub fn binary(&self) -> &Path {
        &self.binary
    }

    fn command(&self, args: &[String]) -> Command {
        tracing::debug!("brew {}", args.join(" "));
        let mut cmd = Command::new(&self.binary);
        cmd.args(args);
        cmd
    }
}

#[async_trait]
impl Backend for BrewCli {
    async fn capture(&self, args: &[String]) -> Result<CommandOutput> {
        let output = self
            .command(args)
            .stdin(Stdio::null())
            .output()
            .await
            .map_err(|source| BridgeError::Spawn {
                command: args.join(" "),
                source,
            })?;

        Ok(CommandOutput {
            success: output.status.success(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }

    async fn run(&self, args: &[String]) -> Result<bool> {
        let stdout = if self.stdout_to_stderr {
            Stdio::from(std::io::stderr())
        } else {
            Stdio::inherit()
        };

        let status = self
            .command(args)
            .stdin(Stdio::inherit())
            .stdout(stdout)
            .stderr(Stdio::inherit())
            .status()
            .await
            .map_err(|source| BridgeError::Spawn {
                command: args.join(" "),
                source,
            })?;

        Ok(status.success())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_brew_args() {
        let name = String::from("wget");
        assert_eq!(brew_args(["install", "--cask"]), vec!["install", "--cask"]);
        assert_eq!(
            brew_args(vec!["info".to_string(), "--json=v2".to_string(), name]),
            vec!["info", "--json=v2", "wget"]
        );
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_capture_and_run_with_shell_stub() {
        use std::os::unix::fs::PermissionsExt;

        let temp = tempfile::TempDir::new().unwrap();
        let script = temp.path().join("brew");
        std::fs::write(
            &script,
            "#!/bin/sh\nif [ \"$1\" = \"fail\" ]; then exit 3; fi\necho \"$@\"\n",
        )
        .unwrap();
        std::fs::set_permissions(&script, std::fs::Permissions::from_mode(0o755)).unwrap();

        let cli = BrewCli::new(&script);
        let out = cli.capture(&brew_args(["list", "--formula"])).await.unwrap();
        assert!(out.success);
        assert_eq!(out.stdout.trim(), "list --formula");

        let failed = cli.capture(&brew_args(["fail"])).await.unwrap();
        assert!(!failed.success);

        assert!(!cli.run(&brew_args(["fail"])).await.unwrap());
    }

    #[test]
    fn test_locate_carries_output_redirect() {
        let temp = tempfile::TempDir::new().unwrap();
        let config = BridgeConfig::default()
            .with_overrides(Some(temp.path().join("missing")), None)
            .with_brew_output_on_stderr(true);
        assert!(BrewCli::locate(&config).is_err());

        let cli = BrewCli::new("/usr/bin/true").stdout_to_stderr(true);
        assert!(cli.stdout_to_stderr);
        assert!(!BrewCli::new("/usr/bin/true").stdout_to_stderr);
    }

    #[tokio::test]
    async fn test_missing_binary_is_spawn_error() {
        let cli = BrewCli::new("/nonexistent/kegbridge/brew");
        match cli.capture(&brew_args(["update"])).await {
            Err(BridgeError::Spawn { command, .. }) => assert_eq!(command, "update"),
            other => panic!("expected spawn error, got {:?}", other),
        }
    }
}
