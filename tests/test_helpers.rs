// Test helpers for driving the bridge without Homebrew
// Provides a scripted backend that records every brew invocation

#![allow(dead_code)]

use async_trait::async_trait;
use kegbridge::{Backend, BridgeError, CommandOutput, Result};
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};

/// Scripted brew stand-in
///
/// Captured commands answer from a table keyed by the joined argument list;
/// anything unscripted fails like an unknown brew subcommand. Interactive
/// runs succeed unless marked failing.
///
/// # Example
/// ```ignore
/// let stub = StubBackend::with_listing(&["git"], &[]);
/// let bridge = SystemBridge::with_backend(stub.clone()).await;
/// assert_eq!(stub.count("install"), 0);
/// ```
#[derive(Default)]
pub struct StubBackend {
    calls: Mutex<Vec<String>>,
    responses: Mutex<HashMap<String, CommandOutput>>,
    failing_runs: Mutex<HashSet<String>>,
    unspawnable: Mutex<HashSet<String>>,
}

impl StubBackend {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Stub whose `brew list` reports the given names
    pub fn with_listing(formulas: &[&str], casks: &[&str]) -> Arc<Self> {
        let stub = Self::new();
        stub.respond_ok("list --formula", &lines(formulas));
        stub.respond_ok("list --cask", &lines(casks));
        stub
    }

    pub fn respond_ok(&self, args: &str, stdout: &str) {
        self.responses.lock().unwrap().insert(
            args.to_string(),
            CommandOutput {
                success: true,
                stdout: stdout.to_string(),
                stderr: String::new(),
            },
        );
    }

    pub fn respond_err(&self, args: &str, stderr: &str) {
        self.responses.lock().unwrap().insert(
            args.to_string(),
            CommandOutput {
                success: false,
                stdout: String::new(),
                stderr: stderr.to_string(),
            },
        );
    }

    /// Stub `info --json=v2 <name>` with a formula entry
    pub fn formula_info(&self, name: &str, version: &str, deps: &[&str]) {
        let json = serde_json::json!({
            "formulae": [{
                "name": name,
                "versions": {"stable": version},
                "dependencies": deps,
            }],
            "casks": [],
        });
        self.respond_ok(&format!("info --json=v2 {}", name), &json.to_string());
    }

    /// Stub `info --cask --json=v2 <token>` with a cask entry
    pub fn cask_info(&self, token: &str, version: &str) {
        let json = serde_json::json!({
            "formulae": [],
            "casks": [{"token": token, "name": [token], "version": version}],
        });
        self.respond_ok(&format!("info --cask --json=v2 {}", token), &json.to_string());
    }

    /// Make an interactive run exit non-zero
    pub fn fail_run(&self, args: &str) {
        self.failing_runs.lock().unwrap().insert(args.to_string());
    }

    /// Make a command fail to spawn at all
    pub fn unspawnable(&self, args: &str) {
        self.unspawnable.lock().unwrap().insert(args.to_string());
    }

    /// Every invocation so far, arguments joined by spaces
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    /// Invocations whose first argument is `subcommand`
    pub fn count(&self, subcommand: &str) -> usize {
        self.calls()
            .iter()
            .filter(|c| c.split(' ').next() == Some(subcommand))
            .count()
    }

    /// Invocations other than the installed scan and info lookups
    pub fn mutating_calls(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter(|c| !c.starts_with("list ") && !c.starts_with("info "))
            .collect()
    }

    pub fn clear_calls(&self) {
        self.calls.lock().unwrap().clear();
    }

    fn record(&self, args: &[String]) -> Result<String> {
        let joined = args.join(" ");
        self.calls.lock().unwrap().push(joined.clone());
        if self.unspawnable.lock().unwrap().contains(&joined) {
            return Err(BridgeError::Spawn {
                command: joined,
                source: std::io::Error::new(std::io::ErrorKind::NotFound, "no such file"),
            });
        }
        Ok(joined)
    }
}

#[async_trait]
impl Backend for StubBackend {
    async fn capture(&self, args: &[String]) -> Result<CommandOutput> {
        let joined = self.record(args)?;
        let scripted = self.responses.lock().unwrap().get(&joined).cloned();
        Ok(scripted.unwrap_or_else(|| CommandOutput {
            success: false,
            stdout: String::new(),
            stderr: format!("Error: Unknown command: {}", joined),
        }))
    }

    async fn run(&self, args: &[String]) -> Result<bool> {
        let joined = self.record(args)?;
        Ok(!self.failing_runs.lock().unwrap().contains(&joined))
    }
}

fn lines(names: &[&str]) -> String {
    names.iter().map(|n| format!("{}\n", n)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use kegbridge::backend::brew_args;

    #[tokio::test]
    async fn test_stub_records_and_answers() {
        let stub = StubBackend::with_listing(&["git"], &[]);
        let out = stub.capture(&brew_args(["list", "--formula"])).await.unwrap();
        assert!(out.success);
        assert_eq!(out.stdout, "git\n");

        let unknown = stub.capture(&brew_args(["doctor"])).await.unwrap();
        assert!(!unknown.success);

        assert_eq!(stub.calls(), vec!["list --formula", "doctor"]);
    }

    #[tokio::test]
    async fn test_stub_failing_runs() {
        let stub = StubBackend::new();
        stub.fail_run("install broken");
        assert!(!stub.run(&brew_args(["install", "broken"])).await.unwrap());
        assert!(stub.run(&brew_args(["install", "fine"])).await.unwrap());
        assert_eq!(stub.count("install"), 2);
    }
}
