use anyhow::Result;
use colored::Colorize;
use kegbridge::{Backend, SystemBridge, should_awaken};

/// Dispatch one specifier and print its outcome; returns whether it succeeded
pub async fn awaken<B: Backend>(
    bridge: &mut SystemBridge<B>,
    package: &str,
    specifier: &str,
    json: bool,
) -> Result<bool> {
    if !should_awaken(specifier) {
        anyhow::bail!(
            "{} is not a system specifier (expected brew:, cask: or system:)",
            specifier
        );
    }

    if !json {
        println!("Awakening {} via {}...", package.cyan(), specifier.bold());
    }

    let outcome = bridge.awaken(package, specifier).await;

    if json {
        println!("{}", serde_json::to_string_pretty(&outcome)?);
    } else {
        super::render::outcome(&outcome);
    }

    Ok(outcome.succeeded())
}
