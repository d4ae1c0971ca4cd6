use anyhow::Result;
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use kegbridge::{Backend, PackageKind, RecordLookup, SystemBridge};
use std::time::Duration;

fn spinner(message: String, enabled: bool) -> ProgressBar {
    let is_tty = std::io::IsTerminal::is_terminal(&std::io::stdout());
    if !enabled || !is_tty {
        return ProgressBar::hidden();
    }

    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.cyan} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    pb.set_message(message);
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}

/// Show the normalized record for one formula or cask
pub async fn info<B: Backend>(
    bridge: &SystemBridge<B>,
    name: &str,
    cask: bool,
    json: bool,
) -> Result<()> {
    let kind = if cask {
        PackageKind::Cask
    } else {
        PackageKind::Formula
    };

    let pb = spinner(format!("Fetching info for {}...", name), !json);
    let lookup = bridge.info(name, kind).await;
    pb.finish_and_clear();

    if json {
        println!("{}", serde_json::to_string_pretty(lookup.record())?);
        return Ok(());
    }

    super::render::record(lookup.record());
    if let RecordLookup::Degraded { reason, .. } = &lookup {
        println!(
            "  {} metadata unavailable: {}",
            "⚠".yellow(),
            reason.dimmed()
        );
    }

    Ok(())
}

/// Export every cached package plus live taps (`system:soul`)
pub async fn snapshot<B: Backend>(bridge: &SystemBridge<B>, json: bool) -> Result<()> {
    let installed = bridge.installed();
    let total = installed.len(PackageKind::Formula) + installed.len(PackageKind::Cask);

    let pb = spinner(format!("Collecting metadata for {} packages...", total), !json);
    let snapshot = bridge.export_snapshot().await;
    pb.finish_and_clear();

    if json {
        println!("{}", serde_json::to_string_pretty(&snapshot)?);
        return Ok(());
    }

    println!("{}", "==> Formulas".bold().green());
    for record in &snapshot.formulas {
        println!("  {} {}", record.name.bold(), record.version.dimmed());
    }
    println!("{}", "==> Casks".bold().green());
    for record in &snapshot.casks {
        println!("  {} {}", record.name.bold(), record.version.dimmed());
    }
    println!("{}", "==> Taps".bold().green());
    for tap in &snapshot.taps {
        println!("  {}", tap.cyan());
    }

    if !bridge.scan_status().is_complete() {
        println!(
            "{} installed scan was incomplete; some packages may be missing",
            "⚠".yellow()
        );
    }

    Ok(())
}
