use anyhow::{Context, Result};
use colored::Colorize;
use kegbridge::{Backend, ManifestDocument, SystemBridge};
use std::path::Path;

/// Apply `system.brew` from a manifest file; returns whether every item succeeded
pub async fn harmonize<B: Backend>(
    bridge: &mut SystemBridge<B>,
    manifest_path: &Path,
    json: bool,
) -> Result<bool> {
    let document = ManifestDocument::from_path(manifest_path)
        .with_context(|| format!("Failed to load {}", manifest_path.display()))?;

    let Some(manifest) = document.brew() else {
        if !json {
            println!(
                "{} {} has no {} section, nothing to do",
                "ℹ".bold(),
                manifest_path.display().to_string().cyan(),
                "system.brew".bold()
            );
        }
        return Ok(true);
    };

    if !json {
        println!(
            "Harmonizing {} formulas, {} casks, {} taps from {}...",
            manifest.formulas.len().to_string().bold(),
            manifest.casks.len().to_string().bold(),
            manifest.taps.len().to_string().bold(),
            manifest_path.display().to_string().cyan()
        );
    }

    let report = bridge.harmonize(&document).await;

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(report.is_clean());
    }

    for step in &report.steps {
        super::render::outcome(&step.outcome);
    }

    let failed: Vec<_> = report.failures().map(|s| s.operation.as_str()).collect();
    if failed.is_empty() {
        println!(
            "{} {} items in harmony",
            "✓".green().bold(),
            report.steps.len().to_string().bold()
        );
    } else {
        println!(
            "{} {} of {} items failed: {}",
            "⚠".yellow(),
            failed.len().to_string().bold(),
            report.steps.len(),
            failed.join(", ")
        );
    }

    Ok(failed.is_empty())
}
