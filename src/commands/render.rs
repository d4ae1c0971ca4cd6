//! Human-readable rendering shared by commands

use colored::Colorize;
use kegbridge::dispatch::InstallStatus;
use kegbridge::{Operation, Outcome, PackageRecord};

pub(super) fn operation(operation: &Operation) -> String {
    match operation {
        Operation::Install {
            kind,
            name,
            options,
        } => {
            let cask = if kind.is_cask() { " --cask" } else { "" };
            let mut line = format!("brew install{} {}", cask, name);
            for option in options {
                line.push(' ');
                line.push_str(option);
            }
            line
        }
        Operation::Tap { action, tap } => format!("brew {} {}", action.subcommand(), tap),
        Operation::Maintenance(task) => format!("brew {}", task),
        Operation::ExportSnapshot => "snapshot export".to_string(),
        Operation::Passthrough { command, args } => {
            format!("brew {} {}", command, args.join(" ")).trim_end().to_string()
        }
        Operation::Invalid { reason, .. } => format!("nothing ({})", reason),
    }
}

pub(super) fn record(record: &PackageRecord) {
    let kind = if record.is_cask { "cask" } else { "formula" };
    let state = if record.installed {
        "installed".green()
    } else {
        "not installed".dimmed()
    };
    println!(
        "{} {} {} ({})",
        "==>".bold().green(),
        record.name.bold(),
        record.version.cyan(),
        kind
    );
    println!("  {}: {}", "State".dimmed(), state);
    if let Some(deps) = &record.dependencies
        && !deps.is_empty()
    {
        println!("  {}: {}", "Dependencies".dimmed(), deps.join(", "));
    }
}

pub(super) fn outcome(outcome: &Outcome) {
    match outcome {
        Outcome::Install(report) => {
            let name = report.record.name.bold();
            match report.status {
                InstallStatus::AlreadyInstalled => {
                    println!("  {} {} already installed", "✓".green(), name)
                }
                InstallStatus::Installed => println!(
                    "  {} Installed {} {}",
                    "✓".green(),
                    name,
                    report.record.version.dimmed()
                ),
                InstallStatus::Failed => println!("  {} Failed to install {}", "✗".red(), name),
            }
        }
        Outcome::Tap {
            tap,
            action,
            success,
        } => status_line(*success, &format!("{} {}", action.subcommand(), tap.bold())),
        Outcome::Maintenance { task, success } => status_line(*success, &format!("brew {}", task)),
        Outcome::Snapshot(snapshot) => println!(
            "  {} {} formulas, {} casks, {} taps",
            "✓".green(),
            snapshot.formulas.len().to_string().bold(),
            snapshot.casks.len().to_string().bold(),
            snapshot.taps.len().to_string().bold()
        ),
        Outcome::Passthrough {
            command,
            args,
            success,
        } => status_line(
            *success,
            format!("brew {} {}", command, args.join(" ")).trim_end(),
        ),
        Outcome::Rejected { specifier, reason } => {
            println!("  {} {}: {}", "✗".red(), specifier.bold(), reason)
        }
    }
}

fn status_line(success: bool, label: &str) {
    if success {
        println!("  {} {}", "✓".green(), label);
    } else {
        println!("  {} {} {}", "✗".red(), label, "failed".red());
    }
}
