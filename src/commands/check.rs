use colored::Colorize;
use kegbridge::{Operation, Specifier, should_awaken};

/// Report whether a specifier is claimed and what it would run.
///
/// Returns the claim decision so the caller can map it to an exit code.
pub fn check(specifier: &str, package: Option<&str>) -> bool {
    if !should_awaken(specifier) {
        println!(
            "{} {} is not a system specifier",
            "✗".dimmed(),
            specifier.bold()
        );
        return false;
    }

    let spec = Specifier::parse(specifier);
    println!("{} {} is claimed", "✓".green(), specifier.bold());
    println!("  {}: {}", "Protocol".dimmed(), spec.protocol.to_string().cyan());
    if !spec.command.is_empty() {
        println!("  {}: {}", "Command".dimmed(), spec.command.cyan());
    }
    if !spec.args.is_empty() {
        println!("  {}: {}", "Arguments".dimmed(), spec.args.join(" ").cyan());
    }

    let operation = Operation::resolve(&spec, package.unwrap_or_default());
    println!("  {}: {}", "Runs".dimmed(), super::render::operation(&operation));
    true
}
