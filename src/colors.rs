//! Terminal color policy.
//!
//! Honors `NO_COLOR` (https://no-color.org/), `CLICOLOR=0` and
//! `CLICOLOR_FORCE`; otherwise colors follow whether stdout is a TTY.
//! `--json` output disables colors regardless.

use colored::control;
use std::io::IsTerminal;

fn env_flag(key: &str) -> Option<bool> {
    std::env::var(key).ok().map(|v| v != "0")
}

/// Decide whether to colorize, from environment and TTY state
fn colors_enabled(json: bool, is_tty: bool, env: impl Fn(&str) -> Option<bool>) -> bool {
    if json || env("NO_COLOR").is_some() {
        return false;
    }
    if env("CLICOLOR_FORCE") == Some(true) {
        return true;
    }
    if env("CLICOLOR") == Some(false) {
        return false;
    }
    is_tty
}

/// Configure `colored` for the whole process; call early in main
pub fn init_colors(json: bool) {
    let is_tty = std::io::stdout().is_terminal();
    control::set_override(colors_enabled(json, is_tty, env_flag));
}

#[cfg(test)]
mod tests {
    use super::*;

    fn env_of<'a>(pairs: &'a [(&'a str, bool)]) -> impl Fn(&str) -> Option<bool> + 'a {
        move |key: &str| pairs.iter().find(|(k, _)| *k == key).map(|(_, v)| *v)
    }

    #[test]
    fn test_tty_default() {
        assert!(colors_enabled(false, true, env_of(&[])));
        assert!(!colors_enabled(false, false, env_of(&[])));
    }

    #[test]
    fn test_no_color_wins() {
        let env = [("NO_COLOR", true), ("CLICOLOR_FORCE", true)];
        assert!(!colors_enabled(false, true, env_of(&env)));
    }

    #[test]
    fn test_force_and_disable() {
        assert!(colors_enabled(false, false, env_of(&[("CLICOLOR_FORCE", true)])));
        assert!(!colors_enabled(false, true, env_of(&[("CLICOLOR", false)])));
    }

    #[test]
    fn test_json_disables() {
        assert!(!colors_enabled(true, true, env_of(&[("CLICOLOR_FORCE", true)])));
    }
}
