/// ANSI color helper utilities for terminal output.
pub const RESET: &str = "\x1b[0m";

pub const GREY: &str = "\x1b[90m";

pub const RED: &str = "\x1b[31m";
pub const GREEN: &str = "\x1b[32m";

pub const YELLOW: &str = "\x1b[33m";
pub const BLUE: &str = "\x1b[34m";
pub const CYAN: &str = "\x1b[36m";
pub const MAGENTA: &str = "\x1b[35m";

/// Color used when printing an inspection status.
pub fn color_for_status(status: &str) -> &'static str {
    match status {
        "New" => BLUE,
        "InProgress" => YELLOW,
        "Closed" => GREEN,
        _ => RESET,
    }
}

/// Color used when printing a checklist outcome.
pub fn color_for_outcome(outcome: &str) -> &'static str {
    match outcome {
        "OK" => GREEN,
        "NA" => GREY,
        "Def" => RED,
        _ => RESET,
    }
}

/// Grey out placeholder values ("" or "--").
pub fn colorize_optional(value: &str) -> String {
    if value.trim().is_empty() || value.trim() == "--" {
        format!("{GREY}{value}{RESET}")
    } else {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn placeholders_are_greyed() {
        assert_eq!(colorize_optional("--"), format!("{GREY}--{RESET}"));
        assert_eq!(colorize_optional("901"), "901");
    }
}
