//! Console prefixes shared by the scan loop and the binary.

use owo_colors::OwoColorize;

/// True unless colors were disabled by config or `NO_COLOR`.
pub fn use_colors(config_color: bool) -> bool {
    config_color && std::env::var_os("NO_COLOR").is_none()
}

pub fn error_prefix(color: bool) -> String {
    if color {
        "error:".red().bold().to_string()
    } else {
        "error:".to_string()
    }
}

pub fn warn_prefix(color: bool) -> String {
    if color {
        "warn:".yellow().bold().to_string()
    } else {
        "warn:".to_string()
    }
}

pub fn note_prefix(color: bool) -> String {
    if color {
        "note:".blue().bold().to_string()
    } else {
        "note:".to_string()
    }
}
