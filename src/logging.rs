use std::fs::OpenOptions;
use std::io::IsTerminal;
use std::path::Path;
use std::sync::Mutex;

use tracing_subscriber::EnvFilter;

/// Environment variable holding an EnvFilter directive
pub const LOG_ENV: &str = "TASKLIST_LOG";

/// Where log lines go
pub enum LogTarget<'a> {
    /// Command-line use
    Stderr,
    /// The TUI owns the terminal, so it logs to a file
    File(&'a Path),
}

/// Filter directive from `-v` count and the configured level.
/// `TASKLIST_LOG` wins over both when set.
pub fn default_directive(verbose: u8, configured: Option<&str>) -> String {
    match verbose {
        0 => configured.unwrap_or("warn").to_string(),
        1 => "info".to_string(),
        2 => "debug".to_string(),
        _ => "trace".to_string(),
    }
}

pub fn init_logging(verbose: u8, configured: Option<&str>, target: LogTarget<'_>) {
    let directive = default_directive(verbose, configured);
    let filter = EnvFilter::try_from_env(LOG_ENV)
        .or_else(|_| EnvFilter::try_new(&directive))
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    let result = match target {
        LogTarget::Stderr => tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .with_ansi(std::io::stderr().is_terminal())
            .with_writer(std::io::stderr)
            .try_init(),
        LogTarget::File(path) => {
            if let Some(parent) = path.parent()
                && !parent.as_os_str().is_empty()
            {
                let _ = std::fs::create_dir_all(parent);
            }
            let file = match OpenOptions::new().create(true).append(true).open(path) {
                Ok(f) => f,
                // No log file means no logging, not a failed launch
                Err(_) => return,
            };
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .try_init()
        }
    };

    if let Err(err) = result {
        tracing::debug!(error = %err, "tracing subscriber already set, continuing");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verbosity_overrides_configured_level() {
        assert_eq!(default_directive(0, None), "warn");
        assert_eq!(default_directive(0, Some("tasklist=debug")), "tasklist=debug");
        assert_eq!(default_directive(1, Some("error")), "info");
        assert_eq!(default_directive(2, None), "debug");
        assert_eq!(default_directive(5, None), "trace");
    }
}
