use chrono::{DateTime, Utc};

use crate::cli::commands::{RecoveryAction, RecoveryCmd};
use crate::io::recovery;

use super::Context;

const DEFAULT_LIMIT: usize = 10;

pub fn cmd_recovery(args: RecoveryCmd, ctx: &Context) -> Result<(), Box<dyn std::error::Error>> {
    let dir = ctx.data_dir();

    match args.action {
        Some(RecoveryAction::Path) => {
            let path = recovery::recovery_log_path(&dir);
            let path = std::fs::canonicalize(&path).unwrap_or(path);
            println!("{}", path.display());
            Ok(())
        }
        Some(RecoveryAction::Prune(prune)) => {
            let before = prune.before.as_deref().map(parse_timestamp).transpose()?;
            let removed = recovery::prune_recovery(&dir, before, prune.all)?;
            if ctx.json {
                println!("{}", serde_json::json!({ "removed": removed }));
            } else {
                println!("removed {} entries", removed);
            }
            Ok(())
        }
        None => {
            let since = args.since.as_deref().map(parse_timestamp).transpose()?;
            let limit = args.limit.unwrap_or(DEFAULT_LIMIT);
            let entries = recovery::read_recovery_entries(&dir, Some(limit), since);

            if ctx.json {
                let json: Vec<_> = entries.iter().map(|e| e.to_json()).collect();
                println!("{}", serde_json::to_string_pretty(&json)?);
            } else if entries.is_empty() {
                println!("No recovery entries");
            } else {
                for entry in &entries {
                    print!("{}", entry.to_display_markdown());
                }
            }
            Ok(())
        }
    }
}

fn parse_timestamp(s: &str) -> Result<DateTime<Utc>, String> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| format!("invalid timestamp '{}': {}", s, e))
}
