use clap::Parser;
use tasklist::cli::commands::Cli;
use tasklist::cli::handlers::{self, Context};
use tasklist::io::config_io;
use tasklist::logging::{self, LogTarget};

fn main() {
    let cli = Cli::parse();
    let ctx = match Context::new(&cli) {
        Ok(ctx) => ctx,
        Err(e) => {
            eprintln!("error: {}", e);
            std::process::exit(1);
        }
    };
    let log_level = ctx.config.log.level.clone();

    match cli.command {
        None => {
            // No subcommand → launch TUI
            let log_path = config_io::resolve_log_path(&ctx.config, &ctx.storage_path);
            logging::init_logging(cli.verbose, log_level.as_deref(), LogTarget::File(&log_path));
            if let Err(e) = tasklist::tui::run(ctx.config, &ctx.storage_path) {
                eprintln!("error: {}", e);
                std::process::exit(1);
            }
        }
        Some(command) => {
            logging::init_logging(cli.verbose, log_level.as_deref(), LogTarget::Stderr);
            if let Err(e) = handlers::dispatch(command, &ctx) {
                eprintln!("error: {}", e);
                std::process::exit(1);
            }
        }
    }
}
