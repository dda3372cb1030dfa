//! `resort` - find attachments that drifted away from their notes and move
//! them back.

/// CLI module - command-line interface for resort
mod cli;

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    cli::run_cli();
}
