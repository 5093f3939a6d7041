pub mod types;
pub mod validation;

use clap::Parser;
use std::fs;

pub use types::{Args, CleanArgs};

/// Parse the CLI and preload any startup scripts into one combined batch.
///
/// # Panics
///
/// Will panic if a startup script passed validation but is unreadable by the
/// time we load it.
pub fn args_checks() -> CleanArgs {
    let args = Args::parse();

    let combined_sql_script = args.db_startup_script.as_ref().map_or_else(
        String::new,
        |scripts| {
            scripts
                .split(';')
                .map(|script| fs::read_to_string(script).unwrap())
                .collect::<Vec<_>>()
                .join("\n")
        },
    );

    CleanArgs {
        db_type: args.db_type,
        db_host: args.db_host,
        db_port: args.db_port,
        db_user: args.db_user,
        db_password: args.db_password,
        db_name: args.db_name,
        db_startup_script: args.db_startup_script,
        combined_sql_script,
    }
}
