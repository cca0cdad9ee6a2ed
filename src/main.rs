use std::io;
use std::path::PathBuf;
use std::process::ExitCode;

use openapi_resources::{build_command, load_dir, run, CliConfig, CliError, SpecMapper};
use tracing::error;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::EnvFilter;

fn init_tracing() {
    let filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::WARN.into())
        .from_env_lossy();

    // A subscriber may already be installed when embedded; keep the existing one.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .try_init();
}

fn main() -> ExitCode {
    init_tracing();

    let config = CliConfig::new(
        "openapi-resources",
        "Resolve API resource names to their OpenAPI specs and print example requests",
    );
    let matches = build_command(&config).get_matches();

    let Some(dir) = matches.get_one::<String>("specs-dir").map(PathBuf::from) else {
        eprintln!("error: --specs-dir (or SPEC_DIR) is required");
        return ExitCode::from(2);
    };

    let result = load_dir(&dir)
        .map_err(CliError::from)
        .and_then(|documents| run(&SpecMapper::new(documents), &matches));

    match result {
        Ok(output) => {
            if !output.is_empty() {
                println!("{output}");
            }
            ExitCode::SUCCESS
        }
        Err(err @ CliError::ResourceNotFound { .. }) => {
            eprintln!("{err}");
            ExitCode::from(3)
        }
        Err(err) => {
            error!(error = ?err, "command failed");
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}
