//! `bayesnet` command-line entry point.

use std::io::Write;

use bn_config::{resolve_config, ConfigPaths, ConfigSource, EngineConfig};
use bn_core::cli::{self, Cli};
use bn_core::exit_codes::ExitCode;
use clap::Parser;
use tracing::debug;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

fn init_logging(config: &EngineConfig, json: bool) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level));
    let json_layer = json.then(|| fmt::layer().json().with_writer(std::io::stderr));
    let text_layer = (!json).then(|| {
        fmt::layer()
            .with_target(false)
            .with_writer(std::io::stderr)
    });
    tracing_subscriber::registry()
        .with(filter)
        .with(json_layer)
        .with(text_layer)
        .init();
}

fn main() {
    let cli = Cli::parse();

    let (config, source) = match resolve_config(&ConfigPaths::discover(cli.config.clone())) {
        Ok(resolved) => resolved,
        Err(err) => {
            eprintln!("bayesnet: {err}");
            std::process::exit(ExitCode::ConfigError.as_i32());
        }
    };
    init_logging(&config, cli.log_json);
    if source != ConfigSource::Defaults {
        debug!(?source, "loaded configuration");
    }

    match cli::run(&cli, &config) {
        Ok(output) => {
            let mut stdout = std::io::stdout().lock();
            if stdout.write_all(output.as_bytes()).is_err() {
                std::process::exit(ExitCode::IoError.as_i32());
            }
        }
        Err(err) => {
            eprintln!("bayesnet: {err}");
            std::process::exit(ExitCode::from(&err).as_i32());
        }
    }
}
