//! The unipoll binary: registers the compiled-in plugins, hands the
//! registry to the supervisor, and runs until the first output fails.

mod cli;

use clap::Parser;
use tracing::error;
use tracing_subscriber::EnvFilter;

use unipoll_core::config::{default_config_paths, ConfigLoader};
use unipoll_core::webserver::WebServer;
use unipoll_core::{Flags, InputEntry, OutputEntry, Poller, Registry};

/// The config file's debug/quiet switches pick the default log level;
/// RUST_LOG still wins when set. Logs go to stderr so `--dumpjson`
/// output stays clean on stdout.
fn init_tracing(flags: &Flags) {
    let paths = flags.config.clone().unwrap_or_else(default_config_paths);
    let level = match ConfigLoader::from_paths(&paths).and_then(|l| l.poller_section()) {
        Ok(section) if section.debug => "debug",
        Ok(section) if section.quiet => "warn",
        _ => "info",
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

/// Build the registry with every compiled-in plugin, inputs first.
fn register_plugins(registry: &Registry) {
    registry.register_input(InputEntry {
        name: unipoll_unifi::PLUGIN_NAME,
        input: unipoll_unifi::InputUnifi::new(),
    });

    registry.register_output(OutputEntry {
        name: unipoll_influx::PLUGIN_NAME,
        output: unipoll_influx::InfluxDb::new(),
    });
    registry.register_output(OutputEntry {
        name: unipoll_loki::PLUGIN_NAME,
        output: unipoll_loki::Loki::new(),
    });
    registry.register_output(OutputEntry {
        name: unipoll_prom::PLUGIN_NAME,
        output: unipoll_prom::Prometheus::new(),
    });
    registry.register_output(OutputEntry {
        name: unipoll_core::webserver::PLUGIN_NAME,
        output: WebServer::new(),
    });
}

#[tokio::main]
async fn main() -> std::process::ExitCode {
    let cli = cli::Cli::parse();
    let flags = Flags {
        config: cli.config,
        dumpjson: cli.dumpjson,
        encrypt: cli.encrypt,
        debugio: cli.debugio,
    };

    init_tracing(&flags);

    let registry = Registry::new();
    register_plugins(&registry);

    let poller = Poller::new(registry);

    match poller.start(flags).await {
        Ok(()) => std::process::ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            std::process::ExitCode::FAILURE
        }
    }
}
