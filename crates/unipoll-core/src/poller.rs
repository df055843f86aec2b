// ── Supervisor ──
//
// Startup ordering: flags → config → special commands → inputs (parallel
// init, fail-fast) → outputs (one task each). The first output to return
// an error terminates the process; if every output returns cleanly the
// supervisor reports AllStopped.

use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use tokio::task::JoinSet;
use tracing::{debug, error, info};

use crate::commands;
use crate::config::{default_config_paths, ConfigLoader, PollerSection};
use crate::error::PollerError;
use crate::metrics::{EventLog, Filter, Snapshot};
use crate::registry::Registry;

/// Parsed CLI flags, handed in by the binary.
#[derive(Debug, Clone, Default)]
pub struct Flags {
    /// Comma-separated config file candidates; first existing wins.
    pub config: Option<String>,
    /// `--dumpjson kind[:n]` payload selector.
    pub dumpjson: Option<String>,
    /// `--encrypt <pw|->` bcrypt hash helper.
    pub encrypt: Option<String>,
    /// `--debugio` checks every plugin and exits.
    pub debugio: bool,
}

/// The interface outputs consume. Implemented by [`Poller`]; outputs
/// never reach into the controller pool directly.
#[async_trait]
pub trait Collect: Send + Sync {
    /// Aggregate snapshots from every (filtered) input.
    async fn metrics(&self, filter: &Filter) -> Result<Snapshot, PollerError>;

    /// Aggregate event logs from every (filtered) input.
    async fn events(&self, filter: &Filter) -> Result<EventLog, PollerError>;

    /// The core poller config section.
    fn poller(&self) -> PollerSection;

    /// Names of registered input plugins, in registration order.
    fn inputs(&self) -> Vec<String>;

    /// Names of registered output plugins, in registration order.
    fn outputs(&self) -> Vec<String>;
}

/// The supervisor: owns the registry and drives the plugin lifecycle.
pub struct Poller {
    registry: Arc<Registry>,
    section: RwLock<PollerSection>,
}

impl Poller {
    pub fn new(registry: Arc<Registry>) -> Arc<Self> {
        Arc::new(Self {
            registry,
            section: RwLock::new(PollerSection::default()),
        })
    }

    pub fn registry(&self) -> &Arc<Registry> {
        &self.registry
    }

    /// Run the application. Returns when a special command completes,
    /// when startup fails, or when the first output dies.
    pub async fn start(self: &Arc<Self>, flags: Flags) -> Result<(), PollerError> {
        if let Some(ref pw) = flags.encrypt {
            return commands::print_password_hash(pw);
        }

        let paths = flags
            .config
            .clone()
            .unwrap_or_else(default_config_paths);
        let loader = ConfigLoader::from_paths(&paths)?;

        if flags.dumpjson.is_none() {
            info!("loading configuration file: {}", loader.path().display());
        }

        let section = loader.bind_plugins(&self.registry)?;
        {
            *self.section.write().expect("lock poisoned") = section;
        }

        if let Some(ref dump) = flags.dumpjson {
            return commands::print_raw_metrics(&self.registry, dump).await;
        }

        if flags.debugio {
            return commands::debug_io(&self.registry).await;
        }

        info!(pid = std::process::id(), "unipoll v{} starting up", env!("CARGO_PKG_VERSION"));

        self.initialize_inputs().await?;
        debug!("starting outputs");
        self.run_outputs().await
    }

    /// Initialize every input in parallel; aggregate errors; fail fast.
    async fn initialize_inputs(&self) -> Result<(), PollerError> {
        let inputs = self.registry.inputs();
        debug!(count = inputs.len(), "initializing inputs");

        if inputs.is_empty() {
            return Err(PollerError::NoInputPlugins);
        }

        let mut set = JoinSet::new();

        for entry in inputs {
            set.spawn(async move {
                debug!(input = entry.name, "initializing input");
                entry
                    .input
                    .initialize()
                    .await
                    .map_err(|e| format!("{}: {e}", entry.name))
            });
        }

        let mut errs = Vec::new();
        while let Some(joined) = set.join_next().await {
            match joined {
                Ok(Ok(())) => {}
                Ok(Err(msg)) => errs.push(msg),
                Err(e) => errs.push(format!("input init task panicked: {e}")),
            }
        }

        match PollerError::join(errs) {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    /// Start each enabled output in its own task. The first non-Ok exit
    /// value terminates the supervisor; all-Ok yields AllStopped.
    async fn run_outputs(self: &Arc<Self>) -> Result<(), PollerError> {
        let outputs = self.registry.outputs();

        if outputs.is_empty() {
            return Err(PollerError::NoOutputPlugins);
        }

        let collect: Arc<dyn Collect> = self.clone();
        let mut set = JoinSet::new();

        for entry in outputs {
            let collect = Arc::clone(&collect);
            set.spawn(async move {
                let result = entry.output.run(collect).await;
                (entry.name, result)
            });
        }

        while let Some(joined) = set.join_next().await {
            match joined {
                Ok((name, Ok(()))) => debug!(output = name, "output stopped cleanly"),
                Ok((name, Err(e))) => {
                    error!(output = name, error = %e, "output plugin failed");
                    return Err(e);
                }
                Err(e) => {
                    return Err(PollerError::Internal(format!("output task panicked: {e}")));
                }
            }
        }

        Err(PollerError::AllStopped)
    }
}

#[async_trait]
impl Collect for Poller {
    async fn metrics(&self, filter: &Filter) -> Result<Snapshot, PollerError> {
        let mut set = JoinSet::new();

        for entry in self.registry.inputs() {
            if !filter.name.is_empty() && !entry.name.eq_ignore_ascii_case(&filter.name) {
                continue;
            }

            let filter = filter.clone();
            set.spawn(async move {
                (entry.name, entry.input.metrics(&filter).await)
            });
        }

        let mut composite = Snapshot::default();
        let mut collected = false;
        let mut errs = Vec::new();

        while let Some(joined) = set.join_next().await {
            match joined {
                Ok((_, Ok(snapshot))) => {
                    collected = true;
                    composite.append(snapshot);
                }
                Ok((name, Err(e))) => errs.push(format!("{name}: {e}")),
                Err(e) => errs.push(format!("metrics task panicked: {e}")),
            }
        }

        // Partial results still flow downstream; a joined error surfaces
        // only when every input came back empty-handed.
        match PollerError::join(errs) {
            Some(err) if !collected => Err(err),
            Some(err) => {
                error!(error = %err, "some inputs failed; continuing with partial metrics");
                Ok(composite)
            }
            None => Ok(composite),
        }
    }

    async fn events(&self, filter: &Filter) -> Result<EventLog, PollerError> {
        let mut set = JoinSet::new();

        for entry in self.registry.inputs() {
            if !filter.name.is_empty() && !entry.name.eq_ignore_ascii_case(&filter.name) {
                continue;
            }

            let filter = filter.clone();
            set.spawn(async move {
                (entry.name, entry.input.events(&filter).await)
            });
        }

        let mut composite = EventLog::default();
        let mut collected = false;
        let mut errs = Vec::new();

        while let Some(joined) = set.join_next().await {
            match joined {
                Ok((_, Ok(events))) => {
                    collected = true;
                    composite.append(events);
                }
                Ok((name, Err(e))) => errs.push(format!("{name}: {e}")),
                Err(e) => errs.push(format!("events task panicked: {e}")),
            }
        }

        match PollerError::join(errs) {
            Some(err) if !collected => Err(err),
            Some(err) => {
                error!(error = %err, "some inputs failed; continuing with partial events");
                Ok(composite)
            }
            None => Ok(composite),
        }
    }

    fn poller(&self) -> PollerSection {
        self.section.read().expect("lock poisoned").clone()
    }

    fn inputs(&self) -> Vec<String> {
        self.registry.input_names()
    }

    fn outputs(&self) -> Vec<String> {
        self.registry.output_names()
    }
}
