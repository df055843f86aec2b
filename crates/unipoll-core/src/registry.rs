// ── Plugin registry ──
//
// Two lock-protected lists of inputs and outputs. Registration happens
// only during the single initialization phase before the supervisor
// starts; lookups during collection take the lock shared. The registry
// is an injected handle, not a process-global.

use std::sync::{Arc, RwLock};

use async_trait::async_trait;

use crate::config::ConfigLoader;
use crate::error::PollerError;
use crate::metrics::{EventLog, Filter, Snapshot};
use crate::poller::Collect;

/// Behavior every input plugin implements.
///
/// `metrics`/`events` return whatever was collected; an input reports
/// `Err` only when nothing at all could be gathered, logging (and
/// joining) per-controller failures otherwise.
#[async_trait]
pub trait Input: Send + Sync {
    /// Bind this plugin's typed config section. Called by the binder
    /// before `initialize`, never after the supervisor starts.
    fn configure(&self, loader: &ConfigLoader) -> Result<(), PollerError>;

    /// Called once on startup.
    async fn initialize(&self) -> Result<(), PollerError>;

    /// Collect a fresh snapshot.
    async fn metrics(&self, filter: &Filter) -> Result<Snapshot, PollerError>;

    /// Collect the event log.
    async fn events(&self, filter: &Filter) -> Result<EventLog, PollerError>;

    /// Raw JSON passthrough for `--dumpjson`.
    async fn raw_metrics(&self, filter: &Filter) -> Result<Vec<u8>, PollerError>;

    /// Connectivity self-check for `--debugio`.
    async fn debug_input(&self) -> Result<(), PollerError>;
}

/// Behavior every output plugin implements.
#[async_trait]
pub trait Output: Send + Sync {
    /// Bind this plugin's typed config section.
    fn configure(&self, loader: &ConfigLoader) -> Result<(), PollerError>;

    /// Run until fatal error or process shutdown. A disabled output
    /// should return `Ok(())` immediately.
    async fn run(&self, collect: Arc<dyn Collect>) -> Result<(), PollerError>;

    /// Whether the bound config enables this output.
    fn enabled(&self) -> bool;

    /// Connectivity self-check for `--debugio`.
    async fn debug_output(&self) -> Result<(), PollerError>;
}

/// A registered input plugin.
#[derive(Clone)]
pub struct InputEntry {
    pub name: &'static str,
    pub input: Arc<dyn Input>,
}

/// A registered output plugin.
#[derive(Clone)]
pub struct OutputEntry {
    pub name: &'static str,
    pub output: Arc<dyn Output>,
}

/// Process-wide tables of inputs and outputs, handed to the supervisor.
#[derive(Default)]
pub struct Registry {
    inputs: RwLock<Vec<InputEntry>>,
    outputs: RwLock<Vec<OutputEntry>>,
}

impl Registry {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Register an input plugin. Panics on a nameless entry: this runs
    /// only at init time and a bad registration is a programming error.
    pub fn register_input(&self, entry: InputEntry) {
        assert!(!entry.name.is_empty(), "input plugin registered without a name");

        self.inputs.write().expect("lock poisoned").push(entry);
    }

    /// Register an output plugin. Panics on a nameless entry.
    pub fn register_output(&self, entry: OutputEntry) {
        assert!(!entry.name.is_empty(), "output plugin registered without a name");

        self.outputs.write().expect("lock poisoned").push(entry);
    }

    /// Case-insensitive lookup. N is small (1-6); a linear scan is fine.
    pub fn input_by_name(&self, name: &str) -> Option<InputEntry> {
        self.inputs
            .read()
            .expect("lock poisoned")
            .iter()
            .find(|e| e.name.eq_ignore_ascii_case(name))
            .cloned()
    }

    pub fn output_by_name(&self, name: &str) -> Option<OutputEntry> {
        self.outputs
            .read()
            .expect("lock poisoned")
            .iter()
            .find(|e| e.name.eq_ignore_ascii_case(name))
            .cloned()
    }

    /// All inputs, in registration order.
    pub fn inputs(&self) -> Vec<InputEntry> {
        self.inputs.read().expect("lock poisoned").clone()
    }

    /// All outputs, in registration order.
    pub fn outputs(&self) -> Vec<OutputEntry> {
        self.outputs.read().expect("lock poisoned").clone()
    }

    pub fn input_names(&self) -> Vec<String> {
        self.inputs().iter().map(|e| e.name.to_owned()).collect()
    }

    pub fn output_names(&self) -> Vec<String> {
        self.outputs().iter().map(|e| e.name.to_owned()).collect()
    }
}
