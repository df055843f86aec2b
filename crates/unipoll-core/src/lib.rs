//! Plugin runtime and metric pipeline for unipoll.
//!
//! The supervisor ([`Poller`]) binds input collectors to output emitters
//! through an injected [`Registry`]. Outputs consume snapshots through
//! the [`Collect`] trait and never reach the controller pool directly.

pub mod commands;
pub mod config;
pub mod counts;
pub mod error;
pub mod metrics;
pub mod point;
pub mod poller;
pub mod registry;
pub mod webserver;

pub use config::{ConfigLoader, PollerSection};
pub use counts::{Counts, ItemKind};
pub use error::PollerError;
pub use metrics::{EventLog, Filter, LogRecord, Snapshot};
pub use point::{FieldValue, Point};
pub use poller::{Collect, Flags, Poller};
pub use registry::{Input, InputEntry, Output, OutputEntry, Registry};

/// Application name, used for logging, env prefixes, and HTTP banners.
pub const APP_NAME: &str = "unipoll";
