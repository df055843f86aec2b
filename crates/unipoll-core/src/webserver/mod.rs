// ── Status web surface ──
//
// A read-only JSON view over the live plugin registry plus a rolling
// event log per plugin. Plugins push updates through the free functions
// here (update_input, new_input_event, ...); the handlers only read.
// Every hook is a no-op until the webserver output enables the shared
// state during config binding, mirroring the enable gate the plugins
// check before paying the formatting cost.

mod auth;
mod handlers;
mod server;
mod state;

pub use server::{WebConfig, WebServer};
pub use state::{
    new_input_event, new_output_event, update_input, update_input_counter, update_output,
    update_output_counter, Event, EventGroup, InputUpdate, OutputUpdate, WebClient, WebDevice,
    WebSite,
};

/// Default status UI port.
pub const DEFAULT_PORT: u16 = 37288;

/// Default number of events retained per (plugin, group) ring.
pub const DEFAULT_MAX_EVENTS: usize = 200;

/// The plugin name the webserver registers under.
pub const PLUGIN_NAME: &str = "webserver";
