// unipoll-api: Async Rust client for the UniFi controller legacy API

pub mod client;
pub mod error;
pub mod models;
pub mod transport;

mod clients;
mod devices;
mod events;
mod sites;

pub use client::{Auth, UnifiClient};
pub use error::Error;
pub use transport::{TlsMode, TransportConfig};
