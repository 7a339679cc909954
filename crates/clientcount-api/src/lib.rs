// clientcount-api: Async client for the client-count telemetry HTTP API

pub mod client;
pub mod error;
pub mod models;
pub mod transport;

pub use client::ClientCountClient;
pub use error::Error;
pub use models::{ClientCountRecord, ClientCountResponse, ParseSessionError, Session};
pub use transport::{TlsMode, TransportConfig};
