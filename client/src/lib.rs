//! # Confproto Client
//! A client that connects to a config protocol server, mirrors the server's
//! component tree locally and keeps the mirror in sync by applying the core
//! events the server relays.

#![deny(
    trivial_casts,
    trivial_numeric_casts,
    unstable_features,
    unused_import_braces
)]

pub mod mirror;
pub mod transport;

mod client;
mod connection;
mod error;
mod events;

pub use client::{ClientConfig, ConfigClient};
pub use connection::ConfigComm;
pub use error::ConfigClientError;
pub use events::{ClientEvent, ClientEvents};
pub use transport::{RequestTransport, TransportError};

pub mod shared {
    pub use confproto_shared::*;
}
