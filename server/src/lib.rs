//! # Confproto Server
//! Serves a component tree to remote clients over the config protocol:
//! negotiates the protocol version, dispatches RPCs against the tree under
//! access and lock checks, relays every change of the tree to connected
//! clients and tracks streaming subscriptions.

#![deny(
    trivial_casts,
    trivial_numeric_casts,
    unstable_features,
    unused_import_braces
)]

pub mod transport;
pub mod tree;

mod connection;
mod dispatch;
mod error;
mod lock;
mod relay;
mod server;
mod streaming;

pub use connection::ConnectionKey;
pub use dispatch::{Dispatcher, RpcContext};
pub use error::ConfigServerError;
pub use lock::{DeviceLockManager, LockError};
pub use relay::CoreEventRelay;
pub use server::{ConfigServer, ServerConfig};
pub use streaming::{StreamingError, StreamingEvent, StreamingRegistration, StreamingSignal};
pub use tree::{ComponentTree, EventSink, EventSource, RaisedEvent, TreeError};

pub mod shared {
    pub use confproto_shared::*;
}
