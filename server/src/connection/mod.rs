mod connection;
mod connection_key;

pub use connection::ServerConnection;
pub use connection_key::ConnectionKey;
