use thiserror::Error;

use confproto_shared::{CodecError, ProtocolError, RemoteError};

use crate::{mirror::MirrorError, transport::TransportError};

#[derive(Debug, Error)]
pub enum ConfigClientError {
    /// Operation requires a completed connect
    #[error("Client is not connected. Call connect() first")]
    NotConnected,

    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),

    #[error("Protocol error: {0}")]
    Protocol(#[from] ProtocolError),

    #[error("Codec error: {0}")]
    Codec(#[from] CodecError),

    /// The server answered the call with an error
    #[error("Remote error: {0}")]
    Remote(#[from] RemoteError),

    #[error("Mirror error: {0}")]
    Mirror(#[from] MirrorError),

    /// Reply packet of the wrong kind
    #[error("Expected {expected} packet, received {received}")]
    UnexpectedPacket {
        expected: &'static str,
        received: &'static str,
    },

    /// Reply payload does not have the shape the call returns
    #[error("Invalid reply to {method}: {reason}")]
    InvalidReply {
        method: &'static str,
        reason: String,
    },
}
