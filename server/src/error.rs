use thiserror::Error;

use confproto_shared::{CodecError, PacketType};

use crate::{connection::ConnectionKey, streaming::StreamingError};

/// Errors that can occur while the server processes an incoming frame or a
/// streaming request
#[derive(Debug, Error)]
pub enum ConfigServerError {
    /// Frame arrived for a connection that was never added or was removed
    #[error("Connection {0} is not known to this server")]
    UnknownConnection(ConnectionKey),

    /// Incoming frame could not be decoded, or a reply could not be encoded
    #[error("Codec error: {0}")]
    Codec(#[from] CodecError),

    /// Client sent a packet kind only a server may send
    #[error("Unexpected {} packet from client", .0.name())]
    UnexpectedPacket(PacketType),

    #[error("Streaming error: {0}")]
    Streaming(#[from] StreamingError),
}
