use thiserror::Error;

use crate::{ProtocolVersion, RejectReason, RequestId};

/// Failures that abort a connection attempt.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProtocolError {
    #[error("No common protocol version. Client supports {client:?}, server supports {server:?}")]
    NoCommonVersion {
        client: Vec<ProtocolVersion>,
        server: Vec<ProtocolVersion>,
    },

    #[error("Requested protocol version {requested} is not supported by both peers")]
    UnsupportedVersion { requested: ProtocolVersion },

    #[error("Server rejected upgrade to protocol version {version}")]
    UpgradeRejected { version: ProtocolVersion },

    #[error("Server rejected the connection: {reason}")]
    ConnectionRejected { reason: RejectReason },

    #[error("Malformed handshake: expected {expected}, received {received}")]
    MalformedHandshake {
        expected: &'static str,
        received: &'static str,
    },

    #[error("Reply id {received} does not match request id {expected}")]
    ReplyIdMismatch {
        expected: RequestId,
        received: RequestId,
    },

    #[error("{method} requires protocol version {required}, connection negotiated {negotiated}")]
    MethodNotSupported {
        method: &'static str,
        required: ProtocolVersion,
        negotiated: ProtocolVersion,
    },

    #[error("Handshake has not been completed on this connection")]
    HandshakeIncomplete,
}
