use log::warn;

use confproto_shared::{ClientType, ProtocolVersion, RejectReason};

use crate::transport::PacketSender;

use super::ConnectionKey;

pub struct ServerConnection {
    pub key: ConnectionKey,
    pub user: String,
    pub client_type: ClientType,
    /// Set once the client has upgraded to a version both sides support.
    pub protocol_version: Option<ProtocolVersion>,
    /// Set if the server refused this connection when it was added.
    pub rejected: Option<RejectReason>,
    sender: Box<dyn PacketSender>,
}

impl ServerConnection {
    pub fn new(
        key: ConnectionKey,
        user: &str,
        client_type: ClientType,
        sender: Box<dyn PacketSender>,
    ) -> Self {
        Self {
            key,
            user: user.to_string(),
            client_type,
            protocol_version: None,
            rejected: None,
            sender,
        }
    }

    /// Handshaken and not rejected: eligible for notifications.
    pub fn is_established(&self) -> bool {
        self.rejected.is_none() && self.protocol_version.is_some()
    }

    pub fn send(&self, payload: &[u8]) {
        if self.sender.send(payload).is_err() {
            warn!("failed to send {} bytes to connection {}", payload.len(), self.key);
        }
    }
}
