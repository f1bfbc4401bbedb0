use std::default::Default;

use confproto_shared::{ClientType, ProtocolConfig, ProtocolVersion};

/// Contains Config properties which will be used by a Client
#[derive(Clone)]
pub struct ClientConfig {
    /// Identity the server attributes locks and writes to
    pub user: String,
    /// Access tier requested from the server
    pub client_type: ClientType,
    /// Protocol versions the client is able to speak
    pub protocol: ProtocolConfig,
    /// Speak exactly this version instead of the highest common one
    pub requested_protocol_version: Option<ProtocolVersion>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            user: "anonymous".to_string(),
            client_type: ClientType::Control,
            protocol: ProtocolConfig::default(),
            requested_protocol_version: None,
        }
    }
}
