use std::default::Default;

use confproto_shared::ProtocolConfig;

/// Contains Config properties which will be used by the Server
#[derive(Clone)]
pub struct ServerConfig {
    /// Protocol versions the server advertises and accepts upgrades to
    pub protocol: ProtocolConfig,
    /// Maximum number of simultaneously connected Control clients. Further
    /// Control clients are rejected; ViewOnly clients are never limited.
    pub max_control_connections: Option<usize>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            protocol: ProtocolConfig::default(),
            max_control_connections: None,
        }
    }
}
