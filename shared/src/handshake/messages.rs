use std::fmt;

use serde::{Deserialize, Serialize};

use crate::ProtocolVersion;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProtocolInfo {
    pub current: ProtocolVersion,
    pub supported: Vec<ProtocolVersion>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpgradeRequest {
    pub version: ProtocolVersion,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpgradeReply {
    pub accepted: bool,
    pub version: ProtocolVersion,
}

/// Why a server refused a connection before the handshake completed.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum RejectReason {
    ControlConnectionLimit { limit: usize },
    Other(String),
}

impl fmt::Display for RejectReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RejectReason::ControlConnectionLimit { limit } => {
                write!(f, "control connection limit of {} reached", limit)
            }
            RejectReason::Other(reason) => f.write_str(reason),
        }
    }
}
