use log::debug;

use crate::{ProtocolError, ProtocolVersion};

pub const CURRENT_PROTOCOL_VERSION: ProtocolVersion = 4;

/// Protocol versions a peer is able to speak.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProtocolConfig {
    /// Version advertised as the peer's own.
    pub current_version: ProtocolVersion,
    pub supported_versions: Vec<ProtocolVersion>,
}

impl ProtocolConfig {
    pub fn supports(&self, version: ProtocolVersion) -> bool {
        self.supported_versions.contains(&version)
    }

    /// Restricts the peer to exactly the given versions.
    pub fn with_versions(versions: &[ProtocolVersion]) -> Self {
        Self {
            current_version: versions.iter().copied().max().unwrap_or(0),
            supported_versions: versions.to_vec(),
        }
    }
}

impl Default for ProtocolConfig {
    fn default() -> Self {
        Self {
            current_version: CURRENT_PROTOCOL_VERSION,
            supported_versions: (0..=CURRENT_PROTOCOL_VERSION).collect(),
        }
    }
}

/// Picks the version both peers will speak: the highest common one, or the
/// explicitly requested one if both peers support it.
pub fn negotiate(
    client: &[ProtocolVersion],
    server: &[ProtocolVersion],
    requested: Option<ProtocolVersion>,
) -> Result<ProtocolVersion, ProtocolError> {
    if let Some(requested) = requested {
        if client.contains(&requested) && server.contains(&requested) {
            return Ok(requested);
        }
        return Err(ProtocolError::UnsupportedVersion { requested });
    }

    let chosen = client
        .iter()
        .copied()
        .filter(|version| server.contains(version))
        .max();

    match chosen {
        Some(version) => {
            debug!("negotiated protocol version {}", version);
            Ok(version)
        }
        None => Err(ProtocolError::NoCommonVersion {
            client: client.to_vec(),
            server: server.to_vec(),
        }),
    }
}
