//! Protocol version handshake.
//!
//! ```text
//! Client                                         Server
//!   | -- GetProtocolInfoRequest -------------------> |
//!   | <- GetProtocolInfoReply { current, supported } |
//!   |    (client picks max common version)           |
//!   | -- UpgradeProtocolRequest { version } -------> |
//!   | <- UpgradeProtocolReply { accepted } --------- |
//! ```
//!
//! The server may answer the first packet with ConnectionRejected instead.

mod error;
mod messages;
mod negotiation;

pub use error::ProtocolError;
pub use messages::{ProtocolInfo, RejectReason, UpgradeReply, UpgradeRequest};
pub use negotiation::{negotiate, ProtocolConfig, CURRENT_PROTOCOL_VERSION};
