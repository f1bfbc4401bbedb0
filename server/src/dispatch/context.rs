use confproto_shared::{ClientType, ProtocolVersion};

use crate::{lock::DeviceLockManager, tree::ComponentTree, tree::EventSink};

/// Everything a handler may touch while serving one request.
pub struct RpcContext<'a> {
    pub tree: &'a mut dyn ComponentTree,
    pub locks: &'a mut DeviceLockManager,
    pub sink: &'a EventSink,
    /// Resolved identity of the calling connection.
    pub user: &'a str,
    pub client_type: ClientType,
    pub protocol_version: ProtocolVersion,
}
