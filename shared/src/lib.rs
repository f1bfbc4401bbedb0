//! # Confproto Shared
//! Common functionality shared between confproto-server & confproto-client
//! crates: packet framing, the version handshake, RPC and core-event types,
//! component-tree snapshots and global ids.

#![deny(trivial_numeric_casts, unstable_features, unused_import_braces)]

mod component_kind;
mod connection;
mod event;
mod global_id;
mod handshake;
mod key_generator;
mod rpc;
mod serialized;
mod types;

pub use component_kind::ComponentKind;
pub use connection::{
    codec,
    error::CodecError,
    packet::{DataFrame, Packet},
    packet_type::PacketType,
};
pub use event::{params as event_params, CoreEvent, CoreEventId, PackedNotification};
pub use global_id::GlobalId;
pub use handshake::{
    negotiate, ProtocolConfig, ProtocolError, ProtocolInfo, RejectReason, UpgradeReply,
    UpgradeRequest, CURRENT_PROTOCOL_VERSION,
};
pub use key_generator::RequestIdGenerator;
pub use rpc::{
    params as rpc_params, ErrorCode, MethodScope, RemoteError, RpcMethod, RpcOutcome, RpcReply,
    RpcRequest,
};
pub use serialized::{fields, split_dotted, SerializedComponent, SerializedPropertyObject};
pub use types::{ClientType, ParamMap, ProtocolVersion, RequestId, SignalNumericId};

pub use serde_json::{json, Value};
