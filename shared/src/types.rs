use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

pub type ProtocolVersion = u16;
pub type RequestId = u64;
pub type SignalNumericId = u32;

/// Named parameters of an RPC or a core event.
pub type ParamMap = BTreeMap<String, Value>;

/// Access tier of a connected client.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ClientType {
    /// May read and mutate the tree.
    #[default]
    Control,
    /// May only read; every mutating RPC is rejected.
    ViewOnly,
}

impl ClientType {
    pub fn can_mutate(&self) -> bool {
        matches!(self, ClientType::Control)
    }
}
