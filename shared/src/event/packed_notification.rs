use serde::{Deserialize, Serialize};

use crate::{CoreEvent, GlobalId};

/// A core event as it travels from server to client.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PackedNotification {
    /// Server-side global id of the component the event concerns. None for
    /// events that do not belong to any component (type registry changes).
    #[serde(default)]
    pub target: Option<GlobalId>,
    pub event: CoreEvent,
    /// Dotted path from `target` to the nested property object that raised
    /// the event, if it was not raised by the component itself.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
}

impl PackedNotification {
    pub fn component(target: GlobalId, event: CoreEvent) -> Self {
        Self {
            target: Some(target),
            event,
            path: None,
        }
    }

    pub fn nested(owner: GlobalId, path: String, event: CoreEvent) -> Self {
        Self {
            target: Some(owner),
            event,
            path: Some(path),
        }
    }

    pub fn global(event: CoreEvent) -> Self {
        Self {
            target: None,
            event,
            path: None,
        }
    }
}
