use std::fmt;

use serde::{Deserialize, Serialize};

/// Type tag carried by every node of a serialized component tree.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ComponentKind {
    Device,
    FunctionBlock,
    Channel,
    Signal,
    InputPort,
    Folder,
    Component,
    /// A tag this build does not know; mirrored generically.
    Other(String),
}

impl ComponentKind {
    pub fn tag(&self) -> &str {
        match self {
            ComponentKind::Device => "Device",
            ComponentKind::FunctionBlock => "FunctionBlock",
            ComponentKind::Channel => "Channel",
            ComponentKind::Signal => "Signal",
            ComponentKind::InputPort => "InputPort",
            ComponentKind::Folder => "Folder",
            ComponentKind::Component => "Component",
            ComponentKind::Other(tag) => tag,
        }
    }

    pub fn is_device(&self) -> bool {
        matches!(self, ComponentKind::Device)
    }

    /// Channels are function blocks bound to physical inputs.
    pub fn is_function_block(&self) -> bool {
        matches!(self, ComponentKind::FunctionBlock | ComponentKind::Channel)
    }
}

impl From<String> for ComponentKind {
    fn from(tag: String) -> Self {
        match tag.as_str() {
            "Device" => ComponentKind::Device,
            "FunctionBlock" => ComponentKind::FunctionBlock,
            "Channel" => ComponentKind::Channel,
            "Signal" => ComponentKind::Signal,
            "InputPort" => ComponentKind::InputPort,
            "Folder" => ComponentKind::Folder,
            "Component" => ComponentKind::Component,
            _ => ComponentKind::Other(tag),
        }
    }
}

impl From<ComponentKind> for String {
    fn from(kind: ComponentKind) -> Self {
        kind.tag().to_string()
    }
}

impl fmt::Display for ComponentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}
