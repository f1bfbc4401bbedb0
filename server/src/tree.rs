//! The component tree the server exposes. The property-object model, value
//! validation and component behavior live behind [`ComponentTree`]; the
//! config server only locates components by global id and forwards calls.

use std::sync::mpsc::{self, Receiver, Sender};

use log::warn;
use thiserror::Error;

use confproto_shared::{
    ComponentKind, CoreEvent, ErrorCode, GlobalId, RemoteError, SerializedComponent, Value,
};

/// Errors reported by a [`ComponentTree`] implementation
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TreeError {
    #[error("Component {0} not found")]
    ComponentNotFound(GlobalId),

    #[error("Property {name} not found on {component}")]
    PropertyNotFound { component: GlobalId, name: String },

    #[error("Property {name} on {component} is read-only")]
    ReadOnly { component: GlobalId, name: String },

    /// The property model refused a value; the message is passed through verbatim.
    #[error("{0}")]
    Validation(String),

    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("Invalid state: {0}")]
    InvalidState(String),

    #[error("Not supported: {0}")]
    NotSupported(String),
}

impl From<TreeError> for RemoteError {
    fn from(error: TreeError) -> Self {
        let code = match &error {
            TreeError::ComponentNotFound(_) | TreeError::PropertyNotFound { .. } => {
                ErrorCode::NotFound
            }
            TreeError::ReadOnly { .. } => ErrorCode::AccessDenied,
            TreeError::Validation(_) => ErrorCode::ValidationFailed,
            TreeError::InvalidParameter(_) => ErrorCode::InvalidParameter,
            TreeError::InvalidState(_) => ErrorCode::InvalidState,
            TreeError::NotSupported(_) => ErrorCode::NotSupported,
        };
        RemoteError::new(code, error.to_string())
    }
}

/// Where a raised event originated.
#[derive(Clone, Debug, PartialEq)]
pub enum EventSource {
    /// Raised by the component itself.
    Component(GlobalId),
    /// Raised by a property object nested inside a component's property
    /// object; `path` is dotted, relative to the owning component.
    PropertyObject { owner: GlobalId, path: String },
    /// Not tied to any component (type registry changes).
    Global,
}

/// One change of the tree, as pushed by the tree onto its event channel.
#[derive(Clone, Debug, PartialEq)]
pub struct RaisedEvent {
    pub source: EventSource,
    pub event: CoreEvent,
}

/// Sending half of the tree's change-event channel. The tree keeps it after
/// [`ComponentTree::subscribe`] and raises every change through it.
#[derive(Clone)]
pub struct EventSink {
    sender: Sender<RaisedEvent>,
}

impl EventSink {
    pub fn channel() -> (EventSink, Receiver<RaisedEvent>) {
        let (sender, receiver) = mpsc::channel();
        (EventSink { sender }, receiver)
    }

    pub fn raise(&self, source: EventSource, event: CoreEvent) {
        if self.sender.send(RaisedEvent { source, event }).is_err() {
            warn!("event sink disconnected; dropping core event");
        }
    }

    pub fn raise_on(&self, component: &GlobalId, event: CoreEvent) {
        self.raise(EventSource::Component(component.clone()), event);
    }
}

/// Component lookup by global id plus the component operations reachable
/// over RPC. Every method taking a `GlobalId` must answer
/// [`TreeError::ComponentNotFound`] when the id does not resolve.
pub trait ComponentTree: Send {
    /// Called exactly once, when the config server is built.
    fn subscribe(&mut self, sink: EventSink);

    fn root_id(&self) -> GlobalId;

    fn kind_of(&self, id: &GlobalId) -> Option<ComponentKind>;

    fn contains(&self, id: &GlobalId) -> bool {
        self.kind_of(id).is_some()
    }

    /// Closest device ancestor-or-self of a component.
    fn owning_device(&self, id: &GlobalId) -> Option<GlobalId>;

    /// Every device strictly below `id`.
    fn descendant_devices(&self, id: &GlobalId) -> Vec<GlobalId>;

    fn serialize(&self, id: &GlobalId) -> Result<SerializedComponent, TreeError>;

    // Property object

    fn get_property_value(&self, id: &GlobalId, name: &str) -> Result<Value, TreeError>;

    /// `protected` writes bypass read-only flags.
    fn set_property_value(
        &mut self,
        id: &GlobalId,
        name: &str,
        value: Value,
        protected: bool,
    ) -> Result<(), TreeError>;

    fn clear_property_value(&mut self, id: &GlobalId, name: &str) -> Result<(), TreeError>;

    /// Applies a serialized snapshot onto an existing subtree.
    fn update(&mut self, id: &GlobalId, snapshot: &SerializedComponent) -> Result<(), TreeError>;

    fn call_property(&mut self, id: &GlobalId, name: &str, args: Value) -> Result<Value, TreeError>;

    fn begin_update(&mut self, id: &GlobalId) -> Result<(), TreeError>;

    fn end_update(&mut self, id: &GlobalId) -> Result<(), TreeError>;

    // Component

    fn set_attribute_value(
        &mut self,
        id: &GlobalId,
        name: &str,
        value: Value,
    ) -> Result<(), TreeError>;

    fn last_value(&self, signal: &GlobalId) -> Result<Value, TreeError>;

    // Device

    fn available_function_block_types(&self, device: &GlobalId) -> Result<Value, TreeError>;

    fn add_function_block(
        &mut self,
        device: &GlobalId,
        type_id: &str,
        config: Value,
    ) -> Result<GlobalId, TreeError>;

    fn remove_function_block(&mut self, device: &GlobalId, local_id: &str)
        -> Result<(), TreeError>;

    fn ticks_since_origin(&self, device: &GlobalId) -> Result<u64, TreeError>;

    fn available_devices(&self, device: &GlobalId) -> Result<Value, TreeError>;

    fn available_device_types(&self, device: &GlobalId) -> Result<Value, TreeError>;

    fn add_device(
        &mut self,
        device: &GlobalId,
        connection_string: &str,
        config: Value,
    ) -> Result<GlobalId, TreeError>;

    fn remove_device(&mut self, device: &GlobalId, local_id: &str) -> Result<(), TreeError>;

    fn log_file_infos(&self, device: &GlobalId) -> Result<Value, TreeError>;

    fn log(&self, device: &GlobalId, log_id: &str, size: i64, offset: i64)
        -> Result<String, TreeError>;

    // Context

    /// Serialized shared type registry.
    fn type_manager(&self) -> Value;
}
