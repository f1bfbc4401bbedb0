use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::ParamMap;

/// Identifies the kind of change a [`CoreEvent`] describes.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CoreEventId {
    PropertyValueChanged,
    PropertyObjectUpdateEnd,
    PropertyAdded,
    PropertyRemoved,
    ComponentAdded,
    ComponentRemoved,
    SignalConnected,
    SignalDisconnected,
    DataDescriptorChanged,
    ComponentUpdateEnd,
    AttributeChanged,
    TagsChanged,
    StatusChanged,
    TypeAdded,
    TypeRemoved,
    DeviceDomainChanged,
    DeviceLockStateChanged,
}

impl CoreEventId {
    pub fn name(&self) -> &'static str {
        match self {
            CoreEventId::PropertyValueChanged => "PropertyValueChanged",
            CoreEventId::PropertyObjectUpdateEnd => "PropertyObjectUpdateEnd",
            CoreEventId::PropertyAdded => "PropertyAdded",
            CoreEventId::PropertyRemoved => "PropertyRemoved",
            CoreEventId::ComponentAdded => "ComponentAdded",
            CoreEventId::ComponentRemoved => "ComponentRemoved",
            CoreEventId::SignalConnected => "SignalConnected",
            CoreEventId::SignalDisconnected => "SignalDisconnected",
            CoreEventId::DataDescriptorChanged => "DataDescriptorChanged",
            CoreEventId::ComponentUpdateEnd => "ComponentUpdateEnd",
            CoreEventId::AttributeChanged => "AttributeChanged",
            CoreEventId::TagsChanged => "TagsChanged",
            CoreEventId::StatusChanged => "StatusChanged",
            CoreEventId::TypeAdded => "TypeAdded",
            CoreEventId::TypeRemoved => "TypeRemoved",
            CoreEventId::DeviceDomainChanged => "DeviceDomainChanged",
            CoreEventId::DeviceLockStateChanged => "DeviceLockStateChanged",
        }
    }

    /// Events that add or remove tree nodes.
    pub fn is_structural(&self) -> bool {
        matches!(
            self,
            CoreEventId::ComponentAdded | CoreEventId::ComponentRemoved
        )
    }

    /// Events that concern the shared type registry rather than a component.
    pub fn is_type_event(&self) -> bool {
        matches!(self, CoreEventId::TypeAdded | CoreEventId::TypeRemoved)
    }
}

/// A structured notification describing a property or structural change.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CoreEvent {
    pub id: CoreEventId,
    pub name: String,
    #[serde(default)]
    pub params: ParamMap,
}

impl CoreEvent {
    pub fn new(id: CoreEventId) -> Self {
        Self {
            id,
            name: id.name().to_string(),
            params: ParamMap::new(),
        }
    }

    pub fn with_param(mut self, name: &str, value: impl Into<Value>) -> Self {
        self.params.insert(name.to_string(), value.into());
        self
    }

    pub fn param(&self, name: &str) -> Option<&Value> {
        self.params.get(name)
    }

    pub fn str_param(&self, name: &str) -> Option<&str> {
        self.params.get(name).and_then(Value::as_str)
    }
}
