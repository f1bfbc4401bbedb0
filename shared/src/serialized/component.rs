use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{ComponentKind, GlobalId, ParamMap, SerializedPropertyObject};

/// One node of a serialized component tree, as exchanged for initial sync,
/// ComponentAdded events and client-state pushes.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SerializedComponent {
    pub kind: ComponentKind,
    pub local_id: String,
    pub global_id: GlobalId,
    /// Always-present default child (standard folders); never pruned during
    /// reconciliation.
    #[serde(default, skip_serializing_if = "is_false")]
    pub default_component: bool,
    #[serde(default)]
    pub attributes: ParamMap,
    #[serde(default)]
    pub properties: SerializedPropertyObject,
    #[serde(default)]
    pub fields: ParamMap,
    #[serde(default)]
    pub children: Vec<SerializedComponent>,
}

impl SerializedComponent {
    pub fn new(kind: ComponentKind, global_id: GlobalId) -> Self {
        Self {
            kind,
            local_id: global_id.local_id().to_string(),
            global_id,
            default_component: false,
            attributes: ParamMap::new(),
            properties: SerializedPropertyObject::new(),
            fields: ParamMap::new(),
            children: Vec::new(),
        }
    }

    pub fn child(&self, local_id: &str) -> Option<&SerializedComponent> {
        self.children.iter().find(|child| child.local_id == local_id)
    }

    pub fn field(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    /// Depth-first search by server-side global id.
    pub fn find(&self, global_id: &GlobalId) -> Option<&SerializedComponent> {
        if &self.global_id == global_id {
            return Some(self);
        }
        if !self.global_id.is_ancestor_of(global_id) {
            return None;
        }
        self.children.iter().find_map(|child| child.find(global_id))
    }

    pub fn find_mut(&mut self, global_id: &GlobalId) -> Option<&mut SerializedComponent> {
        if &self.global_id == global_id {
            return Some(self);
        }
        if !self.global_id.is_ancestor_of(global_id) {
            return None;
        }
        self.children.iter_mut().find_map(|child| child.find_mut(global_id))
    }

    /// Visits every node, parents before children.
    pub fn visit<F: FnMut(&SerializedComponent)>(&self, visitor: &mut F) {
        visitor(self);
        for child in &self.children {
            child.visit(visitor);
        }
    }

    pub fn visit_mut<F: FnMut(&mut SerializedComponent)>(&mut self, visitor: &mut F) {
        visitor(self);
        for child in &mut self.children {
            child.visit_mut(visitor);
        }
    }

    pub fn to_value(&self) -> Value {
        serde_json::to_value(self).unwrap_or(Value::Null)
    }

    pub fn from_value(value: &Value) -> Result<Self, serde_json::Error> {
        Self::deserialize(value)
    }
}

fn is_false(value: &bool) -> bool {
    !*value
}
