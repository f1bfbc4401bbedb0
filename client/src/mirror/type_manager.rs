use std::collections::BTreeMap;

use log::debug;

use confproto_shared::{event_params, CoreEvent, CoreEventId, Value};

/// Client copy of the server's shared type registry: type name to type
/// definition.
#[derive(Default)]
pub struct TypeManagerMirror {
    types: BTreeMap<String, Value>,
}

impl TypeManagerMirror {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the registry with a serialized one. Anything but an object is
    /// treated as empty.
    pub fn load(&mut self, serialized: &Value) {
        self.types = match serialized {
            Value::Object(types) => types
                .iter()
                .map(|(name, definition)| (name.clone(), definition.clone()))
                .collect(),
            _ => BTreeMap::new(),
        };
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.types.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.types.contains_key(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.types.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    /// Applies a component-less core event. Returns false for events that do
    /// not concern the registry.
    pub fn handle_core_event(&mut self, event: &CoreEvent) -> bool {
        match event.id {
            CoreEventId::TypeAdded => {
                let Some(name) = event.str_param(event_params::TYPE_NAME) else {
                    debug!("TypeAdded without a type name; ignoring");
                    return true;
                };
                let definition = event.param(event_params::TYPE).cloned().unwrap_or(Value::Null);
                self.types.insert(name.to_string(), definition);
                true
            }
            CoreEventId::TypeRemoved => {
                if let Some(name) = event.str_param(event_params::TYPE_NAME) {
                    self.types.remove(name);
                }
                true
            }
            _ => false,
        }
    }
}
