use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::ParamMap;

/// Serialized state of a property object: its own values plus nested
/// property objects keyed by the owning property's name.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SerializedPropertyObject {
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub values: ParamMap,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub objects: BTreeMap<String, SerializedPropertyObject>,
}

impl SerializedPropertyObject {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_value(mut self, name: &str, value: Value) -> Self {
        self.values.insert(name.to_string(), value);
        self
    }

    pub fn with_object(mut self, name: &str, object: SerializedPropertyObject) -> Self {
        self.objects.insert(name.to_string(), object);
        self
    }

    /// Walks a dotted path (`"Settings.Filter"`) of nested objects. An empty
    /// path yields `self`.
    pub fn object_at(&self, path: &str) -> Option<&SerializedPropertyObject> {
        let mut current = self;
        for segment in path.split('.').filter(|segment| !segment.is_empty()) {
            current = current.objects.get(segment)?;
        }
        Some(current)
    }

    pub fn object_at_mut(&mut self, path: &str) -> Option<&mut SerializedPropertyObject> {
        let mut current = self;
        for segment in path.split('.').filter(|segment| !segment.is_empty()) {
            current = current.objects.get_mut(segment)?;
        }
        Some(current)
    }

    /// Reads a value by dotted name, where every segment but the last names a
    /// nested object.
    pub fn value(&self, dotted_name: &str) -> Option<&Value> {
        let (path, name) = split_dotted(dotted_name);
        self.object_at(path)?.values.get(name)
    }
}

/// Splits `"A.B.c"` into (`"A.B"`, `"c"`).
pub fn split_dotted(dotted_name: &str) -> (&str, &str) {
    match dotted_name.rfind('.') {
        Some(index) => (&dotted_name[..index], &dotted_name[index + 1..]),
        None => ("", dotted_name),
    }
}
