use std::collections::BTreeMap;

use confproto_server::tree::TreeError;
use confproto_shared::{split_dotted, GlobalId, SerializedPropertyObject, Value};

/// Definition of one property: its default, whether clients may write it and
/// the accepted numeric range.
#[derive(Clone, Debug, PartialEq)]
pub struct PropertyDef {
    pub default: Value,
    pub read_only: bool,
    pub min: Option<f64>,
    pub max: Option<f64>,
}

impl PropertyDef {
    pub fn new(default: Value) -> Self {
        Self {
            default,
            read_only: false,
            min: None,
            max: None,
        }
    }

    pub fn read_only(mut self) -> Self {
        self.read_only = true;
        self
    }

    pub fn range(mut self, min: f64, max: f64) -> Self {
        self.min = Some(min);
        self.max = Some(max);
        self
    }

    /// Checks that `value` has the default's type and lies within range.
    pub fn validate(&self, name: &str, value: &Value) -> Result<(), TreeError> {
        let same_type = matches!(
            (&self.default, value),
            (Value::Number(_), Value::Number(_))
                | (Value::Bool(_), Value::Bool(_))
                | (Value::String(_), Value::String(_))
                | (Value::Array(_), Value::Array(_))
                | (Value::Object(_), Value::Object(_))
        ) || self.default.is_null();
        if !same_type {
            return Err(TreeError::Validation(format!(
                "Value {} has the wrong type for property {}",
                value, name
            )));
        }

        if let Some(number) = value.as_f64() {
            let below = self.min.map_or(false, |min| number < min);
            let above = self.max.map_or(false, |max| number > max);
            if below || above {
                return Err(TreeError::Validation(format!(
                    "Value {} is out of range [{}, {}] for property {}",
                    number,
                    self.min.unwrap_or(f64::NEG_INFINITY),
                    self.max.unwrap_or(f64::INFINITY),
                    name
                )));
            }
        }

        Ok(())
    }
}

#[derive(Clone, Debug, PartialEq)]
struct Property {
    def: PropertyDef,
    value: Value,
}

/// A property object: named properties plus nested property objects.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PropertyObject {
    properties: BTreeMap<String, Property>,
    objects: BTreeMap<String, PropertyObject>,
}

impl PropertyObject {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_property(mut self, name: &str, def: PropertyDef) -> Self {
        self.add_property(name, def);
        self
    }

    pub fn with_object(mut self, name: &str, object: PropertyObject) -> Self {
        self.objects.insert(name.to_string(), object);
        self
    }

    pub fn add_property(&mut self, name: &str, def: PropertyDef) {
        let value = def.default.clone();
        self.properties
            .insert(name.to_string(), Property { def, value });
    }

    pub fn remove_property(&mut self, name: &str) -> bool {
        self.properties.remove(name).is_some()
    }

    pub fn has_property(&self, name: &str) -> bool {
        self.properties.contains_key(name)
    }

    pub fn object(&self, path: &str) -> Option<&PropertyObject> {
        let mut current = self;
        for segment in path.split('.').filter(|segment| !segment.is_empty()) {
            current = current.objects.get(segment)?;
        }
        Some(current)
    }

    pub fn object_mut(&mut self, path: &str) -> Option<&mut PropertyObject> {
        let mut current = self;
        for segment in path.split('.').filter(|segment| !segment.is_empty()) {
            current = current.objects.get_mut(segment)?;
        }
        Some(current)
    }

    fn property(&self, component: &GlobalId, dotted_name: &str) -> Result<&Property, TreeError> {
        let (path, name) = split_dotted(dotted_name);
        self.object(path)
            .and_then(|object| object.properties.get(name))
            .ok_or_else(|| TreeError::PropertyNotFound {
                component: component.clone(),
                name: dotted_name.to_string(),
            })
    }

    fn property_mut(
        &mut self,
        component: &GlobalId,
        dotted_name: &str,
    ) -> Result<&mut Property, TreeError> {
        let (path, name) = split_dotted(dotted_name);
        self.object_mut(path)
            .and_then(|object| object.properties.get_mut(name))
            .ok_or_else(|| TreeError::PropertyNotFound {
                component: component.clone(),
                name: dotted_name.to_string(),
            })
    }

    pub fn value(&self, component: &GlobalId, dotted_name: &str) -> Result<Value, TreeError> {
        Ok(self.property(component, dotted_name)?.value.clone())
    }

    /// Runs every check a write of `value` would run, without writing.
    pub fn check_write(
        &self,
        component: &GlobalId,
        dotted_name: &str,
        value: &Value,
        protected: bool,
    ) -> Result<(), TreeError> {
        let property = self.property(component, dotted_name)?;
        if property.def.read_only && !protected {
            return Err(TreeError::ReadOnly {
                component: component.clone(),
                name: dotted_name.to_string(),
            });
        }
        property.def.validate(dotted_name, value)
    }

    /// Writes a value that already passed [`PropertyObject::check_write`].
    /// Returns true if the value changed.
    pub fn write(
        &mut self,
        component: &GlobalId,
        dotted_name: &str,
        value: Value,
    ) -> Result<bool, TreeError> {
        let property = self.property_mut(component, dotted_name)?;
        if property.value == value {
            return Ok(false);
        }
        property.value = value;
        Ok(true)
    }

    /// Restores the default. Returns the default if the value changed.
    pub fn clear(
        &mut self,
        component: &GlobalId,
        dotted_name: &str,
    ) -> Result<Option<Value>, TreeError> {
        let property = self.property_mut(component, dotted_name)?;
        if property.def.read_only {
            return Err(TreeError::ReadOnly {
                component: component.clone(),
                name: dotted_name.to_string(),
            });
        }
        if property.value == property.def.default {
            return Ok(None);
        }
        property.value = property.def.default.clone();
        Ok(Some(property.value.clone()))
    }

    pub fn serialize(&self) -> SerializedPropertyObject {
        SerializedPropertyObject {
            values: self
                .properties
                .iter()
                .map(|(name, property)| (name.clone(), property.value.clone()))
                .collect(),
            objects: self
                .objects
                .iter()
                .map(|(name, object)| (name.clone(), object.serialize()))
                .collect(),
        }
    }

    /// Every value in `serialized` as (dotted name, value) pairs, own values
    /// first, nested objects after, each in name order.
    pub fn flatten(serialized: &SerializedPropertyObject) -> Vec<(String, Value)> {
        let mut output = Vec::new();
        Self::flatten_into(serialized, "", &mut output);
        output
    }

    fn flatten_into(serialized: &SerializedPropertyObject, prefix: &str, output: &mut Vec<(String, Value)>) {
        for (name, value) in &serialized.values {
            output.push((join(prefix, name), value.clone()));
        }
        for (name, object) in &serialized.objects {
            Self::flatten_into(object, &join(prefix, name), output);
        }
    }
}

fn join(prefix: &str, name: &str) -> String {
    if prefix.is_empty() {
        name.to_string()
    } else {
        format!("{}.{}", prefix, name)
    }
}

#[cfg(test)]
mod tests {
    use confproto_shared::json;

    use super::*;

    fn settings() -> PropertyObject {
        PropertyObject::new()
            .with_property("Rate", PropertyDef::new(json!(1000)).range(1.0, 10000.0))
            .with_property("Serial", PropertyDef::new(json!("SN-1")).read_only())
            .with_object(
                "Filter",
                PropertyObject::new().with_property("Order", PropertyDef::new(json!(2)).range(1.0, 8.0)),
            )
    }

    #[test]
    fn range_and_type_are_validated() {
        let id = GlobalId::new("/dev");
        let object = settings();

        assert!(object.check_write(&id, "Rate", &json!(500), false).is_ok());
        assert!(matches!(
            object.check_write(&id, "Rate", &json!(0), false),
            Err(TreeError::Validation(_))
        ));
        assert!(matches!(
            object.check_write(&id, "Rate", &json!("fast"), false),
            Err(TreeError::Validation(_))
        ));
        assert!(matches!(
            object.check_write(&id, "Filter.Order", &json!(9), false),
            Err(TreeError::Validation(_))
        ));
    }

    #[test]
    fn read_only_needs_protected_write() {
        let id = GlobalId::new("/dev");
        let object = settings();

        assert!(matches!(
            object.check_write(&id, "Serial", &json!("SN-2"), false),
            Err(TreeError::ReadOnly { .. })
        ));
        assert!(object.check_write(&id, "Serial", &json!("SN-2"), true).is_ok());
    }

    #[test]
    fn flatten_lists_nested_values_with_dotted_names() {
        let flat = PropertyObject::flatten(&settings().serialize());
        let names: Vec<_> = flat.iter().map(|(name, _)| name.as_str()).collect();
        assert_eq!(names, vec!["Rate", "Serial", "Filter.Order"]);
    }
}
