//! Parameter names used by core events.

pub const NAME: &str = "Name";
pub const VALUE: &str = "Value";
pub const UPDATED_PROPERTIES: &str = "UpdatedProperties";
pub const COMPONENT: &str = "Component";
pub const ID: &str = "Id";
pub const SIGNAL: &str = "Signal";
pub const DOMAIN_SIGNAL: &str = "DomainSignal";
pub const RELATED_SIGNALS: &str = "RelatedSignals";
pub const DATA_DESCRIPTOR: &str = "DataDescriptor";
pub const SERIALIZED_COMPONENT: &str = "SerializedComponent";
pub const ATTRIBUTE_NAME: &str = "AttributeName";
pub const ATTRIBUTE_VALUE: &str = "AttributeValue";
pub const TAGS: &str = "Tags";
pub const STATUS_NAME: &str = "StatusName";
pub const TYPE: &str = "Type";
pub const TYPE_NAME: &str = "TypeName";
pub const DEVICE_DOMAIN: &str = "DeviceDomain";
pub const IS_LOCKED: &str = "IsLocked";

/// Parameters that reference other components by global id. String (or
/// string-list) values under these names are resolved to local mirrors on the
/// client; any other value shape is passed through untouched.
pub const REFERENCE_PARAMS: [&str; 4] = [SIGNAL, DOMAIN_SIGNAL, COMPONENT, RELATED_SIGNALS];

pub fn is_reference_param(name: &str) -> bool {
    REFERENCE_PARAMS.contains(&name)
}
