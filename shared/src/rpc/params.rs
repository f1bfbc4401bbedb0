//! Parameter names used in RPC requests and replies.

pub const PROPERTY_NAME: &str = "PropertyName";
pub const PROPERTY_VALUE: &str = "PropertyValue";
pub const SERIALIZED: &str = "Serialized";
pub const PARAMS: &str = "Params";
pub const ATTRIBUTE_NAME: &str = "AttributeName";
pub const ATTRIBUTE_VALUE: &str = "AttributeValue";
pub const TYPE_ID: &str = "TypeId";
pub const CONFIG: &str = "Config";
pub const LOCAL_ID: &str = "LocalId";
pub const CONNECTION_STRING: &str = "ConnectionString";
pub const LOG_ID: &str = "Id";
pub const SIZE: &str = "Size";
pub const OFFSET: &str = "Offset";
pub const GLOBAL_ID: &str = "GlobalId";

pub const ROOT: &str = "Root";
pub const TYPE_MANAGER: &str = "TypeManager";
