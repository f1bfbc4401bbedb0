//! Keys of kind-specific scalar fields carried by a [`SerializedComponent`](super::SerializedComponent).

pub const DEVICE_DOMAIN: &str = "DeviceDomain";
pub const DEVICE_INFO: &str = "DeviceInfo";
pub const LOCKED: &str = "Locked";
pub const DATA_DESCRIPTOR: &str = "DataDescriptor";
pub const DOMAIN_SIGNAL: &str = "DomainSignal";
pub const RELATED_SIGNALS: &str = "RelatedSignals";
pub const CONNECTED_SIGNAL: &str = "ConnectedSignal";
pub const FUNCTION_BLOCK_TYPE: &str = "FunctionBlockType";
