use crate::ProtocolVersion;

/// How an RPC locates what it operates on.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum MethodScope {
    /// Target is any component, resolved by global id.
    Component,
    /// Target must resolve to a device.
    Device,
    /// No target component.
    Global,
}

/// Every remote call understood by the config protocol.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum RpcMethod {
    SetPropertyValue,
    SetProtectedPropertyValue,
    GetPropertyValue,
    ClearPropertyValue,
    Update,
    CallProperty,
    SetAttributeValue,
    GetLastValue,
    Lock,
    Unlock,
    IsLocked,
    BeginUpdate,
    EndUpdate,
    GetAvailableFunctionBlockTypes,
    AddFunctionBlock,
    RemoveFunctionBlock,
    GetTicksSinceOrigin,
    GetAvailableDevices,
    GetAvailableDeviceTypes,
    AddDevice,
    RemoveDevice,
    GetLogFileInfos,
    GetLog,
    GetTypeManager,
    GetSerializedRootDevice,
    Connect,
    ForceUnlock,
}

impl RpcMethod {
    pub const ALL: [RpcMethod; 27] = [
        RpcMethod::SetPropertyValue,
        RpcMethod::SetProtectedPropertyValue,
        RpcMethod::GetPropertyValue,
        RpcMethod::ClearPropertyValue,
        RpcMethod::Update,
        RpcMethod::CallProperty,
        RpcMethod::SetAttributeValue,
        RpcMethod::GetLastValue,
        RpcMethod::Lock,
        RpcMethod::Unlock,
        RpcMethod::IsLocked,
        RpcMethod::BeginUpdate,
        RpcMethod::EndUpdate,
        RpcMethod::GetAvailableFunctionBlockTypes,
        RpcMethod::AddFunctionBlock,
        RpcMethod::RemoveFunctionBlock,
        RpcMethod::GetTicksSinceOrigin,
        RpcMethod::GetAvailableDevices,
        RpcMethod::GetAvailableDeviceTypes,
        RpcMethod::AddDevice,
        RpcMethod::RemoveDevice,
        RpcMethod::GetLogFileInfos,
        RpcMethod::GetLog,
        RpcMethod::GetTypeManager,
        RpcMethod::GetSerializedRootDevice,
        RpcMethod::Connect,
        RpcMethod::ForceUnlock,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            RpcMethod::SetPropertyValue => "SetPropertyValue",
            RpcMethod::SetProtectedPropertyValue => "SetProtectedPropertyValue",
            RpcMethod::GetPropertyValue => "GetPropertyValue",
            RpcMethod::ClearPropertyValue => "ClearPropertyValue",
            RpcMethod::Update => "Update",
            RpcMethod::CallProperty => "CallProperty",
            RpcMethod::SetAttributeValue => "SetAttributeValue",
            RpcMethod::GetLastValue => "GetLastValue",
            RpcMethod::Lock => "Lock",
            RpcMethod::Unlock => "Unlock",
            RpcMethod::IsLocked => "IsLocked",
            RpcMethod::BeginUpdate => "BeginUpdate",
            RpcMethod::EndUpdate => "EndUpdate",
            RpcMethod::GetAvailableFunctionBlockTypes => "GetAvailableFunctionBlockTypes",
            RpcMethod::AddFunctionBlock => "AddFunctionBlock",
            RpcMethod::RemoveFunctionBlock => "RemoveFunctionBlock",
            RpcMethod::GetTicksSinceOrigin => "GetTicksSinceOrigin",
            RpcMethod::GetAvailableDevices => "GetAvailableDevices",
            RpcMethod::GetAvailableDeviceTypes => "GetAvailableDeviceTypes",
            RpcMethod::AddDevice => "AddDevice",
            RpcMethod::RemoveDevice => "RemoveDevice",
            RpcMethod::GetLogFileInfos => "GetLogFileInfos",
            RpcMethod::GetLog => "GetLog",
            RpcMethod::GetTypeManager => "GetTypeManager",
            RpcMethod::GetSerializedRootDevice => "GetSerializedRootDevice",
            RpcMethod::Connect => "Connect",
            RpcMethod::ForceUnlock => "ForceUnlock",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|method| method.name() == name)
    }

    pub fn scope(&self) -> MethodScope {
        match self {
            RpcMethod::GetAvailableFunctionBlockTypes
            | RpcMethod::AddFunctionBlock
            | RpcMethod::RemoveFunctionBlock
            | RpcMethod::GetTicksSinceOrigin
            | RpcMethod::GetAvailableDevices
            | RpcMethod::GetAvailableDeviceTypes
            | RpcMethod::AddDevice
            | RpcMethod::RemoveDevice
            | RpcMethod::GetLogFileInfos
            | RpcMethod::GetLog => MethodScope::Device,
            RpcMethod::GetTypeManager
            | RpcMethod::GetSerializedRootDevice
            | RpcMethod::Connect
            | RpcMethod::ForceUnlock => MethodScope::Global,
            _ => MethodScope::Component,
        }
    }

    /// Whether the call may change server state. ViewOnly clients are refused
    /// every mutating call.
    pub fn is_mutating(&self) -> bool {
        matches!(
            self,
            RpcMethod::SetPropertyValue
                | RpcMethod::SetProtectedPropertyValue
                | RpcMethod::ClearPropertyValue
                | RpcMethod::Update
                | RpcMethod::CallProperty
                | RpcMethod::SetAttributeValue
                | RpcMethod::Lock
                | RpcMethod::Unlock
                | RpcMethod::BeginUpdate
                | RpcMethod::EndUpdate
                | RpcMethod::AddFunctionBlock
                | RpcMethod::RemoveFunctionBlock
                | RpcMethod::AddDevice
                | RpcMethod::RemoveDevice
                | RpcMethod::ForceUnlock
        )
    }

    /// Whether the call is refused on a device locked by another user. Lock
    /// management calls carry their own ownership rules.
    pub fn requires_lock_ownership(&self) -> bool {
        self.is_mutating()
            && !matches!(
                self,
                RpcMethod::Lock | RpcMethod::Unlock | RpcMethod::ForceUnlock
            )
    }

    /// Oldest protocol version that understands this call.
    pub fn min_protocol_version(&self) -> ProtocolVersion {
        match self {
            RpcMethod::BeginUpdate
            | RpcMethod::EndUpdate
            | RpcMethod::SetAttributeValue
            | RpcMethod::GetLastValue => 1,
            RpcMethod::GetAvailableDevices
            | RpcMethod::GetAvailableDeviceTypes
            | RpcMethod::AddDevice
            | RpcMethod::RemoveDevice => 2,
            RpcMethod::Lock | RpcMethod::Unlock | RpcMethod::IsLocked | RpcMethod::ForceUnlock => 3,
            RpcMethod::GetLogFileInfos | RpcMethod::GetLog => 4,
            _ => 0,
        }
    }
}
