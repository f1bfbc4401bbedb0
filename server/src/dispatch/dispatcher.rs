use std::collections::HashMap;

use log::trace;

use confproto_shared::{
    GlobalId, MethodScope, ParamMap, RemoteError, RpcMethod, RpcRequest, Value,
};

use super::{handlers, RpcContext};

type HandlerResult = Result<Value, RemoteError>;
type TargetHandler = fn(&mut RpcContext, &GlobalId, &ParamMap) -> HandlerResult;
type GlobalHandler = fn(&mut RpcContext, &ParamMap) -> HandlerResult;

#[derive(Clone, Copy)]
enum Handler {
    Component(TargetHandler),
    Device(TargetHandler),
    Global(GlobalHandler),
}

/// Name to handler table, built once per server.
pub struct Dispatcher {
    handlers: HashMap<&'static str, (RpcMethod, Handler)>,
}

impl Dispatcher {
    pub fn new() -> Self {
        let mut dispatcher = Self {
            handlers: HashMap::new(),
        };

        for method in RpcMethod::ALL {
            dispatcher.register(method, Self::handler_for(method));
        }

        dispatcher
    }

    fn register(&mut self, method: RpcMethod, handler: Handler) {
        let handler_scope = match handler {
            Handler::Component(_) => MethodScope::Component,
            Handler::Device(_) => MethodScope::Device,
            Handler::Global(_) => MethodScope::Global,
        };
        debug_assert_eq!(handler_scope, method.scope());
        self.handlers.insert(method.name(), (method, handler));
    }

    fn handler_for(method: RpcMethod) -> Handler {
        match method {
            RpcMethod::SetPropertyValue => Handler::Component(handlers::set_property_value),
            RpcMethod::SetProtectedPropertyValue => {
                Handler::Component(handlers::set_protected_property_value)
            }
            RpcMethod::GetPropertyValue => Handler::Component(handlers::get_property_value),
            RpcMethod::ClearPropertyValue => Handler::Component(handlers::clear_property_value),
            RpcMethod::Update => Handler::Component(handlers::update),
            RpcMethod::CallProperty => Handler::Component(handlers::call_property),
            RpcMethod::SetAttributeValue => Handler::Component(handlers::set_attribute_value),
            RpcMethod::GetLastValue => Handler::Component(handlers::get_last_value),
            RpcMethod::Lock => Handler::Component(handlers::lock),
            RpcMethod::Unlock => Handler::Component(handlers::unlock),
            RpcMethod::IsLocked => Handler::Component(handlers::is_locked),
            RpcMethod::BeginUpdate => Handler::Component(handlers::begin_update),
            RpcMethod::EndUpdate => Handler::Component(handlers::end_update),
            RpcMethod::GetAvailableFunctionBlockTypes => {
                Handler::Device(handlers::get_available_function_block_types)
            }
            RpcMethod::AddFunctionBlock => Handler::Device(handlers::add_function_block),
            RpcMethod::RemoveFunctionBlock => Handler::Device(handlers::remove_function_block),
            RpcMethod::GetTicksSinceOrigin => Handler::Device(handlers::get_ticks_since_origin),
            RpcMethod::GetAvailableDevices => Handler::Device(handlers::get_available_devices),
            RpcMethod::GetAvailableDeviceTypes => {
                Handler::Device(handlers::get_available_device_types)
            }
            RpcMethod::AddDevice => Handler::Device(handlers::add_device),
            RpcMethod::RemoveDevice => Handler::Device(handlers::remove_device),
            RpcMethod::GetLogFileInfos => Handler::Device(handlers::get_log_file_infos),
            RpcMethod::GetLog => Handler::Device(handlers::get_log),
            RpcMethod::GetTypeManager => Handler::Global(handlers::get_type_manager),
            RpcMethod::GetSerializedRootDevice => {
                Handler::Global(handlers::get_serialized_root_device)
            }
            RpcMethod::Connect => Handler::Global(handlers::connect),
            RpcMethod::ForceUnlock => Handler::Global(handlers::force_unlock),
        }
    }

    pub fn supports(&self, method: &str) -> bool {
        self.handlers.contains_key(method)
    }

    /// Runs every access check for `request`, then its handler.
    pub fn dispatch(&self, ctx: &mut RpcContext, request: &RpcRequest) -> HandlerResult {
        trace!("dispatching {} from {}", request.method, ctx.user);

        let Some((method, handler)) = self.handlers.get(request.method.as_str()).copied() else {
            return Err(RemoteError::not_supported(format!(
                "Unknown method {}",
                request.method
            )));
        };

        if method.min_protocol_version() > ctx.protocol_version {
            return Err(RemoteError::not_supported(format!(
                "{} requires protocol version {}, connection negotiated {}",
                method.name(),
                method.min_protocol_version(),
                ctx.protocol_version
            )));
        }

        if method.is_mutating() && !ctx.client_type.can_mutate() {
            return Err(RemoteError::access_denied(format!(
                "{} is not permitted for view-only clients",
                method.name()
            )));
        }

        match handler {
            Handler::Global(handler) => handler(ctx, &request.params),
            Handler::Component(handler) => {
                let target = Self::resolve_target(ctx, method, request)?;
                Self::check_lock_ownership(ctx, method, &target)?;
                handler(ctx, &target, &request.params)
            }
            Handler::Device(handler) => {
                let target = Self::resolve_target(ctx, method, request)?;
                let is_device = ctx
                    .tree
                    .kind_of(&target)
                    .map_or(false, |kind| kind.is_device());
                if !is_device {
                    return Err(RemoteError::invalid_parameter(format!(
                        "{} requires a device target, {} is not a device",
                        method.name(),
                        target
                    )));
                }
                Self::check_lock_ownership(ctx, method, &target)?;
                handler(ctx, &target, &request.params)
            }
        }
    }

    fn resolve_target(
        ctx: &RpcContext,
        method: RpcMethod,
        request: &RpcRequest,
    ) -> Result<GlobalId, RemoteError> {
        let Some(target) = request.target.as_ref() else {
            return Err(RemoteError::invalid_parameter(format!(
                "{} requires a target component",
                method.name()
            )));
        };
        if !ctx.tree.contains(target) {
            return Err(RemoteError::not_found(format!("Component {} not found", target)));
        }
        Ok(target.clone())
    }

    fn check_lock_ownership(
        ctx: &RpcContext,
        method: RpcMethod,
        target: &GlobalId,
    ) -> Result<(), RemoteError> {
        if !method.requires_lock_ownership() {
            return Ok(());
        }
        let Some(device) = ctx.tree.owning_device(target) else {
            return Ok(());
        };
        if ctx.locks.can_modify(&device, ctx.user) {
            return Ok(());
        }
        Err(RemoteError::device_locked(format!(
            "Device {} is locked by {}",
            device,
            ctx.locks.effective_owner(&device).unwrap_or_default()
        )))
    }
}

impl Default for Dispatcher {
    fn default() -> Self {
        Self::new()
    }
}
