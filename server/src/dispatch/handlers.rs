//! One function per RPC. Targets have already been resolved and access
//! checks have already passed when these run.

use std::iter;

use confproto_shared::{
    event_params, rpc_params, CoreEvent, CoreEventId, GlobalId, ParamMap, RemoteError,
    SerializedComponent, Value,
};

use super::RpcContext;

type HandlerResult = Result<Value, RemoteError>;

// Params

fn str_param<'p>(params: &'p ParamMap, name: &str) -> Result<&'p str, RemoteError> {
    params
        .get(name)
        .and_then(Value::as_str)
        .ok_or_else(|| RemoteError::invalid_parameter(format!("missing string parameter {}", name)))
}

fn value_param(params: &ParamMap, name: &str) -> Result<Value, RemoteError> {
    params
        .get(name)
        .cloned()
        .ok_or_else(|| RemoteError::invalid_parameter(format!("missing parameter {}", name)))
}

fn optional_param(params: &ParamMap, name: &str) -> Value {
    params.get(name).cloned().unwrap_or(Value::Null)
}

fn int_param(params: &ParamMap, name: &str, default: i64) -> Result<i64, RemoteError> {
    match params.get(name) {
        None | Some(Value::Null) => Ok(default),
        Some(value) => value.as_i64().ok_or_else(|| {
            RemoteError::invalid_parameter(format!("parameter {} must be an integer", name))
        }),
    }
}

fn serialized_value(component: &SerializedComponent) -> HandlerResult {
    Ok(component.to_value())
}

// Property object

pub(crate) fn set_property_value(ctx: &mut RpcContext, id: &GlobalId, params: &ParamMap) -> HandlerResult {
    let name = str_param(params, rpc_params::PROPERTY_NAME)?;
    let value = value_param(params, rpc_params::PROPERTY_VALUE)?;
    ctx.tree.set_property_value(id, name, value, false)?;
    Ok(Value::Null)
}

pub(crate) fn set_protected_property_value(
    ctx: &mut RpcContext,
    id: &GlobalId,
    params: &ParamMap,
) -> HandlerResult {
    let name = str_param(params, rpc_params::PROPERTY_NAME)?;
    let value = value_param(params, rpc_params::PROPERTY_VALUE)?;
    ctx.tree.set_property_value(id, name, value, true)?;
    Ok(Value::Null)
}

pub(crate) fn get_property_value(ctx: &mut RpcContext, id: &GlobalId, params: &ParamMap) -> HandlerResult {
    let name = str_param(params, rpc_params::PROPERTY_NAME)?;
    Ok(ctx.tree.get_property_value(id, name)?)
}

pub(crate) fn clear_property_value(ctx: &mut RpcContext, id: &GlobalId, params: &ParamMap) -> HandlerResult {
    let name = str_param(params, rpc_params::PROPERTY_NAME)?;
    ctx.tree.clear_property_value(id, name)?;
    Ok(Value::Null)
}

pub(crate) fn update(ctx: &mut RpcContext, id: &GlobalId, params: &ParamMap) -> HandlerResult {
    let serialized = params
        .get(rpc_params::SERIALIZED)
        .ok_or_else(|| RemoteError::invalid_parameter("missing parameter Serialized"))?;
    let snapshot = SerializedComponent::from_value(serialized)
        .map_err(|error| RemoteError::invalid_parameter(error.to_string()))?;
    ctx.tree.update(id, &snapshot)?;
    Ok(Value::Null)
}

pub(crate) fn call_property(ctx: &mut RpcContext, id: &GlobalId, params: &ParamMap) -> HandlerResult {
    let name = str_param(params, rpc_params::PROPERTY_NAME)?;
    let args = optional_param(params, rpc_params::PARAMS);
    Ok(ctx.tree.call_property(id, name, args)?)
}

pub(crate) fn begin_update(ctx: &mut RpcContext, id: &GlobalId, _: &ParamMap) -> HandlerResult {
    ctx.tree.begin_update(id)?;
    Ok(Value::Null)
}

pub(crate) fn end_update(ctx: &mut RpcContext, id: &GlobalId, _: &ParamMap) -> HandlerResult {
    ctx.tree.end_update(id)?;
    Ok(Value::Null)
}

// Component

pub(crate) fn set_attribute_value(ctx: &mut RpcContext, id: &GlobalId, params: &ParamMap) -> HandlerResult {
    let name = str_param(params, rpc_params::ATTRIBUTE_NAME)?;
    let value = value_param(params, rpc_params::ATTRIBUTE_VALUE)?;
    ctx.tree.set_attribute_value(id, name, value)?;
    Ok(Value::Null)
}

pub(crate) fn get_last_value(ctx: &mut RpcContext, id: &GlobalId, _: &ParamMap) -> HandlerResult {
    Ok(ctx.tree.last_value(id)?)
}

// Locking

fn lock_target(ctx: &RpcContext, id: &GlobalId) -> Result<GlobalId, RemoteError> {
    ctx.tree
        .owning_device(id)
        .ok_or_else(|| RemoteError::invalid_parameter(format!("{} does not belong to a device", id)))
}

/// Effective lock state of `device` and every device below it.
fn lock_states(ctx: &RpcContext, device: &GlobalId) -> Vec<(GlobalId, bool)> {
    iter::once(device.clone())
        .chain(ctx.tree.descendant_devices(device))
        .map(|id| {
            let locked = ctx.locks.is_locked(&id);
            (id, locked)
        })
        .collect()
}

fn raise_lock_changes(ctx: &RpcContext, before: Vec<(GlobalId, bool)>) {
    for (device, was_locked) in before {
        let is_locked = ctx.locks.is_locked(&device);
        if is_locked != was_locked {
            ctx.sink.raise_on(
                &device,
                CoreEvent::new(CoreEventId::DeviceLockStateChanged)
                    .with_param(event_params::IS_LOCKED, is_locked),
            );
        }
    }
}

pub(crate) fn lock(ctx: &mut RpcContext, id: &GlobalId, _: &ParamMap) -> HandlerResult {
    let device = lock_target(ctx, id)?;
    let before = lock_states(ctx, &device);
    ctx.locks.lock(&device, ctx.user)?;
    raise_lock_changes(ctx, before);
    Ok(Value::Null)
}

pub(crate) fn unlock(ctx: &mut RpcContext, id: &GlobalId, _: &ParamMap) -> HandlerResult {
    let device = lock_target(ctx, id)?;
    let before = lock_states(ctx, &device);
    ctx.locks.unlock(&device, ctx.user)?;
    raise_lock_changes(ctx, before);
    Ok(Value::Null)
}

pub(crate) fn is_locked(ctx: &mut RpcContext, id: &GlobalId, _: &ParamMap) -> HandlerResult {
    let device = lock_target(ctx, id)?;
    Ok(Value::Bool(ctx.locks.is_locked(&device)))
}

pub(crate) fn force_unlock(ctx: &mut RpcContext, params: &ParamMap) -> HandlerResult {
    let id = GlobalId::new(str_param(params, rpc_params::GLOBAL_ID)?);
    if !ctx.tree.contains(&id) {
        return Err(RemoteError::not_found(format!("Component {} not found", id)));
    }
    let device = lock_target(ctx, &id)?;
    let scope = ctx.locks.force_unlock_scope(&device);
    let before = lock_states(ctx, &scope);
    ctx.locks.force_unlock(&device);
    raise_lock_changes(ctx, before);
    Ok(Value::Null)
}

// Device

pub(crate) fn get_available_function_block_types(
    ctx: &mut RpcContext,
    device: &GlobalId,
    _: &ParamMap,
) -> HandlerResult {
    Ok(ctx.tree.available_function_block_types(device)?)
}

pub(crate) fn add_function_block(ctx: &mut RpcContext, device: &GlobalId, params: &ParamMap) -> HandlerResult {
    let type_id = str_param(params, rpc_params::TYPE_ID)?;
    let config = optional_param(params, rpc_params::CONFIG);
    let added = ctx.tree.add_function_block(device, type_id, config)?;
    annotated(ctx, &added)
}

pub(crate) fn remove_function_block(
    ctx: &mut RpcContext,
    device: &GlobalId,
    params: &ParamMap,
) -> HandlerResult {
    let local_id = str_param(params, rpc_params::LOCAL_ID)?;
    ctx.tree.remove_function_block(device, local_id)?;
    Ok(Value::Null)
}

pub(crate) fn get_ticks_since_origin(ctx: &mut RpcContext, device: &GlobalId, _: &ParamMap) -> HandlerResult {
    Ok(Value::from(ctx.tree.ticks_since_origin(device)?))
}

pub(crate) fn get_available_devices(ctx: &mut RpcContext, device: &GlobalId, _: &ParamMap) -> HandlerResult {
    Ok(ctx.tree.available_devices(device)?)
}

pub(crate) fn get_available_device_types(
    ctx: &mut RpcContext,
    device: &GlobalId,
    _: &ParamMap,
) -> HandlerResult {
    Ok(ctx.tree.available_device_types(device)?)
}

pub(crate) fn add_device(ctx: &mut RpcContext, device: &GlobalId, params: &ParamMap) -> HandlerResult {
    let connection_string = str_param(params, rpc_params::CONNECTION_STRING)?;
    let config = optional_param(params, rpc_params::CONFIG);
    let added = ctx.tree.add_device(device, connection_string, config)?;
    annotated(ctx, &added)
}

pub(crate) fn remove_device(ctx: &mut RpcContext, device: &GlobalId, params: &ParamMap) -> HandlerResult {
    let local_id = str_param(params, rpc_params::LOCAL_ID)?;
    ctx.tree.remove_device(device, local_id)?;
    let tree = &*ctx.tree;
    ctx.locks.retain_existing(|locked| tree.contains(locked));
    Ok(Value::Null)
}

pub(crate) fn get_log_file_infos(ctx: &mut RpcContext, device: &GlobalId, _: &ParamMap) -> HandlerResult {
    Ok(ctx.tree.log_file_infos(device)?)
}

pub(crate) fn get_log(ctx: &mut RpcContext, device: &GlobalId, params: &ParamMap) -> HandlerResult {
    let log_id = str_param(params, rpc_params::LOG_ID)?;
    let size = int_param(params, rpc_params::SIZE, -1)?;
    let offset = int_param(params, rpc_params::OFFSET, 0)?;
    Ok(Value::String(ctx.tree.log(device, log_id, size, offset)?))
}

// Global

pub(crate) fn get_type_manager(ctx: &mut RpcContext, _: &ParamMap) -> HandlerResult {
    Ok(ctx.tree.type_manager())
}

/// Full tree snapshot with every device annotated with its effective lock
/// state.
fn annotated_root(ctx: &RpcContext) -> Result<SerializedComponent, RemoteError> {
    let mut root = ctx.tree.serialize(&ctx.tree.root_id())?;
    ctx.locks.annotate(&mut root);
    Ok(root)
}

fn annotated(ctx: &RpcContext, id: &GlobalId) -> HandlerResult {
    let mut component = ctx.tree.serialize(id)?;
    ctx.locks.annotate(&mut component);
    serialized_value(&component)
}

pub(crate) fn get_serialized_root_device(ctx: &mut RpcContext, _: &ParamMap) -> HandlerResult {
    serialized_value(&annotated_root(ctx)?)
}

pub(crate) fn connect(ctx: &mut RpcContext, _: &ParamMap) -> HandlerResult {
    let root = annotated_root(ctx)?;
    let mut reply = serde_json::Map::new();
    reply.insert(rpc_params::ROOT.to_string(), root.to_value());
    reply.insert(rpc_params::TYPE_MANAGER.to_string(), ctx.tree.type_manager());
    Ok(Value::Object(reply))
}
