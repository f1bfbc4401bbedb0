//! How a mirrored component applies a relayed core event to itself.

use log::debug;

use confproto_shared::{
    event_params, split_dotted, CoreEvent, CoreEventId, SerializedComponent,
    SerializedPropertyObject, Value,
};

use super::{MirrorError, MirrorFactory, MirroredObject};

const STATUSES: &str = "Statuses";

fn required<'e>(event: &'e CoreEvent, param: &'static str) -> Result<&'e Value, MirrorError> {
    event.param(param).ok_or(MirrorError::MissingParam {
        event: event.id.name(),
        param,
    })
}

fn required_str<'e>(event: &'e CoreEvent, param: &'static str) -> Result<&'e str, MirrorError> {
    required(event, param)?
        .as_str()
        .ok_or(MirrorError::MissingParam {
            event: event.id.name(),
            param,
        })
}

fn snapshot_param(event: &CoreEvent, param: &'static str) -> Result<SerializedComponent, MirrorError> {
    SerializedComponent::from_value(required(event, param)?)
        .map_err(|error| MirrorError::InvalidSnapshot(error.to_string()))
}

/// Writes `value` under a possibly dotted `name` relative to `object`.
fn set_value<M: MirroredObject + ?Sized>(
    mirror: &mut M,
    path: Option<&str>,
    name: &str,
    value: Value,
) -> Result<(), MirrorError> {
    let component = mirror.global_id().clone();
    let object = property_object(mirror, path)?;
    let (nested, name) = split_dotted(name);
    let Some(target) = object.object_at_mut(nested) else {
        return Err(MirrorError::PropertyObjectNotFound {
            component,
            path: nested.to_string(),
        });
    };
    target.values.insert(name.to_string(), value);
    Ok(())
}

fn property_object<'m, M: MirroredObject + ?Sized>(
    mirror: &'m mut M,
    path: Option<&str>,
) -> Result<&'m mut SerializedPropertyObject, MirrorError> {
    let path = path.unwrap_or("");
    let component = mirror.global_id().clone();
    mirror
        .core_mut()
        .properties
        .object_at_mut(path)
        .ok_or_else(|| MirrorError::PropertyObjectNotFound {
            component,
            path: path.to_string(),
        })
}

pub(crate) fn apply_core_event<M: MirroredObject + ?Sized>(
    mirror: &mut M,
    raw: &CoreEvent,
    resolved: &CoreEvent,
    path: Option<&str>,
    factory: &MirrorFactory,
) -> Result<(), MirrorError> {
    if path.is_none() && mirror.handle_kind_event(raw, resolved) {
        return Ok(());
    }

    match raw.id {
        CoreEventId::PropertyValueChanged | CoreEventId::PropertyAdded => {
            let name = required_str(raw, event_params::NAME)?;
            let value = raw.param(event_params::VALUE).cloned().unwrap_or(Value::Null);
            set_value(mirror, path, name, value)?;
        }
        CoreEventId::PropertyRemoved => {
            let name = required_str(raw, event_params::NAME)?;
            let (nested, name) = split_dotted(name);
            let object = property_object(mirror, path)?;
            if let Some(target) = object.object_at_mut(nested) {
                target.values.remove(name);
            }
        }
        CoreEventId::PropertyObjectUpdateEnd => {
            let Some(Value::Object(updated)) = raw.param(event_params::UPDATED_PROPERTIES) else {
                return Err(MirrorError::MissingParam {
                    event: raw.id.name(),
                    param: event_params::UPDATED_PROPERTIES,
                });
            };
            for (name, value) in updated {
                set_value(mirror, path, name, value.clone())?;
            }
        }
        _ if path.is_some() => {
            debug!(
                "ignoring {} on nested object {:?} of {}",
                raw.name,
                path,
                mirror.global_id()
            );
        }
        CoreEventId::ComponentAdded => {
            let snapshot = snapshot_param(raw, event_params::COMPONENT)?;
            let local_parent = mirror.global_id().clone();
            let core = mirror.core_mut();
            match core.child_mut(&snapshot.local_id) {
                Some(existing) if existing.kind() == &snapshot.kind => {
                    existing.remote_update(&snapshot, factory);
                }
                Some(existing) => {
                    *existing = factory.build(&snapshot, &local_parent);
                }
                None => core.children.push(factory.build(&snapshot, &local_parent)),
            }
        }
        CoreEventId::ComponentRemoved => {
            let local_id = required_str(raw, event_params::ID)?;
            let core = mirror.core_mut();
            let before = core.children.len();
            core.children.retain(|child| child.local_id() != local_id);
            if before == core.children.len() {
                debug!("{} already absent from {}", local_id, core.global_id);
            }
        }
        CoreEventId::ComponentUpdateEnd => {
            let snapshot = snapshot_param(raw, event_params::SERIALIZED_COMPONENT)?;
            mirror.remote_update(&snapshot, factory);
        }
        CoreEventId::AttributeChanged => {
            let name = required_str(raw, event_params::ATTRIBUTE_NAME)?;
            let value = raw
                .param(event_params::ATTRIBUTE_VALUE)
                .cloned()
                .unwrap_or(Value::Null);
            mirror.core_mut().attributes.insert(name.to_string(), value);
        }
        CoreEventId::TagsChanged => {
            let tags = required(raw, event_params::TAGS)?.clone();
            mirror
                .core_mut()
                .attributes
                .insert(event_params::TAGS.to_string(), tags);
        }
        CoreEventId::StatusChanged => {
            let name = required_str(raw, event_params::STATUS_NAME)?;
            let value = raw.param(event_params::VALUE).cloned().unwrap_or(Value::Null);
            let statuses = mirror
                .core_mut()
                .attributes
                .entry(STATUSES.to_string())
                .or_insert_with(|| Value::Object(Default::default()));
            if !statuses.is_object() {
                *statuses = Value::Object(Default::default());
            }
            if let Value::Object(statuses) = statuses {
                statuses.insert(name.to_string(), value);
            }
        }
        _ => {
            debug!(
                "{} has no use for {}; ignoring",
                mirror.global_id(),
                raw.name
            );
        }
    }

    Ok(())
}
