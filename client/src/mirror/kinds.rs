//! Mirror implementations of the built-in component kinds.

use std::any::Any;

use log::debug;

use confproto_shared::{
    event_params, fields, CoreEvent, CoreEventId, GlobalId, Value,
};

use super::{MirrorCore, MirroredObject};

macro_rules! mirror_core_access {
    () => {
        fn core(&self) -> &MirrorCore {
            &self.core
        }

        fn core_mut(&mut self) -> &mut MirrorCore {
            &mut self.core
        }

        fn as_any(&self) -> &dyn Any {
            self
        }
    };
}

fn local_ids(value: Option<&Value>, resolve: &dyn Fn(&GlobalId) -> Option<GlobalId>) -> Vec<GlobalId> {
    match value {
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(Value::as_str)
            .filter_map(|remote| resolve(&GlobalId::new(remote)))
            .collect(),
        _ => Vec::new(),
    }
}

fn local_id(value: Option<&Value>, resolve: &dyn Fn(&GlobalId) -> Option<GlobalId>) -> Option<GlobalId> {
    value
        .and_then(Value::as_str)
        .and_then(|remote| resolve(&GlobalId::new(remote)))
}

// Component

/// Any component without kind-specific state; also stands in for tags no
/// constructor is registered for.
pub struct MirroredComponent {
    core: MirrorCore,
}

impl MirroredComponent {
    pub fn new(core: MirrorCore) -> Self {
        Self { core }
    }
}

impl MirroredObject for MirroredComponent {
    mirror_core_access!();
}

// Folder

pub struct MirroredFolder {
    core: MirrorCore,
}

impl MirroredFolder {
    pub fn new(core: MirrorCore) -> Self {
        Self { core }
    }

    pub fn len(&self) -> usize {
        self.core.children.len()
    }

    pub fn is_empty(&self) -> bool {
        self.core.children.is_empty()
    }
}

impl MirroredObject for MirroredFolder {
    mirror_core_access!();
}

// Device

pub struct MirroredDevice {
    core: MirrorCore,
    locked: bool,
    domain: Option<Value>,
}

impl MirroredDevice {
    pub fn new(core: MirrorCore) -> Self {
        let mut device = Self {
            core,
            locked: false,
            domain: None,
        };
        device.apply_fields();
        device
    }

    /// Lock state as last reported by the server.
    pub fn is_locked(&self) -> bool {
        self.locked
    }

    pub fn domain(&self) -> Option<&Value> {
        self.domain.as_ref()
    }

    pub fn info(&self) -> Option<&Value> {
        self.core.fields.get(fields::DEVICE_INFO)
    }
}

impl MirroredObject for MirroredDevice {
    mirror_core_access!();

    fn apply_fields(&mut self) {
        self.locked = self
            .core
            .fields
            .get(fields::LOCKED)
            .and_then(Value::as_bool)
            .unwrap_or(false);
        self.domain = self.core.fields.get(fields::DEVICE_DOMAIN).cloned();
    }

    fn handle_kind_event(&mut self, raw: &CoreEvent, _resolved: &CoreEvent) -> bool {
        match raw.id {
            CoreEventId::DeviceLockStateChanged => {
                let locked = raw
                    .param(event_params::IS_LOCKED)
                    .and_then(Value::as_bool)
                    .unwrap_or(false);
                self.core
                    .fields
                    .insert(fields::LOCKED.to_string(), Value::Bool(locked));
            }
            CoreEventId::DeviceDomainChanged => {
                let domain = raw
                    .param(event_params::DEVICE_DOMAIN)
                    .cloned()
                    .unwrap_or(Value::Null);
                self.core
                    .fields
                    .insert(fields::DEVICE_DOMAIN.to_string(), domain);
            }
            _ => return false,
        }
        self.apply_fields();
        true
    }
}

// Function block

pub struct MirroredFunctionBlock {
    core: MirrorCore,
}

impl MirroredFunctionBlock {
    pub fn new(core: MirrorCore) -> Self {
        Self { core }
    }

    pub fn type_id(&self) -> Option<&str> {
        self.core
            .fields
            .get(fields::FUNCTION_BLOCK_TYPE)
            .and_then(Value::as_str)
    }
}

impl MirroredObject for MirroredFunctionBlock {
    mirror_core_access!();
}

// Channel

/// A device's input/output channel. Carries no state beyond the core.
pub struct MirroredChannel {
    core: MirrorCore,
}

impl MirroredChannel {
    pub fn new(core: MirrorCore) -> Self {
        Self { core }
    }
}

impl MirroredObject for MirroredChannel {
    mirror_core_access!();
}

// Signal

pub struct MirroredSignal {
    core: MirrorCore,
    domain_signal: Option<GlobalId>,
    related_signals: Vec<GlobalId>,
}

impl MirroredSignal {
    pub fn new(core: MirrorCore) -> Self {
        Self {
            core,
            domain_signal: None,
            related_signals: Vec::new(),
        }
    }

    pub fn descriptor(&self) -> Option<&Value> {
        self.core.fields.get(fields::DATA_DESCRIPTOR)
    }

    /// Local id of the domain signal's mirror.
    pub fn domain_signal(&self) -> Option<&GlobalId> {
        self.domain_signal.as_ref()
    }

    pub fn related_signals(&self) -> &[GlobalId] {
        &self.related_signals
    }
}

impl MirroredObject for MirroredSignal {
    mirror_core_access!();

    fn wire_references(&mut self, resolve: &dyn Fn(&GlobalId) -> Option<GlobalId>) {
        self.domain_signal = local_id(self.core.fields.get(fields::DOMAIN_SIGNAL), resolve);
        self.related_signals = local_ids(self.core.fields.get(fields::RELATED_SIGNALS), resolve);
    }

    fn handle_kind_event(&mut self, raw: &CoreEvent, resolved: &CoreEvent) -> bool {
        match raw.id {
            CoreEventId::DataDescriptorChanged => {
                let descriptor = raw
                    .param(event_params::DATA_DESCRIPTOR)
                    .cloned()
                    .unwrap_or(Value::Null);
                self.core
                    .fields
                    .insert(fields::DATA_DESCRIPTOR.to_string(), descriptor);
                true
            }
            CoreEventId::AttributeChanged => match raw.str_param(event_params::ATTRIBUTE_NAME) {
                Some(event_params::DOMAIN_SIGNAL) => {
                    let remote = raw
                        .param(event_params::DOMAIN_SIGNAL)
                        .cloned()
                        .unwrap_or(Value::Null);
                    self.core
                        .fields
                        .insert(fields::DOMAIN_SIGNAL.to_string(), remote);
                    self.domain_signal = resolved
                        .str_param(event_params::DOMAIN_SIGNAL)
                        .map(GlobalId::new);
                    true
                }
                Some(event_params::RELATED_SIGNALS) => {
                    let remote = raw
                        .param(event_params::RELATED_SIGNALS)
                        .cloned()
                        .unwrap_or_else(|| Value::Array(Vec::new()));
                    self.core
                        .fields
                        .insert(fields::RELATED_SIGNALS.to_string(), remote);
                    self.related_signals = match resolved.param(event_params::RELATED_SIGNALS) {
                        Some(Value::Array(items)) => items
                            .iter()
                            .filter_map(Value::as_str)
                            .map(GlobalId::new)
                            .collect(),
                        _ => Vec::new(),
                    };
                    true
                }
                _ => false,
            },
            _ => false,
        }
    }
}

// Input port

pub struct MirroredInputPort {
    core: MirrorCore,
    connected_signal: Option<GlobalId>,
}

impl MirroredInputPort {
    pub fn new(core: MirrorCore) -> Self {
        Self {
            core,
            connected_signal: None,
        }
    }

    /// Local id of the connected signal's mirror.
    pub fn connected_signal(&self) -> Option<&GlobalId> {
        self.connected_signal.as_ref()
    }
}

impl MirroredObject for MirroredInputPort {
    mirror_core_access!();

    fn wire_references(&mut self, resolve: &dyn Fn(&GlobalId) -> Option<GlobalId>) {
        self.connected_signal = local_id(self.core.fields.get(fields::CONNECTED_SIGNAL), resolve);
    }

    fn handle_kind_event(&mut self, raw: &CoreEvent, resolved: &CoreEvent) -> bool {
        match raw.id {
            CoreEventId::SignalConnected => {
                let remote = raw
                    .param(event_params::SIGNAL)
                    .cloned()
                    .unwrap_or(Value::Null);
                self.core
                    .fields
                    .insert(fields::CONNECTED_SIGNAL.to_string(), remote);
                self.connected_signal = resolved.str_param(event_params::SIGNAL).map(GlobalId::new);
                if self.connected_signal.is_none() {
                    debug!("{} connected to a signal outside the mirror", self.core.global_id);
                }
                true
            }
            CoreEventId::SignalDisconnected => {
                self.core.fields.remove(fields::CONNECTED_SIGNAL);
                self.connected_signal = None;
                true
            }
            _ => false,
        }
    }
}
