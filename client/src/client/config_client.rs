use log::{debug, warn};

use confproto_shared::{
    event_params, rpc_params, CoreEvent, CoreEventId, GlobalId, PackedNotification, Packet,
    ParamMap, ProtocolVersion, RpcMethod, SerializedComponent, Value,
};

use crate::{
    connection::ConfigComm,
    events::{ClientEvent, ClientEvents},
    mirror::{MirrorError, MirrorFactory, MirrorTree, MirroredObject, TypeManagerMirror},
    transport::RequestTransport,
    ClientConfig, ConfigClientError,
};

fn params<const N: usize>(entries: [(&str, Value); N]) -> ParamMap {
    entries
        .into_iter()
        .map(|(name, value)| (name.to_string(), value))
        .collect()
}

fn invalid_reply(method: RpcMethod, reason: impl Into<String>) -> ConfigClientError {
    ConfigClientError::InvalidReply {
        method: method.name(),
        reason: reason.into(),
    }
}

fn parse_snapshot(method: RpcMethod, value: &Value) -> Result<SerializedComponent, ConfigClientError> {
    SerializedComponent::from_value(value).map_err(|error| invalid_reply(method, error.to_string()))
}

/// A config protocol client. Keeps a mirror of the server's component tree
/// and forwards calls made on it to the server.
///
/// Calls address components by their server-side global id (see
/// [`MirroredObject::remote_global_id`]).
pub struct ConfigClient {
    config: ClientConfig,
    comm: ConfigComm,
    factory: MirrorFactory,
    mirror: Option<MirrorTree>,
    type_manager: TypeManagerMirror,
    incoming_events: ClientEvents,
}

impl ConfigClient {
    /// Create a new ConfigClient
    pub fn new(config: ClientConfig, transport: Box<dyn RequestTransport>) -> Self {
        let comm = ConfigComm::new(transport, config.protocol.clone());
        Self {
            config,
            comm,
            factory: MirrorFactory::new(),
            mirror: None,
            type_manager: TypeManagerMirror::new(),
            incoming_events: ClientEvents::new(),
        }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Register additional mirror kinds here before connecting.
    pub fn factory_mut(&mut self) -> &mut MirrorFactory {
        &mut self.factory
    }

    pub fn is_connected(&self) -> bool {
        self.comm.is_connected()
    }

    pub fn protocol_version(&self) -> Option<ProtocolVersion> {
        self.comm.protocol_version()
    }

    // Connection

    /// Handshakes with the server, fetches the full tree and type registry in
    /// one round trip and mirrors the tree below `parent`.
    pub fn connect(&mut self, parent: &GlobalId) -> Result<(), ConfigClientError> {
        self.comm.handshake(self.config.requested_protocol_version)?;

        let (root, types) = match self.fetch_root() {
            Ok(reply) => reply,
            Err(error) => {
                self.comm.mark_disconnected();
                return Err(error);
            }
        };

        self.mirror = Some(MirrorTree::build(&root, parent, &self.factory));
        self.type_manager.load(&types);
        Ok(())
    }

    /// Re-runs the handshake on the existing mirror. With
    /// `restore_client_config` the mirror's state is pushed to the server;
    /// otherwise the mirror is reconciled with the server's current tree and
    /// observers see a single ComponentUpdateEnd on the mirror root.
    pub fn reconnect(&mut self, restore_client_config: bool) -> Result<(), ConfigClientError> {
        if self.mirror.is_none() {
            return Err(ConfigClientError::NotConnected);
        }

        self.comm.mark_disconnected();
        self.comm.transport_mut().reconnect()?;
        self.comm.handshake(self.config.requested_protocol_version)?;

        if restore_client_config {
            let Some(mirror) = self.mirror.as_ref() else {
                return Err(ConfigClientError::NotConnected);
            };
            let snapshot = mirror.serialize();
            let root = snapshot.global_id.clone();
            self.update(&root, &snapshot)?;
            return Ok(());
        }

        let (root, types) = self.fetch_root()?;
        let Some(mirror) = self.mirror.as_mut() else {
            return Err(ConfigClientError::NotConnected);
        };
        mirror.remote_update(&root, &self.factory);
        self.type_manager.load(&types);

        let event = CoreEvent::new(CoreEventId::ComponentUpdateEnd)
            .with_param(event_params::SERIALIZED_COMPONENT, root.to_value());
        self.incoming_events.push(ClientEvent::Core {
            target: Some(mirror.root().global_id().clone()),
            path: None,
            event,
        });
        Ok(())
    }

    fn fetch_root(&mut self) -> Result<(SerializedComponent, Value), ConfigClientError> {
        let reply = self.comm.request(RpcMethod::Connect, None, ParamMap::new())?;
        let root = reply
            .get(rpc_params::ROOT)
            .ok_or_else(|| invalid_reply(RpcMethod::Connect, "missing Root"))?;
        let root = parse_snapshot(RpcMethod::Connect, root)?;
        let types = reply
            .get(rpc_params::TYPE_MANAGER)
            .cloned()
            .unwrap_or(Value::Null);
        Ok((root, types))
    }

    // Mirror

    pub fn mirror(&self) -> Option<&MirrorTree> {
        self.mirror.as_ref()
    }

    pub fn mirrored_root(&self) -> Option<&dyn MirroredObject> {
        self.mirror.as_ref().map(MirrorTree::root)
    }

    /// Finds a mirror by its local global id.
    pub fn find(&self, local: &GlobalId) -> Option<&dyn MirroredObject> {
        self.mirror.as_ref()?.find(local)
    }

    /// Finds the mirror of a server component.
    pub fn find_remote(&self, remote: &GlobalId) -> Option<&dyn MirroredObject> {
        self.mirror.as_ref()?.find_remote(remote)
    }

    pub fn type_manager(&self) -> &TypeManagerMirror {
        &self.type_manager
    }

    // Notifications

    /// Applies every notification and data frame that has arrived, in
    /// arrival order, and returns what local observers should see.
    pub fn receive(&mut self) -> Result<ClientEvents, ConfigClientError> {
        while let Some(packet) = self.comm.receive()? {
            match packet {
                Packet::Notification(notification) => {
                    if let Err(error) = self.process_notification(&notification) {
                        warn!("could not apply {}: {}", notification.event.name, error);
                    }
                }
                Packet::Data(frame) => self.incoming_events.push(ClientEvent::Data(frame)),
                other => warn!("ignoring unexpected {} packet", other.packet_type().name()),
            }
        }

        Ok(std::mem::take(&mut self.incoming_events))
    }

    /// Applies one relayed core event to the mirror. Events without a target,
    /// or whose target is not mirrored, go to the global handler.
    pub fn process_notification(
        &mut self,
        notification: &PackedNotification,
    ) -> Result<(), MirrorError> {
        let Some(remote) = notification.target.as_ref() else {
            self.process_global_event(&notification.event);
            return Ok(());
        };

        let mirror = self.mirror.as_mut().ok_or(MirrorError::NoMirror)?;
        if mirror.to_local(remote).is_none() {
            debug!("{} targets unmirrored {}", notification.event.name, remote);
            self.process_global_event(&notification.event);
            return Ok(());
        }

        let (local, resolved) = mirror.process(
            remote,
            &notification.event,
            notification.path.as_deref(),
            &self.factory,
        )?;
        self.incoming_events.push(ClientEvent::Core {
            target: Some(local),
            path: notification.path.clone(),
            event: resolved,
        });
        Ok(())
    }

    fn process_global_event(&mut self, event: &CoreEvent) {
        if self.type_manager.handle_core_event(event) {
            self.incoming_events.push(ClientEvent::Core {
                target: None,
                path: None,
                event: event.clone(),
            });
        } else {
            debug!("ignoring component-less {}", event.name);
        }
    }

    fn graft_reply(&mut self, method: RpcMethod, reply: &Value) -> Result<GlobalId, ConfigClientError> {
        let snapshot = parse_snapshot(method, reply)?;
        let mirror = self.mirror.as_mut().ok_or(ConfigClientError::NotConnected)?;
        Ok(mirror.graft(&snapshot, &self.factory)?)
    }

    // Property object

    pub fn set_property_value(
        &mut self,
        id: &GlobalId,
        name: &str,
        value: Value,
    ) -> Result<(), ConfigClientError> {
        self.comm.request(
            RpcMethod::SetPropertyValue,
            Some(id),
            params([
                (rpc_params::PROPERTY_NAME, Value::from(name)),
                (rpc_params::PROPERTY_VALUE, value),
            ]),
        )?;
        Ok(())
    }

    /// Like [`ConfigClient::set_property_value`], but does not wait for the
    /// server; failures are not reported.
    pub fn set_property_value_no_reply(
        &mut self,
        id: &GlobalId,
        name: &str,
        value: Value,
    ) -> Result<(), ConfigClientError> {
        self.comm.send_no_reply(
            RpcMethod::SetPropertyValue,
            Some(id),
            params([
                (rpc_params::PROPERTY_NAME, Value::from(name)),
                (rpc_params::PROPERTY_VALUE, value),
            ]),
        )
    }

    /// Writes a property even if it is read-only.
    pub fn set_protected_property_value(
        &mut self,
        id: &GlobalId,
        name: &str,
        value: Value,
    ) -> Result<(), ConfigClientError> {
        self.comm.request(
            RpcMethod::SetProtectedPropertyValue,
            Some(id),
            params([
                (rpc_params::PROPERTY_NAME, Value::from(name)),
                (rpc_params::PROPERTY_VALUE, value),
            ]),
        )?;
        Ok(())
    }

    pub fn get_property_value(&mut self, id: &GlobalId, name: &str) -> Result<Value, ConfigClientError> {
        self.comm.request(
            RpcMethod::GetPropertyValue,
            Some(id),
            params([(rpc_params::PROPERTY_NAME, Value::from(name))]),
        )
    }

    pub fn clear_property_value(&mut self, id: &GlobalId, name: &str) -> Result<(), ConfigClientError> {
        self.comm.request(
            RpcMethod::ClearPropertyValue,
            Some(id),
            params([(rpc_params::PROPERTY_NAME, Value::from(name))]),
        )?;
        Ok(())
    }

    /// Applies a serialized snapshot onto the server component `id`.
    pub fn update(
        &mut self,
        id: &GlobalId,
        snapshot: &SerializedComponent,
    ) -> Result<(), ConfigClientError> {
        self.comm.request(
            RpcMethod::Update,
            Some(id),
            params([(rpc_params::SERIALIZED, snapshot.to_value())]),
        )?;
        Ok(())
    }

    pub fn call_property(
        &mut self,
        id: &GlobalId,
        name: &str,
        args: Value,
    ) -> Result<Value, ConfigClientError> {
        self.comm.request(
            RpcMethod::CallProperty,
            Some(id),
            params([
                (rpc_params::PROPERTY_NAME, Value::from(name)),
                (rpc_params::PARAMS, args),
            ]),
        )
    }

    pub fn begin_update(&mut self, id: &GlobalId) -> Result<(), ConfigClientError> {
        self.comm.request(RpcMethod::BeginUpdate, Some(id), ParamMap::new())?;
        Ok(())
    }

    pub fn end_update(&mut self, id: &GlobalId) -> Result<(), ConfigClientError> {
        self.comm.request(RpcMethod::EndUpdate, Some(id), ParamMap::new())?;
        Ok(())
    }

    // Component

    pub fn set_attribute_value(
        &mut self,
        id: &GlobalId,
        name: &str,
        value: Value,
    ) -> Result<(), ConfigClientError> {
        self.comm.request(
            RpcMethod::SetAttributeValue,
            Some(id),
            params([
                (rpc_params::ATTRIBUTE_NAME, Value::from(name)),
                (rpc_params::ATTRIBUTE_VALUE, value),
            ]),
        )?;
        Ok(())
    }

    pub fn get_last_value(&mut self, signal: &GlobalId) -> Result<Value, ConfigClientError> {
        self.comm.request(RpcMethod::GetLastValue, Some(signal), ParamMap::new())
    }

    // Locking

    pub fn lock(&mut self, device: &GlobalId) -> Result<(), ConfigClientError> {
        self.comm.request(RpcMethod::Lock, Some(device), ParamMap::new())?;
        Ok(())
    }

    pub fn unlock(&mut self, device: &GlobalId) -> Result<(), ConfigClientError> {
        self.comm.request(RpcMethod::Unlock, Some(device), ParamMap::new())?;
        Ok(())
    }

    pub fn is_locked(&mut self, device: &GlobalId) -> Result<bool, ConfigClientError> {
        let reply = self.comm.request(RpcMethod::IsLocked, Some(device), ParamMap::new())?;
        reply
            .as_bool()
            .ok_or_else(|| invalid_reply(RpcMethod::IsLocked, "expected a boolean"))
    }

    /// Clears every lock on the device and below it, regardless of owner.
    pub fn force_unlock(&mut self, device: &GlobalId) -> Result<(), ConfigClientError> {
        self.comm.request(
            RpcMethod::ForceUnlock,
            None,
            params([(rpc_params::GLOBAL_ID, Value::from(device.as_str()))]),
        )?;
        Ok(())
    }

    // Device

    pub fn get_available_function_block_types(
        &mut self,
        device: &GlobalId,
    ) -> Result<Value, ConfigClientError> {
        self.comm.request(
            RpcMethod::GetAvailableFunctionBlockTypes,
            Some(device),
            ParamMap::new(),
        )
    }

    /// Adds a function block on the server and mirrors it right away.
    /// Returns the local id of the new mirror.
    pub fn add_function_block(
        &mut self,
        device: &GlobalId,
        type_id: &str,
        config: Value,
    ) -> Result<GlobalId, ConfigClientError> {
        let reply = self.comm.request(
            RpcMethod::AddFunctionBlock,
            Some(device),
            params([
                (rpc_params::TYPE_ID, Value::from(type_id)),
                (rpc_params::CONFIG, config),
            ]),
        )?;
        self.graft_reply(RpcMethod::AddFunctionBlock, &reply)
    }

    pub fn remove_function_block(
        &mut self,
        device: &GlobalId,
        local_id: &str,
    ) -> Result<(), ConfigClientError> {
        self.comm.request(
            RpcMethod::RemoveFunctionBlock,
            Some(device),
            params([(rpc_params::LOCAL_ID, Value::from(local_id))]),
        )?;
        Ok(())
    }

    pub fn get_ticks_since_origin(&mut self, device: &GlobalId) -> Result<u64, ConfigClientError> {
        let reply = self
            .comm
            .request(RpcMethod::GetTicksSinceOrigin, Some(device), ParamMap::new())?;
        reply
            .as_u64()
            .ok_or_else(|| invalid_reply(RpcMethod::GetTicksSinceOrigin, "expected an unsigned integer"))
    }

    pub fn get_available_devices(&mut self, device: &GlobalId) -> Result<Value, ConfigClientError> {
        self.comm
            .request(RpcMethod::GetAvailableDevices, Some(device), ParamMap::new())
    }

    pub fn get_available_device_types(&mut self, device: &GlobalId) -> Result<Value, ConfigClientError> {
        self.comm
            .request(RpcMethod::GetAvailableDeviceTypes, Some(device), ParamMap::new())
    }

    /// Adds a sub-device on the server and mirrors it right away. Returns the
    /// local id of the new mirror.
    pub fn add_device(
        &mut self,
        device: &GlobalId,
        connection_string: &str,
        config: Value,
    ) -> Result<GlobalId, ConfigClientError> {
        let reply = self.comm.request(
            RpcMethod::AddDevice,
            Some(device),
            params([
                (rpc_params::CONNECTION_STRING, Value::from(connection_string)),
                (rpc_params::CONFIG, config),
            ]),
        )?;
        self.graft_reply(RpcMethod::AddDevice, &reply)
    }

    pub fn remove_device(&mut self, device: &GlobalId, local_id: &str) -> Result<(), ConfigClientError> {
        self.comm.request(
            RpcMethod::RemoveDevice,
            Some(device),
            params([(rpc_params::LOCAL_ID, Value::from(local_id))]),
        )?;
        Ok(())
    }

    pub fn get_log_file_infos(&mut self, device: &GlobalId) -> Result<Value, ConfigClientError> {
        self.comm
            .request(RpcMethod::GetLogFileInfos, Some(device), ParamMap::new())
    }

    /// Reads `size` bytes of a device log starting at `offset`; a negative
    /// size reads to the end.
    pub fn get_log(
        &mut self,
        device: &GlobalId,
        log_id: &str,
        size: i64,
        offset: i64,
    ) -> Result<String, ConfigClientError> {
        let reply = self.comm.request(
            RpcMethod::GetLog,
            Some(device),
            params([
                (rpc_params::LOG_ID, Value::from(log_id)),
                (rpc_params::SIZE, Value::from(size)),
                (rpc_params::OFFSET, Value::from(offset)),
            ]),
        )?;
        match reply {
            Value::String(log) => Ok(log),
            _ => Err(invalid_reply(RpcMethod::GetLog, "expected a string")),
        }
    }

    // Global

    pub fn get_type_manager(&mut self) -> Result<Value, ConfigClientError> {
        self.comm.request(RpcMethod::GetTypeManager, None, ParamMap::new())
    }

    pub fn get_serialized_root_device(&mut self) -> Result<SerializedComponent, ConfigClientError> {
        let reply = self
            .comm
            .request(RpcMethod::GetSerializedRootDevice, None, ParamMap::new())?;
        parse_snapshot(RpcMethod::GetSerializedRootDevice, &reply)
    }
}
