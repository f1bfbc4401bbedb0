use std::collections::HashMap;

use log::{info, trace, warn};

use confproto_shared::{
    codec, event_params, ClientType, CoreEvent, CoreEventId, ErrorCode, GlobalId, PackedNotification,
    Packet, ProtocolInfo, RejectReason, RemoteError, RpcReply, RpcRequest, SerializedComponent,
    SignalNumericId, UpgradeReply, UpgradeRequest, Value,
};

use crate::{
    connection::{ConnectionKey, ServerConnection},
    dispatch::{Dispatcher, RpcContext},
    lock::DeviceLockManager,
    relay::CoreEventRelay,
    streaming::{StreamingEvent, StreamingRegistration, StreamingSignal},
    transport::PacketSender,
    tree::{ComponentTree, EventSink},
    ConfigServerError, ServerConfig,
};

/// Serves a component tree to remote clients: answers the version handshake,
/// dispatches RPCs against the tree and relays every change of the tree to
/// every established connection.
pub struct ConfigServer<T: ComponentTree> {
    config: ServerConfig,
    // Tree
    tree: T,
    locks: DeviceLockManager,
    streaming: StreamingRegistration,
    // Events
    sink: EventSink,
    relay: CoreEventRelay,
    dispatcher: Dispatcher,
    // Connections
    connections: HashMap<ConnectionKey, ServerConnection>,
    next_connection_key: u64,
}

impl<T: ComponentTree> ConfigServer<T> {
    /// Create a new ConfigServer. The tree is subscribed to once, here.
    pub fn new(config: ServerConfig, mut tree: T) -> Self {
        let (sink, receiver) = EventSink::channel();
        tree.subscribe(sink.clone());

        Self {
            config,
            tree,
            locks: DeviceLockManager::new(),
            streaming: StreamingRegistration::new(),
            sink,
            relay: CoreEventRelay::new(receiver),
            dispatcher: Dispatcher::new(),
            connections: HashMap::new(),
            next_connection_key: 0,
        }
    }

    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    pub fn tree(&self) -> &T {
        &self.tree
    }

    /// Direct access to the served tree. Changes made through it reach
    /// clients on the next [`ConfigServer::relay_events`].
    pub fn tree_mut(&mut self) -> &mut T {
        &mut self.tree
    }

    pub fn locks(&self) -> &DeviceLockManager {
        &self.locks
    }

    // Connections

    /// Registers a client connection. `sender` receives notifications and data
    /// frames once the connection has completed the handshake.
    pub fn add_connection(
        &mut self,
        user: &str,
        client_type: ClientType,
        sender: Box<dyn PacketSender>,
    ) -> ConnectionKey {
        let key = ConnectionKey::new(self.next_connection_key);
        self.next_connection_key += 1;

        let mut connection = ServerConnection::new(key, user, client_type, sender);

        if client_type == ClientType::Control {
            if let Some(limit) = self.config.max_control_connections {
                if self.control_connection_count() >= limit {
                    warn!("rejecting control connection {} of {}: limit {} reached", key, user, limit);
                    connection.rejected = Some(RejectReason::ControlConnectionLimit { limit });
                }
            }
        }

        info!("connection {} added for {} ({:?})", key, user, client_type);
        self.connections.insert(key, connection);
        key
    }

    pub fn remove_connection(&mut self, key: &ConnectionKey) -> bool {
        if self.connections.remove(key).is_some() {
            info!("connection {} removed", key);
            return true;
        }
        false
    }

    pub fn connection_count(&self) -> usize {
        self.connections.len()
    }

    fn control_connection_count(&self) -> usize {
        self.connections
            .values()
            .filter(|connection| {
                connection.client_type == ClientType::Control && connection.rejected.is_none()
            })
            .count()
    }

    // Requests

    /// Handles one frame received on `key` and returns the frame to answer
    /// with, if any. Every notification caused by a request is sent before the
    /// reply is returned.
    pub fn process_request(
        &mut self,
        key: &ConnectionKey,
        frame: &[u8],
    ) -> Result<Option<Box<[u8]>>, ConfigServerError> {
        let packet = codec::decode(frame)?;

        let Some(connection) = self.connections.get_mut(key) else {
            return Err(ConfigServerError::UnknownConnection(*key));
        };

        if let Some(reason) = &connection.rejected {
            let reply = Packet::ConnectionRejected(reason.clone());
            return Ok(Some(codec::encode(&reply)?));
        }

        let reply = match packet {
            Packet::GetProtocolInfoRequest => Some(Packet::GetProtocolInfoReply(ProtocolInfo {
                current: self.config.protocol.current_version,
                supported: self.config.protocol.supported_versions.clone(),
            })),
            Packet::UpgradeProtocolRequest(UpgradeRequest { version }) => {
                let accepted = self.config.protocol.supports(version);
                if accepted {
                    info!("connection {} upgraded to protocol version {}", key, version);
                    connection.protocol_version = Some(version);
                } else {
                    warn!("connection {} requested unsupported protocol version {}", key, version);
                }
                Some(Packet::UpgradeProtocolReply(UpgradeReply { accepted, version }))
            }
            Packet::Request(request) => {
                let id = request.id;
                let result = self.dispatch(key, &request);
                self.relay_events();
                Some(Packet::Reply(RpcReply::from_result(id, result)))
            }
            Packet::NoReplyRequest(request) => {
                if let Err(error) = self.dispatch(key, &request) {
                    warn!("no-reply request {} failed: {}", request.method, error);
                }
                self.relay_events();
                None
            }
            other => {
                warn!("connection {} sent unexpected {} packet", key, other.packet_type().name());
                return Err(ConfigServerError::UnexpectedPacket(other.packet_type()));
            }
        };

        match reply {
            Some(reply) => Ok(Some(codec::encode(&reply)?)),
            None => Ok(None),
        }
    }

    fn dispatch(&mut self, key: &ConnectionKey, request: &RpcRequest) -> Result<Value, RemoteError> {
        let Some(connection) = self.connections.get(key) else {
            return Err(RemoteError::new(ErrorCode::General, "connection closed"));
        };
        let Some(protocol_version) = connection.protocol_version else {
            return Err(RemoteError::new(
                ErrorCode::Protocol,
                "Handshake has not been completed on this connection",
            ));
        };
        let user = connection.user.clone();
        let client_type = connection.client_type;

        let mut ctx = RpcContext {
            tree: &mut self.tree,
            locks: &mut self.locks,
            sink: &self.sink,
            user: &user,
            client_type,
            protocol_version,
        };
        let result = self.dispatcher.dispatch(&mut ctx, request);
        if let Err(error) = &result {
            trace!("{} failed for {}: {}", request.method, user, error);
        }
        result
    }

    // Events

    /// Sends every event raised since the last relay to every established
    /// connection, in raise order. Called after each request; call it after
    /// changing the tree directly.
    pub fn relay_events(&mut self) {
        for mut notification in self.relay.drain() {
            self.annotate_snapshot(&mut notification);
            self.broadcast(&Packet::Notification(notification));
        }
    }

    /// Stamps lock states onto the snapshot a structural event carries.
    fn annotate_snapshot(&self, notification: &mut PackedNotification) {
        let param = match notification.event.id {
            CoreEventId::ComponentAdded => event_params::COMPONENT,
            CoreEventId::ComponentUpdateEnd => event_params::SERIALIZED_COMPONENT,
            _ => return,
        };
        let Some(value) = notification.event.params.get_mut(param) else {
            return;
        };
        match SerializedComponent::from_value(value) {
            Ok(mut snapshot) => {
                self.locks.annotate(&mut snapshot);
                *value = snapshot.to_value();
            }
            Err(error) => warn!("{} carries a malformed snapshot: {}", notification.event.name, error),
        }
    }

    fn broadcast(&self, packet: &Packet) {
        let frame = match codec::encode(packet) {
            Ok(frame) => frame,
            Err(error) => {
                warn!("dropping {} packet: {}", packet.packet_type().name(), error);
                return;
            }
        };
        for connection in self.connections.values() {
            if connection.is_established() {
                connection.send(&frame);
            }
        }
    }

    // Streaming

    pub fn register_signal(&mut self, signal: &StreamingSignal) -> SignalNumericId {
        self.streaming.register_or_update_signal(signal)
    }

    pub fn remove_signal(&mut self, signal: &GlobalId) -> Option<SignalNumericId> {
        self.streaming.remove_signal(signal)
    }

    pub fn signal_numeric_id(&self, signal: &GlobalId) -> Option<SignalNumericId> {
        self.streaming.numeric_id(signal)
    }

    /// Subscribes an input port to a registered signal. The first subscriber
    /// causes the signal's descriptors to be sent ahead of any data.
    pub fn connect_signal(
        &mut self,
        signal: &GlobalId,
        input_port: &str,
    ) -> Result<SignalNumericId, ConfigServerError> {
        let numeric_id = self.streaming.add_connection(signal, input_port)?;

        for StreamingEvent::DataDescriptorChanged {
            signal, descriptor, ..
        } in self.streaming.take_events()
        {
            self.sink.raise_on(
                &signal,
                CoreEvent::new(CoreEventId::DataDescriptorChanged)
                    .with_param(event_params::DATA_DESCRIPTOR, descriptor),
            );
        }

        Ok(numeric_id)
    }

    /// Returns the numeric ids no longer used by any subscriber.
    pub fn disconnect_signal(
        &mut self,
        signal: &GlobalId,
        input_port: &str,
    ) -> Result<Vec<SignalNumericId>, ConfigServerError> {
        Ok(self.streaming.remove_connection(signal, input_port)?)
    }

    /// Broadcasts a data frame for `signal`. Returns false if nobody is
    /// subscribed to it.
    pub fn stream_data(&mut self, signal: &GlobalId, payload: Vec<u8>) -> bool {
        let Some(frame) = self.streaming.data_frame(signal, payload) else {
            return false;
        };
        // descriptors must reach clients before the first sample
        self.relay_events();
        self.broadcast(&Packet::Data(frame));
        true
    }
}
