use log::{info, trace, warn};

use confproto_shared::{
    codec, negotiate, GlobalId, Packet, ParamMap, ProtocolConfig, ProtocolError, ProtocolVersion,
    RequestIdGenerator, RpcMethod, RpcRequest, UpgradeRequest, Value,
};

use crate::{transport::RequestTransport, ConfigClientError};

/// Request/reply plumbing of one client connection: the version handshake,
/// request ids and blocking RPC round trips.
pub struct ConfigComm {
    transport: Box<dyn RequestTransport>,
    protocol: ProtocolConfig,
    id_generator: RequestIdGenerator,
    protocol_version: Option<ProtocolVersion>,
    connected: bool,
}

impl ConfigComm {
    pub fn new(transport: Box<dyn RequestTransport>, protocol: ProtocolConfig) -> Self {
        Self {
            transport,
            protocol,
            id_generator: RequestIdGenerator::new(),
            protocol_version: None,
            connected: false,
        }
    }

    pub fn is_connected(&self) -> bool {
        self.connected
    }

    /// Version negotiated by the last successful handshake.
    pub fn protocol_version(&self) -> Option<ProtocolVersion> {
        self.protocol_version
    }

    pub(crate) fn transport_mut(&mut self) -> &mut dyn RequestTransport {
        self.transport.as_mut()
    }

    pub(crate) fn mark_disconnected(&mut self) {
        if self.connected {
            info!("client disconnected");
        }
        self.connected = false;
        self.protocol_version = None;
    }

    // Handshake

    /// Agrees on a protocol version with the server. On failure the
    /// connection is left without a negotiated version.
    pub fn handshake(
        &mut self,
        requested: Option<ProtocolVersion>,
    ) -> Result<ProtocolVersion, ConfigClientError> {
        self.mark_disconnected();

        let info = match self.exchange(&Packet::GetProtocolInfoRequest)? {
            Packet::GetProtocolInfoReply(info) => info,
            other => return Err(Self::handshake_failure("GetProtocolInfoReply", other)),
        };

        let version = negotiate(&self.protocol.supported_versions, &info.supported, requested)?;

        let reply = match self.exchange(&Packet::UpgradeProtocolRequest(UpgradeRequest { version }))? {
            Packet::UpgradeProtocolReply(reply) => reply,
            other => return Err(Self::handshake_failure("UpgradeProtocolReply", other)),
        };
        if !reply.accepted || reply.version != version {
            return Err(ProtocolError::UpgradeRejected { version }.into());
        }

        info!("connected with protocol version {}", version);
        self.protocol_version = Some(version);
        self.connected = true;
        Ok(version)
    }

    fn handshake_failure(expected: &'static str, received: Packet) -> ConfigClientError {
        match received {
            Packet::ConnectionRejected(reason) => ProtocolError::ConnectionRejected { reason }.into(),
            other => ProtocolError::MalformedHandshake {
                expected,
                received: other.packet_type().name(),
            }
            .into(),
        }
    }

    fn exchange(&mut self, packet: &Packet) -> Result<Packet, ConfigClientError> {
        let frame = codec::encode(packet)?;
        let reply = match self.transport.send_request(&frame) {
            Ok(reply) => reply,
            Err(error) => {
                warn!("transport failed during {}: {}", packet.packet_type().name(), error);
                self.mark_disconnected();
                return Err(error.into());
            }
        };
        Ok(codec::decode(&reply)?)
    }

    // Requests

    fn build_request(
        &mut self,
        method: RpcMethod,
        target: Option<&GlobalId>,
        params: ParamMap,
    ) -> Result<RpcRequest, ConfigClientError> {
        let Some(negotiated) = self.protocol_version else {
            return Err(ConfigClientError::NotConnected);
        };
        if method.min_protocol_version() > negotiated {
            return Err(ProtocolError::MethodNotSupported {
                method: method.name(),
                required: method.min_protocol_version(),
                negotiated,
            }
            .into());
        }

        let mut request = RpcRequest::new(self.id_generator.generate(), method.name());
        request.target = target.cloned();
        request.params = params;
        Ok(request)
    }

    /// Blocking round trip. No retry on failure.
    pub fn request(
        &mut self,
        method: RpcMethod,
        target: Option<&GlobalId>,
        params: ParamMap,
    ) -> Result<Value, ConfigClientError> {
        let request = self.build_request(method, target, params)?;
        let id = request.id;
        trace!("request {} {}", id, method.name());

        match self.exchange(&Packet::Request(request))? {
            Packet::Reply(reply) => {
                if reply.id != id {
                    return Err(ProtocolError::ReplyIdMismatch {
                        expected: id,
                        received: reply.id,
                    }
                    .into());
                }
                Ok(reply.into_result()?)
            }
            Packet::ConnectionRejected(reason) => {
                self.mark_disconnected();
                Err(ProtocolError::ConnectionRejected { reason }.into())
            }
            other => Err(ConfigClientError::UnexpectedPacket {
                expected: "Reply",
                received: other.packet_type().name(),
            }),
        }
    }

    /// Fire and forget; the server's result is discarded.
    pub fn send_no_reply(
        &mut self,
        method: RpcMethod,
        target: Option<&GlobalId>,
        params: ParamMap,
    ) -> Result<(), ConfigClientError> {
        let request = self.build_request(method, target, params)?;
        let frame = codec::encode(&Packet::NoReplyRequest(request))?;
        if let Err(error) = self.transport.send_no_reply(&frame) {
            self.mark_disconnected();
            return Err(error.into());
        }
        Ok(())
    }

    /// Next pushed packet, if any.
    pub fn receive(&mut self) -> Result<Option<Packet>, ConfigClientError> {
        let frame = match self.transport.receive() {
            Ok(Some(frame)) => frame,
            Ok(None) => return Ok(None),
            Err(error) => {
                self.mark_disconnected();
                return Err(error.into());
            }
        };
        Ok(Some(codec::decode(&frame)?))
    }
}
