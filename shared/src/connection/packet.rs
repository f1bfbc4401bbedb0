use crate::{
    PackedNotification, PacketType, ProtocolInfo, RejectReason, RpcReply, RpcRequest,
    SignalNumericId, UpgradeReply, UpgradeRequest,
};

/// Payload of a streaming Data frame.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DataFrame {
    pub signal_id: SignalNumericId,
    pub payload: Vec<u8>,
}

/// Everything that travels over a config protocol connection.
#[derive(Clone, Debug, PartialEq)]
pub enum Packet {
    GetProtocolInfoRequest,
    GetProtocolInfoReply(ProtocolInfo),
    UpgradeProtocolRequest(UpgradeRequest),
    UpgradeProtocolReply(UpgradeReply),
    ConnectionRejected(RejectReason),
    Request(RpcRequest),
    Reply(RpcReply),
    NoReplyRequest(RpcRequest),
    Notification(PackedNotification),
    Data(DataFrame),
}

impl Packet {
    pub fn packet_type(&self) -> PacketType {
        match self {
            Packet::GetProtocolInfoRequest => PacketType::GetProtocolInfoRequest,
            Packet::GetProtocolInfoReply(_) => PacketType::GetProtocolInfoReply,
            Packet::UpgradeProtocolRequest(_) => PacketType::UpgradeProtocolRequest,
            Packet::UpgradeProtocolReply(_) => PacketType::UpgradeProtocolReply,
            Packet::ConnectionRejected(_) => PacketType::ConnectionRejected,
            Packet::Request(_) => PacketType::Request,
            Packet::Reply(_) => PacketType::Reply,
            Packet::NoReplyRequest(_) => PacketType::NoReplyRequest,
            Packet::Notification(_) => PacketType::Notification,
            Packet::Data(_) => PacketType::Data,
        }
    }
}
