// An enum representing the different types of packets that can be
// sent/received

use crate::CodecError;

#[derive(Copy, Debug, Clone, Eq, PartialEq, Hash)]
pub enum PacketType {
    // Client asks which protocol versions the server speaks
    GetProtocolInfoRequest,
    // Server's current version and full supported set
    GetProtocolInfoReply,
    // Client asks to switch the connection to a negotiated version
    UpgradeProtocolRequest,
    // Server confirms or refuses the upgrade
    UpgradeProtocolReply,
    // Server refuses the connection; terminal
    ConnectionRejected,
    // An RPC that expects a Reply with the same id
    Request,
    // The answer to a Request
    Reply,
    // An RPC whose result is discarded
    NoReplyRequest,
    // A core event relayed from server to client
    Notification,
    // A raw streaming frame tagged with a signal numeric id
    Data,
}

impl PacketType {
    pub fn to_index(&self) -> u8 {
        match self {
            PacketType::GetProtocolInfoRequest => 0,
            PacketType::GetProtocolInfoReply => 1,
            PacketType::UpgradeProtocolRequest => 2,
            PacketType::UpgradeProtocolReply => 3,
            PacketType::ConnectionRejected => 4,
            PacketType::Request => 5,
            PacketType::Reply => 6,
            PacketType::NoReplyRequest => 7,
            PacketType::Notification => 8,
            PacketType::Data => 9,
        }
    }

    pub fn from_index(index: u8) -> Result<Self, CodecError> {
        match index {
            0 => Ok(PacketType::GetProtocolInfoRequest),
            1 => Ok(PacketType::GetProtocolInfoReply),
            2 => Ok(PacketType::UpgradeProtocolRequest),
            3 => Ok(PacketType::UpgradeProtocolReply),
            4 => Ok(PacketType::ConnectionRejected),
            5 => Ok(PacketType::Request),
            6 => Ok(PacketType::Reply),
            7 => Ok(PacketType::NoReplyRequest),
            8 => Ok(PacketType::Notification),
            9 => Ok(PacketType::Data),
            // Malformed or malicious packets may carry any index; never panic on them.
            _ => Err(CodecError::InvalidPacketTypeIndex { index }),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            PacketType::GetProtocolInfoRequest => "GetProtocolInfoRequest",
            PacketType::GetProtocolInfoReply => "GetProtocolInfoReply",
            PacketType::UpgradeProtocolRequest => "UpgradeProtocolRequest",
            PacketType::UpgradeProtocolReply => "UpgradeProtocolReply",
            PacketType::ConnectionRejected => "ConnectionRejected",
            PacketType::Request => "Request",
            PacketType::Reply => "Reply",
            PacketType::NoReplyRequest => "NoReplyRequest",
            PacketType::Notification => "Notification",
            PacketType::Data => "Data",
        }
    }

    /// Handshake packets are the only ones accepted before an upgrade.
    pub fn is_handshake(&self) -> bool {
        matches!(
            self,
            PacketType::GetProtocolInfoRequest
                | PacketType::GetProtocolInfoReply
                | PacketType::UpgradeProtocolRequest
                | PacketType::UpgradeProtocolReply
                | PacketType::ConnectionRejected
        )
    }
}
