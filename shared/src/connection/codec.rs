//! Frame layout: one header byte with the [`PacketType`] index, then the body.
//! Control bodies are JSON; Data bodies are a little-endian `u32` signal id
//! followed by the raw payload.

use serde::{de::DeserializeOwned, Serialize};

use crate::{CodecError, DataFrame, Packet, PacketType};

const SIGNAL_ID_LENGTH: usize = 4;

pub fn encode(packet: &Packet) -> Result<Box<[u8]>, CodecError> {
    let packet_type = packet.packet_type();
    let mut output = vec![packet_type.to_index()];

    match packet {
        Packet::GetProtocolInfoRequest => {}
        Packet::GetProtocolInfoReply(info) => write_body(&mut output, packet_type, info)?,
        Packet::UpgradeProtocolRequest(request) => write_body(&mut output, packet_type, request)?,
        Packet::UpgradeProtocolReply(reply) => write_body(&mut output, packet_type, reply)?,
        Packet::ConnectionRejected(reason) => write_body(&mut output, packet_type, reason)?,
        Packet::Request(request) | Packet::NoReplyRequest(request) => {
            write_body(&mut output, packet_type, request)?
        }
        Packet::Reply(reply) => write_body(&mut output, packet_type, reply)?,
        Packet::Notification(notification) => {
            write_body(&mut output, packet_type, notification)?
        }
        Packet::Data(frame) => {
            output.extend_from_slice(&frame.signal_id.to_le_bytes());
            output.extend_from_slice(&frame.payload);
        }
    }

    Ok(output.into_boxed_slice())
}

pub fn decode(frame: &[u8]) -> Result<Packet, CodecError> {
    let Some((&header, body)) = frame.split_first() else {
        return Err(CodecError::EmptyFrame);
    };
    let packet_type = PacketType::from_index(header)?;

    let packet = match packet_type {
        PacketType::GetProtocolInfoRequest => Packet::GetProtocolInfoRequest,
        PacketType::GetProtocolInfoReply => {
            Packet::GetProtocolInfoReply(read_body(body, packet_type)?)
        }
        PacketType::UpgradeProtocolRequest => {
            Packet::UpgradeProtocolRequest(read_body(body, packet_type)?)
        }
        PacketType::UpgradeProtocolReply => {
            Packet::UpgradeProtocolReply(read_body(body, packet_type)?)
        }
        PacketType::ConnectionRejected => Packet::ConnectionRejected(read_body(body, packet_type)?),
        PacketType::Request => Packet::Request(read_body(body, packet_type)?),
        PacketType::Reply => Packet::Reply(read_body(body, packet_type)?),
        PacketType::NoReplyRequest => Packet::NoReplyRequest(read_body(body, packet_type)?),
        PacketType::Notification => Packet::Notification(read_body(body, packet_type)?),
        PacketType::Data => {
            if body.len() < SIGNAL_ID_LENGTH {
                return Err(CodecError::TruncatedDataFrame { length: frame.len() });
            }
            let (id_bytes, payload) = body.split_at(SIGNAL_ID_LENGTH);
            let mut signal_id = [0u8; SIGNAL_ID_LENGTH];
            signal_id.copy_from_slice(id_bytes);
            Packet::Data(DataFrame {
                signal_id: u32::from_le_bytes(signal_id),
                payload: payload.to_vec(),
            })
        }
    };

    Ok(packet)
}

fn write_body<T: Serialize>(
    output: &mut Vec<u8>,
    packet_type: PacketType,
    body: &T,
) -> Result<(), CodecError> {
    serde_json::to_writer(output, body).map_err(|error| CodecError::EncodeFailed {
        packet_type: packet_type.name(),
        reason: error.to_string(),
    })
}

fn read_body<T: DeserializeOwned>(body: &[u8], packet_type: PacketType) -> Result<T, CodecError> {
    serde_json::from_slice(body).map_err(|error| CodecError::DecodeFailed {
        packet_type: packet_type.name(),
        reason: error.to_string(),
    })
}
