//! Outgoing half of a server-side connection. Incoming frames are handed to
//! [`ConfigServer::process_request`](crate::ConfigServer::process_request)
//! by whatever transport the embedder runs.

use std::sync::mpsc::Sender;

pub struct SendError;

/// Delivers frames that are not replies (notifications, data) to one client.
pub trait PacketSender: Send {
    /// Fire and forget
    fn send(&self, payload: &[u8]) -> Result<(), SendError>;
}

impl PacketSender for Sender<Box<[u8]>> {
    fn send(&self, payload: &[u8]) -> Result<(), SendError> {
        Sender::send(self, payload.into()).map_err(|_| SendError)
    }
}
