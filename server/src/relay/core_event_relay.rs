use std::sync::mpsc::{Receiver, TryRecvError};

use log::{trace, warn};

use confproto_shared::PackedNotification;

use crate::tree::{EventSource, RaisedEvent};

/// Consumes the tree's change-event stream and packs each event into the form
/// it travels in to clients.
pub struct CoreEventRelay {
    receiver: Receiver<RaisedEvent>,
    disconnected: bool,
}

impl CoreEventRelay {
    pub fn new(receiver: Receiver<RaisedEvent>) -> Self {
        Self {
            receiver,
            disconnected: false,
        }
    }

    /// Packs every event raised since the last drain, in raise order.
    pub fn drain(&mut self) -> Vec<PackedNotification> {
        let mut output = Vec::new();
        loop {
            match self.receiver.try_recv() {
                Ok(raised) => output.push(Self::pack(raised)),
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    if !self.disconnected {
                        warn!("component tree dropped its event sink; no further notifications");
                        self.disconnected = true;
                    }
                    break;
                }
            }
        }
        output
    }

    pub fn pack(raised: RaisedEvent) -> PackedNotification {
        trace!("relaying {} from {:?}", raised.event.name, raised.source);
        match raised.source {
            EventSource::Component(target) => PackedNotification::component(target, raised.event),
            EventSource::PropertyObject { owner, path } => {
                PackedNotification::nested(owner, path, raised.event)
            }
            EventSource::Global => PackedNotification::global(raised.event),
        }
    }
}
