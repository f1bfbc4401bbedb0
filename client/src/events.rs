use std::collections::{vec_deque, VecDeque};

use confproto_shared::{CoreEvent, DataFrame, GlobalId};

/// Something local observers of the mirror are told about.
#[derive(Clone, Debug, PartialEq)]
pub enum ClientEvent {
    /// A core event applied to the mirror. Component references in `event`
    /// are local ids.
    Core {
        /// Local id of the affected mirror; None for registry events.
        target: Option<GlobalId>,
        /// Dotted path of the nested property object that raised the event.
        path: Option<String>,
        event: CoreEvent,
    },
    Data(DataFrame),
}

/// Events collected since the last [`ConfigClient::receive`](crate::ConfigClient::receive),
/// in arrival order.
#[derive(Default)]
pub struct ClientEvents {
    events: VecDeque<ClientEvent>,
}

impl ClientEvents {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn push(&mut self, event: ClientEvent) {
        self.events.push_back(event);
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn iter(&self) -> vec_deque::Iter<'_, ClientEvent> {
        self.events.iter()
    }

    /// Core events only, each with its local target.
    pub fn core_events(&self) -> impl Iterator<Item = (Option<&GlobalId>, &CoreEvent)> {
        self.events.iter().filter_map(|event| match event {
            ClientEvent::Core { target, event, .. } => Some((target.as_ref(), event)),
            ClientEvent::Data(_) => None,
        })
    }

    pub fn data_frames(&self) -> impl Iterator<Item = &DataFrame> {
        self.events.iter().filter_map(|event| match event {
            ClientEvent::Data(frame) => Some(frame),
            ClientEvent::Core { .. } => None,
        })
    }
}

impl IntoIterator for ClientEvents {
    type Item = ClientEvent;
    type IntoIter = vec_deque::IntoIter<ClientEvent>;

    fn into_iter(self) -> Self::IntoIter {
        self.events.into_iter()
    }
}
