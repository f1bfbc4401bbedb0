use std::collections::{HashMap, HashSet};

use log::{debug, info};

use confproto_shared::{DataFrame, GlobalId, SignalNumericId, Value};

use super::StreamingError;

/// What the registration needs to know about a signal.
#[derive(Clone, Debug, PartialEq)]
pub struct StreamingSignal {
    pub global_id: GlobalId,
    pub domain_signal: Option<GlobalId>,
    pub descriptor: Value,
}

impl StreamingSignal {
    pub fn new(global_id: GlobalId, descriptor: Value) -> Self {
        Self {
            global_id,
            domain_signal: None,
            descriptor,
        }
    }

    pub fn with_domain_signal(mut self, domain_signal: GlobalId) -> Self {
        self.domain_signal = Some(domain_signal);
        self
    }
}

/// Emitted so a newly subscribed consumer sees a valid descriptor before any data.
#[derive(Clone, Debug, PartialEq)]
pub enum StreamingEvent {
    DataDescriptorChanged {
        signal: GlobalId,
        signal_id: SignalNumericId,
        descriptor: Value,
    },
}

struct SignalRecord {
    numeric_id: SignalNumericId,
    domain_signal: Option<GlobalId>,
    descriptor: Value,
    connections: HashSet<String>,
}

/// Maps signals to compact numeric ids and counts the input ports subscribed
/// to each of them.
pub struct StreamingRegistration {
    next_numeric_id: SignalNumericId,
    signals: HashMap<GlobalId, SignalRecord>,
    outgoing_events: Vec<StreamingEvent>,
}

impl StreamingRegistration {
    pub fn new() -> Self {
        Self {
            next_numeric_id: 1,
            signals: HashMap::new(),
            outgoing_events: Vec::new(),
        }
    }

    /// Registers a signal, or refreshes its descriptor and domain signal if it
    /// is already registered. The numeric id of a known signal never changes.
    pub fn register_or_update_signal(&mut self, signal: &StreamingSignal) -> SignalNumericId {
        if let Some(record) = self.signals.get_mut(&signal.global_id) {
            record.domain_signal = signal.domain_signal.clone();
            record.descriptor = signal.descriptor.clone();
            return record.numeric_id;
        }

        let numeric_id = self.next_numeric_id;
        self.next_numeric_id += 1;
        self.signals.insert(
            signal.global_id.clone(),
            SignalRecord {
                numeric_id,
                domain_signal: signal.domain_signal.clone(),
                descriptor: signal.descriptor.clone(),
                connections: HashSet::new(),
            },
        );
        info!("signal {} registered with numeric id {}", signal.global_id, numeric_id);

        numeric_id
    }

    /// Forgets a signal. Its numeric id is not handed out again.
    pub fn remove_signal(&mut self, signal: &GlobalId) -> Option<SignalNumericId> {
        self.signals.remove(signal).map(|record| record.numeric_id)
    }

    pub fn numeric_id(&self, signal: &GlobalId) -> Option<SignalNumericId> {
        self.signals.get(signal).map(|record| record.numeric_id)
    }

    pub fn connection_count(&self, signal: &GlobalId) -> usize {
        self.signals
            .get(signal)
            .map_or(0, |record| record.connections.len())
    }

    pub fn add_connection(
        &mut self,
        signal: &GlobalId,
        input_port: &str,
    ) -> Result<SignalNumericId, StreamingError> {
        let record = self
            .signals
            .get_mut(signal)
            .ok_or_else(|| StreamingError::SignalNotRegistered(signal.clone()))?;

        let first_connection = record.connections.is_empty();
        record.connections.insert(input_port.to_string());
        let numeric_id = record.numeric_id;

        if first_connection {
            let descriptor = record.descriptor.clone();
            let domain_signal = record.domain_signal.clone();

            self.outgoing_events.push(StreamingEvent::DataDescriptorChanged {
                signal: signal.clone(),
                signal_id: numeric_id,
                descriptor,
            });

            if let Some(domain_signal) = domain_signal {
                if let Some(domain) = self.signals.get(&domain_signal) {
                    self.outgoing_events.push(StreamingEvent::DataDescriptorChanged {
                        signal: domain_signal.clone(),
                        signal_id: domain.numeric_id,
                        descriptor: domain.descriptor.clone(),
                    });
                }
            }
        }

        debug!("input port {} subscribed to signal {}", input_port, signal);
        Ok(numeric_id)
    }

    /// Removes one subscriber and returns the numeric ids that are no longer
    /// needed by anyone. A signal is unused once neither it nor its domain
    /// signal has subscribers and no signal streaming on it as a domain has
    /// subscribers either. The disconnected signal comes first, then its
    /// domain signal, then signals that use it as their domain.
    pub fn remove_connection(
        &mut self,
        signal: &GlobalId,
        input_port: &str,
    ) -> Result<Vec<SignalNumericId>, StreamingError> {
        let record = self
            .signals
            .get_mut(signal)
            .ok_or_else(|| StreamingError::SignalNotRegistered(signal.clone()))?;

        record.connections.remove(input_port);
        debug!("input port {} unsubscribed from signal {}", input_port, signal);

        if !record.connections.is_empty() {
            return Ok(Vec::new());
        }
        let domain_signal = record.domain_signal.clone();

        let mut dependents: Vec<(SignalNumericId, &GlobalId)> = self
            .signals
            .iter()
            .filter(|(_, record)| record.domain_signal.as_ref() == Some(signal))
            .map(|(dependent, record)| (record.numeric_id, dependent))
            .collect();
        dependents.sort_by_key(|(numeric_id, _)| *numeric_id);

        let candidates = std::iter::once(signal)
            .chain(domain_signal.as_ref())
            .chain(dependents.into_iter().map(|(_, dependent)| dependent));

        let mut unused = Vec::new();
        for candidate in candidates {
            if !self.is_unused(candidate) {
                continue;
            }
            if let Some(numeric_id) = self.numeric_id(candidate) {
                if !unused.contains(&numeric_id) {
                    unused.push(numeric_id);
                }
            }
        }

        Ok(unused)
    }

    /// Builds a Data frame for a signal, or None if nobody is subscribed.
    pub fn data_frame(&self, signal: &GlobalId, payload: Vec<u8>) -> Option<DataFrame> {
        let record = self.signals.get(signal)?;
        if record.connections.is_empty() {
            return None;
        }
        Some(DataFrame {
            signal_id: record.numeric_id,
            payload,
        })
    }

    pub fn take_events(&mut self) -> Vec<StreamingEvent> {
        std::mem::take(&mut self.outgoing_events)
    }

    fn is_unused(&self, signal: &GlobalId) -> bool {
        let record = match self.signals.get(signal) {
            Some(record) => record,
            None => return false,
        };
        if !record.connections.is_empty() {
            return false;
        }
        if let Some(domain_signal) = &record.domain_signal {
            if self.connection_count(domain_signal) > 0 {
                return false;
            }
        }
        !self.has_active_dependents(signal)
    }

    fn has_active_dependents(&self, domain_signal: &GlobalId) -> bool {
        self.signals.values().any(|record| {
            record.domain_signal.as_ref() == Some(domain_signal) && !record.connections.is_empty()
        })
    }
}

impl Default for StreamingRegistration {
    fn default() -> Self {
        Self::new()
    }
}
