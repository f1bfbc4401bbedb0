mod core_event_relay;

pub use core_event_relay::CoreEventRelay;
