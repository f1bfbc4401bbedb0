mod core_event;
mod packed_notification;

pub mod params;

pub use core_event::{CoreEvent, CoreEventId};
pub use packed_notification::PackedNotification;
