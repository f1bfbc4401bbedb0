pub mod codec;
pub mod error;
pub mod packet;
pub mod packet_type;
