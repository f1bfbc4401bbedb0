use thiserror::Error;

/// Errors that can occur while encoding or decoding a packet frame
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CodecError {
    /// Frame has no header byte
    #[error("Received an empty frame")]
    EmptyFrame,

    /// Invalid packet type index received (SECURITY: potentially malicious packet)
    #[error("Invalid packet type index {index} received (valid range: 0-9). This may indicate a malformed or malicious packet")]
    InvalidPacketTypeIndex { index: u8 },

    /// Data frame shorter than its signal id header
    #[error("Data frame of {length} bytes is too short to hold a signal id")]
    TruncatedDataFrame { length: usize },

    /// Body could not be encoded
    #[error("Failed to encode {packet_type} body: {reason}")]
    EncodeFailed {
        packet_type: &'static str,
        reason: String,
    },

    /// Body could not be decoded
    #[error("Failed to decode {packet_type} body: {reason}")]
    DecodeFailed {
        packet_type: &'static str,
        reason: String,
    },
}
