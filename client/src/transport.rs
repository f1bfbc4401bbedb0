use thiserror::Error;

/// Errors that can occur while moving frames to and from the server
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    /// The link to the server is gone; reconnect to continue
    #[error("Transport is disconnected from the server")]
    Disconnected,

    /// The server produced no reply to a request that requires one
    #[error("Server sent no reply to the request")]
    NoReply,

    /// Underlying link reported a failure
    #[error("Transport failure: {0}")]
    Failed(String),
}

/// Moves encoded frames between a client and its server.
pub trait RequestTransport: Send {
    /// Sends a frame and blocks until the server's reply frame arrives.
    fn send_request(&mut self, frame: &[u8]) -> Result<Box<[u8]>, TransportError>;

    /// Sends a frame without waiting for anything.
    fn send_no_reply(&mut self, frame: &[u8]) -> Result<(), TransportError>;

    /// Next notification or data frame pushed by the server, if one has
    /// arrived. Never blocks.
    fn receive(&mut self) -> Result<Option<Box<[u8]>>, TransportError>;

    /// Re-establishes the link after a disconnect.
    fn reconnect(&mut self) -> Result<(), TransportError> {
        Ok(())
    }
}
