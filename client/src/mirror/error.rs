use thiserror::Error;

use confproto_shared::GlobalId;

/// Errors that can occur while applying server state to the local mirror
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MirrorError {
    /// No mirror has been built yet; connect first
    #[error("No mirrored tree exists yet. Connect before processing notifications")]
    NoMirror,

    /// Event or snapshot refers to a server component the mirror does not contain
    #[error("Server component {0} is not part of the mirrored tree")]
    TargetNotFound(GlobalId),

    /// Nested property object addressed by a dotted path does not exist
    #[error("Component {component} has no nested property object at '{path}'")]
    PropertyObjectNotFound { component: GlobalId, path: String },

    /// Core event lacks a parameter its kind requires
    #[error("{event} event is missing required parameter {param}")]
    MissingParam {
        event: &'static str,
        param: &'static str,
    },

    /// Serialized component could not be decoded
    #[error("Invalid serialized component: {0}")]
    InvalidSnapshot(String),
}
