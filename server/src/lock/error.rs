use thiserror::Error;

use confproto_shared::{ErrorCode, GlobalId, RemoteError};

/// Errors that can occur while locking or unlocking a device
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LockError {
    /// Device, an ancestor or a descendant is held by someone else
    #[error("Device {device} is locked by {owner}")]
    LockedByOther { device: GlobalId, owner: String },

    /// Unlock attempted by a user who does not own the lock
    #[error("User {user} does not own the lock on {device} (owner: {owner})")]
    NotOwner {
        device: GlobalId,
        user: String,
        owner: String,
    },

    /// The device is only locked through an ancestor; unlock the ancestor instead
    #[error("Device {device} is locked through parent device {ancestor}")]
    LockedThroughParent { device: GlobalId, ancestor: GlobalId },
}

impl From<LockError> for RemoteError {
    fn from(error: LockError) -> Self {
        match &error {
            LockError::LockedByOther { .. } => RemoteError::device_locked(error.to_string()),
            LockError::NotOwner { .. } => RemoteError::access_denied(error.to_string()),
            LockError::LockedThroughParent { .. } => {
                RemoteError::new(ErrorCode::InvalidState, error.to_string())
            }
        }
    }
}
