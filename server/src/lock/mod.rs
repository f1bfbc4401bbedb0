mod device_lock_manager;
mod error;

pub use device_lock_manager::DeviceLockManager;
pub use error::LockError;
