use std::collections::HashMap;

use log::info;

use confproto_shared::{fields, GlobalId, SerializedComponent, Value};

use super::LockError;

/// Per-device ownership locks.
///
/// Only explicitly locked devices are stored. A lock covers the device and
/// every device below it, so the effective owner of any device is the owner
/// stored on its closest locked ancestor-or-self.
pub struct DeviceLockManager {
    locks: HashMap<GlobalId, String>,
}

impl DeviceLockManager {
    pub fn new() -> Self {
        Self {
            locks: HashMap::new(),
        }
    }

    /// Owner and lock holder of the closest locked ancestor-or-self.
    pub fn effective_lock(&self, device: &GlobalId) -> Option<(&GlobalId, &str)> {
        self.locks
            .iter()
            .filter(|(locked, _)| locked.is_ancestor_or_self_of(device))
            .max_by_key(|(locked, _)| locked.depth())
            .map(|(locked, owner)| (locked, owner.as_str()))
    }

    pub fn effective_owner(&self, device: &GlobalId) -> Option<&str> {
        self.effective_lock(device).map(|(_, owner)| owner)
    }

    pub fn is_locked(&self, device: &GlobalId) -> bool {
        self.effective_lock(device).is_some()
    }

    /// True if `user` may mutate `device`: no effective lock, or `user` owns it.
    pub fn can_modify(&self, device: &GlobalId, user: &str) -> bool {
        match self.effective_owner(device) {
            Some(owner) => owner == user,
            None => true,
        }
    }

    pub fn lock(&mut self, device: &GlobalId, user: &str) -> Result<(), LockError> {
        if let Some(owner) = self.effective_owner(device) {
            if owner != user {
                return Err(LockError::LockedByOther {
                    device: device.clone(),
                    owner: owner.to_string(),
                });
            }
        }

        if let Some((locked, owner)) = self
            .locks
            .iter()
            .find(|(locked, owner)| device.is_ancestor_of(locked) && owner.as_str() != user)
        {
            return Err(LockError::LockedByOther {
                device: locked.clone(),
                owner: owner.clone(),
            });
        }

        // descendant locks of the same user are subsumed by this one
        self.locks.retain(|locked, _| !device.is_ancestor_of(locked));
        self.locks.insert(device.clone(), user.to_string());
        info!("device {} locked by {}", device, user);

        Ok(())
    }

    pub fn unlock(&mut self, device: &GlobalId, user: &str) -> Result<(), LockError> {
        let Some((locked, owner)) = self.effective_lock(device) else {
            return Ok(());
        };

        if owner != user {
            return Err(LockError::NotOwner {
                device: device.clone(),
                user: user.to_string(),
                owner: owner.to_string(),
            });
        }

        if locked != device {
            return Err(LockError::LockedThroughParent {
                device: device.clone(),
                ancestor: locked.clone(),
            });
        }

        self.locks.remove(device);
        info!("device {} unlocked by {}", device, user);

        Ok(())
    }

    /// Device whose subtree a force unlock of `device` clears: the closest
    /// locked ancestor if the device is only locked through it, else the
    /// device itself.
    pub fn force_unlock_scope(&self, device: &GlobalId) -> GlobalId {
        match self.effective_lock(device) {
            Some((locked, _)) => locked.clone(),
            None => device.clone(),
        }
    }

    /// Clears every lock on the force unlock scope of `device` or below it,
    /// whoever owns it. Returns false if there was nothing to clear.
    pub fn force_unlock(&mut self, device: &GlobalId) -> bool {
        let scope = self.force_unlock_scope(device);
        let before = self.locks.len();
        self.locks
            .retain(|locked, _| !scope.is_ancestor_or_self_of(locked));
        let cleared = before != self.locks.len();
        if cleared {
            info!("device {} force-unlocked", scope);
        }
        cleared
    }

    /// Stamps every device of a snapshot with its current lock state.
    pub fn annotate(&self, snapshot: &mut SerializedComponent) {
        snapshot.visit_mut(&mut |node: &mut SerializedComponent| {
            if node.kind.is_device() {
                let locked = self.is_locked(&node.global_id);
                node.fields.insert(fields::LOCKED.to_string(), Value::Bool(locked));
            }
        });
    }

    /// Drops locks of devices that no longer exist.
    pub fn retain_existing<F: Fn(&GlobalId) -> bool>(&mut self, exists: F) {
        self.locks.retain(|locked, _| exists(locked));
    }
}

impl Default for DeviceLockManager {
    fn default() -> Self {
        Self::new()
    }
}
