use std::collections::HashMap;

use log::debug;

use confproto_shared::{
    event_params, CoreEvent, CoreEventId, GlobalId, SerializedComponent, Value,
};

use super::{MirrorError, MirrorFactory, MirroredObject};

/// The client-side copy of a server's component tree, rooted below a local
/// parent id.
pub struct MirrorTree {
    root: Box<dyn MirroredObject>,
}

impl MirrorTree {
    pub fn build(
        snapshot: &SerializedComponent,
        local_parent: &GlobalId,
        factory: &MirrorFactory,
    ) -> Self {
        let mut tree = Self {
            root: factory.build(snapshot, local_parent),
        };
        tree.wire_references();
        tree
    }

    pub fn root(&self) -> &dyn MirroredObject {
        self.root.as_ref()
    }

    pub fn serialize(&self) -> SerializedComponent {
        self.root.serialize()
    }

    // Lookup

    /// Finds a mirror by its local global id.
    pub fn find(&self, local: &GlobalId) -> Option<&dyn MirroredObject> {
        let relative = local.relative_to(self.root.global_id())?;
        let mut current: &dyn MirroredObject = self.root.as_ref();
        for segment in relative {
            current = current.core().child(segment)?;
        }
        Some(current)
    }

    pub fn find_mut(&mut self, local: &GlobalId) -> Option<&mut dyn MirroredObject> {
        let relative = local.relative_to(self.root.global_id())?;
        let mut current: &mut dyn MirroredObject = self.root.as_mut();
        for segment in relative {
            current = current.core_mut().child_mut(segment)?.as_mut();
        }
        Some(current)
    }

    /// Local id of the mirror of a server component, if it is mirrored.
    pub fn to_local(&self, remote: &GlobalId) -> Option<GlobalId> {
        let local = remote.rebase(self.root.remote_global_id(), self.root.global_id())?;
        self.find(&local).map(|mirror| mirror.global_id().clone())
    }

    pub fn to_remote(&self, local: &GlobalId) -> Option<GlobalId> {
        self.find(local).map(|mirror| mirror.remote_global_id().clone())
    }

    pub fn find_remote(&self, remote: &GlobalId) -> Option<&dyn MirroredObject> {
        let local = remote.rebase(self.root.remote_global_id(), self.root.global_id())?;
        self.find(&local)
    }

    // Sync

    /// Reconciles the whole mirror with a fresh server snapshot.
    pub fn remote_update(&mut self, snapshot: &SerializedComponent, factory: &MirrorFactory) {
        self.root.remote_update(snapshot, factory);
        self.wire_references();
    }

    /// Places a server snapshot below its parent's mirror, or reconciles the
    /// existing mirror of the same id. Returns the mirror's local id.
    pub fn graft(
        &mut self,
        snapshot: &SerializedComponent,
        factory: &MirrorFactory,
    ) -> Result<GlobalId, MirrorError> {
        let remote_parent = snapshot
            .global_id
            .parent()
            .ok_or_else(|| MirrorError::TargetNotFound(snapshot.global_id.clone()))?;
        let local_parent = self
            .to_local(&remote_parent)
            .ok_or(MirrorError::TargetNotFound(remote_parent))?;

        let event = CoreEvent::new(CoreEventId::ComponentAdded)
            .with_param(event_params::COMPONENT, snapshot.to_value());
        if let Some(parent) = self.find_mut(&local_parent) {
            parent.handle_remote_core_event(&event, &event, None, factory)?;
        }
        self.wire_references();

        Ok(local_parent.child(&snapshot.local_id))
    }

    /// Applies a relayed event targeted at the server component `remote` and
    /// returns the local target together with the event as local observers
    /// see it.
    pub fn process(
        &mut self,
        remote: &GlobalId,
        event: &CoreEvent,
        path: Option<&str>,
        factory: &MirrorFactory,
    ) -> Result<(GlobalId, CoreEvent), MirrorError> {
        let local = self
            .to_local(remote)
            .ok_or_else(|| MirrorError::TargetNotFound(remote.clone()))?;
        let resolved = self.resolve_references(event);

        let mirror = self
            .find_mut(&local)
            .ok_or_else(|| MirrorError::TargetNotFound(remote.clone()))?;
        mirror.handle_remote_core_event(event, &resolved, path, factory)?;

        if event.id.is_structural() || event.id == CoreEventId::ComponentUpdateEnd {
            self.wire_references();
        }

        Ok((local, resolved))
    }

    /// Copy of `event` with every component reference rewritten from a
    /// server id to the local id of its mirror. References that do not
    /// resolve are dropped.
    pub fn resolve_references(&self, event: &CoreEvent) -> CoreEvent {
        let mut resolved = event.clone();
        for name in event_params::REFERENCE_PARAMS {
            let Some(value) = resolved.params.get(name) else {
                continue;
            };
            let replacement = match value {
                Value::String(remote) => match self.to_local(&GlobalId::new(remote.as_str())) {
                    Some(local) => Some(Value::String(local.to_string())),
                    None => {
                        debug!("dropping unresolved reference {}={} in {}", name, remote, event.name);
                        None
                    }
                },
                Value::Array(items) if items.iter().all(Value::is_string) => {
                    let locals = items
                        .iter()
                        .filter_map(Value::as_str)
                        .filter_map(|remote| {
                            let local = self.to_local(&GlobalId::new(remote));
                            if local.is_none() {
                                debug!("dropping unresolved reference {} in {}", remote, event.name);
                            }
                            local
                        })
                        .map(|local| Value::String(local.to_string()))
                        .collect();
                    Some(Value::Array(locals))
                }
                _ => continue,
            };
            match replacement {
                Some(value) => {
                    resolved.params.insert(name.to_string(), value);
                }
                None => {
                    resolved.params.remove(name);
                }
            }
        }
        resolved
    }

    /// Re-points every kind-held reference at the current mirrors.
    pub fn wire_references(&mut self) {
        let mut remote_to_local = HashMap::new();
        collect_ids(self.root.as_ref(), &mut remote_to_local);
        let resolve = |remote: &GlobalId| remote_to_local.get(remote).cloned();
        wire(self.root.as_mut(), &resolve);
    }
}

fn collect_ids(mirror: &dyn MirroredObject, output: &mut HashMap<GlobalId, GlobalId>) {
    output.insert(mirror.remote_global_id().clone(), mirror.global_id().clone());
    for child in mirror.children() {
        collect_ids(child.as_ref(), output);
    }
}

fn wire(mirror: &mut dyn MirroredObject, resolve: &dyn Fn(&GlobalId) -> Option<GlobalId>) {
    mirror.wire_references(resolve);
    for child in mirror.core_mut().children.iter_mut() {
        wire(child.as_mut(), resolve);
    }
}
