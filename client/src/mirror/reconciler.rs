//! In-place reconciliation of a mirrored subtree with a server snapshot.

use std::collections::HashSet;

use log::debug;

use confproto_shared::SerializedComponent;

use super::{MirrorFactory, MirroredObject};

/// Brings `mirror` in line with `snapshot`:
/// children absent from the snapshot are dropped unless they are default
/// components, same-id children are reconciled recursively, new ones are
/// built, and the node's own attributes, properties and fields are replaced.
/// Children end up in snapshot order, followed by retained defaults.
pub(crate) fn reconcile<M: MirroredObject + ?Sized>(
    mirror: &mut M,
    snapshot: &SerializedComponent,
    factory: &MirrorFactory,
) {
    let core = mirror.core_mut();

    let wanted: HashSet<&str> = snapshot
        .children
        .iter()
        .map(|child| child.local_id.as_str())
        .collect();

    let mut existing = std::mem::take(&mut core.children);
    existing.retain(|child| {
        let keep = child.core().default_component || wanted.contains(child.local_id());
        if !keep {
            debug!("{} no longer on server; removing mirror", child.global_id());
        }
        keep
    });

    let mut children = Vec::with_capacity(snapshot.children.len() + existing.len());
    for child_snapshot in &snapshot.children {
        let position = existing
            .iter()
            .position(|child| child.local_id() == child_snapshot.local_id);

        let child = match position {
            Some(index) if existing[index].kind() == &child_snapshot.kind => {
                let mut child = existing.remove(index);
                child.remote_update(child_snapshot, factory);
                child
            }
            Some(index) => {
                // same id, different kind: the old mirror cannot represent it
                existing.remove(index);
                factory.build(child_snapshot, &core.global_id)
            }
            None => factory.build(child_snapshot, &core.global_id),
        };
        children.push(child);
    }
    children.extend(existing);
    core.children = children;

    core.remote_global_id = snapshot.global_id.clone();
    core.default_component = snapshot.default_component;
    core.attributes = snapshot.attributes.clone();
    core.properties = snapshot.properties.clone();
    core.fields = snapshot.fields.clone();

    mirror.apply_fields();
}
