use std::any::Any;

use confproto_shared::{
    ComponentKind, CoreEvent, GlobalId, ParamMap, SerializedComponent, SerializedPropertyObject,
};

use super::{notification, reconciler, MirrorError, MirrorFactory};

/// State every mirrored component carries, whatever its kind.
pub struct MirrorCore {
    pub kind: ComponentKind,
    pub local_id: String,
    /// Id within the client's own tree.
    pub global_id: GlobalId,
    /// Id of the mirrored component on the server.
    pub remote_global_id: GlobalId,
    pub default_component: bool,
    pub attributes: ParamMap,
    pub properties: SerializedPropertyObject,
    pub fields: ParamMap,
    pub children: Vec<Box<dyn MirroredObject>>,
}

impl MirrorCore {
    /// Core of a fresh mirror of `snapshot`, placed below `local_parent`.
    /// Children are not built.
    pub fn from_snapshot(snapshot: &SerializedComponent, local_parent: &GlobalId) -> Self {
        Self {
            kind: snapshot.kind.clone(),
            local_id: snapshot.local_id.clone(),
            global_id: local_parent.child(&snapshot.local_id),
            remote_global_id: snapshot.global_id.clone(),
            default_component: snapshot.default_component,
            attributes: snapshot.attributes.clone(),
            properties: snapshot.properties.clone(),
            fields: snapshot.fields.clone(),
            children: Vec::new(),
        }
    }

    pub fn child(&self, local_id: &str) -> Option<&dyn MirroredObject> {
        self.children
            .iter()
            .find(|child| child.core().local_id == local_id)
            .map(|child| child.as_ref())
    }

    pub fn child_mut(&mut self, local_id: &str) -> Option<&mut Box<dyn MirroredObject>> {
        self.children
            .iter_mut()
            .find(|child| child.core().local_id == local_id)
    }

    pub fn property_value(&self, dotted_name: &str) -> Option<&serde_json::Value> {
        self.properties.value(dotted_name)
    }
}

/// A client-side stand-in for a server component. Implemented once per
/// component kind; the shared behavior comes from [`MirrorCore`].
pub trait MirroredObject: Send {
    fn core(&self) -> &MirrorCore;

    fn core_mut(&mut self) -> &mut MirrorCore;

    fn as_any(&self) -> &dyn Any;

    /// Refreshes the kind's typed view after `core().fields` changed.
    fn apply_fields(&mut self) {}

    /// Points references held by the kind at local mirrors. `resolve` maps a
    /// remote global id to the local id of its mirror.
    fn wire_references(&mut self, _resolve: &dyn Fn(&GlobalId) -> Option<GlobalId>) {}

    /// Kind-specific event handling. `raw` carries remote ids, `resolved`
    /// carries local ones. Returns false if the kind has nothing to do with
    /// the event.
    fn handle_kind_event(&mut self, _raw: &CoreEvent, _resolved: &CoreEvent) -> bool {
        false
    }

    // Provided

    fn kind(&self) -> &ComponentKind {
        &self.core().kind
    }

    fn local_id(&self) -> &str {
        &self.core().local_id
    }

    fn global_id(&self) -> &GlobalId {
        &self.core().global_id
    }

    fn remote_global_id(&self) -> &GlobalId {
        &self.core().remote_global_id
    }

    fn children(&self) -> &[Box<dyn MirroredObject>] {
        &self.core().children
    }

    /// Snapshot of this subtree as the server would serialize it.
    fn serialize(&self) -> SerializedComponent {
        let core = self.core();
        SerializedComponent {
            kind: core.kind.clone(),
            local_id: core.local_id.clone(),
            global_id: core.remote_global_id.clone(),
            default_component: core.default_component,
            attributes: core.attributes.clone(),
            properties: core.properties.clone(),
            fields: core.fields.clone(),
            children: core.children.iter().map(|child| child.serialize()).collect(),
        }
    }

    /// Reconciles this subtree in place with a server snapshot.
    fn remote_update(&mut self, snapshot: &SerializedComponent, factory: &MirrorFactory) {
        reconciler::reconcile(self, snapshot, factory);
    }

    /// Applies a relayed core event targeted at this component, or at the
    /// nested property object at `path` when one is given.
    fn handle_remote_core_event(
        &mut self,
        raw: &CoreEvent,
        resolved: &CoreEvent,
        path: Option<&str>,
        factory: &MirrorFactory,
    ) -> Result<(), MirrorError> {
        notification::apply_core_event(self, raw, resolved, path, factory)
    }
}
