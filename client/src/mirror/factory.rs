use std::collections::HashMap;

use log::debug;

use confproto_shared::{ComponentKind, GlobalId, SerializedComponent};

use super::{
    MirrorCore, MirroredChannel, MirroredComponent, MirroredDevice, MirroredFolder,
    MirroredFunctionBlock, MirroredInputPort, MirroredObject, MirroredSignal,
};

/// Builds a mirror of a given kind around an already populated core.
pub type MirrorConstructor = fn(MirrorCore) -> Box<dyn MirroredObject>;

fn generic_mirror(core: MirrorCore) -> Box<dyn MirroredObject> {
    Box::new(MirroredComponent::new(core))
}

/// Maps component type tags to mirror constructors.
pub struct MirrorFactory {
    constructors: HashMap<String, MirrorConstructor>,
}

impl MirrorFactory {
    /// A factory knowing every built-in component kind.
    pub fn new() -> Self {
        let mut factory = Self {
            constructors: HashMap::new(),
        };
        factory.register(&ComponentKind::Device, |core| Box::new(MirroredDevice::new(core)));
        factory.register(&ComponentKind::FunctionBlock, |core| {
            Box::new(MirroredFunctionBlock::new(core))
        });
        factory.register(&ComponentKind::Channel, |core| Box::new(MirroredChannel::new(core)));
        factory.register(&ComponentKind::Signal, |core| Box::new(MirroredSignal::new(core)));
        factory.register(&ComponentKind::InputPort, |core| {
            Box::new(MirroredInputPort::new(core))
        });
        factory.register(&ComponentKind::Folder, |core| Box::new(MirroredFolder::new(core)));
        factory.register(&ComponentKind::Component, generic_mirror);
        factory
    }

    /// Registers (or replaces) the constructor used for `kind`.
    pub fn register(&mut self, kind: &ComponentKind, constructor: MirrorConstructor) {
        self.constructors.insert(kind.tag().to_string(), constructor);
    }

    pub fn is_registered(&self, kind: &ComponentKind) -> bool {
        self.constructors.contains_key(kind.tag())
    }

    /// Recursively builds a mirror of `snapshot` below `local_parent`.
    pub fn build(
        &self,
        snapshot: &SerializedComponent,
        local_parent: &GlobalId,
    ) -> Box<dyn MirroredObject> {
        let core = MirrorCore::from_snapshot(snapshot, local_parent);
        let constructor = match self.constructors.get(snapshot.kind.tag()) {
            Some(constructor) => *constructor,
            None => {
                debug!(
                    "no mirror registered for {}; mirroring {} generically",
                    snapshot.kind, snapshot.global_id
                );
                generic_mirror
            }
        };

        let mut mirror = constructor(core);
        let local_id = mirror.global_id().clone();
        for child in &snapshot.children {
            let child_mirror = self.build(child, &local_id);
            mirror.core_mut().children.push(child_mirror);
        }
        mirror.apply_fields();
        mirror
    }
}

impl Default for MirrorFactory {
    fn default() -> Self {
        Self::new()
    }
}
