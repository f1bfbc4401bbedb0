mod error;
mod factory;
mod kinds;
mod mirrored;
mod notification;
mod reconciler;
mod tree;
mod type_manager;

pub use error::MirrorError;
pub use factory::{MirrorConstructor, MirrorFactory};
pub use kinds::{
    MirroredChannel, MirroredComponent, MirroredDevice, MirroredFolder, MirroredFunctionBlock,
    MirroredInputPort, MirroredSignal,
};
pub use mirrored::{MirrorCore, MirroredObject};
pub use tree::MirrorTree;
pub use type_manager::TypeManagerMirror;
