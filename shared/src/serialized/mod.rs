mod component;
mod property_object;

pub mod fields;

pub use component::SerializedComponent;
pub use property_object::{split_dotted, SerializedPropertyObject};
