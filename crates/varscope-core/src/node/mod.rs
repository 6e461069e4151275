//! Snapshot tree model and its JSON wire form.

pub mod model;
mod wire;

pub use model::{
    FieldSlot, Metatype, Node, NodeValue, Pair, ValueShape, CHANNEL_PLACEHOLDER,
    COMPLEX_PLACEHOLDER, DEPTH_PLACEHOLDER, DEPTH_TYPE_NAME, FUNCTION_PLACEHOLDER,
    INTERFACE_PLACEHOLDER, NIL_TYPE_NAME, NULL_PLACEHOLDER, UNEXPORTED_PLACEHOLDER,
    VISITED_PLACEHOLDER,
};
