//! Application layer: the single-writer scene store and the serializer.

pub mod serializer;
pub mod store;
