//! Core entities and value objects.
//!
//! Nothing in here performs I/O except the existence checks used by
//! workspace discovery.

pub mod entities;
pub mod value_objects;
