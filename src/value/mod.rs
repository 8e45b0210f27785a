//! Value module - In-memory representation of YAML/JSON documents.
//!
//! A parsed manifest is a tree of [`Value`]s whose maps keep their key order,
//! so untouched content survives a load/store cycle.

mod value;

pub use value::*;
