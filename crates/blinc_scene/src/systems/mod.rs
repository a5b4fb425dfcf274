//! Built-in systems

mod hierarchy;

pub use hierarchy::{parent_matrix, HierarchySystem, HIERARCHY_PRIORITY};
