pub mod walk;

pub use walk::{walk, DirectoryEntry, NodeKind, Visitor};
