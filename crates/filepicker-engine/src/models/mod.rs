pub mod directory_entry;

pub use directory_entry::{DirectoryEntry, PARENT_ORDER};
