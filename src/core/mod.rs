// Public modules
pub mod artifact;
pub mod component;
pub mod defaults;
pub mod error;
pub mod manifest;
pub mod project;
pub mod tree;
pub mod versions;

// Re-export common types for convenience
pub use error::{Error, ErrorCode, Result};
pub use tree::{FsTree, MemoryTree, StagingTree, Tree};
