//! Generic utility primitives with zero domain knowledge.
//!
//! - `io` - File I/O with consistent error handling
//! - `names` - Identifier case variants (class, property, constant, file)
//! - `patch` - Positional text changes applied to source strings
//! - `paths` - POSIX-style path joining and relative paths
//! - `validation` - Input validation helpers

pub mod io;
pub mod names;
pub mod patch;
pub mod paths;
pub mod validation;
