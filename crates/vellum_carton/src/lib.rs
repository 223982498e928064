//! Carton - The artist's toolbox for Vellum.
//!
//! Shared utilities and re-exports used by every Vellum crate, the way a carton
//! (artist's portfolio case) holds the tools the rest of the workshop reaches for.
//!
//! # Modules
//!
//! - **DOM tag configuration**: static tag tables shared by the parser and the serializer
//!
//! # Example
//!
//! ```
//! use vellum_carton::{is_void_tag, FxHashMap, String};
//!
//! let mut attrs: FxHashMap<String, String> = FxHashMap::default();
//! attrs.insert("type".into(), "text".into());
//! assert_eq!(attrs.len(), 1);
//! assert!(is_void_tag("input"));
//! ```

pub mod dom_tag_config;

// Re-export compact_str::CompactString for convenience
pub use compact_str::CompactString;
pub use compact_str::CompactString as String;
pub use compact_str::ToCompactString;

// Re-export smallvec for stack-optimized collections
pub use smallvec::{smallvec, SmallVec};

// Re-export rustc-hash for fast hash maps/sets
pub use rustc_hash::{FxHashMap, FxHashSet};

// Re-export phf for compile-time perfect hash functions
pub use phf::{phf_set, Set as PhfSet};

pub use dom_tag_config::*;
