//! storage/mod.rs
//! Path provider and directory listing.
//!
//! Platform-specific resolution of the save directory stays outside the crate;
//! the store is handed a provider that maps logical names onto paths under a root.

pub mod provider;
pub mod listing;

pub use provider::*;
pub use listing::*;
