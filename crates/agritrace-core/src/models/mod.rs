//! Data models for the admin client toolkit
//!
//! Wire types for the admin backend API and the storage subsystem,
//! organized by domain. The backend speaks camelCase JSON, so every wire
//! struct carries a `rename_all = "camelCase"` attribute.

mod company;
mod document;
mod pagination;
mod product;
mod storage;

// Re-export all models for convenient imports
pub use company::*;
pub use document::*;
pub use pagination::*;
pub use product::*;
pub use storage::*;
