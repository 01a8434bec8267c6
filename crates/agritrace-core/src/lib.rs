//! AgriTrace Core Library
//!
//! Shared configuration and data models for the AgriTrace admin client
//! toolkit. The API client and storage client crates build on the types
//! defined here.
//!
//! # Storage path format
//!
//! Files live in a single storage container; entities reference them by a
//! container-relative path such as `products/{unique-name}.jpg`. Paths never
//! carry the container prefix or host and are always forward-slash
//! separated. Unique-name generation is centralized in the storage client so
//! every upload pathway stays consistent.

pub mod config;
pub mod models;

// Re-export commonly used types
pub use config::AdminConfig;
