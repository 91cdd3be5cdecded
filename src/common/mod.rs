//! Common types and utilities shared across pagesim.
//!
//! This module contains fundamental primitives used throughout the codebase:
//! - Configuration constants and policy parameters
//! - Error types
//! - Identifiers (PageId, TenantId, TenantPage) and the `PageKey` bound

pub mod config;
pub mod error;
mod page_id;

pub use config::PolicyConfig;
pub use error::{Error, Result};
pub use page_id::{PageId, PageKey, TenantId, TenantPage};
