//! Core types for ShimStack
//!
//! This crate provides the pieces shared by every emulated store: the
//! service error codes, entity kinds, resource-locator synthesis and the
//! clock used for record timestamps.

pub mod account;
pub mod clock;
pub mod error;

pub use account::{AccountRegion, ResourceArn, DEFAULT_ACCOUNT_ID, DEFAULT_REGION};
pub use error::{EntityKind, ErrorCode};
