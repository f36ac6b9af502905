//! ShimStack - emulated AWS backends for connector tests
//!
//! Test code asks a [`BackendSelector`] for a client of a logical service.
//! Depending on the configured [`ExecutionMode`] it gets an in-memory
//! emulated store, a handle to a local network emulator, or a handle to the
//! real service.

pub mod config;
pub mod error;
pub mod fixtures;
pub mod selector;
pub mod service;

pub use crate::config::{ExecutionMode, Settings};
pub use crate::error::SelectorError;
pub use crate::selector::{
    Backend, BackendSelector, ClientHandle, RemoteEndpoint, Route, StaticCredentials,
};
pub use crate::service::Service;
