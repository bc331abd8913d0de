//! Identity Gateway Core - User Provider Dispatch
//!
//! This crate forwards user lookups, searches and group queries to a backend
//! user provider over gRPC, and resolves `uid:`-encoded user ids into the
//! provider's canonical ids.

pub mod config;
pub mod error;
pub mod gateway;
pub mod grpc;
pub mod identity;
pub mod pool;
pub mod telemetry;

// Re-export commonly used types
pub use config::Config;
pub use error::{GatewayError, Result};
pub use gateway::{Operation, UserProviderGateway};
pub use pool::{Pool, UserProvider, UserProviderResolver};
