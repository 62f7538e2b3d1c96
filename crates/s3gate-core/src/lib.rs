//! Endpoint configuration, bucket registry, and in-memory S3 state for s3gate.
//!
//! # Architecture
//!
//! ```text
//! ServerConfig (env / builder)
//!        |
//!        v
//! EndpointConfig ----reads----> BucketRegistry (trait)
//!                                     ^
//!                                     | implements
//! S3Provider ----owns----> S3ServiceState (buckets, objects)
//! ```
//!
//! The HTTP layer (`s3gate-http`) only sees [`EndpointConfig`]; the registry
//! behind it is the live bucket table owned by [`S3ServiceState`].

pub mod config;
pub mod endpoint;
pub mod error;
pub mod ops;
pub mod provider;
pub mod registry;
pub mod state;
pub mod utils;
pub mod validation;

pub use config::{BucketSeed, ServerConfig};
pub use endpoint::EndpointConfig;
pub use error::S3ServiceError;
pub use provider::S3Provider;
pub use registry::{BucketRegistry, StaticBucketRegistry};
pub use state::S3ServiceState;
