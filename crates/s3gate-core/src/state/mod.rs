//! In-memory S3 state.
//!
//! - [`S3ServiceState`] -- the bucket table, also the live bucket registry
//! - [`S3Bucket`] -- per-bucket metadata and objects
//! - [`ObjectStore`] -- sorted key storage and listing
//! - [`S3Object`] / [`Owner`] -- stored objects
//!
//! # Thread Safety
//!
//! `DashMap` guards the bucket table and `parking_lot::RwLock` guards each
//! bucket's object store.

pub(crate) mod bucket;
pub(crate) mod keystore;
pub(crate) mod object;
pub(crate) mod service;

pub use bucket::S3Bucket;
pub use keystore::{ListResult, ObjectStore};
pub use object::{Owner, S3Object};
pub use service::S3ServiceState;
