//! S3 operation handlers.
//!
//! Each submodule adds `handle_*` methods to [`crate::provider::S3Provider`].
//! Handlers are synchronous: all state is in memory and guarded by
//! `DashMap` / `parking_lot` locks that are never held across an await.

pub mod bucket;
pub mod list;
pub mod object;
