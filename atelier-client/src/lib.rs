//! Atelier store client
//!
//! Row-level access to the hosted relational store, its remote procedures and
//! its serverless functions. The [`StoreClient`] trait is the single seam the
//! application services depend on; [`RemoteStoreClient`] talks to the hosted
//! backend over HTTPS, [`LocalStoreClient`] is an in-memory stand-in used by
//! tests and offline development.

pub mod client;
pub mod config;
pub mod error;

// Re-export main types
pub use client::{LocalStoreClient, OpRecord, RemoteStoreClient, StoreClient, StoreOp};
pub use config::ClientConfig;
pub use error::{ClientError, ClientResult};
