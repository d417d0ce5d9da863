//! # annota-api
//!
//! HTTP server for the annota notes backend: CRUD for notes and categories,
//! plus on-demand enrichment endpoints backed by the pipeline in
//! `annota-enrich`. The router is built here so integration tests can drive
//! it in-process; the binary in `main.rs` wires configuration and serves it.

pub mod error;
pub mod routes;
pub mod state;

pub use error::ApiError;
pub use routes::build_router;
pub use state::{rate_limit_quota, AppState};
