//! Domain Status HTTP service.
//!
//! Exposes [`domain_status_lib`] over HTTP: `POST /check-domain` takes
//! `{"domains": [...]}` and answers `{"ok": true, "results": [...]}` in input
//! order. `GET /health` reports liveness.

pub mod config;
pub mod routes;

pub use config::{build_settings, Args, ServerSettings};
pub use routes::{build_router, AppState, CHECK_PATH};
