//! Posters application library
//!
//! Feature modules of the posters service and the bootstrap shared by the
//! `posters-app` binary and the `posters` CLI.

pub mod app;
pub mod modules;

pub use app::{open_store, serve, StoreBackend};
