//! HTTP surface.
//!
//! The shell and withdrawal views of the original page become JSON
//! view models here; submission is a POST whose response window is the
//! "Processing..." state.

pub mod handlers;
pub mod server;

pub use server::{AppState, HttpServer};
