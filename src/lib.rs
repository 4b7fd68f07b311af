//! Crypto withdrawal portal library.

pub mod blockchain;
pub mod chains;
pub mod config;
pub mod http;
pub mod observability;
pub mod session;
pub mod withdraw;

pub use config::PortalConfig;
pub use http::HttpServer;
pub use withdraw::WithdrawFlow;
