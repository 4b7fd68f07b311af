//! Session and identity subsystem.
//!
//! # Data Flow
//! ```text
//! provider config (base URL, app id, login methods)
//!     → provider.rs (REST client: session fetch, logout, tx submission)
//!     → types.rs (Session, LinkedAccount, primary-account rule)
//! ```
//!
//! Identity, wallet linking and signing all live behind the hosted
//! provider; nothing in this process ever touches key material.

pub mod provider;
pub mod types;

pub use provider::{ProviderClient, SessionError, SmartWalletSigner};
pub use types::{AccountKind, LinkedAccount, Session};
