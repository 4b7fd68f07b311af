//! Withdrawal subsystem.
//!
//! # Data Flow
//! ```text
//! session (primary account)  ──┐
//! token reads (balance, dec) ──┼→ flow.rs (amount, gates, submission)
//! smart-wallet signer        ──┘        ↓
//!                               view.rs (form / switch-network notice)
//! ```

pub mod flow;
pub mod gateway;
pub mod view;

pub use flow::{FlowSettings, WithdrawError, WithdrawFlow, HASH_DISPLAY_WINDOW};
pub use gateway::{PortalGateway, WithdrawGateway};
pub use view::{ShellView, WithdrawView};
