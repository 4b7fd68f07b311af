//! Session and linked-account types.
//!
//! The hosted provider owns the session; these types mirror the shape
//! of what it reports and encode the one local rule: which linked
//! account is "primary".

use alloy::primitives::Address;
use serde::{Deserialize, Serialize};

/// Kind of a linked account, as reported by the provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccountKind {
    /// Provider-managed embedded wallet.
    Embedded,
    /// Plain externally-owned wallet attached by the user.
    Wallet,
    /// Contract-based smart account.
    SmartWallet,
}

/// One account linked to the session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkedAccount {
    /// Account kind.
    #[serde(rename = "type")]
    pub kind: AccountKind,
    /// On-chain address of the account.
    pub address: Address,
}

/// Session state as reported by the hosted provider.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Session {
    /// Whether the provider has finished initializing the session.
    pub ready: bool,
    /// Whether a user is logged in.
    pub authenticated: bool,
    /// Accounts linked to the logged-in user.
    pub linked_accounts: Vec<LinkedAccount>,
}

impl Session {
    /// The account used for display and transactions: the smart-wallet
    /// account when one exists, otherwise the first attached wallet.
    pub fn primary_account(&self) -> Option<&LinkedAccount> {
        self.linked_accounts
            .iter()
            .find(|a| a.kind == AccountKind::SmartWallet)
            .or_else(|| {
                self.linked_accounts
                    .iter()
                    .find(|a| a.kind == AccountKind::Wallet)
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn account(kind: AccountKind, addr: &str) -> LinkedAccount {
        LinkedAccount {
            kind,
            address: addr.parse().unwrap(),
        }
    }

    const A1: &str = "0x1111111111111111111111111111111111111111";
    const A2: &str = "0x2222222222222222222222222222222222222222";
    const A3: &str = "0x3333333333333333333333333333333333333333";

    #[test]
    fn test_primary_prefers_smart_wallet() {
        let session = Session {
            ready: true,
            authenticated: true,
            linked_accounts: vec![
                account(AccountKind::Wallet, A1),
                account(AccountKind::SmartWallet, A2),
            ],
        };
        let primary = session.primary_account().unwrap();
        assert_eq!(primary.kind, AccountKind::SmartWallet);
        assert_eq!(primary.address, A2.parse::<Address>().unwrap());
    }

    #[test]
    fn test_primary_falls_back_to_first_wallet() {
        let session = Session {
            ready: true,
            authenticated: true,
            linked_accounts: vec![
                account(AccountKind::Embedded, A1),
                account(AccountKind::Wallet, A2),
                account(AccountKind::Wallet, A3),
            ],
        };
        let primary = session.primary_account().unwrap();
        assert_eq!(primary.kind, AccountKind::Wallet);
        assert_eq!(primary.address, A2.parse::<Address>().unwrap());
    }

    #[test]
    fn test_embedded_only_has_no_primary() {
        let session = Session {
            ready: true,
            authenticated: true,
            linked_accounts: vec![account(AccountKind::Embedded, A1)],
        };
        assert!(session.primary_account().is_none());
    }

    #[test]
    fn test_account_kind_wire_format() {
        let json = r#"{"type":"smart_wallet","address":"0x1111111111111111111111111111111111111111"}"#;
        let parsed: LinkedAccount = serde_json::from_str(json).unwrap();
        assert_eq!(parsed.kind, AccountKind::SmartWallet);
    }
}
