//! ERC-20 token surface.
//!
//! Only the three calls the portal needs: `balanceOf` and `decimals`
//! as reads through [`ChainClient::call`], and `transfer` as calldata
//! for the hosted signer to submit.

use alloy::primitives::{Address, Bytes, U256};
use alloy::sol;
use alloy::sol_types::SolCall;

use crate::blockchain::client::ChainClient;
use crate::blockchain::types::{ChainError, ChainResult};

sol! {
    function balanceOf(address owner) external view returns (uint256);
    function decimals() external view returns (uint8);
    function transfer(address to, uint256 amount) external returns (bool);
}

/// Reader for a single ERC-20 contract.
#[derive(Debug, Clone)]
pub struct Erc20Reader {
    client: ChainClient,
    token: Address,
}

impl Erc20Reader {
    /// Bind a reader to one token contract.
    pub fn new(client: ChainClient, token: Address) -> Self {
        Self { client, token }
    }

    /// The token contract address.
    pub fn token(&self) -> Address {
        self.token
    }

    /// Read `balanceOf(owner)`.
    pub async fn balance_of(&self, owner: Address) -> ChainResult<U256> {
        let data = balanceOfCall { owner }.abi_encode();
        let raw = self.client.call(self.token, data.into()).await?;
        balanceOfCall::abi_decode_returns(&raw)
            .map_err(|e| ChainError::BadResponse(format!("balanceOf: {}", e)))
    }

    /// Read `decimals()`.
    pub async fn decimals(&self) -> ChainResult<u8> {
        let data = decimalsCall {}.abi_encode();
        let raw = self.client.call(self.token, data.into()).await?;
        decimalsCall::abi_decode_returns(&raw)
            .map_err(|e| ChainError::BadResponse(format!("decimals: {}", e)))
    }
}

/// Encode `transfer(to, amount)` calldata for submission through the
/// hosted wallet signer.
pub fn transfer_calldata(to: Address, amount: U256) -> Bytes {
    transferCall { to, amount }.abi_encode().into()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transfer_calldata_layout() {
        let to: Address = "0x000000000000000000000000000000000000dEaD"
            .parse()
            .unwrap();
        let data = transfer_calldata(to, U256::from(1_500_000u64));

        // 4-byte selector + two 32-byte words
        assert_eq!(data.len(), 68);
        // transfer(address,uint256) selector
        assert_eq!(&data[..4], &[0xa9, 0x05, 0x9c, 0xbb]);
        // Recipient is right-aligned in the first word
        assert_eq!(&data[16..36], to.as_slice());
        // Amount is the last word
        assert_eq!(
            U256::from_be_slice(&data[36..68]),
            U256::from(1_500_000u64)
        );
    }

    #[test]
    fn test_decode_balance_word() {
        // A uint256 return is a single 32-byte word
        let word = U256::from(1_500_000u64).to_be_bytes::<32>();
        let decoded = balanceOfCall::abi_decode_returns(&word).unwrap();
        assert_eq!(decoded, U256::from(1_500_000u64));
    }
}
