use alloy_primitives::{Address, U256};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct Asset {
    pub address: Address,
    pub decimals: u8,
    pub symbol: &'static str,
    pub name: &'static str,
    pub logo: &'static str,
    /// Whole tokens minted per faucet request.
    pub faucet_units: u64,
}

impl Asset {
    pub fn faucet_amount(&self) -> U256 {
        U256::from(self.faucet_units) * U256::from(10u64).pow(U256::from(self.decimals))
    }
}

/// An Aave pool token and the asset it wraps. Pool tokens share the asset's decimals.
#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pool {
    pub address: Address,
    pub asset: &'static Asset,
    pub symbol: &'static str,
}

impl Pool {
    pub fn decimals(&self) -> u8 {
        self.asset.decimals
    }
}

#[derive(Serialize, Deserialize, Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    #[default]
    Deposit,
    Withdraw,
}

impl Direction {
    pub fn is_deposit(self) -> bool {
        self == Direction::Deposit
    }

    /// The token the user hands to the wrapper.
    pub fn spent_token(self, pool: &Pool) -> Address {
        match self {
            Direction::Deposit => pool.asset.address,
            Direction::Withdraw => pool.address,
        }
    }

    pub fn spent_symbol(self, pool: &Pool) -> &'static str {
        match self {
            Direction::Deposit => pool.asset.symbol,
            Direction::Withdraw => pool.symbol,
        }
    }

    /// The token the user receives when redeeming.
    pub fn redeemed_symbol(self, pool: &Pool) -> &'static str {
        match self {
            Direction::Deposit => pool.symbol,
            Direction::Withdraw => pool.asset.symbol,
        }
    }

    pub fn verb(self) -> &'static str {
        match self {
            Direction::Deposit => "deposit",
            Direction::Withdraw => "withdraw",
        }
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum ModalTab {
    #[default]
    Wrap,
    Redeem,
}

/// Raw token balances of the connected account. A missing entry means "not loaded yet".
pub type WalletBalances = HashMap<Address, U256>;

#[derive(Serialize, Deserialize, Debug, Default, Clone, PartialEq)]
pub struct EpochEntry {
    pub current_epoch: u64,
    /// Unix seconds.
    pub last_wrapped_time: u64,
    pub has_request: bool,
    /// Handle of the encrypted amount the user has queued for the current epoch.
    pub pending_user_request: U256,
}

/// Keyed by the spent token: the asset for deposits, the pool token for withdrawals.
pub type EpochInfo = HashMap<Address, EpochEntry>;

/// Encrypted amounts still claimable, with the epoch each one belongs to.
#[derive(Serialize, Deserialize, Debug, Default, Clone, PartialEq)]
pub struct RedeemableEntry {
    pub amounts: Vec<U256>,
    pub epochs: Vec<u64>,
}

impl RedeemableEntry {
    pub fn is_empty(&self) -> bool {
        self.amounts.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (u64, U256)> + '_ {
        self.epochs.iter().copied().zip(self.amounts.iter().copied())
    }
}

pub type RedeemableInfo = HashMap<Address, RedeemableEntry>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::{A_USDT, DAI, USDT};

    #[test]
    fn faucet_amount_scales_by_decimals() {
        assert_eq!(
            DAI.faucet_amount(),
            U256::from(100u64) * U256::from(10u64).pow(U256::from(18u64))
        );
        assert_eq!(USDT.faucet_amount(), U256::from(100_000_000u64));
    }

    #[test]
    fn direction_selects_tokens() {
        let pool = &A_USDT;

        assert_eq!(Direction::Deposit.spent_token(pool), USDT.address);
        assert_eq!(Direction::Withdraw.spent_token(pool), pool.address);
        assert_eq!(Direction::Deposit.spent_symbol(pool), "USDT");
        assert_eq!(Direction::Deposit.redeemed_symbol(pool), "aUSDT");
        assert_eq!(Direction::Withdraw.spent_symbol(pool), "aUSDT");
        assert_eq!(Direction::Withdraw.redeemed_symbol(pool), "USDT");
    }
}
