use crate::types::{Asset, Pool};
use alloy_primitives::{address, Address};
use std::time::Duration;
use wrapper_sdk::constants::{
    addrs::{get_fhevm_contracts, FhevmContracts},
    ChainId,
};

// Compile-time network selection
#[cfg(feature = "testnet")]
pub const CHAIN: ChainId = ChainId::Sepolia;

#[cfg(not(feature = "testnet"))]
compile_error!("no network selected, enable the `testnet` feature");

/// How often balances, epochs and redeemable amounts are re-read.
pub const REFRESH_INTERVAL: Duration = Duration::from_secs(10);

/// Seconds that must pass after a wrap before the next one is accepted.
pub const MIN_WRAP_THRESHOLD: u64 = 60;

/// Blocks to wait for before a transaction counts as done.
pub const CONFIRMATIONS: u64 = 1;

/// How long finished toasts stay on screen.
pub const TOAST_AUTO_CLOSE: Duration = Duration::from_secs(5);

pub const WALLET_CONNECTED_KEY: &str = "is_wallet_connected";

pub mod contracts {
    use super::CHAIN;
    use crate::support::{IFaucet, IMulticall, IWrapper};
    use multicall::MULTICALL3;
    use std::sync::LazyLock;
    use wrapper_sdk::constants::addrs::get_deployed_contracts;

    pub static WRAPPER: LazyLock<IWrapper> =
        LazyLock::new(|| IWrapper(get_deployed_contracts(CHAIN).wrapper));

    pub static FAUCET: LazyLock<IFaucet> =
        LazyLock::new(|| IFaucet(get_deployed_contracts(CHAIN).faucet));

    pub static MULTICALL: IMulticall = IMulticall(MULTICALL3);
}

pub fn fhevm_contracts() -> &'static FhevmContracts {
    get_fhevm_contracts(CHAIN)
}

pub static DAI: Asset = Asset {
    address: address!("0xD22bb3c93cC785E28c5597DCc6852E1D100A1B70"),
    decimals: 18,
    symbol: "DAI",
    name: "Dai Stablecoin",
    logo: "/assets/tokens/dai.svg",
    faucet_units: 100,
};

pub static USDT: Asset = Asset {
    address: address!("0xd4937EbEe26Ae28161B2E6A4255657D50c4Ce5E9"),
    decimals: 6,
    symbol: "USDT",
    name: "Tether USD",
    logo: "/assets/tokens/usdt.svg",
    faucet_units: 100,
};

pub static USDC: Asset = Asset {
    address: address!("0x5A3857Bd31d998dCAb13487a0788AeFf95397508"),
    decimals: 6,
    symbol: "USDC",
    name: "USDC Coin",
    logo: "/assets/tokens/usdc.svg",
    faucet_units: 100,
};

pub static A_DAI: Pool = Pool {
    address: address!("0x09b796967443c3b0f0cae1dBD322D103C8d34dc5"),
    asset: &DAI,
    symbol: "aDAI",
};

pub static A_USDT: Pool = Pool {
    address: address!("0x1A72C502796429189c408Dc64AC494F583D30b77"),
    asset: &USDT,
    symbol: "aUSDT",
};

pub static A_USDC: Pool = Pool {
    address: address!("0x5941aa4D17b8ebE9A7644a1EF4adf0c7E384cF82"),
    asset: &USDC,
    symbol: "aUSDC",
};

pub static ASSETS: [&Asset; 3] = [&DAI, &USDT, &USDC];

pub static POOLS: [&Pool; 3] = [&A_DAI, &A_USDT, &A_USDC];

/// Every token the dashboard reads: each pool token followed by its asset.
pub fn tracked_tokens() -> Vec<Address> {
    POOLS
        .iter()
        .flat_map(|pool| [pool.address, pool.asset.address])
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tracked_tokens_pair_pools_with_assets() {
        let tokens = tracked_tokens();

        assert_eq!(tokens.len(), 6);
        assert_eq!(tokens[0], A_DAI.address);
        assert_eq!(tokens[1], DAI.address);
        assert_eq!(tokens[4], A_USDC.address);
        assert_eq!(tokens[5], USDC.address);
    }

    #[test]
    fn sepolia_is_selected() {
        assert_eq!(CHAIN.id(), 11_155_111);
        assert_eq!(CHAIN.explorer_url(), "https://sepolia.etherscan.io");
        assert_eq!(
            **contracts::WRAPPER,
            address!("0x6CB1fcFFF4757B8b7B0BCFE25f43F6b4626FDAfF")
        );
    }
}
