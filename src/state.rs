use crate::types::{EpochInfo, RedeemableInfo, WalletBalances};
use alloy_primitives::Address;
use fhevm::FhevmInstance;
use leptos::prelude::*;
use reactive_stores::Store;

#[derive(Copy, Clone, Debug)]
pub struct WalletSignals {
    pub account: RwSignal<Option<Address>>,
    pub chain_id: RwSignal<Option<u64>>,
    /// True while the wallet's connection prompt is open.
    pub connecting: RwSignal<bool>,
}

impl WalletSignals {
    pub fn new() -> Self {
        Self {
            account: RwSignal::new(None),
            chain_id: RwSignal::new(None),
            connecting: RwSignal::new(false),
        }
    }

    pub fn is_connected(&self) -> bool {
        self.account.with(Option::is_some)
    }

    pub fn clear(&self) {
        self.account.set(None);
        self.chain_id.set(None);
    }
}

/// Opens the wallet's connection prompt and remembers the choice for the next visit.
#[derive(Copy, Clone)]
pub struct ConnectWallet(pub Callback<()>);

impl Default for WalletSignals {
    fn default() -> Self {
        Self::new()
    }
}

/// Snapshots of on-chain state, each replaced as a whole by the matching refresh.
#[derive(Store, Clone, Debug, Default)]
pub struct Dashboard {
    pub balances: WalletBalances,
    pub epoch_info: EpochInfo,
    pub redeemable_info: RedeemableInfo,
}

#[derive(Copy, Clone)]
pub struct FhevmSignals {
    /// `initFhevm` only needs to succeed once per page load.
    pub initialized: RwSignal<bool>,
    pub instance: RwSignal<Option<FhevmInstance>>,
}

impl FhevmSignals {
    pub fn new() -> Self {
        Self {
            initialized: RwSignal::new(false),
            instance: RwSignal::new(None),
        }
    }
}

impl Default for FhevmSignals {
    fn default() -> Self {
        Self::new()
    }
}
