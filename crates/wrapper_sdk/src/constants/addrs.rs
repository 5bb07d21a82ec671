use super::ChainId;
use alloy_primitives::{address, Address};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeployedContracts {
    pub wrapper: Address,
    pub faucet: Address,
}

/// Coprocessor contracts the FHE gateway needs to know about.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FhevmContracts {
    pub gateway_url: &'static str,
    pub kms_verifier: Address,
    pub acl: Address,
}

static SEPOLIA_CONTRACTS: DeployedContracts = DeployedContracts {
    wrapper: address!("0x6CB1fcFFF4757B8b7B0BCFE25f43F6b4626FDAfF"),
    faucet: address!("0x1A2Cb6A80e1357037a1EAc98a5a68D9CcdF69040"),
};

static SEPOLIA_FHEVM: FhevmContracts = FhevmContracts {
    gateway_url: "https://gateway.sepolia.zama.ai",
    kms_verifier: address!("0x9D6891A6240D6130c54ae243d8005063D05fE14b"),
    acl: address!("0xFee8407e2f5e3Ee68ad77cAE98c434e637f516e5"),
};

// Chain-to-contract mapping
pub fn get_deployed_contracts(chain_id: ChainId) -> &'static DeployedContracts {
    match chain_id {
        ChainId::Sepolia => &SEPOLIA_CONTRACTS,
    }
}

pub fn get_fhevm_contracts(chain_id: ChainId) -> &'static FhevmContracts {
    match chain_id {
        ChainId::Sepolia => &SEPOLIA_FHEVM,
    }
}
