use super::{call_typed, Provider};
use crate::{types::Direction, Error};
use alloy_primitives::{Address, U256};
use alloy_sol_types::SolCall;
use eip1193::TransactionRequest;
use multicall::{msg_aggregate3, parse_aggregate3_exact, BatchItemResponse, Call3};
use serde::{Deserialize, Serialize};
use std::ops::Deref;
use tracing::debug;
use wrapper_sdk::contract_interfaces::{erc20, faucet, wrapper};

fn transaction<C: SolCall>(from: Address, to: Address, call: &C) -> TransactionRequest {
    TransactionRequest {
        from,
        to,
        data: call.abi_encode().into(),
    }
}

/// A thin wrapper around the Multicall3 address.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq)]
pub struct IMulticall(pub Address);

impl Deref for IMulticall {
    type Target = Address;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl IMulticall {
    /// Runs every call in one `eth_call`. Results come back in call order.
    pub async fn aggregate3<P: Provider + ?Sized>(
        &self,
        provider: &P,
        calls: Vec<Call3>,
    ) -> Result<Vec<BatchItemResponse>, Error> {
        if calls.is_empty() {
            return Ok(vec![]);
        }

        let expected = calls.len();
        let response = provider.call(self.0, msg_aggregate3(calls)).await?;
        let items = parse_aggregate3_exact(&response, expected)?;
        debug!("multicall returned {} items", items.len());

        Ok(items)
    }
}

/// A thin wrapper around an ERC-20 token address.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq)]
pub struct IErc20(pub Address);

impl Deref for IErc20 {
    type Target = Address;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl IErc20 {
    pub async fn allowance<P: Provider + ?Sized>(
        &self,
        provider: &P,
        owner: Address,
        spender: Address,
    ) -> Result<U256, Error> {
        call_typed(provider, self.0, &erc20::allowanceCall { owner, spender }).await
    }

    pub fn approve(&self, from: Address, spender: Address, amount: U256) -> TransactionRequest {
        transaction(from, self.0, &erc20::approveCall { spender, amount })
    }
}

/// A thin wrapper around the wrapper contract address.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq)]
pub struct IWrapper(pub Address);

impl Deref for IWrapper {
    type Target = Address;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl IWrapper {
    pub async fn get_wrapper_info<P: Provider + ?Sized>(
        &self,
        provider: &P,
        tokens: Vec<Address>,
        user: Address,
    ) -> Result<wrapper::getWrapperInfoReturn, Error> {
        call_typed(provider, self.0, &wrapper::getWrapperInfoCall { tokens, user }).await
    }

    pub fn wrap_request(
        &self,
        from: Address,
        asset: Address,
        amount: U256,
        direction: Direction,
    ) -> TransactionRequest {
        let call = wrapper::wrapRequestCall {
            token: asset,
            amount,
            isDeposit: direction.is_deposit(),
        };
        transaction(from, self.0, &call)
    }

    pub fn wrap(&self, from: Address, asset: Address, direction: Direction) -> TransactionRequest {
        let call = wrapper::wrapCall {
            token: asset,
            isDeposit: direction.is_deposit(),
        };
        transaction(from, self.0, &call)
    }

    pub fn redeem(
        &self,
        from: Address,
        asset: Address,
        epoch: u64,
        direction: Direction,
    ) -> TransactionRequest {
        let call = wrapper::redeemCall {
            token: asset,
            epoch: U256::from(epoch),
            isDeposit: direction.is_deposit(),
        };
        transaction(from, self.0, &call)
    }
}

/// A thin wrapper around the test token faucet address.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq)]
pub struct IFaucet(pub Address);

impl Deref for IFaucet {
    type Target = Address;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl IFaucet {
    pub fn mint(&self, from: Address, token: Address, amount: U256) -> TransactionRequest {
        transaction(
            from,
            self.0,
            &faucet::mintCall {
                token,
                to: from,
                amount,
            },
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::address;

    const USER: Address = address!("0x00000000000000000000000000000000000000aa");
    const WRAPPER: IWrapper = IWrapper(address!("0x0000000000000000000000000000000000000001"));
    const ASSET: Address = address!("0x0000000000000000000000000000000000000002");

    #[test]
    fn wrap_request_targets_wrapper() {
        let request = WRAPPER.wrap_request(USER, ASSET, U256::from(5u64), Direction::Withdraw);

        assert_eq!(request.from, USER);
        assert_eq!(request.to, *WRAPPER);

        let call = wrapper::wrapRequestCall::abi_decode(&request.data).unwrap();
        assert_eq!(call.token, ASSET);
        assert_eq!(call.amount, U256::from(5u64));
        assert!(!call.isDeposit);
    }

    #[test]
    fn wrap_passes_asset_then_direction() {
        let request = WRAPPER.wrap(USER, ASSET, Direction::Deposit);
        let call = wrapper::wrapCall::abi_decode(&request.data).unwrap();

        assert_eq!(call.token, ASSET);
        assert!(call.isDeposit);
    }

    #[test]
    fn redeem_encodes_epoch() {
        let request = WRAPPER.redeem(USER, ASSET, 7, Direction::Deposit);
        let call = wrapper::redeemCall::abi_decode(&request.data).unwrap();

        assert_eq!(call.epoch, U256::from(7u64));
        assert!(call.isDeposit);
    }

    #[test]
    fn faucet_mints_to_sender() {
        let contract = IFaucet(address!("0x0000000000000000000000000000000000000003"));
        let request = contract.mint(USER, ASSET, U256::from(100u64));
        let call = faucet::mintCall::abi_decode(&request.data).unwrap();

        assert_eq!(request.to, *contract);
        assert_eq!(call.token, ASSET);
        assert_eq!(call.to, USER);
        assert_eq!(call.amount, U256::from(100u64));
    }
}
