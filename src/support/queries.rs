use super::{IMulticall, IWrapper, Provider};
use crate::{
    types::{EpochEntry, EpochInfo, RedeemableEntry, RedeemableInfo},
    Error,
};
use alloy_primitives::{Address, U256};
use multicall::call3;
use tracing::debug;
use wrapper_sdk::contract_interfaces::{erc20, wrapper};

fn to_u64(value: U256) -> Result<u64, Error> {
    u64::try_from(value).map_err(|_| Error::generic(format!("{value} does not fit in u64")))
}

/// `balanceOf(user)` for every token, in the same order as `tokens`.
pub async fn get_token_balances<P: Provider + ?Sized>(
    provider: &P,
    multicall: IMulticall,
    tokens: &[Address],
    user: Address,
) -> Result<Vec<U256>, Error> {
    let calls = tokens
        .iter()
        .map(|token| call3(*token, &erc20::balanceOfCall { account: user }))
        .collect();

    multicall
        .aggregate3(provider, calls)
        .await?
        .iter()
        .map(|item| item.decode::<erc20::balanceOfCall>().map_err(Error::from))
        .collect()
}

/// Reads the wrapper's epoch bookkeeping for `tokens`. Works with the zero address when no
/// account is connected.
pub async fn get_epoch_info<P: Provider + ?Sized>(
    provider: &P,
    wrapper: IWrapper,
    tokens: &[Address],
    user: Address,
) -> Result<EpochInfo, Error> {
    let info = wrapper
        .get_wrapper_info(provider, tokens.to_vec(), user)
        .await?;

    decode_epoch_info(tokens, info)
}

pub fn decode_epoch_info(
    tokens: &[Address],
    info: wrapper::getWrapperInfoReturn,
) -> Result<EpochInfo, Error> {
    let lengths = [
        info.currentEpochs.len(),
        info.lastWrappedTimes.len(),
        info.hasRequests.len(),
        info.pendingUserRequests.len(),
    ];
    if lengths.iter().any(|len| *len != tokens.len()) {
        return Err(Error::generic(format!(
            "getWrapperInfo returned {lengths:?} entries for {} tokens",
            tokens.len()
        )));
    }

    tokens
        .iter()
        .enumerate()
        .map(|(i, token)| {
            let entry = EpochEntry {
                current_epoch: to_u64(info.currentEpochs[i])?,
                last_wrapped_time: to_u64(info.lastWrappedTimes[i])?,
                has_request: info.hasRequests[i],
                pending_user_request: info.pendingUserRequests[i],
            };
            Ok((*token, entry))
        })
        .collect()
}

/// Finds every epoch below the current one whose request the user has not redeemed yet.
///
/// Tokens without epoch info are skipped. Tokens with epoch info always get an entry, even when
/// it is empty.
pub async fn get_redeemable_amounts<P: Provider + ?Sized>(
    provider: &P,
    multicall: IMulticall,
    wrapper: IWrapper,
    tokens: &[Address],
    epoch_info: &EpochInfo,
    user: Address,
) -> Result<RedeemableInfo, Error> {
    let mut calls = Vec::new();

    for token in tokens {
        let Some(entry) = epoch_info.get(token) else {
            continue;
        };
        for epoch in 0..entry.current_epoch {
            let epoch = U256::from(epoch);
            let token = *token;
            calls.push(call3(
                *wrapper,
                &wrapper::hasWithdrawnCall { epoch, token, user },
            ));
            calls.push(call3(
                *wrapper,
                &wrapper::pendingUserRequestsCall { epoch, token, user },
            ));
        }
    }

    if calls.is_empty() {
        return Ok(RedeemableInfo::new());
    }

    let results = multicall.aggregate3(provider, calls).await?;
    let mut results = results.iter();
    let mut redeemable = RedeemableInfo::new();

    for token in tokens {
        let Some(entry) = epoch_info.get(token) else {
            continue;
        };
        let mut amounts = RedeemableEntry::default();

        for epoch in 0..entry.current_epoch {
            let (Some(withdrawn), Some(pending)) = (results.next(), results.next()) else {
                return Err(Error::generic("multicall returned too few results"));
            };
            if withdrawn.decode::<wrapper::hasWithdrawnCall>()? {
                continue;
            }
            let amount = pending.decode::<wrapper::pendingUserRequestsCall>()?;
            if !amount.is_zero() {
                amounts.amounts.push(amount);
                amounts.epochs.push(epoch);
            }
        }

        debug!("{token}: {} redeemable epochs", amounts.epochs.len());
        redeemable.insert(*token, amounts);
    }

    Ok(redeemable)
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::{address, Bytes};
    use alloy_sol_types::SolCall;
    use async_trait::async_trait;
    use futures::executor::block_on;
    use multicall::{Call3Result, IMulticall3, MULTICALL3};
    use std::cell::Cell;

    const USER: Address = address!("0x00000000000000000000000000000000000000aa");
    const WRAPPER: IWrapper = IWrapper(address!("0x0000000000000000000000000000000000000001"));
    const TOKEN_A: Address = address!("0x000000000000000000000000000000000000000a");
    const TOKEN_B: Address = address!("0x000000000000000000000000000000000000000b");

    /// Answers single calls with `handler` and unpacks `aggregate3` batches sent to Multicall3.
    struct MockProvider<F> {
        handler: F,
        calls: Cell<usize>,
    }

    impl<F: Fn(Address, &[u8]) -> Vec<u8>> MockProvider<F> {
        fn new(handler: F) -> Self {
            Self {
                handler,
                calls: Cell::new(0),
            }
        }
    }

    #[async_trait(?Send)]
    impl<F: Fn(Address, &[u8]) -> Vec<u8>> Provider for MockProvider<F> {
        async fn call(&self, to: Address, data: Bytes) -> Result<Bytes, Error> {
            self.calls.set(self.calls.get() + 1);

            if to != MULTICALL3 {
                return Ok((self.handler)(to, &data).into());
            }

            let batch = IMulticall3::aggregate3Call::abi_decode(&data)?;
            let results: Vec<Call3Result> = batch
                .calls
                .iter()
                .map(|call| Call3Result {
                    success: true,
                    returnData: (self.handler)(call.target, &call.callData).into(),
                })
                .collect();

            Ok(IMulticall3::aggregate3Call::abi_encode_returns(&results).into())
        }
    }

    // Handles: token A has epochs 0..3, epoch 1 withdrawn, epoch 2 empty. Token B has 0..1.
    fn wrapper_state(target: Address, data: &[u8]) -> Vec<u8> {
        assert_eq!(target, *WRAPPER);

        if let Ok(call) = wrapper::hasWithdrawnCall::abi_decode(data) {
            let withdrawn = call.token == TOKEN_A && call.epoch == U256::from(1u64);
            return wrapper::hasWithdrawnCall::abi_encode_returns(&withdrawn);
        }
        if let Ok(call) = wrapper::pendingUserRequestsCall::abi_decode(data) {
            let epoch = call.epoch.to::<u64>();
            let handle = if call.token == TOKEN_A {
                [U256::from(100u64), U256::from(101u64), U256::ZERO][epoch as usize]
            } else {
                assert_eq!((call.token, epoch), (TOKEN_B, 0));
                U256::from(200u64)
            };
            return wrapper::pendingUserRequestsCall::abi_encode_returns(&handle);
        }
        panic!("unexpected call");
    }

    fn epoch(current_epoch: u64) -> EpochEntry {
        EpochEntry {
            current_epoch,
            ..Default::default()
        }
    }

    #[test]
    fn balances_come_back_in_token_order() {
        let provider = MockProvider::new(|target, data| {
            let call = erc20::balanceOfCall::abi_decode(data).unwrap();
            assert_eq!(call.account, USER);
            let balance = if target == TOKEN_A { 5u64 } else { 9u64 };
            erc20::balanceOfCall::abi_encode_returns(&U256::from(balance))
        });

        let balances = block_on(get_token_balances(
            &provider,
            IMulticall(MULTICALL3),
            &[TOKEN_B, TOKEN_A],
            USER,
        ))
        .unwrap();

        assert_eq!(balances, vec![U256::from(9u64), U256::from(5u64)]);
        assert_eq!(provider.calls.get(), 1);
    }

    #[test]
    fn epoch_info_zips_parallel_arrays() {
        let info = wrapper::getWrapperInfoReturn {
            currentEpochs: vec![U256::from(3u64), U256::from(1u64)],
            lastWrappedTimes: vec![U256::from(1_700_000_000u64), U256::ZERO],
            hasRequests: vec![true, false],
            pendingUserRequests: vec![U256::from(42u64), U256::ZERO],
        };

        let epochs = decode_epoch_info(&[TOKEN_A, TOKEN_B], info).unwrap();

        assert_eq!(
            epochs[&TOKEN_A],
            EpochEntry {
                current_epoch: 3,
                last_wrapped_time: 1_700_000_000,
                has_request: true,
                pending_user_request: U256::from(42u64),
            }
        );
        assert_eq!(epochs[&TOKEN_B].current_epoch, 1);
        assert!(!epochs[&TOKEN_B].has_request);
    }

    #[test]
    fn epoch_info_rejects_short_arrays() {
        let info = wrapper::getWrapperInfoReturn {
            currentEpochs: vec![U256::from(3u64)],
            lastWrappedTimes: vec![U256::ZERO],
            hasRequests: vec![true],
            pendingUserRequests: vec![],
        };

        assert!(decode_epoch_info(&[TOKEN_A], info).is_err());
    }

    #[test]
    fn epoch_info_is_read_in_one_call() {
        let provider = MockProvider::new(|target, data| {
            assert_eq!(target, *WRAPPER);
            let call = wrapper::getWrapperInfoCall::abi_decode(data).unwrap();
            assert_eq!(call.user, Address::ZERO);

            let n = call.tokens.len();
            wrapper::getWrapperInfoCall::abi_encode_returns(&wrapper::getWrapperInfoReturn {
                currentEpochs: vec![U256::from(2u64); n],
                lastWrappedTimes: vec![U256::ZERO; n],
                hasRequests: vec![false; n],
                pendingUserRequests: vec![U256::ZERO; n],
            })
        });

        let epochs = block_on(get_epoch_info(
            &provider,
            WRAPPER,
            &[TOKEN_A, TOKEN_B],
            Address::ZERO,
        ))
        .unwrap();

        assert_eq!(epochs.len(), 2);
        assert_eq!(epochs[&TOKEN_B].current_epoch, 2);
    }

    #[test]
    fn redeemables_skip_withdrawn_and_empty_epochs() {
        let provider = MockProvider::new(wrapper_state);
        let epoch_info = EpochInfo::from([(TOKEN_A, epoch(3)), (TOKEN_B, epoch(1))]);

        let redeemable = block_on(get_redeemable_amounts(
            &provider,
            IMulticall(MULTICALL3),
            WRAPPER,
            &[TOKEN_A, TOKEN_B],
            &epoch_info,
            USER,
        ))
        .unwrap();

        assert_eq!(redeemable[&TOKEN_A].epochs, vec![0]);
        assert_eq!(redeemable[&TOKEN_A].amounts, vec![U256::from(100u64)]);
        assert_eq!(redeemable[&TOKEN_B].epochs, vec![0]);
        assert_eq!(redeemable[&TOKEN_B].amounts, vec![U256::from(200u64)]);
        assert_eq!(provider.calls.get(), 1);
    }

    #[test]
    fn tokens_without_epochs_get_empty_entries() {
        let provider = MockProvider::new(wrapper_state);
        let epoch_info = EpochInfo::from([(TOKEN_A, epoch(3)), (TOKEN_B, epoch(0))]);

        let redeemable = block_on(get_redeemable_amounts(
            &provider,
            IMulticall(MULTICALL3),
            WRAPPER,
            &[TOKEN_A, TOKEN_B],
            &epoch_info,
            USER,
        ))
        .unwrap();

        assert!(redeemable[&TOKEN_B].is_empty());
        assert_eq!(redeemable.len(), 2);
    }

    #[test]
    fn no_calls_means_no_request() {
        let provider = MockProvider::new(|_, _| panic!("should not be called"));
        let epoch_info = EpochInfo::from([(TOKEN_A, epoch(0))]);

        let redeemable = block_on(get_redeemable_amounts(
            &provider,
            IMulticall(MULTICALL3),
            WRAPPER,
            &[TOKEN_A, TOKEN_B],
            &epoch_info,
            USER,
        ))
        .unwrap();

        assert!(redeemable.is_empty());
        assert_eq!(provider.calls.get(), 0);
    }
}
