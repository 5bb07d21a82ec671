use alloy_primitives::{address, Address, Bytes};
use alloy_sol_types::SolCall;
use tracing::{debug, trace};

/// Multicall3 is deployed at the same address on every EVM chain.
pub const MULTICALL3: Address = address!("0xcA11bde05977b3631167028862bE2a173976CA11");

mod types;

pub use types::{
    BatchItemResponse, BatchItemResponseStatus,
    IMulticall3::{self, Call3, Call3Result},
};

#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum Error {
    #[error("ABI error: {0}")]
    Abi(String),

    #[error("Batch item {0} failed")]
    ItemFailed(usize),

    #[error("Expected {expected} batch results, got {actual}")]
    LengthMismatch { expected: usize, actual: usize },
}

impl From<alloy_sol_types::Error> for Error {
    fn from(error: alloy_sol_types::Error) -> Self {
        Error::Abi(error.to_string())
    }
}

/// Builds a batch entry that must succeed for the whole batch to succeed.
pub fn call3<C: SolCall>(target: Address, call: &C) -> Call3 {
    Call3 {
        target,
        allowFailure: false,
        callData: call.abi_encode().into(),
    }
}

pub fn msg_aggregate3(calls: Vec<Call3>) -> Bytes {
    trace!("aggregating {} calls", calls.len());
    IMulticall3::aggregate3Call { calls }.abi_encode().into()
}

pub fn parse_aggregate3(data: &[u8]) -> Result<Vec<BatchItemResponse>, Error> {
    let results = IMulticall3::aggregate3Call::abi_decode_returns(data)?;

    debug!("aggregate3 returned {} results", results.len());

    Ok(results
        .into_iter()
        .enumerate()
        .map(|(index, result)| BatchItemResponse {
            index,
            status: if result.success {
                BatchItemResponseStatus::SUCCESS
            } else {
                BatchItemResponseStatus::ERROR
            },
            return_data: result.returnData,
        })
        .collect())
}

/// Like [`parse_aggregate3`], but checks that every call got an answer.
pub fn parse_aggregate3_exact(
    data: &[u8],
    expected: usize,
) -> Result<Vec<BatchItemResponse>, Error> {
    let items = parse_aggregate3(data)?;
    if items.len() != expected {
        return Err(Error::LengthMismatch {
            expected,
            actual: items.len(),
        });
    }
    Ok(items)
}

impl BatchItemResponse {
    pub fn decode<C: SolCall>(&self) -> Result<C::Return, Error> {
        if self.status == BatchItemResponseStatus::ERROR {
            return Err(Error::ItemFailed(self.index));
        }
        C::abi_decode_returns(&self.return_data).map_err(Into::into)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::{hex, U256};
    use alloy_sol_types::sol;

    sol! {
        function balanceOf(address account) external view returns (uint256);
    }

    fn encoded_results(results: Vec<Call3Result>) -> Vec<u8> {
        IMulticall3::aggregate3Call::abi_encode_returns(&results)
    }

    #[test]
    fn aggregate3_uses_the_canonical_selector() {
        let calldata = msg_aggregate3(vec![]);
        assert_eq!(&calldata[..4], hex!("82ad56cb"));
    }

    #[test]
    fn call3_wraps_the_inner_calldata() {
        let account = address!("0x00000000000000000000000000000000000000aa");
        let token = address!("0x00000000000000000000000000000000000000bb");
        let call = call3(token, &balanceOfCall { account });

        assert_eq!(call.target, token);
        assert!(!call.allowFailure);
        assert_eq!(call.callData.as_ref(), balanceOfCall { account }.abi_encode().as_slice());
    }

    #[test]
    fn aggregate3_calldata_decodes_back_to_the_batch() {
        let token = address!("0x00000000000000000000000000000000000000bb");
        let calls = vec![
            call3(token, &balanceOfCall { account: Address::ZERO }),
            call3(token, &balanceOfCall { account: token }),
        ];
        let calldata = msg_aggregate3(calls.clone());
        let decoded = IMulticall3::aggregate3Call::abi_decode(&calldata).unwrap();

        assert_eq!(decoded.calls, calls);
    }

    #[test]
    fn parse_keeps_order_and_decodes_items() {
        let data = encoded_results(vec![
            Call3Result {
                success: true,
                returnData: U256::from(42u64).to_be_bytes::<32>().to_vec().into(),
            },
            Call3Result {
                success: false,
                returnData: Bytes::new(),
            },
        ]);

        let items = parse_aggregate3(&data).unwrap();

        assert_eq!(items.len(), 2);
        assert_eq!(items[0].index, 0);
        assert_eq!(items[0].status, BatchItemResponseStatus::SUCCESS);
        assert_eq!(items[0].decode::<balanceOfCall>().unwrap(), U256::from(42u64));
        assert_eq!(items[1].status, BatchItemResponseStatus::ERROR);
        assert_eq!(
            items[1].decode::<balanceOfCall>(),
            Err(Error::ItemFailed(1))
        );
    }

    #[test]
    fn parse_exact_rejects_short_batches() {
        let data = encoded_results(vec![]);
        assert_eq!(
            parse_aggregate3_exact(&data, 2),
            Err(Error::LengthMismatch {
                expected: 2,
                actual: 0
            })
        );
    }

    #[test]
    fn garbage_is_an_error_not_a_panic() {
        assert!(matches!(parse_aggregate3(&[0xde, 0xad]), Err(Error::Abi(_))));
    }
}
