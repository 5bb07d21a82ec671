use alloy_primitives::Bytes;
use alloy_sol_types::sol;
use serde::{Deserialize, Serialize};

sol! {
    #[sol(all_derives)]
    interface IMulticall3 {
        struct Call3 {
            address target;
            bool allowFailure;
            bytes callData;
        }

        struct Call3Result {
            bool success;
            bytes returnData;
        }

        function aggregate3(Call3[] calldata calls) external payable returns (Call3Result[] memory returnData);
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct BatchItemResponse {
    pub index: usize,
    pub status: BatchItemResponseStatus,
    pub return_data: Bytes,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum BatchItemResponseStatus {
    SUCCESS,
    ERROR,
}
