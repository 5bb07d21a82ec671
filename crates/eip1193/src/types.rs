use alloy_primitives::{Address, Bytes};
use serde::{Deserialize, Serialize};

use crate::Error;

#[derive(Serialize, Debug)]
pub(crate) struct RequestArguments<'a, P: Serialize> {
    pub method: &'a str,
    pub params: P,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TransactionRequest {
    pub from: Address,
    pub to: Address,
    pub data: Bytes,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub(crate) struct CallRequest {
    pub to: Address,
    pub data: Bytes,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub(crate) struct SwitchChainParameter {
    pub chain_id: String,
}

/// The subset of a transaction receipt the dashboard looks at. Quantities stay as the hex
/// strings the node returns and are parsed on access.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TransactionReceipt {
    pub transaction_hash: String,
    pub block_number: Option<String>,
    pub status: Option<String>,
}

impl TransactionReceipt {
    pub fn block(&self) -> Option<u64> {
        self.block_number
            .as_deref()
            .and_then(|block| parse_quantity(block).ok())
    }

    /// Pre-Byzantium receipts carry no status; treat those as successful.
    pub fn succeeded(&self) -> bool {
        self.status
            .as_deref()
            .map_or(true, |status| parse_quantity(status) == Ok(1))
    }
}

/// Parses a JSON-RPC hex quantity such as `"0xaa36a7"`.
pub fn parse_quantity(value: &str) -> Result<u64, Error> {
    let digits = value
        .strip_prefix("0x")
        .or_else(|| value.strip_prefix("0X"))
        .ok_or_else(|| Error::Serialization(format!("{value} is not a hex quantity")))?;

    if digits.is_empty() {
        return Err(Error::Serialization(format!("{value} is not a hex quantity")));
    }

    u64::from_str_radix(digits, 16).map_err(|error| Error::Serialization(error.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quantities_are_hex() {
        assert_eq!(parse_quantity("0xaa36a7"), Ok(11_155_111));
        assert_eq!(parse_quantity("0x0"), Ok(0));
        assert!(parse_quantity("0x").is_err());
        assert!(parse_quantity("12").is_err());
        assert!(parse_quantity("0xzz").is_err());
    }

    #[test]
    fn receipt_status() {
        let receipt: TransactionReceipt = serde_json::from_str(
            r#"{
                "transactionHash": "0x1111111111111111111111111111111111111111111111111111111111111111",
                "blockNumber": "0x10",
                "status": "0x1",
                "gasUsed": "0x5208"
            }"#,
        )
        .unwrap();

        assert!(receipt.succeeded());
        assert_eq!(receipt.block(), Some(16));

        let reverted = TransactionReceipt {
            status: Some("0x0".to_string()),
            ..receipt.clone()
        };
        assert!(!reverted.succeeded());

        let legacy = TransactionReceipt {
            status: None,
            ..receipt
        };
        assert!(legacy.succeeded());
    }

    #[test]
    fn call_request_serializes_as_hex() {
        let request = CallRequest {
            to: Address::ZERO,
            data: Bytes::from(vec![0x12, 0x34]),
        };
        let json = serde_json::to_value(&request).unwrap();

        assert_eq!(json["to"], "0x0000000000000000000000000000000000000000");
        assert_eq!(json["data"], "0x1234");
    }
}
