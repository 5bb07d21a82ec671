use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

pub const REENCRYPT_PRIMARY_TYPE: &str = "Reencrypt";
const DOMAIN_TYPE: &str = "EIP712Domain";

/// An EIP-712 payload as produced by `createEIP712`, ready for `eth_signTypedData_v4`.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Eip712 {
    pub domain: Value,
    pub types: Map<String, Value>,
    #[serde(default)]
    pub primary_type: String,
    pub message: Value,
}

impl Eip712 {
    /// Narrows the payload to the reencryption request. Wallets hash every listed type, so any
    /// extra types the SDK attaches would change the signature the gateway checks.
    pub fn into_reencrypt_request(mut self) -> Self {
        self.types
            .retain(|name, _| name == DOMAIN_TYPE || name == REENCRYPT_PRIMARY_TYPE);
        self.primary_type = REENCRYPT_PRIMARY_TYPE.to_string();
        self
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn reencrypt_request_keeps_domain_and_reencrypt_types() {
        let payload: Eip712 = serde_json::from_value(json!({
            "domain": {
                "name": "Authorization token",
                "version": "1",
                "chainId": 11155111,
                "verifyingContract": "0x6CB1fcFFF4757B8b7B0BCFE25f43F6b4626FDAfF"
            },
            "types": {
                "EIP712Domain": [{ "name": "name", "type": "string" }],
                "Reencrypt": [{ "name": "publicKey", "type": "bytes" }],
                "Unused": [{ "name": "x", "type": "uint256" }]
            },
            "message": { "publicKey": "0xabcd" }
        }))
        .unwrap();

        let request = payload.into_reencrypt_request();

        assert_eq!(request.primary_type, "Reencrypt");
        assert_eq!(request.types.len(), 2);
        assert!(request.types.contains_key("EIP712Domain"));
        assert!(request.types.contains_key("Reencrypt"));

        let json: Value = serde_json::from_str(&request.to_json().unwrap()).unwrap();
        assert_eq!(json["primaryType"], "Reencrypt");
        assert_eq!(json["message"]["publicKey"], "0xabcd");
        assert_eq!(json["domain"]["chainId"], 11155111);
    }
}
