use serde::{Deserialize, Serialize};
use web_sys::{js_sys, wasm_bindgen};

/// EIP-1193 code for "the user rejected the request".
pub const USER_REJECTED_REQUEST: i64 = 4001;
/// EIP-3085 code for "unrecognized chain", returned by `wallet_switchEthereumChain`.
pub const UNRECOGNIZED_CHAIN: i64 = 4902;

#[derive(thiserror::Error, Serialize, Deserialize, Debug, Clone, PartialEq)]
pub enum Error {
    #[error("No injected Ethereum provider found!")]
    ProviderUnavailable,

    #[error("{message} (code {code})")]
    Rpc { code: i64, message: String },

    #[error("Transaction {0} reverted")]
    Reverted(String),

    #[error("{0}")]
    Js(String),

    #[error("Serialization Error: {0}")]
    Serialization(String),

    #[error("{0}")]
    Generic(String),
}

impl Error {
    pub fn js(value: wasm_bindgen::JsValue) -> Self {
        value.into()
    }
    pub fn generic(value: impl std::fmt::Display) -> Self {
        Self::Generic(value.to_string())
    }
    pub fn is_user_rejection(&self) -> bool {
        matches!(self, Error::Rpc { code, .. } if *code == USER_REJECTED_REQUEST)
    }
    /// The wallet does not know the chain it was asked to switch to.
    pub fn is_unrecognized_chain(&self) -> bool {
        matches!(self, Error::Rpc { code, .. } if *code == UNRECOGNIZED_CHAIN)
    }
}

// Wallets reject with plain `{ code, message }` objects rather than `Error` instances, so read
// the properties instead of casting.
impl From<wasm_bindgen::JsValue> for Error {
    fn from(error: wasm_bindgen::JsValue) -> Self {
        let message = js_sys::Reflect::get(&error, &"message".into())
            .ok()
            .and_then(|message| message.as_string())
            .or_else(|| error.as_string())
            .unwrap_or("unknown JS error".to_string());

        match js_sys::Reflect::get(&error, &"code".into())
            .ok()
            .and_then(|code| code.as_f64())
        {
            Some(code) => Error::Rpc {
                code: code as i64,
                message,
            },
            None => Error::Js(message),
        }
    }
}

impl From<serde_wasm_bindgen::Error> for Error {
    fn from(error: serde_wasm_bindgen::Error) -> Self {
        let message = error.to_string();
        Error::Serialization(message)
    }
}

impl From<serde_json::Error> for Error {
    fn from(error: serde_json::Error) -> Self {
        Error::Serialization(error.to_string())
    }
}

impl From<&str> for Error {
    fn from(value: &str) -> Self {
        Self::Generic(value.to_string())
    }
}

impl From<String> for Error {
    fn from(value: String) -> Self {
        Self::Generic(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rpc(code: i64) -> Error {
        Error::Rpc {
            code,
            message: "request failed".to_string(),
        }
    }

    #[test]
    fn classifies_rpc_codes() {
        assert!(rpc(4001).is_user_rejection());
        assert!(!rpc(4001).is_unrecognized_chain());
        assert!(rpc(4902).is_unrecognized_chain());
        assert!(!rpc(-32603).is_user_rejection());
        assert!(!Error::Js("User rejected".to_string()).is_user_rejection());
    }
}
