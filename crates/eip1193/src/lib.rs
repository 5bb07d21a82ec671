use alloy_primitives::{Address, Bytes, TxHash};
use serde::{de::DeserializeOwned, Serialize};
use std::str::FromStr;
use tracing::{debug, trace, warn};
use wasm_bindgen_futures::JsFuture;
use web_sys::{
    js_sys,
    wasm_bindgen::{closure::Closure, JsCast, JsValue},
};

mod error;
mod types;

pub use error::{Error, UNRECOGNIZED_CHAIN, USER_REJECTED_REQUEST};
pub use types::{parse_quantity, TransactionReceipt, TransactionRequest};

use types::{CallRequest, RequestArguments, SwitchChainParameter};

/// How often `wait_for_transaction` polls for a receipt.
const RECEIPT_POLL_INTERVAL_MS: i32 = 1_000;

pub struct Ethereum {}

impl Ethereum {
    pub fn is_available() -> bool {
        Self::provider().is_ok()
    }

    /// The raw `window.ethereum` object, for libraries that take an EIP-1193 provider.
    pub fn provider() -> Result<JsValue, Error> {
        web_sys::window()
            .and_then(|window| js_sys::Reflect::get(&window, &JsValue::from_str("ethereum")).ok())
            .filter(|ethereum| !ethereum.is_undefined() && !ethereum.is_null())
            .ok_or(Error::ProviderUnavailable)
    }

    pub async fn request<P, R>(method: &str, params: P) -> Result<R, Error>
    where
        P: Serialize,
        R: DeserializeOwned,
    {
        let ethereum = Self::provider()?;
        let request = js_sys::Reflect::get(&ethereum, &JsValue::from_str("request"))
            .map_err(Error::js)?
            .dyn_into::<js_sys::Function>()
            .map_err(|_| Error::ProviderUnavailable)?;

        trace!("{method}");

        let arguments = serde_wasm_bindgen::to_value(&RequestArguments { method, params })?;
        let promise = request
            .call1(&ethereum, &arguments)
            .map_err(Error::js)?
            .dyn_into::<js_sys::Promise>()
            .map_err(Error::js)?;
        let response = JsFuture::from(promise).await.map_err(Error::js)?;

        Ok(serde_wasm_bindgen::from_value(response)?)
    }

    /// Prompts the user to connect.
    pub async fn request_accounts() -> Result<Vec<Address>, Error> {
        Self::request::<_, Vec<String>>("eth_requestAccounts", ())
            .await
            .and_then(parse_addresses)
    }

    /// Accounts already authorized for this origin. Never prompts.
    pub async fn accounts() -> Result<Vec<Address>, Error> {
        Self::request::<_, Vec<String>>("eth_accounts", ())
            .await
            .and_then(parse_addresses)
    }

    pub async fn chain_id() -> Result<u64, Error> {
        let chain_id: String = Self::request("eth_chainId", ()).await?;
        parse_quantity(&chain_id)
    }

    pub async fn switch_chain(chain_id_hex: &str) -> Result<(), Error> {
        Self::request::<_, Option<()>>(
            "wallet_switchEthereumChain",
            [SwitchChainParameter {
                chain_id: chain_id_hex.to_string(),
            }],
        )
        .await
        .map(|_| ())
    }

    pub async fn block_number() -> Result<u64, Error> {
        let block: String = Self::request("eth_blockNumber", ()).await?;
        parse_quantity(&block)
    }

    pub async fn call(to: Address, data: Bytes) -> Result<Bytes, Error> {
        let response: String =
            Self::request("eth_call", (CallRequest { to, data }, "latest")).await?;
        Bytes::from_str(&response).map_err(Error::generic)
    }

    pub async fn send_transaction(transaction: TransactionRequest) -> Result<TxHash, Error> {
        let hash: String = Self::request("eth_sendTransaction", [transaction]).await?;
        debug!("submitted transaction {hash}");
        TxHash::from_str(&hash).map_err(Error::generic)
    }

    pub async fn get_transaction_receipt(hash: TxHash) -> Result<Option<TransactionReceipt>, Error> {
        Self::request("eth_getTransactionReceipt", [hash.to_string()]).await
    }

    /// Polls until the transaction is mined with at least `confirmations` blocks on top of (and
    /// including) its own. A reverted transaction is an error.
    pub async fn wait_for_transaction(
        hash: TxHash,
        confirmations: u64,
    ) -> Result<TransactionReceipt, Error> {
        loop {
            if let Some(receipt) = Self::get_transaction_receipt(hash).await? {
                if !receipt.succeeded() {
                    return Err(Error::Reverted(hash.to_string()));
                }
                if let Some(mined_at) = receipt.block() {
                    let head = Self::block_number().await?;
                    if head + 1 >= mined_at + confirmations {
                        return Ok(receipt);
                    }
                }
            }
            sleep(RECEIPT_POLL_INTERVAL_MS).await?;
        }
    }

    /// `typed_data` is the JSON-encoded EIP-712 payload, including its `EIP712Domain` type.
    pub async fn sign_typed_data_v4(signer: Address, typed_data: String) -> Result<String, Error> {
        Self::request("eth_signTypedData_v4", (signer.to_string(), typed_data)).await
    }

    /// Subscribes to a provider event such as `accountsChanged` or `chainChanged`. The listener
    /// is removed when the returned [`Subscription`] is dropped.
    pub fn on(
        event: &'static str,
        callback: impl FnMut(JsValue) + 'static,
    ) -> Result<Subscription, Error> {
        let ethereum = Self::provider()?;
        let closure = Closure::<dyn FnMut(JsValue)>::new(callback);

        call_method(&ethereum, "on", &[JsValue::from_str(event), closure.as_ref().clone()])?;

        Ok(Subscription {
            event,
            provider: ethereum,
            closure,
        })
    }
}

pub struct Subscription {
    event: &'static str,
    provider: JsValue,
    closure: Closure<dyn FnMut(JsValue)>,
}

impl Drop for Subscription {
    fn drop(&mut self) {
        let listener = self.closure.as_ref().clone();
        if let Err(error) = call_method(
            &self.provider,
            "removeListener",
            &[JsValue::from_str(self.event), listener],
        ) {
            warn!("failed to remove {} listener: {error}", self.event);
        }
    }
}

fn parse_addresses(accounts: Vec<String>) -> Result<Vec<Address>, Error> {
    accounts
        .iter()
        .map(|account| Address::from_str(account).map_err(Error::generic))
        .collect()
}

fn call_method(target: &JsValue, name: &str, arguments: &[JsValue]) -> Result<JsValue, Error> {
    let method = js_sys::Reflect::get(target, &JsValue::from_str(name))
        .map_err(Error::js)?
        .dyn_into::<js_sys::Function>()
        .map_err(|_| Error::Generic(format!("provider has no `{name}` method")))?;
    let arguments = arguments.iter().collect::<js_sys::Array>();

    method.apply(target, &arguments).map_err(Error::js)
}

async fn sleep(millis: i32) -> Result<(), Error> {
    let promise = js_sys::Promise::new(&mut |resolve, _reject| {
        if let Some(window) = web_sys::window() {
            let _ = window
                .set_timeout_with_callback_and_timeout_and_arguments_0(&resolve, millis);
        }
    });
    JsFuture::from(promise).await.map(|_| ()).map_err(Error::js)
}
