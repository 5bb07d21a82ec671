use alloy_primitives::{Address, U256};
use send_wrapper::SendWrapper;
use serde::{Deserialize, Serialize};
use std::{rc::Rc, str::FromStr};
use tracing::{debug, trace};
use wasm_bindgen_futures::JsFuture;
use web_sys::{
    js_sys,
    wasm_bindgen::{JsCast, JsValue},
};

mod eip712;
mod error;

pub use eip712::{Eip712, REENCRYPT_PRIMARY_TYPE};
pub use error::Error;

pub struct Fhevm {}

impl Fhevm {
    pub fn is_available() -> bool {
        global().is_ok()
    }

    /// Loads the TFHE wasm modules. Must succeed once before [`Fhevm::create_instance`].
    pub async fn init() -> Result<(), Error> {
        let fhevm = global()?;
        let result = await_promise(call_method(&fhevm, "initFhevm", &[])?).await?;

        // initFhevm resolves to `true` in recent releases and `undefined` in older ones.
        if result.as_bool() == Some(false) {
            return Err(Error::InitFailed);
        }
        debug!("fhevm initialized");
        Ok(())
    }

    pub async fn create_instance(config: InstanceConfig) -> Result<FhevmInstance, Error> {
        let fhevm = global()?;
        let options = serde_wasm_bindgen::to_value(&config.options)?;
        js_sys::Reflect::set(&options, &JsValue::from_str("network"), &config.network)
            .map_err(Error::js)?;

        let instance = await_promise(call_method(&fhevm, "createInstance", &[options])?).await?;
        debug!("fhevm instance created");

        Ok(instance.into())
    }
}

#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct InstanceOptions {
    pub gateway_url: String,
    pub kms_contract_address: String,
    pub acl_contract_address: String,
}

pub struct InstanceConfig {
    /// An EIP-1193 provider, usually `window.ethereum`.
    pub network: JsValue,
    pub options: InstanceOptions,
}

#[derive(Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Keypair {
    pub public_key: String,
    pub private_key: String,
}

impl std::fmt::Debug for Keypair {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Keypair")
            .field("public_key", &self.public_key)
            .field("private_key", &"<redacted>")
            .finish()
    }
}

#[derive(Debug, Clone)]
pub struct FhevmInstance {
    inner: SendWrapper<Rc<JsValue>>,
}

impl From<JsValue> for FhevmInstance {
    fn from(value: JsValue) -> Self {
        Self {
            inner: SendWrapper::new(Rc::new(value)),
        }
    }
}

impl PartialEq for FhevmInstance {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }
}

impl FhevmInstance {
    pub fn generate_keypair(&self) -> Result<Keypair, Error> {
        let keypair = call_method(&self.inner, "generateKeypair", &[])?;
        Ok(serde_wasm_bindgen::from_value(keypair)?)
    }

    pub fn create_eip712(&self, public_key: &str, contract: Address) -> Result<Eip712, Error> {
        let payload = call_method(
            &self.inner,
            "createEIP712",
            &[
                JsValue::from_str(public_key),
                JsValue::from_str(&contract.to_string()),
            ],
        )?;
        let json: String = js_sys::JSON::stringify(&payload)
            .map_err(Error::js)?
            .into();
        trace!("{json}");

        Ok(serde_json::from_str(&json)?)
    }

    /// Asks the gateway to reencrypt `handle` under `keypair` and decrypts the result locally.
    pub async fn reencrypt(
        &self,
        handle: U256,
        keypair: &Keypair,
        signature: &str,
        contract: Address,
        user: Address,
    ) -> Result<U256, Error> {
        let handle = js_sys::BigInt::new(&JsValue::from_str(&handle.to_string()))
            .map_err(|error| Error::js(error.into()))?;

        let promise = call_method(
            &self.inner,
            "reencrypt",
            &[
                handle.into(),
                JsValue::from_str(&keypair.private_key),
                JsValue::from_str(&keypair.public_key),
                JsValue::from_str(signature),
                JsValue::from_str(&contract.to_string()),
                JsValue::from_str(&user.to_string()),
            ],
        )?;
        let value = await_promise(promise).await?;

        js_to_u256(&value)
    }
}

fn global() -> Result<JsValue, Error> {
    web_sys::window()
        .and_then(|window| js_sys::Reflect::get(&window, &JsValue::from_str("fhevm")).ok())
        .filter(|fhevm| !fhevm.is_undefined() && !fhevm.is_null())
        .ok_or(Error::FhevmUnavailable)
}

fn call_method(target: &JsValue, name: &str, arguments: &[JsValue]) -> Result<JsValue, Error> {
    let method = js_sys::Reflect::get(target, &JsValue::from_str(name))
        .map_err(Error::js)?
        .dyn_into::<js_sys::Function>()
        .map_err(|_| Error::Generic(format!("fhevmjs has no `{name}` function")))?;
    let arguments = arguments.iter().collect::<js_sys::Array>();

    method.apply(target, &arguments).map_err(Error::js)
}

async fn await_promise(value: JsValue) -> Result<JsValue, Error> {
    let promise = js_sys::Promise::resolve(&value);
    JsFuture::from(promise).await.map_err(Error::js)
}

fn js_to_u256(value: &JsValue) -> Result<U256, Error> {
    let digits = if let Some(bigint) = value.dyn_ref::<js_sys::BigInt>() {
        String::from(
            bigint
                .to_string(10)
                .map_err(|error| Error::js(error.into()))?,
        )
    } else if let Some(text) = value.as_string() {
        text
    } else if let Some(number) = value.as_f64().filter(|n| n.fract() == 0.0 && *n >= 0.0) {
        format!("{number:.0}")
    } else {
        return Err(Error::Serialization(
            "reencrypt did not return an integer".to_string(),
        ));
    };

    U256::from_str(&digits).map_err(Error::generic)
}
