use crate::Error;
use alloy_primitives::{Address, Bytes};
use alloy_sol_types::SolCall;
use async_trait::async_trait;
use eip1193::Ethereum;
use tracing::trace;

/// Read access to the chain. The dashboard talks to the injected wallet, tests talk to a mock.
#[async_trait(?Send)]
pub trait Provider {
    async fn call(&self, to: Address, data: Bytes) -> Result<Bytes, Error>;
}

/// Encodes `call`, runs it against `to` and decodes the return value.
pub async fn call_typed<P, C>(provider: &P, to: Address, call: &C) -> Result<C::Return, Error>
where
    P: Provider + ?Sized,
    C: SolCall,
{
    let response = provider.call(to, call.abi_encode().into()).await?;
    Ok(C::abi_decode_returns(&response)?)
}

/// `eth_call` through `window.ethereum`.
#[derive(Debug, Clone, Copy, Default)]
pub struct BrowserProvider;

impl BrowserProvider {
    /// Returns `None` when no wallet extension is injected.
    pub fn detect() -> Option<Self> {
        Ethereum::is_available().then_some(BrowserProvider)
    }
}

#[async_trait(?Send)]
impl Provider for BrowserProvider {
    async fn call(&self, to: Address, data: Bytes) -> Result<Bytes, Error> {
        trace!("eth_call to {to}");
        Ethereum::call(to, data).await.map_err(Into::into)
    }
}
