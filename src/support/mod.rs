mod contracts;
mod provider;
mod queries;

pub use contracts::{IErc20, IFaucet, IMulticall, IWrapper};
pub use provider::{call_typed, BrowserProvider, Provider};
pub use queries::{get_epoch_info, get_redeemable_amounts, get_token_balances};
