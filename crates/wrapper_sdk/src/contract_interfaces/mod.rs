pub mod erc20;
pub mod faucet;
pub mod wrapper;
