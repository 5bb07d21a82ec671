use alloy_sol_types::sol;

pub use IFaucet::*;

sol! {
    /// Test-token faucet. Mints `amount` of `token` to `to`.
    #[sol(all_derives)]
    interface IFaucet {
        function mint(address token, address to, uint256 amount) external;
    }
}
