use alloy_sol_types::sol;

pub use IERC20::*;

sol! {
    #[sol(all_derives)]
    interface IERC20 {
        function balanceOf(address account) external view returns (uint256);
        function allowance(address owner, address spender) external view returns (uint256);
        function approve(address spender, uint256 amount) external returns (bool);
    }
}
