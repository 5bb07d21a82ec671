use alloy_sol_types::sol;

pub use IWrapper::*;

sol! {
    /// The confidential Aave wrapper.
    ///
    /// Requests are keyed by the underlying asset. `isDeposit` selects the deposit queue (asset in,
    /// pool token out) or the withdraw queue (pool token in, asset out). Amounts returned by the
    /// view functions are handles to encrypted values, not plaintext.
    #[sol(all_derives)]
    interface IWrapper {
        function wrapRequest(address token, uint256 amount, bool isDeposit) external;
        function wrap(address token, bool isDeposit) external;
        function redeem(address token, uint256 epoch, bool isDeposit) external;

        function getWrapperInfo(address[] tokens, address user)
            external
            view
            returns (
                uint256[] currentEpochs,
                uint256[] lastWrappedTimes,
                bool[] hasRequests,
                uint256[] pendingUserRequests
            );

        function hasWithdrawn(uint256 epoch, address token, address user) external view returns (bool);
        function pendingUserRequests(uint256 epoch, address token, address user) external view returns (uint256);
    }
}
