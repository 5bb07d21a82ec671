use crate::{
    constants::{contracts::*, fhevm_contracts, tracked_tokens, CHAIN, CONFIRMATIONS},
    state::{Dashboard, DashboardStoreFields, FhevmSignals, WalletSignals},
    support::{
        get_epoch_info, get_redeemable_amounts, get_token_balances, BrowserProvider, IErc20,
    },
    toaster::{Notice, Toaster},
    types::{Asset, Direction, Pool, WalletBalances},
    utils::display_token_amount,
    Error,
};
use alloy_primitives::{Address, U256};
use eip1193::{Ethereum, TransactionRequest};
use fhevm::{Fhevm, InstanceConfig, InstanceOptions};
use leptos::{prelude::*, task::spawn_local};
use reactive_stores::Store;
use std::future::Future;
use tracing::{debug, error, info, warn};

/// Everything the pages can ask of the chain. Refreshes log their failures; user-triggered
/// operations report theirs through toasts.
#[derive(Copy, Clone)]
pub struct Actions {
    wallet: WalletSignals,
    dashboard: Store<Dashboard>,
    fhevm: FhevmSignals,
    toaster: Toaster,
}

impl Actions {
    pub fn new(
        wallet: WalletSignals,
        dashboard: Store<Dashboard>,
        fhevm: FhevmSignals,
        toaster: Toaster,
    ) -> Self {
        Self {
            wallet,
            dashboard,
            fhevm,
            toaster,
        }
    }

    fn account(&self) -> Option<Address> {
        self.wallet.account.get_untracked()
    }

    // --- wallet

    /// Prompts the wallet for access. Returns whether an account is now connected.
    pub async fn connect(self) -> bool {
        self.wallet.connecting.set(true);
        let result = async {
            let accounts = Ethereum::request_accounts().await?;
            let chain_id = Ethereum::chain_id().await?;
            Ok::<_, eip1193::Error>((accounts, chain_id))
        }
        .await;
        self.wallet.connecting.set(false);

        match result {
            Ok((accounts, chain_id)) => {
                self.wallet.chain_id.set(Some(chain_id));
                self.wallet.account.set(accounts.first().copied());
                accounts.first().is_some()
            }
            Err(error) => {
                error!("failed to connect wallet: {error}");
                if let Some(notice) = connect_failure(&error) {
                    self.toaster.error(None, notice);
                }
                false
            }
        }
    }

    /// Picks up an account authorized in an earlier session without prompting.
    pub async fn restore(self) -> SessionRestore {
        let outcome = session_restore(Ethereum::accounts().await);
        match outcome {
            SessionRestore::Restored(account) => self.wallet.account.set(Some(account)),
            SessionRestore::Revoked => info!("wallet no longer authorizes this site"),
            SessionRestore::Unknown => {}
        }
        match Ethereum::chain_id().await {
            Ok(chain_id) => self.wallet.chain_id.set(Some(chain_id)),
            Err(error) => warn!("could not read chain id: {error}"),
        }
        outcome
    }

    pub fn disconnect(self) {
        self.wallet.clear();
        self.dashboard.balances().set(WalletBalances::new());
        self.dashboard.redeemable_info().set(Default::default());
    }

    pub async fn ensure_chain(self, chain_id: u64) {
        if !needs_switch(chain_id) {
            return;
        }
        info!("wallet is on chain {chain_id}, switching to {}", CHAIN.name());
        match Ethereum::switch_chain(&CHAIN.hex()).await {
            Ok(()) => {}
            Err(error) if error.is_unrecognized_chain() => {
                self.toaster.error(
                    None,
                    Notice::new(
                        "Unknown network",
                        format!("Add {} to your wallet and try again.", CHAIN.name()),
                    ),
                );
            }
            Err(error) => error!("failed to switch chain: {error}"),
        }
    }

    // --- refreshes

    pub async fn update_balances(self) {
        let (Some(provider), Some(account)) = (BrowserProvider::detect(), self.account()) else {
            return;
        };
        let tokens = tracked_tokens();

        match get_token_balances(&provider, MULTICALL, &tokens, account).await {
            // The account may have changed while the query was in flight.
            Ok(_) if self.account() != Some(account) => {}
            Ok(values) => {
                debug!("balances updated");
                self.dashboard
                    .balances()
                    .set(tokens.into_iter().zip(values).collect());
            }
            Err(error) => error!("failed to update balances: {error}"),
        }
    }

    pub async fn update_epoch_info(self) {
        let Some(provider) = BrowserProvider::detect() else {
            return;
        };
        let user = self.account().unwrap_or(Address::ZERO);

        match get_epoch_info(&provider, *WRAPPER, &tracked_tokens(), user).await {
            Ok(_) if self.account().unwrap_or(Address::ZERO) != user => {}
            Ok(epoch_info) => {
                debug!("epoch info updated");
                self.dashboard.epoch_info().set(epoch_info);
            }
            Err(error) => error!("failed to update epoch info: {error}"),
        }
    }

    pub async fn update_redeemable_amounts(self) {
        let (Some(provider), Some(account)) = (BrowserProvider::detect(), self.account()) else {
            return;
        };
        let epoch_info = self.dashboard.epoch_info().get_untracked();

        match get_redeemable_amounts(
            &provider,
            MULTICALL,
            *WRAPPER,
            &tracked_tokens(),
            &epoch_info,
            account,
        )
        .await
        {
            Ok(_) if self.account() != Some(account) => {}
            Ok(redeemable) => {
                debug!("redeemable amounts updated");
                self.dashboard.redeemable_info().set(redeemable);
            }
            Err(error) => error!("failed to update redeemable amounts: {error}"),
        }
    }

    /// Redeemable amounts are not re-read here; they follow every change of the epoch info.
    pub async fn refresh_all(self) {
        futures::join!(self.update_balances(), self.update_epoch_info());
    }

    // --- transactions

    /// Submits `request` and tracks it in a toast until it has [`CONFIRMATIONS`] confirmations.
    /// `on_confirmed` runs before the toast turns green.
    async fn transact<F, Fut>(
        self,
        notice: Notice,
        failure: Notice,
        request: TransactionRequest,
        on_confirmed: F,
    ) -> bool
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = ()>,
    {
        let toast = self.toaster.loading(notice);

        let result = async {
            let hash = Ethereum::send_transaction(request).await?;
            self.toaster.attach_tx(toast, hash);
            Ethereum::wait_for_transaction(hash, CONFIRMATIONS).await?;
            Ok::<_, Error>(())
        }
        .await;

        match result {
            Ok(()) => {
                on_confirmed().await;
                self.toaster.success(toast);
                true
            }
            Err(error) => {
                error!("{error}");
                self.toaster.error(Some(toast), failure);
                false
            }
        }
    }

    pub async fn get_free_token(self, asset: &'static Asset) {
        let Some(account) = self.account() else {
            warn!("get_free_token needs a connected wallet");
            return;
        };
        let amount = asset.faucet_amount();

        let notice = Notice::new(
            "Get free token!",
            format!(
                "Requested {}{} from Faucet.",
                display_token_amount(amount, asset.decimals),
                asset.symbol
            ),
        );
        let failure = Notice::new(
            "Failed to get free token!",
            "There was an unexpected error to get free token!",
        );
        let request = FAUCET.mint(account, asset.address, amount);

        self.transact(notice, failure, request, || self.update_balances())
            .await;
    }

    /// Makes sure the wrapper may spend `amount` of the token `direction` spends. Only sends an
    /// approval when the current allowance is too small.
    pub async fn approve_token(self, pool: Pool, direction: Direction, amount: U256) -> bool {
        let (Some(provider), Some(account)) = (BrowserProvider::detect(), self.account()) else {
            return false;
        };
        let failure = Notice::new(
            "Failed to approve token!",
            "There was an unexpected error to approve token!",
        );
        let token = IErc20(direction.spent_token(&pool));

        match token.allowance(&provider, account, **WRAPPER).await {
            Ok(allowance) if !needs_approval(allowance, amount) => return true,
            Ok(_) => {}
            Err(error) => {
                error!("failed to read allowance: {error}");
                self.toaster.error(None, failure);
                return false;
            }
        }

        let notice = Notice::new(
            "Approve token to wrap",
            format!(
                "Approving {}{} to wrap.",
                display_token_amount(amount, pool.decimals()),
                direction.spent_symbol(&pool)
            ),
        );
        let request = token.approve(account, **WRAPPER, amount);

        self.transact(notice, failure, request, || async {}).await
    }

    pub async fn wrap_request(self, direction: Direction, pool: Pool, amount: U256) {
        let Some(account) = self.account() else {
            warn!("wrap_request needs a connected wallet");
            return;
        };
        let verb = direction.verb();

        let notice = Notice::new(
            format!("Sending {verb} wrap request"),
            format!(
                "Sending wrap request to {verb} {}{}.",
                display_token_amount(amount, pool.decimals()),
                direction.spent_symbol(&pool)
            ),
        );
        let failure = Notice::new(
            "Failed to send wrap request!",
            "There was an unexpected error to send wrap request!",
        );
        let request = WRAPPER.wrap_request(account, pool.asset.address, amount, direction);

        self.transact(notice, failure, request, || async move {
            futures::join!(self.update_epoch_info(), self.update_balances());
        })
        .await;
    }

    pub async fn wrap(self, pool: Pool, direction: Direction) {
        let Some(account) = self.account() else {
            warn!("wrap needs a connected wallet");
            return;
        };
        let (action, preposition) = match direction {
            Direction::Deposit => ("Depositing", "to"),
            Direction::Withdraw => ("Withdrawing", "from"),
        };

        let notice = Notice::new(
            format!("{action} assets {preposition} Aave"),
            format!("{action} wrapped assets {preposition} Aave"),
        );
        let failure = Notice::new("Failed to wrap!", "There was an unexpected error to wrap!");
        let request = WRAPPER.wrap(account, pool.asset.address, direction);

        self.transact(notice, failure, request, || self.update_epoch_info())
            .await;
    }

    pub async fn redeem(self, pool: Pool, epoch: u64, direction: Direction) {
        let Some(account) = self.account() else {
            warn!("redeem needs a connected wallet");
            return;
        };
        let symbol = direction.redeemed_symbol(&pool);

        let notice = Notice::new(
            format!("Redeeming {symbol}"),
            format!("Redeeming {symbol} at epoch #{epoch}"),
        );
        let failure = Notice::new(
            "Failed to redeem!",
            "There was an unexpected error to redeem!",
        );
        let request = WRAPPER.redeem(account, pool.asset.address, epoch, direction);

        self.transact(notice, failure, request, || async move {
            futures::join!(self.update_redeemable_amounts(), self.update_balances());
        })
        .await;
    }

    // --- confidential values

    /// Reveals the plaintext behind an encrypted handle stored in the wrapper contract. The
    /// wallet signs a reencryption request and the gateway answers under a throwaway keypair.
    pub async fn decrypt_euint256(self, handle: U256) -> Option<U256> {
        let title = "Decrypting encrypted value";

        let (Some(instance), Some(account)) = (self.fhevm.instance.get_untracked(), self.account())
        else {
            self.toaster.error(
                None,
                Notice::new(title, format!("{} Try again later.", Error::FhevmNotReady)),
            );
            return None;
        };

        let toast = self
            .toaster
            .loading(Notice::new(title, "Decrypting encrypted value to reveal it."));
        let wrapper = **WRAPPER;

        let result = async {
            let keypair = instance.generate_keypair()?;
            let typed_data = instance
                .create_eip712(&keypair.public_key, wrapper)?
                .into_reencrypt_request()
                .to_json()?;
            let signature = Ethereum::sign_typed_data_v4(account, typed_data).await?;
            let value = instance
                .reencrypt(handle, &keypair, &signature, wrapper, account)
                .await?;
            Ok::<_, Error>(value)
        }
        .await;

        match result {
            Ok(value) => {
                self.toaster.success(toast);
                Some(value)
            }
            Err(error) => {
                error!("failed to decrypt {handle}: {error}");
                self.toaster.error(
                    Some(toast),
                    Notice::new(
                        "Failed to decrypt",
                        "There was an unexpected error to decrypt!",
                    ),
                );
                None
            }
        }
    }

    /// Loads the FHE library once, then creates the instance used for reencryption.
    pub async fn init_fhevm(self) {
        if !Fhevm::is_available() {
            warn!("fhevmjs is not loaded, encrypted values cannot be revealed");
            return;
        }
        if !self.fhevm.initialized.get_untracked() {
            match Fhevm::init().await {
                Ok(()) => self.fhevm.initialized.set(true),
                Err(error) => {
                    error!("{error}");
                    return;
                }
            }
        }
        self.create_fhevm_instance().await;
    }

    pub async fn create_fhevm_instance(self) {
        if !self.fhevm.initialized.get_untracked()
            || self.fhevm.instance.with_untracked(Option::is_some)
        {
            return;
        }

        let title = "Initializing FHE instance";
        let toast = self
            .toaster
            .loading(Notice::new(title, "Initializing and creating FHE instance..."));
        let contracts = fhevm_contracts();

        let result = async {
            let config = InstanceConfig {
                network: Ethereum::provider()?,
                options: InstanceOptions {
                    gateway_url: contracts.gateway_url.to_string(),
                    kms_contract_address: contracts.kms_verifier.to_string(),
                    acl_contract_address: contracts.acl.to_string(),
                },
            };
            Ok::<_, Error>(Fhevm::create_instance(config).await?)
        }
        .await;

        match result {
            Ok(instance) => {
                self.fhevm.instance.set(Some(instance));
                self.toaster.success(toast);
            }
            Err(error) => {
                error!("{error}");
                let retry = Callback::new(move |_| {
                    self.toaster.dismiss(toast);
                    spawn_local(self.create_fhevm_instance());
                });
                self.toaster.error_with_retry(
                    toast,
                    Notice::new(title, "Failed to initialize FHE instance..."),
                    retry,
                );
            }
        }
    }
}

/// What an earlier session's wallet authorization turned into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionRestore {
    Restored(Address),
    /// The wallet answered but authorizes no account anymore.
    Revoked,
    /// The wallet could not be asked.
    Unknown,
}

pub fn session_restore(accounts: Result<Vec<Address>, eip1193::Error>) -> SessionRestore {
    match accounts {
        Ok(accounts) => match accounts.first() {
            Some(account) => SessionRestore::Restored(*account),
            None => SessionRestore::Revoked,
        },
        Err(error) => {
            warn!("could not restore wallet session: {error}");
            SessionRestore::Unknown
        }
    }
}

/// The toast for a failed connection attempt. Declining the prompt is not a failure.
pub fn connect_failure(error: &eip1193::Error) -> Option<Notice> {
    (!error.is_user_rejection()).then(|| {
        Notice::new(
            "Failed to connect wallet",
            format!("There was an unexpected error to connect wallet! {error}"),
        )
    })
}

pub fn needs_approval(allowance: U256, amount: U256) -> bool {
    allowance < amount
}

pub fn needs_switch(chain_id: u64) -> bool {
    chain_id != CHAIN.id()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sufficient_allowance_skips_approval() {
        let amount = U256::from(1_000_000u64);

        assert!(!needs_approval(amount, amount));
        assert!(!needs_approval(U256::MAX, amount));
        assert!(needs_approval(U256::from(999_999u64), amount));
        assert!(needs_approval(U256::ZERO, amount));
    }

    #[test]
    fn only_other_chains_are_switched() {
        assert!(!needs_switch(11_155_111));
        assert!(needs_switch(1));
        assert!(needs_switch(31_337));
    }

    #[test]
    fn restoring_a_session() {
        let account = Address::repeat_byte(0x42);

        assert_eq!(
            session_restore(Ok(vec![account, Address::ZERO])),
            SessionRestore::Restored(account)
        );
        assert_eq!(session_restore(Ok(vec![])), SessionRestore::Revoked);
        assert_eq!(
            session_restore(Err(eip1193::Error::ProviderUnavailable)),
            SessionRestore::Unknown
        );
    }

    #[test]
    fn declined_connection_is_not_toasted() {
        let declined = eip1193::Error::Rpc {
            code: eip1193::USER_REJECTED_REQUEST,
            message: "User rejected the request.".to_string(),
        };
        let broken = eip1193::Error::Rpc {
            code: -32002,
            message: "Request already pending".to_string(),
        };

        assert_eq!(connect_failure(&declined), None);

        let notice = connect_failure(&broken).unwrap();
        assert_eq!(notice.title, "Failed to connect wallet");
        assert!(notice.content.contains("Request already pending"));
    }
}
