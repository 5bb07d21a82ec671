use alloy_primitives::Address;
use codee::string::FromToStringCodec;
use eip1193::{parse_quantity, Ethereum};
use leptos::{html::Dialog, prelude::*, task::spawn_local};
use leptos_meta::*;
use leptos_router::components::{Route, Router, Routes};
use leptos_router_macro::path;
use leptos_use::storage::use_local_storage;
use reactive_stores::Store;
use send_wrapper::SendWrapper;
use std::str::FromStr;
use tracing::{debug, info, warn};
use web_sys::{wasm_bindgen::JsValue, MouseEvent};

mod actions;
mod components;
mod constants;
mod error;
mod routes;
mod state;
mod support;
mod toaster;
mod types;
mod utils;

use actions::{Actions, SessionRestore};
use components::{LoadingModal, Toasts, WalletMenu};
use constants::{REFRESH_INTERVAL, WALLET_CONNECTED_KEY};
use routes::{Faucet, Markets, Nav, Relayer};
use state::{ConnectWallet, Dashboard, DashboardStoreFields, FhevmSignals, WalletSignals};
use toaster::Toaster;
use utils::{alert, shorten_address};

pub use error::Error;

#[component]
pub fn App() -> impl IntoView {
    info!("rendering <App/>");

    // Provides context that manages stylesheets, titles, meta tags, etc.
    provide_meta_context();

    // Global Contexts

    provide_context(WalletSignals::new());
    provide_context(Store::new(Dashboard::default()));
    provide_context(FhevmSignals::new());
    provide_context(Toaster::new());

    let wallet = use_context::<WalletSignals>().expect("wallet signals context missing!");
    let dashboard = use_context::<Store<Dashboard>>().expect("dashboard context missing!");
    let fhevm = use_context::<FhevmSignals>().expect("fhevm signals context missing!");
    let toaster = use_context::<Toaster>().expect("toaster context missing!");

    let actions = Actions::new(wallet, dashboard, fhevm, toaster);
    provide_context(actions);

    let (wallet_connected, set_wallet_connected, _) =
        use_local_storage::<bool, FromToStringCodec>(WALLET_CONNECTED_KEY);

    let connect = Callback::new(move |_: ()| {
        if !Ethereum::is_available() {
            alert("No Ethereum wallet found. Install MetaMask to continue.");
            return;
        }
        spawn_local(async move {
            actions.connect().await;
        });
    });
    provide_context(ConnectWallet(connect));

    if wallet_connected.get_untracked() && Ethereum::is_available() {
        debug!("restoring wallet session");
        spawn_local(async move {
            if actions.restore().await == SessionRestore::Revoked {
                set_wallet_connected.set(false);
            }
        });
    }

    // Effects

    // The first run only sees the initial `None`, so the stored flag survives until the
    // session has been restored.
    Effect::new(move |previous: Option<bool>| {
        let connected = wallet.account.get().is_some();
        if previous.is_some() {
            set_wallet_connected.set(connected);
        }
        connected
    });

    Effect::new(move |_| {
        let account = wallet.account.get();
        info!("account set to {account:?}");
        spawn_local(actions.refresh_all());
    });

    Effect::new(move |_| {
        dashboard.epoch_info().track();
        spawn_local(actions.update_redeemable_amounts());
    });

    Effect::new(move |_| {
        if let Some(chain_id) = wallet.chain_id.get() {
            info!("chain id set to {chain_id}");
            spawn_local(actions.ensure_chain(chain_id));
        }
    });

    spawn_local(actions.init_fhevm());

    // Event Listeners

    let subscriptions = if Ethereum::is_available() {
        [
            Ethereum::on("accountsChanged", move |value: JsValue| {
                let accounts: Vec<String> =
                    serde_wasm_bindgen::from_value(value).unwrap_or_default();
                match accounts.first().and_then(|account| Address::from_str(account).ok()) {
                    Some(account) => wallet.account.set(Some(account)),
                    None => actions.disconnect(),
                }
            }),
            Ethereum::on("chainChanged", move |value: JsValue| {
                match value.as_string().map(|hex| parse_quantity(&hex)) {
                    Some(Ok(chain_id)) => wallet.chain_id.set(Some(chain_id)),
                    _ => warn!("unexpected chainChanged payload: {value:?}"),
                }
            }),
        ]
        .into_iter()
        .filter_map(|subscription| {
            subscription
                .inspect_err(|error| warn!("failed to subscribe to wallet events: {error}"))
                .ok()
        })
        .collect()
    } else {
        Vec::new()
    };
    let subscriptions = SendWrapper::new(subscriptions);

    let refresh_handle = set_interval_with_handle(
        move || spawn_local(actions.refresh_all()),
        REFRESH_INTERVAL,
    )
    .inspect_err(|_| warn!("failed to start the refresh timer"))
    .ok();

    on_cleanup(move || {
        info!("cleaning up <App/>");
        drop(subscriptions);
        if let Some(handle) = refresh_handle {
            handle.clear();
        }
    });

    // Node references

    let wallet_dialog_ref = NodeRef::<Dialog>::new();

    // HTML Elements

    let toggle_wallet_menu = move |_: MouseEvent| match wallet_dialog_ref.get() {
        Some(dialog) => match dialog.open() {
            false => {
                let _ = dialog.show();
            }
            true => dialog.close(),
        },
        None => alert("Something is wrong!"),
    };

    view! {
        <Title text="Private Aave" />
        <Router>
            <header>
                <div class="flex justify-between items-center">
                    <div id="mainTitle" class="my-2 font-bold text-3xl line-clamp-1">
                        "Private Aave"
                    </div>
                    <Show
                        when=move || wallet.is_connected()
                        fallback=move || {
                            view! {
                                <button
                                    on:click=move |_| connect.run(())
                                    disabled=move || wallet.connecting.get()
                                    class="min-w-24 text-sm font-semibold leading-none py-[5px] px-[12px] inline-flex justify-center items-center align-middle"
                                >
                                    "Connect Wallet"
                                </button>
                            }
                        }
                    >
                        <div class="relative inline-block">
                            <button
                                on:click=toggle_wallet_menu
                                class="min-w-24 text-sm font-semibold leading-none py-[5px] px-[12px] inline-flex justify-center items-center align-middle"
                            >
                                {move || wallet.account.get().map(shorten_address)}
                            </button>
                            <WalletMenu dialog_ref=wallet_dialog_ref />
                        </div>
                    </Show>
                </div>
                <hr />
                <Nav />
                <hr />
            </header>
            <main class="p-2 overflow-x-auto">
                <Routes fallback=|| "This page could not be found.">
                    <Route path=path!("/") view=Markets />
                    <Route path=path!("/relayer") view=Relayer />
                    <Route path=path!("/faucet") view=Faucet />
                </Routes>
            </main>
            <LoadingModal when=wallet.connecting message="Requesting Connection" />
            <Toasts />
        </Router>
    }
}
