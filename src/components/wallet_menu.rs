use crate::{
    actions::Actions,
    constants::{CHAIN, POOLS},
    state::{Dashboard, DashboardStoreFields, WalletSignals},
    utils::{human_balance, shorten_address},
};
use leptos::{html, prelude::*};
use lucide_leptos::{ChevronRight, Power, Wallet};
use reactive_stores::Store;
use tracing::info;
use web_sys::MouseEvent;

/// Dropdown under the account button: the connected address, a disconnect button and the
/// wallet's balances of every tracked token.
#[component]
pub fn WalletMenu(dialog_ref: NodeRef<html::Dialog>) -> impl IntoView {
    info!("rendering <WalletMenu/>");

    let wallet = use_context::<WalletSignals>().expect("wallet signals context missing!");
    let dashboard = use_context::<Store<Dashboard>>().expect("dashboard context missing!");
    let actions = use_context::<Actions>().expect("actions context missing!");

    let disconnect = move |_: MouseEvent| {
        actions.disconnect();
        if let Some(dialog) = dialog_ref.get() {
            dialog.close();
        }
    };

    let explorer_link = move || {
        wallet
            .account
            .get()
            .map(|account| format!("{}/address/{account}", CHAIN.explorer_url()))
    };

    let balance_rows = POOLS
        .iter()
        .flat_map(|pool| {
            [
                (pool.address, pool.decimals(), pool.symbol, pool.asset.logo),
                (
                    pool.asset.address,
                    pool.decimals(),
                    pool.asset.symbol,
                    pool.asset.logo,
                ),
            ]
        })
        .map(|(token, decimals, symbol, logo)| {
            let balance = move || {
                dashboard
                    .balances()
                    .with(|balances| human_balance(balances, token, decimals, symbol))
            };
            view! {
                <div class="flex items-center justify-between px-3 py-2 rounded hover:bg-secondary">
                    <div class="flex items-center gap-3">
                        <img src=logo class="w-6 h-6" />
                        <div class="text-sm font-semibold">{symbol}</div>
                    </div>
                    <div class="text-sm font-semibold">{balance}</div>
                </div>
            }
        })
        .collect_view();

    view! {
        <dialog
            node_ref=dialog_ref
            class="z-50 mr-0 mt-2 px-0 py-3 w-80 shadow-md bg-popover text-popover-foreground rounded-lg border border-solid border-border"
        >
            <div class="flex items-center justify-between px-6 pb-3">
                <div>
                    <div class="text-xs text-muted-foreground font-light">"Connected Account:"</div>
                    <div class="text-base font-semibold">
                        {move || wallet.account.get().map(shorten_address)}
                    </div>
                </div>
                <button
                    title="Disconnect wallet"
                    on:click=disconnect
                    class="w-10 h-10 p-0 inline-flex items-center justify-center rounded-full bg-transparent
                    hover:bg-secondary border border-solid border-border transition-all ease-standard duration-200"
                >
                    <Power size=16 />
                </button>
            </div>
            <hr class="m-0 border-border" />
            <div class="px-1 pt-2">
                <div class="flex items-center gap-3 px-3 py-2 font-semibold [&_svg]:stroke-muted-foreground">
                    <Wallet size=22 />
                    "Wallet"
                </div>
                {balance_rows}
            </div>
            <hr class="m-0 border-border" />
            <div class="px-2 pt-3">
                <a href=explorer_link target="_blank" rel="noopener">
                    <div class="menu-button">
                        <span class="text-sm text-muted-foreground">"View on explorer"</span>
                        <ChevronRight size=20 absolute_stroke_width=true />
                    </div>
                </a>
            </div>
        </dialog>
    }
}
